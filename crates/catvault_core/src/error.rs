//! Error types for the catalog cache.

use catvault_crypto::CryptoError;
use catvault_store::StoreError;
use thiserror::Error;

/// Result type for catalog cache operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in catalog cache operations.
///
/// Cryptographic failures are always typed distinctly from absence: a
/// missing catalog is `Ok(None)` or an empty scan, never an error, while
/// an unreadable record is never collapsed into "not found".
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cipher operation failed outside the context of a specific record.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The underlying record store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Decrypted plaintext was not a well-formed catalog.
    #[error("malformed catalog record: {message}")]
    MalformedRecord {
        /// Description of the decode failure.
        message: String,
    },

    /// A stored record failed verification or decryption.
    #[error("catalog {catalog_id} unreadable: {source}")]
    RecordUnreadable {
        /// The catalog whose record could not be opened.
        catalog_id: String,
        /// The underlying cryptographic failure.
        #[source]
        source: CryptoError,
    },

    /// A plaintext index field disagrees with the decrypted payload.
    ///
    /// Treated as an integrity failure: something rewrote the index
    /// fields out-of-band.
    #[error("catalog {catalog_id}: index field {field} does not match decrypted payload")]
    IndexMismatch {
        /// The catalog with the mismatched record.
        catalog_id: String,
        /// Which index field disagreed.
        field: &'static str,
    },

    /// A required catalog name never resolved during initialization.
    ///
    /// Fatal to the session-init flow; callers must surface a blocking
    /// error rather than proceed with partial catalog data.
    #[error("required catalog missing: {name}")]
    CriticalCatalogMissing {
        /// The required name that had no catalog.
        name: String,
    },

    /// The resolution map has not been initialized yet.
    ///
    /// Pending-retry, not permanent absence.
    #[error("resolution map not initialized yet")]
    ResolverNotReady,

    /// A name lookup hit a name outside the resolved set.
    #[error("unknown catalog name: {name}")]
    UnknownCatalogName {
        /// The unresolved name.
        name: String,
    },
}

impl CoreError {
    /// Creates a malformed record error.
    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    /// Creates a record unreadable error.
    pub fn record_unreadable(catalog_id: impl Into<String>, source: CryptoError) -> Self {
        Self::RecordUnreadable {
            catalog_id: catalog_id.into(),
            source,
        }
    }

    /// Creates an index mismatch error.
    pub fn index_mismatch(catalog_id: impl Into<String>, field: &'static str) -> Self {
        Self::IndexMismatch {
            catalog_id: catalog_id.into(),
            field,
        }
    }

    /// Creates a critical catalog missing error.
    pub fn critical_catalog_missing(name: impl Into<String>) -> Self {
        Self::CriticalCatalogMissing { name: name.into() }
    }

    /// Creates an unknown catalog name error.
    pub fn unknown_catalog_name(name: impl Into<String>) -> Self {
        Self::UnknownCatalogName { name: name.into() }
    }
}

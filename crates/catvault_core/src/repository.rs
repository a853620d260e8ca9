//! The catalog repository: encrypt-then-store, fetch-then-decrypt.

use crate::catalog::Catalog;
use crate::codec::{decode_catalog, encode_catalog};
use crate::error::{CoreError, CoreResult};
use catvault_crypto::CatalogCipher;
use catvault_store::{EncryptedRecord, IndexKey, RecordStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a list read under the skip-and-collect policy.
///
/// Every list read returns both the catalogs that opened cleanly and a
/// typed failure per record that did not. Nothing is silently swallowed:
/// a caller that wants abort-on-first-error semantics uses
/// [`into_strict`](Self::into_strict).
#[derive(Debug)]
pub struct CatalogScan {
    /// Catalogs that decrypted and decoded cleanly.
    pub catalogs: Vec<Catalog>,
    /// Records that failed, with the catalog id and the typed error.
    pub failures: Vec<RecordFailure>,
}

impl CatalogScan {
    /// Returns true if every record opened cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts to the abort-on-first-error view.
    ///
    /// # Errors
    ///
    /// Returns the first per-record failure if any record was unreadable.
    pub fn into_strict(self) -> CoreResult<Vec<Catalog>> {
        match self.failures.into_iter().next() {
            None => Ok(self.catalogs),
            Some(failure) => Err(failure.error),
        }
    }
}

/// One record that could not be opened during a scan.
#[derive(Debug)]
pub struct RecordFailure {
    /// The catalog id of the failing record.
    pub catalog_id: String,
    /// Why the record could not be opened.
    pub error: CoreError,
}

/// Result of a bulk replace.
#[derive(Debug)]
pub struct ReplaceOutcome {
    /// Number of catalogs stored.
    pub stored: usize,
    /// Catalogs that could not be sealed and were skipped.
    pub skipped: Vec<RecordFailure>,
}

/// Read/write facade over the encrypted record store.
///
/// This is the only component that sees both plaintext catalogs and the
/// cipher. All reads return plaintext, all writes accept plaintext; the
/// record's plaintext index fields are derived here, at write time, from
/// the catalog being sealed, and cross-checked again on every read.
pub struct CatalogRepository {
    store: Arc<RecordStore>,
    cipher: CatalogCipher,
}

impl CatalogRepository {
    /// Creates a repository over a store and a cipher.
    #[must_use]
    pub fn new(store: Arc<RecordStore>, cipher: CatalogCipher) -> Self {
        Self { store, cipher }
    }

    /// Encrypts a catalog and upserts its record.
    ///
    /// The caller's catalog is stored as-is; the store never derives
    /// fields of its own.
    pub fn save(&self, catalog: &Catalog) -> CoreResult<()> {
        let record = self.seal(catalog)?;
        self.store.put(record)?;
        Ok(())
    }

    /// Fetches and decrypts a catalog by id.
    ///
    /// An absent id is `Ok(None)`, not an error. A present but unreadable
    /// record is an error.
    pub fn get_by_id(&self, catalog_id: &str) -> CoreResult<Option<Catalog>> {
        match self.store.get(catalog_id)? {
            Some(record) => Ok(Some(self.open(&record)?)),
            None => Ok(None),
        }
    }

    /// Fetches and decrypts every catalog.
    pub fn get_all(&self) -> CoreResult<CatalogScan> {
        let records = self.store.get_all()?;
        Ok(self.open_many(records))
    }

    /// Fetches and decrypts the catalogs with the given name.
    pub fn get_by_name(&self, catalog_name: &str) -> CoreResult<CatalogScan> {
        let records = self.store.get_by_index(IndexKey::Name(catalog_name))?;
        Ok(self.open_many(records))
    }

    /// Fetches and decrypts the catalogs with the given active flag.
    pub fn get_active(&self, is_active: bool) -> CoreResult<CatalogScan> {
        let records = self.store.get_by_index(IndexKey::Active(is_active))?;
        Ok(self.open_many(records))
    }

    /// Fetches and decrypts every catalog, ordered by update timestamp
    /// ascending.
    pub fn get_all_ordered_by_update(&self) -> CoreResult<CatalogScan> {
        let records = self.store.all_ordered_by_update()?;
        Ok(self.open_many(records))
    }

    /// Replaces the entire cached set, the entry point for a full
    /// resynchronization.
    ///
    /// Every catalog is sealed first; a catalog that fails to seal is
    /// logged and skipped rather than aborting the batch. The surviving
    /// records then replace the old set in one atomic store step, so a
    /// crash mid-sync leaves either the old full set or the new full set.
    pub fn replace_all(&self, catalogs: &[Catalog]) -> CoreResult<ReplaceOutcome> {
        let mut records = Vec::with_capacity(catalogs.len());
        let mut skipped = Vec::new();

        for catalog in catalogs {
            match self.seal(catalog) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(
                        catalog_id = %catalog.catalog_id,
                        %error,
                        "skipping catalog that failed to seal"
                    );
                    skipped.push(RecordFailure {
                        catalog_id: catalog.catalog_id.clone(),
                        error,
                    });
                }
            }
        }

        let stored = records.len();
        self.store.replace_all(records)?;
        debug!(stored, skipped = skipped.len(), "catalog set replaced");

        Ok(ReplaceOutcome { stored, skipped })
    }

    /// Builds the at-rest record for a catalog.
    ///
    /// Index fields come from the catalog and nowhere else.
    fn seal(&self, catalog: &Catalog) -> CoreResult<EncryptedRecord> {
        let plaintext = encode_catalog(catalog)?;
        let sealed = self.cipher.encrypt_and_sign(&plaintext)?;

        Ok(EncryptedRecord {
            catalog_id: catalog.catalog_id.clone(),
            catalog_name: catalog.catalog_name.clone(),
            is_active: catalog.is_active,
            updated_at: catalog.updated_at.clone(),
            encrypted_data: sealed,
        })
    }

    /// Opens a record: verify, decrypt, decode, cross-check indexes.
    fn open(&self, record: &EncryptedRecord) -> CoreResult<Catalog> {
        let plaintext = self
            .cipher
            .decrypt_and_verify(&record.encrypted_data)
            .map_err(|e| CoreError::record_unreadable(&record.catalog_id, e))?;

        let catalog = decode_catalog(&plaintext)?;

        // The plaintext index fields are a cache of the payload; a
        // disagreement means something rewrote them out-of-band.
        if catalog.catalog_id != record.catalog_id {
            return Err(CoreError::index_mismatch(&record.catalog_id, "catalog_id"));
        }
        if catalog.catalog_name != record.catalog_name {
            return Err(CoreError::index_mismatch(&record.catalog_id, "catalog_name"));
        }
        if catalog.is_active != record.is_active {
            return Err(CoreError::index_mismatch(&record.catalog_id, "is_active"));
        }
        if catalog.updated_at != record.updated_at {
            return Err(CoreError::index_mismatch(&record.catalog_id, "updated_at"));
        }

        Ok(catalog)
    }

    /// Opens a batch of records under the skip-and-collect policy.
    fn open_many(&self, records: Vec<EncryptedRecord>) -> CatalogScan {
        let mut catalogs = Vec::with_capacity(records.len());
        let mut failures = Vec::new();

        for record in &records {
            match self.open(record) {
                Ok(catalog) => catalogs.push(catalog),
                Err(error) => {
                    debug!(catalog_id = %record.catalog_id, %error, "record failed to open");
                    failures.push(RecordFailure {
                        catalog_id: record.catalog_id.clone(),
                        error,
                    });
                }
            }
        }

        CatalogScan { catalogs, failures }
    }
}

impl std::fmt::Debug for CatalogRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogRepository")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

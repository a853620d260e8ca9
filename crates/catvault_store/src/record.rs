//! The at-rest record shape.

use catvault_crypto::SealedBlob;
use serde::{Deserialize, Serialize};

/// One persisted catalog record.
///
/// The four plaintext fields exist only to support indexed lookup without
/// decryption; the sealed blob carries the full catalog, including copies
/// of these same fields. The repository layer is the sole writer and
/// derives the plaintext fields from the catalog it encrypts, and it
/// cross-checks them again on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Primary key, assigned by the server.
    pub catalog_id: String,
    /// Secondary index: human-readable catalog name.
    pub catalog_name: String,
    /// Secondary index: soft-delete / visibility flag.
    pub is_active: bool,
    /// Secondary index: ISO-8601 update timestamp, used for ordered scans.
    pub updated_at: String,
    /// The authenticated ciphertext of the whole catalog.
    pub encrypted_data: SealedBlob,
}

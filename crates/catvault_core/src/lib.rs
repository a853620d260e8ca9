//! # CatVault Core
//!
//! The encrypted catalog cache: plaintext catalog model, JSON codec,
//! the repository facade that orchestrates encrypt-then-store and
//! fetch-then-decrypt, and the session-scoped name-to-id resolver.
//!
//! ## Layering
//!
//! - [`catvault_crypto`] seals and opens opaque payloads
//! - [`catvault_store`] persists sealed records with plaintext indexes
//! - this crate is the only place that sees both plaintext catalogs and
//!   the cipher; UI-facing callers get plaintext in, plaintext out and
//!   never touch cryptographic material
//!
//! ## Example
//!
//! ```
//! use catvault_core::{
//!     Catalog, CatalogCipher, CatalogRepository, CatalogType, CatalogValue, KeySet,
//!     MemoryBackend, RecordStore,
//! };
//! use std::sync::Arc;
//!
//! let store = Arc::new(RecordStore::open(Box::new(MemoryBackend::new())).unwrap());
//! let repo = CatalogRepository::new(store, CatalogCipher::new(KeySet::generate()));
//!
//! let catalog = Catalog {
//!     catalog_id: "c1".into(),
//!     catalog_name: "genders".into(),
//!     catalog_type: CatalogType::List,
//!     is_active: true,
//!     value: CatalogValue::List(vec![]),
//!     description: None,
//!     created_at: None,
//!     updated_at: "2026-01-01T00:00:00Z".into(),
//!     created_by_user_id: None,
//!     updated_by_user_id: None,
//! };
//!
//! repo.save(&catalog).unwrap();
//! assert_eq!(repo.get_by_id("c1").unwrap(), Some(catalog));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod codec;
mod error;
mod repository;
mod resolver;

pub use catalog::{Catalog, CatalogEntry, CatalogType, CatalogValue};
pub use codec::{decode_catalog, encode_catalog};
pub use error::{CoreError, CoreResult};
pub use repository::{CatalogRepository, CatalogScan, RecordFailure, ReplaceOutcome};
pub use resolver::{CatalogResolver, ResolutionMap, ResolverStatus};

// Re-export the lower layers that callers wire together.
pub use catvault_crypto::{CatalogCipher, CryptoError, KeySet, SealedBlob};
pub use catvault_store::{
    EncryptedRecord, FileBackend, IndexKey, MemoryBackend, RecordStore, SnapshotBackend,
    StoreError,
};

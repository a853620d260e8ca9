//! # CatVault Store
//!
//! Durable local persistence for encrypted catalog records.
//!
//! The store keeps [`EncryptedRecord`] values keyed by catalog id, with
//! exact-match secondary lookups on catalog name and active flag and an
//! ordered scan over the update timestamp. Records carry only the minimum
//! plaintext needed for those lookups; everything else lives in the opaque
//! sealed blob.
//!
//! ## Durability
//!
//! Persistence goes through a [`SnapshotBackend`]: every mutating call
//! writes a full snapshot of the post-mutation record set before the
//! change becomes visible in memory. A failed persist leaves both memory
//! and disk at the pre-call state, which makes each call transactional and
//! [`RecordStore::replace_all`] atomic - after a crash mid-replace the
//! snapshot is either the old set or the new set, never a mix.
//!
//! ## Backends
//!
//! - [`MemoryBackend`] - for tests and ephemeral caches
//! - [`FileBackend`] - atomic temp-file-then-rename snapshots with an
//!   exclusive advisory lock

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod record;
mod store;

pub use backend::SnapshotBackend;
pub use error::{StoreError, StoreResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use record::EncryptedRecord;
pub use store::{IndexKey, RecordStore, SNAPSHOT_VERSION};

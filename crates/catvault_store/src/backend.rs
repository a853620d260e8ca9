//! Snapshot backend trait definition.

use crate::error::StoreResult;

/// A durable home for store snapshots.
///
/// Backends are **opaque byte stores**: they hold exactly one snapshot and
/// do not interpret it. The [`crate::RecordStore`] owns the snapshot
/// format.
///
/// # Invariants
///
/// - `load` returns exactly the bytes of the last successful `persist`,
///   or `None` if nothing was ever persisted
/// - `persist` is atomic: after a crash, `load` yields either the previous
///   snapshot or the new one, never a torn write
pub trait SnapshotBackend: Send {
    /// Loads the current snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read.
    fn load(&mut self) -> StoreResult<Option<Vec<u8>>>;

    /// Durably replaces the snapshot with `bytes`.
    ///
    /// After this returns successfully the snapshot survives process
    /// termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the previous snapshot must
    /// remain intact in that case.
    fn persist(&mut self, bytes: &[u8]) -> StoreResult<()>;
}

//! In-memory snapshot backend for testing.

use crate::backend::SnapshotBackend;
use crate::error::{StoreError, StoreResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// An in-memory snapshot backend.
///
/// Suitable for unit tests and ephemeral caches that don't need to survive
/// a restart. Cloning shares the underlying state, so a test can keep a
/// handle to inspect the snapshot or inject a persist failure after the
/// backend has been handed to a store - that is how the replace-all
/// atomicity tests simulate a crash mid-sync.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<Vec<u8>>,
    fail_next_persist: bool,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-loaded with a snapshot.
    ///
    /// Useful for testing recovery and corruption handling.
    #[must_use]
    pub fn with_snapshot(bytes: Vec<u8>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                snapshot: Some(bytes),
                fail_next_persist: false,
            })),
        }
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.state.lock().snapshot.clone()
    }

    /// Makes the next `persist` call fail, leaving the snapshot intact.
    pub fn fail_next_persist(&self) {
        self.state.lock().fail_next_persist = true;
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&mut self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.state.lock().snapshot.clone())
    }

    fn persist(&mut self, bytes: &[u8]) -> StoreResult<()> {
        let mut state = self.state.lock();
        if state.fail_next_persist {
            state.fail_next_persist = false;
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated persist failure",
            )));
        }
        state.snapshot = Some(bytes.to_vec());
        Ok(())
    }
}

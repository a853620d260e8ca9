//! Session-scoped resolution of catalog names to server-assigned ids.
//!
//! UI code refers to catalogs by a fixed set of human-readable names; the
//! server assigns the opaque ids. The resolver scans the repository once
//! per session and produces an immutable name-to-id map, so ids are never
//! hardcoded and the map is never ambient mutable state.

use crate::error::{CoreError, CoreResult};
use crate::repository::CatalogRepository;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable mapping from catalog name to catalog id.
///
/// Built once by [`CatalogResolver::initialize`] and shared as an `Arc`;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionMap {
    map: BTreeMap<String, String>,
}

impl ResolutionMap {
    /// Returns the catalog id for a name, if resolved.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Returns the resolved names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Returns the number of resolved names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Observable state of the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverStatus {
    /// No initialization attempt has completed; lookups are pending-retry.
    Uninitialized,
    /// Every required name resolved; the map is available and immutable.
    Ready,
    /// A required name was missing; terminal for the session.
    Failed,
}

impl ResolverStatus {
    /// Returns true if lookups can succeed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, ResolverStatus::Ready)
    }

    /// Returns true if the session must surface a blocking error.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        matches!(self, ResolverStatus::Failed)
    }
}

enum ResolverState {
    Uninitialized,
    Ready(Arc<ResolutionMap>),
    Failed(String),
}

/// One-shot initializer for the name-to-id map.
///
/// `initialize` is single-flight: the state is settled under one mutex,
/// so a concurrent second initializer blocks and then observes the
/// settled outcome - never a partially populated map. `Ready` is
/// idempotent; `Failed` is terminal for the session and repeated calls
/// return the same error without rescanning.
pub struct CatalogResolver {
    repository: Arc<CatalogRepository>,
    required: Vec<String>,
    state: Mutex<ResolverState>,
}

impl CatalogResolver {
    /// Creates a resolver for the given fixed set of required names.
    #[must_use]
    pub fn new(
        repository: Arc<CatalogRepository>,
        required: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            repository,
            required: required.into_iter().map(Into::into).collect(),
            state: Mutex::new(ResolverState::Uninitialized),
        }
    }

    /// Returns the current status without touching the repository.
    pub fn status(&self) -> ResolverStatus {
        match *self.state.lock() {
            ResolverState::Uninitialized => ResolverStatus::Uninitialized,
            ResolverState::Ready(_) => ResolverStatus::Ready,
            ResolverState::Failed(_) => ResolverStatus::Failed,
        }
    }

    /// Builds the map by scanning the repository for every required name.
    ///
    /// When several catalogs share a name, the first match wins.
    ///
    /// # Errors
    ///
    /// - [`CoreError::CriticalCatalogMissing`] if any required name has no
    ///   readable catalog; the resolver transitions to `Failed` and the
    ///   map stays empty.
    /// - Store errors propagate without settling the state, so a
    ///   transient failure can be retried.
    pub fn initialize(&self) -> CoreResult<Arc<ResolutionMap>> {
        let mut state = self.state.lock();

        match &*state {
            ResolverState::Ready(map) => return Ok(Arc::clone(map)),
            ResolverState::Failed(name) => {
                return Err(CoreError::critical_catalog_missing(name.clone()));
            }
            ResolverState::Uninitialized => {}
        }

        let mut map = BTreeMap::new();
        for name in &self.required {
            let scan = self.repository.get_by_name(name)?;
            match scan.catalogs.first() {
                Some(catalog) => {
                    map.insert(name.clone(), catalog.catalog_id.clone());
                }
                None => {
                    warn!(name = %name, "required catalog missing, resolution failed");
                    *state = ResolverState::Failed(name.clone());
                    return Err(CoreError::critical_catalog_missing(name.clone()));
                }
            }
        }

        debug!(resolved = map.len(), "resolution map ready");
        let map = Arc::new(ResolutionMap { map });
        *state = ResolverState::Ready(Arc::clone(&map));
        Ok(map)
    }

    /// Resolves a catalog name to its id.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ResolverNotReady`] before initialization completes
    ///   (pending-retry, not permanent absence).
    /// - [`CoreError::CriticalCatalogMissing`] after a failed
    ///   initialization.
    /// - [`CoreError::UnknownCatalogName`] for a name outside the
    ///   resolved set.
    pub fn resolve(&self, name: &str) -> CoreResult<String> {
        match &*self.state.lock() {
            ResolverState::Uninitialized => Err(CoreError::ResolverNotReady),
            ResolverState::Failed(missing) => {
                Err(CoreError::critical_catalog_missing(missing.clone()))
            }
            ResolverState::Ready(map) => map
                .get(name)
                .map(str::to_owned)
                .ok_or_else(|| CoreError::unknown_catalog_name(name)),
        }
    }
}

impl std::fmt::Debug for CatalogResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogResolver")
            .field("required", &self.required)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

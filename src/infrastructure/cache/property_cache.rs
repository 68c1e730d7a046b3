//! Generic get-or-create property cache engine

use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::properties::PropertySource;

/// Lazy cache of canonical property bundles, one slot per cache key
///
/// Entries are installed on first use and never removed; the map grows with
/// the number of distinct cache keys seen and lives as long as its owner.
/// Lookups and installs go through a sharded concurrent map, so readers do
/// not block writers and concurrent installs resolve first-writer-wins.
pub struct PropertyCache<K, O, B> {
    entries: DashMap<String, Arc<B>>,
    _kind: PhantomData<fn(K, O) -> B>,
}

impl<K, O, B> PropertyCache<K, O, B> {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            _kind: PhantomData,
        }
    }

    /// Returns the canonical bundle for `id`, constructing and installing it
    /// on first use
    ///
    /// When the source derives no cache key the call bypasses the cache
    /// entirely and builds a fresh bundle. Absent overrides are normalized to
    /// `source.default_overrides()` before construction on every path, so
    /// passing `None` and passing the declared default are equivalent.
    ///
    /// Construction runs outside any map lock. Concurrent first calls for the
    /// same key may therefore each build a candidate; exactly one candidate
    /// is published and the losers' are dropped, so `build` must not have
    /// externally visible irreversible side effects. A failed build installs
    /// nothing and a later call retries the same key.
    pub fn get_or_create(
        &self,
        source: &dyn PropertySource<K, O, B>,
        id: &K,
        overrides: Option<O>,
    ) -> Result<Arc<B>, DomainError> {
        let Some(cache_key) = source.cache_key(id, overrides.as_ref()) else {
            debug!("No cache key derived, bypassing property cache");
            let overrides = overrides.unwrap_or_else(|| source.default_overrides());
            return source.build(id, &overrides).map(Arc::new);
        };

        if let Some(existing) = self.entries.get(&cache_key) {
            return Ok(Arc::clone(existing.value()));
        }

        let overrides = overrides.unwrap_or_else(|| source.default_overrides());
        let candidate = Arc::new(source.build(id, &overrides)?);

        match self.entries.entry(cache_key) {
            Entry::Occupied(winner) => {
                debug!(cache_key = %winner.key(), "Lost install race, returning winning bundle");
                Ok(Arc::clone(winner.get()))
            }
            Entry::Vacant(slot) => {
                debug!(cache_key = %slot.key(), "Installed property bundle");
                slot.insert(Arc::clone(&candidate));
                Ok(candidate)
            }
        }
    }

    /// Number of installed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been installed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, O, B> Default for PropertyCache<K, O, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, O, B> std::fmt::Debug for PropertyCache<K, O, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

//! Descriptor cache.
//!
//! Maps a [`CacheKey`] (interface set plus mode) to the [`ProxyDescriptor`]
//! built for it. Entries are never evicted: descriptors live as long as the
//! cache, which for the global factory is the whole program.
//!
//! # Concurrency
//!
//! The cache is a `DashMap`. Lookups take a read lock on one shard. A miss
//! builds the descriptor while holding the entry's shard write lock, so for
//! any key the build runs at most once and concurrent callers all observe the
//! same `Arc`. A failed build leaves no entry behind.

use crate::error::{Error, Result};
use crate::runtime::contract::{Interface, InterfaceId};
use crate::runtime::descriptor::{Mode, ProxyDescriptor};
use dashmap::DashMap;
use fxhash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity of a descriptor: an interface set and a mode.
///
/// Interface identities are kept sorted, so two keys requesting the same set
/// in different orders are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    interfaces: Box<[InterfaceId]>,
    mode: Mode,
}

impl CacheKey {
    /// Creates the key for `interfaces` in `mode`.
    ///
    /// Repeated interfaces count once.
    #[must_use]
    pub fn new(interfaces: &[&'static Interface], mode: Mode) -> Self {
        let mut ids: Vec<InterfaceId> = interfaces.iter().map(|i| i.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        Self {
            interfaces: ids.into_boxed_slice(),
            mode,
        }
    }

    /// Sorted interface identities.
    #[must_use]
    pub fn interfaces(&self) -> &[InterfaceId] {
        &self.interfaces
    }

    /// Binding mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

/// Concurrent, build-once store of proxy descriptors.
pub struct DescriptorCache {
    entries: DashMap<CacheKey, Arc<ProxyDescriptor>, FxBuildHasher>,
    builds: AtomicUsize,
}

impl DescriptorCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher::default()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Returns the descriptor for `key`, running `build` if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns the error of `build`; nothing is cached in that case.
    pub fn get_or_build<F>(&self, key: CacheKey, build: F) -> Result<Arc<ProxyDescriptor>>
    where
        F: FnOnce(&CacheKey) -> Result<ProxyDescriptor>,
    {
        if let Some(descriptor) = self.entries.get(&key) {
            return Ok(Arc::clone(descriptor.value()));
        }

        let probe = key.clone();
        let entry = self.entries.entry(key).or_try_insert_with(|| {
            let descriptor = build(&probe)?;
            self.builds.fetch_add(1, Ordering::Relaxed);
            Ok::<_, Error>(Arc::new(descriptor))
        })?;
        Ok(Arc::clone(entry.value()))
    }

    /// Returns the descriptor for `key` if one was built.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ProxyDescriptor>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of descriptor builds performed so far.
    #[must_use]
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached descriptor.
    ///
    /// Proxies already created keep their descriptor alive.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("entries", &self.len())
            .field("builds", &self.builds())
            .finish()
    }
}

//! Hot cache module
//!
//! A bounded in-memory copy of recently served assets, populated only by
//! deferred jobs after the triggering response has already gone out. There
//! is no eviction: once the cap is reached, new paths simply keep being
//! served from the store. The cap bounds memory, nothing more.

use super::ResolvedAsset;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub struct HotCache {
    max_entries: usize,
    entries: RwLock<HashMap<String, Arc<ResolvedAsset>>>,
}

impl HotCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a logical path. Lock poisoning is treated as a miss so a
    /// panicked writer can never take the serving path down.
    pub fn get(&self, logical: &str) -> Option<Arc<ResolvedAsset>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(logical).cloned())
    }

    /// Insert an asset fetched from the store. Re-inserting an existing
    /// path refreshes it; a new path is dropped once the cache is full.
    pub fn insert(&self, logical: String, asset: Arc<ResolvedAsset>) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        if entries.len() >= self.max_entries && !entries.contains_key(&logical) {
            return;
        }
        entries.insert(logical, asset);
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Secondary indices over the primary record map
//!
//! A [`LookupIndex`] maps a secondary key (drug name, canonical pair,
//! content hash) to the primary key of a record. The index itself does not
//! enforce uniqueness: the registries check it before staging a write, and
//! the store applies inserts and repoints only inside a committed
//! transaction, under the registry lock.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Secondary index: lookup key → primary key
#[derive(Debug)]
pub struct LookupIndex<I, K> {
    index: FxHashMap<I, K>,
}

impl<I, K> Default for LookupIndex<I, K> {
    fn default() -> Self {
        Self {
            index: FxHashMap::default(),
        }
    }
}

impl<I, K> LookupIndex<I, K>
where
    I: Eq + Hash,
    K: Copy + Eq,
{
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary key stored under `lookup`
    pub fn get(&self, lookup: &I) -> Option<K> {
        self.index.get(lookup).copied()
    }

    /// Check whether `lookup` is present
    pub fn contains(&self, lookup: &I) -> bool {
        self.index.contains_key(lookup)
    }

    /// Point `lookup` at `key`, replacing any previous entry
    pub fn insert(&mut self, lookup: I, key: K) {
        self.index.insert(lookup, key);
    }

    /// Move `key` from `old` to `new`
    ///
    /// The `old` entry is removed only if it still points at `key`; an entry
    /// that was taken over by another record is left alone. Repointing to the
    /// same lookup key changes nothing.
    pub fn repoint(&mut self, old: &I, new: I, key: K) {
        if old == &new {
            return;
        }
        if self.index.get(old) == Some(&key) {
            self.index.remove(old);
        }
        self.index.insert(new, key);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

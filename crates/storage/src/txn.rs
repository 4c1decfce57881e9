//! Staged registry transactions
//!
//! A [`RegistryTxn`] is handed to the closure passed to
//! [`RegistryStore::transaction`](crate::RegistryStore::transaction). It
//! reads the committed state and buffers every write. The buffered writes
//! are applied to all indices at once when the closure returns `Ok`, and
//! dropped when it returns `Err`.
//!
//! ## Read-your-writes
//!
//! Reads through the transaction see its own staged writes layered over the
//! committed state, so a pipeline that stages an insert and then asks for
//! the count or the name index gets a consistent answer.

use rxregistry_core::{Record, UpdateRecord};

use crate::governance::RegistryConfig;
use crate::store::StoreState;

/// A buffered write
#[derive(Debug)]
pub(crate) enum StagedWrite<R: Record> {
    /// A new record under a fresh key
    Insert { key: R::Key, record: R },
    /// A whole-record replacement plus its update history entry
    Replace {
        key: R::Key,
        record: R,
        update: UpdateRecord<R::Changes>,
    },
}

impl<R: Record> StagedWrite<R> {
    fn key(&self) -> &R::Key {
        match self {
            StagedWrite::Insert { key, .. } | StagedWrite::Replace { key, .. } => key,
        }
    }

    fn record(&self) -> &R {
        match self {
            StagedWrite::Insert { record, .. } | StagedWrite::Replace { record, .. } => record,
        }
    }
}

/// Transaction over one registry
///
/// Holds the registry lock for its whole lifetime.
pub struct RegistryTxn<'a, R: Record> {
    state: &'a StoreState<R>,
    writes: Vec<StagedWrite<R>>,
}

impl<'a, R: Record> RegistryTxn<'a, R> {
    pub(crate) fn new(state: &'a StoreState<R>) -> Self {
        RegistryTxn {
            state,
            writes: Vec::new(),
        }
    }

    pub(crate) fn into_writes(self) -> Vec<StagedWrite<R>> {
        self.writes
    }

    // ========== Reads ==========

    /// Record under `key`, including staged writes
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.key() == key)
            .map(StagedWrite::record)
            .or_else(|| self.state.records.get(key))
    }

    /// Primary key currently holding `index_key`, including staged writes
    pub fn lookup(&self, index_key: &R::IndexKey) -> Option<R::Key> {
        let holds = |key: &R::Key| {
            self.get(key)
                .is_some_and(|record| &record.index_key() == index_key)
        };

        if let Some(key) = self.writes.iter().rev().map(StagedWrite::key).find(|k| holds(*k)) {
            return Some(*key);
        }
        self.state.by_index.get(index_key).filter(|key| holds(key))
    }

    /// Committed configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.state.config
    }

    /// Next identifier, counting staged inserts
    pub fn next_id(&self) -> u64 {
        self.state
            .config
            .next_id()
            .saturating_add(self.staged_inserts())
    }

    /// Check if another insert would exceed capacity
    pub fn is_full(&self) -> bool {
        self.next_id() >= self.state.config.max_records()
    }

    fn staged_inserts(&self) -> u64 {
        self.writes
            .iter()
            .filter(|w| matches!(w, StagedWrite::Insert { .. }))
            .count() as u64
    }

    // ========== Writes ==========

    /// Stage a new record
    ///
    /// The caller has already checked that `key` and the record's index key
    /// are free. On commit the record enters the primary map, the uniqueness
    /// index and the hash index, and the counter advances.
    pub fn insert(&mut self, key: R::Key, record: R) {
        self.writes.push(StagedWrite::Insert { key, record });
    }

    /// Stage a whole-record replacement
    ///
    /// On commit the record replaces the stored one, index entries move if
    /// the index key or hash changed, and `update` overwrites the previous
    /// update history entry for `key`.
    pub fn replace(&mut self, key: R::Key, record: R, update: UpdateRecord<R::Changes>) {
        self.writes.push(StagedWrite::Replace {
            key,
            record,
            update,
        });
    }
}

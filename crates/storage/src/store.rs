//! RegistryStore: the multi-index store behind each registry
//!
//! This module implements the storage side of a registry using:
//! - `FxHashMap<Key, R>` for the primary record map
//! - a uniqueness index (`IndexKey → Key`)
//! - a latest-wins hash index (`ContentHash → Key`)
//! - `FxHashMap<Key, UpdateRecord>` for the last update of each record
//! - the [`RegistryConfig`] counter, capacity, fee and authority slot
//! - a single `parking_lot::Mutex` guarding all of the above
//!
//! # Design Notes
//!
//! - **One lock per registry**: the uniqueness index and the primary map
//!   change as one unit, so a per-record lock cannot protect them.
//! - **Staged commit**: mutations run inside [`RegistryStore::transaction`],
//!   which buffers writes and applies them only when the closure succeeds.
//!   Applying buffered writes cannot fail, so a transaction either changes
//!   every index or none.
//! - **Snapshot reads**: projections return cloned records; no reference
//!   into the maps escapes the lock.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use rxregistry_core::{ContentHash, GovernanceError, Principal, Record, UpdateRecord};

use crate::governance::RegistryConfig;
use crate::index::LookupIndex;
use crate::txn::{RegistryTxn, StagedWrite};

/// Everything a registry owns
#[derive(Debug)]
pub(crate) struct StoreState<R: Record> {
    pub(crate) records: FxHashMap<R::Key, R>,
    pub(crate) by_index: LookupIndex<R::IndexKey, R::Key>,
    pub(crate) by_hash: LookupIndex<ContentHash, R::Key>,
    pub(crate) updates: FxHashMap<R::Key, UpdateRecord<R::Changes>>,
    pub(crate) config: RegistryConfig,
}

impl<R: Record> StoreState<R> {
    fn new(config: RegistryConfig) -> Self {
        StoreState {
            records: FxHashMap::default(),
            by_index: LookupIndex::new(),
            by_hash: LookupIndex::new(),
            updates: FxHashMap::default(),
            config,
        }
    }

    /// Apply buffered writes to every index
    fn apply(&mut self, writes: Vec<StagedWrite<R>>) {
        for write in writes {
            match write {
                StagedWrite::Insert { key, record } => {
                    self.by_index.insert(record.index_key(), key);
                    self.by_hash.insert(*record.content_hash(), key);
                    self.records.insert(key, record);
                    self.config.advance();
                }
                StagedWrite::Replace {
                    key,
                    record,
                    update,
                } => {
                    match self.records.get(&key) {
                        Some(previous) => {
                            let old_index = previous.index_key();
                            let old_hash = *previous.content_hash();
                            self.by_index.repoint(&old_index, record.index_key(), key);
                            self.by_hash.repoint(&old_hash, *record.content_hash(), key);
                        }
                        None => {
                            self.by_index.insert(record.index_key(), key);
                            self.by_hash.insert(*record.content_hash(), key);
                        }
                    }
                    self.updates.insert(key, update);
                    self.records.insert(key, record);
                }
            }
        }
    }
}

/// Multi-index store for one registry
///
/// Thread-safe through a single `parking_lot::Mutex`. All mutations go
/// through [`transaction`](Self::transaction); governance changes through
/// [`set_authority`](Self::set_authority) and [`set_fee`](Self::set_fee).
pub struct RegistryStore<R: Record> {
    state: Mutex<StoreState<R>>,
}

impl<R: Record> RegistryStore<R> {
    /// Create an empty store
    pub fn new(config: RegistryConfig) -> Self {
        RegistryStore {
            state: Mutex::new(StoreState::new(config)),
        }
    }

    // ========== Mutations ==========

    /// Run `f` as one all-or-nothing transaction
    ///
    /// Holds the registry lock for the duration of `f`. Writes staged on the
    /// transaction are applied together if `f` returns `Ok`, and discarded
    /// if it returns `Err`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let id = store.transaction(|txn| {
    ///     if txn.lookup(&name).is_some() {
    ///         return Err(DrugError::AlreadyExists);
    ///     }
    ///     let id = DrugId::new(txn.next_id());
    ///     txn.insert(id, record);
    ///     Ok(id)
    /// })?;
    /// ```
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut RegistryTxn<'_, R>) -> Result<T, E>,
    {
        let mut state = self.state.lock();

        let (result, writes) = {
            let mut txn = RegistryTxn::new(&state);
            let result = f(&mut txn);
            (result, txn.into_writes())
        };

        match result {
            Ok(value) => {
                trace!(target: "rxregistry::store", kind = R::KIND, writes = writes.len(), "Committing");
                state.apply(writes);
                Ok(value)
            }
            Err(e) => {
                if !writes.is_empty() {
                    debug!(target: "rxregistry::store", kind = R::KIND, discarded = writes.len(), "Discarding staged writes");
                }
                Err(e)
            }
        }
    }

    /// Delegate the authority contract (write-once)
    ///
    /// # Errors
    ///
    /// - `InvalidAuthority` for the burn address
    /// - `AuthorityAlreadySet` once delegated
    pub fn set_authority(&self, address: Principal) -> Result<(), GovernanceError> {
        self.state.lock().config.set_authority(address)
    }

    /// Change the fee
    ///
    /// # Errors
    ///
    /// `GovernanceNotReady` until the authority contract is delegated.
    pub fn set_fee(&self, fee: u64) -> Result<(), GovernanceError> {
        self.state.lock().config.set_fee(fee)
    }

    // ========== Projections ==========

    /// Snapshot of the record under `key`
    pub fn get(&self, key: &R::Key) -> Option<R> {
        self.state.lock().records.get(key).cloned()
    }

    /// Check if a record exists under `key`
    pub fn contains(&self, key: &R::Key) -> bool {
        self.state.lock().records.contains_key(key)
    }

    /// Primary key holding `index_key`
    pub fn lookup(&self, index_key: &R::IndexKey) -> Option<R::Key> {
        self.state.lock().by_index.get(index_key)
    }

    /// Check if `index_key` is taken
    pub fn contains_index(&self, index_key: &R::IndexKey) -> bool {
        self.state.lock().by_index.contains(index_key)
    }

    /// Most recent record created with `hash`
    pub fn find_by_hash(&self, hash: &ContentHash) -> Option<R::Key> {
        self.state.lock().by_hash.get(hash)
    }

    /// Last update applied to the record under `key`
    pub fn last_update(&self, key: &R::Key) -> Option<UpdateRecord<R::Changes>> {
        self.state.lock().updates.get(key).cloned()
    }

    /// Number of successful creates
    pub fn count(&self) -> u64 {
        self.state.lock().config.next_id()
    }

    /// Number of records in the primary map
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Snapshot of the configuration record
    pub fn config(&self) -> RegistryConfig {
        self.state.lock().config.clone()
    }
}

impl<R: Record> Default for RegistryStore<R> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<R: Record> std::fmt::Debug for RegistryStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RegistryStore")
            .field("kind", &R::KIND)
            .field("records", &state.records.len())
            .field("index_entries", &state.by_index.len())
            .field("updates", &state.updates.len())
            .field("config", &state.config)
            .finish()
    }
}

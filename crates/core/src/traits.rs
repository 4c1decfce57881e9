//! Core traits for records and external collaborators
//!
//! The registry core never talks to the host directly. Everything it needs
//! from outside comes through one of these capability traits, so the core
//! can run against deterministic fakes (see [`crate::testing`]).
//!
//! - [`Record`]: what the generic store needs to know about a record kind
//! - [`AuthorityOracle`]: "is this principal a verified authority"
//! - [`FeeLedger`]: moves the fee from the caller to the authority contract
//! - [`CallContext`]: current caller and current height

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::TransferError;
use crate::types::{ContentHash, Height, Principal};

/// A record kind stored in a registry
///
/// The store keeps three indices per record kind, all keyed off this trait:
/// the primary map (`Key -> Self`), the uniqueness index
/// (`IndexKey -> Key`), and the hash lookup (`ContentHash -> Key`).
pub trait Record: Clone + Debug + Send + Sync + 'static {
    /// Primary storage key
    type Key: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static;

    /// Uniqueness key (name for drugs, canonical pair for interactions)
    ///
    /// Creates check uniqueness through this index. For interactions the
    /// canonical pair is also the primary key, so the index mirrors the
    /// primary map.
    type IndexKey: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// The fields an update may change
    type Changes: Clone + Debug + Send + Sync + 'static;

    /// Short name of the record kind, used in log fields
    const KIND: &'static str;

    /// Current uniqueness key
    fn index_key(&self) -> Self::IndexKey;

    /// Content or source hash
    fn content_hash(&self) -> &ContentHash;

    /// Principal that created the record
    fn creator(&self) -> &Principal;

    /// Current version
    fn version(&self) -> u64;
}

/// External authority oracle
///
/// Must be fast, terminating, and free of side effects on the registry.
/// Registries query it on every create with the current caller and never
/// cache the answer.
pub trait AuthorityOracle: Send + Sync {
    /// Check whether `principal` is currently a verified authority
    fn is_verified_authority(&self, principal: &Principal) -> bool;
}

/// External value-transfer ledger
pub trait FeeLedger: Send + Sync {
    /// Move `amount` from `from` to `to`
    ///
    /// # Errors
    ///
    /// Returns the ledger's failure reason; the registry discards the
    /// create it was charging for.
    fn transfer(&self, amount: u64, from: &Principal, to: &Principal) -> Result<(), TransferError>;
}

/// Caller identity and logical time of the current request
pub trait CallContext {
    /// The calling principal
    fn caller(&self) -> Principal;

    /// The current height
    fn height(&self) -> Height;
}

impl<T: AuthorityOracle + ?Sized> AuthorityOracle for Arc<T> {
    fn is_verified_authority(&self, principal: &Principal) -> bool {
        (**self).is_verified_authority(principal)
    }
}

impl<T: FeeLedger + ?Sized> FeeLedger for Arc<T> {
    fn transfer(&self, amount: u64, from: &Principal, to: &Principal) -> Result<(), TransferError> {
        (**self).transfer(amount, from, to)
    }
}

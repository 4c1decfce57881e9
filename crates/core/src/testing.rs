//! Deterministic collaborators for tests
//!
//! - [`StaticAuthorities`]: an authority oracle backed by a mutable set
//! - [`RecordingLedger`]: a ledger that logs every transfer and can track
//!   balances to simulate insufficient funds
//!
//! # Example
//!
//! ```
//! use rxregistry_core::testing::{RecordingLedger, StaticAuthorities};
//! use rxregistry_core::{AuthorityOracle, FeeLedger, Principal};
//!
//! let oracle = StaticAuthorities::new(["ST1TEST"]);
//! assert!(oracle.is_verified_authority(&Principal::new("ST1TEST")));
//!
//! let ledger = RecordingLedger::new();
//! ledger
//!     .transfer(100, &Principal::new("ST1TEST"), &Principal::new("ST2TEST"))
//!     .unwrap();
//! assert_eq!(ledger.transfers().len(), 1);
//! ```

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::TransferError;
use crate::traits::{AuthorityOracle, FeeLedger};
use crate::types::Principal;

/// A single completed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Amount moved
    pub amount: u64,
    /// Payer
    pub from: Principal,
    /// Payee
    pub to: Principal,
}

impl Transfer {
    /// Create a transfer record
    pub fn new(amount: u64, from: impl Into<Principal>, to: impl Into<Principal>) -> Self {
        Transfer {
            amount,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Authority oracle backed by a set of principals
///
/// Counts queries so tests can assert the oracle is consulted on every
/// create rather than cached.
#[derive(Debug, Default)]
pub struct StaticAuthorities {
    verified: RwLock<HashSet<Principal>>,
    queries: AtomicUsize,
}

impl StaticAuthorities {
    /// Create an oracle that recognizes `principals`
    pub fn new<I, P>(principals: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Principal>,
    {
        StaticAuthorities {
            verified: RwLock::new(principals.into_iter().map(Into::into).collect()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Recognize `principal` from now on
    pub fn grant(&self, principal: impl Into<Principal>) {
        self.verified.write().insert(principal.into());
    }

    /// Stop recognizing `principal`
    pub fn revoke(&self, principal: &Principal) {
        self.verified.write().remove(principal);
    }

    /// Stop recognizing anyone
    pub fn clear(&self) {
        self.verified.write().clear();
    }

    /// Number of queries answered so far
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl AuthorityOracle for StaticAuthorities {
    fn is_verified_authority(&self, principal: &Principal) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.verified.read().contains(principal)
    }
}

/// Ledger that records every successful transfer
///
/// In the default mode every payer has unlimited funds. With
/// [`RecordingLedger::with_balances`] only listed principals hold funds and
/// transfers beyond a balance fail with
/// [`TransferError::InsufficientFunds`].
#[derive(Debug, Default)]
pub struct RecordingLedger {
    balances: Option<RwLock<HashMap<Principal, u64>>>,
    log: RwLock<Vec<Transfer>>,
}

impl RecordingLedger {
    /// Ledger with unlimited funds
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger that tracks balances
    pub fn with_balances<I, P>(balances: I) -> Self
    where
        I: IntoIterator<Item = (P, u64)>,
        P: Into<Principal>,
    {
        RecordingLedger {
            balances: Some(RwLock::new(
                balances.into_iter().map(|(p, amount)| (p.into(), amount)).collect(),
            )),
            log: RwLock::new(Vec::new()),
        }
    }

    /// All successful transfers, oldest first
    pub fn transfers(&self) -> Vec<Transfer> {
        self.log.read().clone()
    }

    /// Current balance of `principal`, if balances are tracked
    pub fn balance(&self, principal: &Principal) -> Option<u64> {
        self.balances
            .as_ref()
            .map(|b| b.read().get(principal).copied().unwrap_or(0))
    }
}

impl FeeLedger for RecordingLedger {
    fn transfer(&self, amount: u64, from: &Principal, to: &Principal) -> Result<(), TransferError> {
        if from == to {
            return Err(TransferError::SenderIsRecipient);
        }

        if let Some(balances) = &self.balances {
            let mut balances = balances.write();
            let available = balances.get(from).copied().unwrap_or(0);
            if available < amount {
                return Err(TransferError::InsufficientFunds {
                    needed: amount,
                    available,
                });
            }
            balances.insert(from.clone(), available - amount);
            *balances.entry(to.clone()).or_insert(0) += amount;
        }

        self.log
            .write()
            .push(Transfer::new(amount, from.clone(), to.clone()));
        Ok(())
    }
}

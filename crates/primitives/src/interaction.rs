//! InteractionRegistry: pairwise drug-interaction records
//!
//! Records are addressed by the canonical [`PairKey`] of two drug ids, so
//! `(a, b)` and `(b, a)` always name the same record. Every lookup, insert,
//! update and existence check derives the key through
//! [`InteractionRegistry::key`].
//!
//! The create pipeline mirrors the drug registry: capacity, field checks,
//! authorization, pair uniqueness, authority readiness, then fee transfer
//! and insert as one transaction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rxregistry_core::limits::MAX_SEVERITY;
use rxregistry_core::{
    AuthorityOracle, CallContext, ContentHash, FeeLedger, GovernanceError, Height,
    InteractionError, PairKey, Principal, Record, RegistrySettings, UpdateRecord, UpdateRejected,
    UpdateRejection,
};
use rxregistry_storage::{RegistryConfig, RegistryStore};

use crate::fees::FeeCollector;
use crate::gate::AuthorityGate;
use crate::validation::{check_interaction_changes, check_new_interaction};

// =============================================================================
// Severity and category
// =============================================================================

/// Clinical severity, levels 0 to 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Severity {
    /// Level 0
    Minor = 0,
    /// Level 1
    Moderate = 1,
    /// Level 2
    Severe = 2,
}

impl Severity {
    /// Parse a numeric level
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Severity::Minor),
            1 => Some(Severity::Moderate),
            2 => Some(Severity::Severe),
            _ => None,
        }
    }

    /// Numeric level
    pub fn level(self) -> u8 {
        self as u8
    }
}

const _: () = assert!(Severity::Severe as u8 == MAX_SEVERITY);

/// Mechanism of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionCategory {
    /// Absorption, distribution, metabolism or excretion
    Pharmacokinetic,
    /// Combined effect at the site of action
    Pharmacodynamic,
    /// Mechanism not established
    Unknown,
}

impl InteractionCategory {
    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionCategory::Pharmacokinetic => "pharmacokinetic",
            InteractionCategory::Pharmacodynamic => "pharmacodynamic",
            InteractionCategory::Unknown => "unknown",
        }
    }
}

impl FromStr for InteractionCategory {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pharmacokinetic" => Ok(InteractionCategory::Pharmacokinetic),
            "pharmacodynamic" => Ok(InteractionCategory::Pharmacodynamic),
            "unknown" => Ok(InteractionCategory::Unknown),
            _ => Err(InteractionError::InvalidCategory),
        }
    }
}

impl fmt::Display for InteractionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Records and requests
// =============================================================================

/// A stored interaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Canonical pair of drug ids
    pub pair: PairKey,
    /// Severity
    pub severity: Severity,
    /// Description
    pub description: String,
    /// Clinical effects
    pub effects: String,
    /// Recommendations, may be empty
    pub recommendations: String,
    /// Digest of the source document
    pub source_hash: ContentHash,
    /// Mechanism category
    pub category: InteractionCategory,
    /// Whether the combination is contraindicated
    pub contraindicated: bool,
    /// Onset
    pub onset: u64,
    /// Duration
    pub duration: u64,
    /// Evidence level, 0 to 5
    pub evidence_level: u8,
    /// Always true; records are never deactivated
    pub active: bool,
    /// Record version
    pub version: u64,
    /// Principal that created the record
    pub creator: Principal,
    /// Height of the create or the last update
    pub timestamp: Height,
}

impl Record for InteractionRecord {
    type Key = PairKey;
    type IndexKey = PairKey;
    type Changes = InteractionChanges;

    const KIND: &'static str = "interaction";

    fn index_key(&self) -> PairKey {
        self.pair
    }

    fn content_hash(&self) -> &ContentHash {
        &self.source_hash
    }

    fn creator(&self) -> &Principal {
        &self.creator
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// A create request, with fields as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInteraction {
    /// First drug id, positive
    pub drug_a: u64,
    /// Second drug id, positive
    pub drug_b: u64,
    /// Severity level, 0 to 2
    pub severity: u8,
    /// Description, 1-500 characters
    pub description: String,
    /// Effects, 1-1000 characters
    pub effects: String,
    /// Recommendations, at most 500 characters
    pub recommendations: String,
    /// Source hash, exactly 32 bytes
    pub source_hash: Vec<u8>,
    /// One of `pharmacokinetic`, `pharmacodynamic`, `unknown`
    pub category: String,
    /// Contraindicated flag
    pub contraindicated: bool,
    /// Onset, non-negative
    pub onset: i64,
    /// Duration, non-negative
    pub duration: i64,
    /// Evidence level, 0 to 5
    pub evidence_level: u8,
    /// Initial version, positive
    pub version: u64,
}

/// The fields an interaction update writes, as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionChanges {
    /// New severity level, 0 to 2
    pub severity: u8,
    /// New description, 1-500 characters
    pub description: String,
}

// =============================================================================
// InteractionRegistry
// =============================================================================

/// Registry of pairwise interaction records
#[derive(Debug)]
pub struct InteractionRegistry {
    store: RegistryStore<InteractionRecord>,
    gate: AuthorityGate,
    fees: FeeCollector,
}

impl InteractionRegistry {
    /// Create a registry with default capacity and fee
    pub fn new(oracle: Arc<dyn AuthorityOracle>, ledger: Arc<dyn FeeLedger>) -> Self {
        Self::with_settings(&RegistrySettings::default(), oracle, ledger)
    }

    /// Create a registry from file settings
    pub fn with_settings(
        settings: &RegistrySettings,
        oracle: Arc<dyn AuthorityOracle>,
        ledger: Arc<dyn FeeLedger>,
    ) -> Self {
        InteractionRegistry {
            store: RegistryStore::new(RegistryConfig::from_settings(settings)),
            gate: AuthorityGate::new(oracle),
            fees: FeeCollector::new(ledger),
        }
    }

    /// Canonical key of the pair `(a, b)`
    pub fn key(a: u64, b: u64) -> PairKey {
        PairKey::new(a, b)
    }

    // ========== Governance ==========

    /// Delegate the authority contract (write-once)
    pub fn set_authority_contract(
        &self,
        address: impl Into<Principal>,
    ) -> Result<(), GovernanceError> {
        let address = address.into();
        self.store.set_authority(address.clone()).map_err(|e| {
            debug!(target: "rxregistry::governance", kind = InteractionRecord::KIND, authority = %address, error = %e, "Authority contract rejected");
            e
        })?;
        info!(target: "rxregistry::governance", kind = InteractionRecord::KIND, authority = %address, "Authority contract set");
        Ok(())
    }

    /// Change the creation fee; requires the authority contract
    pub fn set_fee(&self, fee: u64) -> Result<(), GovernanceError> {
        self.store.set_fee(fee)?;
        info!(target: "rxregistry::governance", kind = InteractionRecord::KIND, fee, "Fee changed");
        Ok(())
    }

    /// Check whether `principal` is currently a verified authority
    pub fn is_verified_authority(&self, principal: &Principal) -> bool {
        self.gate.is_verified(principal)
    }

    // ========== Mutations ==========

    /// Record an interaction between two drugs
    ///
    /// Returns the canonical key the record is stored under. Self-pairs
    /// `(a, a)` are accepted.
    ///
    /// # Errors
    ///
    /// The first failing rule of the create pipeline, as a coded
    /// [`InteractionError`].
    pub fn register(
        &self,
        ctx: &impl CallContext,
        request: &NewInteraction,
    ) -> Result<PairKey, InteractionError> {
        let caller = ctx.caller();
        let height = ctx.height();
        let key = Self::key(request.drug_a, request.drug_b);

        let result = self.store.transaction(|txn| {
            if txn.is_full() {
                return Err(InteractionError::CapacityExceeded);
            }
            let valid = check_new_interaction(request)?;
            if !self.gate.is_verified(&caller) {
                return Err(InteractionError::NotAuthorized);
            }
            if txn.lookup(&key).is_some() {
                return Err(InteractionError::AlreadyExists);
            }
            let authority = txn
                .config()
                .authority()
                .get()
                .cloned()
                .ok_or(InteractionError::AuthorityNotReady)?;

            self.fees
                .collect(InteractionRecord::KIND, txn.config().fee(), &caller, &authority)?;

            txn.insert(
                key,
                InteractionRecord {
                    pair: key,
                    severity: valid.severity,
                    description: request.description.clone(),
                    effects: request.effects.clone(),
                    recommendations: request.recommendations.clone(),
                    source_hash: valid.source_hash,
                    category: valid.category,
                    contraindicated: request.contraindicated,
                    onset: valid.onset,
                    duration: valid.duration,
                    evidence_level: request.evidence_level,
                    active: true,
                    version: request.version,
                    creator: caller.clone(),
                    timestamp: height,
                },
            );
            Ok(key)
        });

        match &result {
            Ok(key) => {
                info!(target: "rxregistry::interaction", pair = %key, creator = %caller, "Interaction recorded");
            }
            Err(e) => {
                debug!(target: "rxregistry::interaction", pair = %key, code = e.code(), error = %e, "Interaction rejected");
            }
        }
        result
    }

    /// Change the severity and description of the interaction `(a, b)`
    ///
    /// Only the creator may update, and only to a strictly greater version.
    pub fn update(
        &self,
        ctx: &impl CallContext,
        a: u64,
        b: u64,
        changes: InteractionChanges,
        version: u64,
    ) -> Result<(), UpdateRejected> {
        let caller = ctx.caller();
        let height = ctx.height();
        let key = Self::key(a, b);

        let result = self.store.transaction(|txn| {
            let current = txn.get(&key).cloned().ok_or(UpdateRejection::NotFound)?;
            if current.creator != caller {
                return Err(UpdateRejection::NotCreator);
            }
            let severity = check_interaction_changes(&changes)?;
            if version <= current.version {
                return Err(UpdateRejection::StaleVersion {
                    current: current.version,
                    proposed: version,
                });
            }

            let record = InteractionRecord {
                severity,
                description: changes.description.clone(),
                timestamp: height,
                version,
                ..current
            };
            txn.replace(
                key,
                record,
                UpdateRecord {
                    changes,
                    version,
                    updater: caller.clone(),
                    timestamp: height,
                },
            );
            Ok(())
        });

        match result {
            Ok(()) => {
                info!(target: "rxregistry::interaction", pair = %key, version, updater = %caller, "Interaction updated");
                Ok(())
            }
            Err(reason) => {
                debug!(target: "rxregistry::interaction", pair = %key, version, %reason, "Interaction update rejected");
                Err(reason.into())
            }
        }
    }

    // ========== Projections ==========

    /// Snapshot of the interaction between `a` and `b`, in either order
    pub fn get(&self, a: u64, b: u64) -> Option<InteractionRecord> {
        self.store.get(&Self::key(a, b))
    }

    /// Check whether an interaction between `a` and `b` exists
    pub fn exists(&self, a: u64, b: u64) -> bool {
        self.store.contains(&Self::key(a, b))
    }

    /// Number of successful creates; equals the number of stored records
    pub fn count(&self) -> u64 {
        self.store.count()
    }

    /// Pair of the most recent interaction recorded with `hash`
    pub fn find_by_hash(&self, hash: &ContentHash) -> Option<PairKey> {
        self.store.find_by_hash(hash)
    }

    /// Last update applied to the interaction `(a, b)`
    pub fn last_update(&self, a: u64, b: u64) -> Option<UpdateRecord<InteractionChanges>> {
        self.store.last_update(&Self::key(a, b))
    }

    /// Current creation fee
    pub fn fee(&self) -> u64 {
        self.store.config().fee()
    }

    /// The delegated authority contract, if any
    pub fn authority(&self) -> Option<Principal> {
        self.store.config().authority().get().cloned()
    }

    /// Maximum number of interactions
    pub fn max_records(&self) -> u64 {
        self.store.config().max_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxregistry_core::testing::{RecordingLedger, StaticAuthorities, Transfer};
    use rxregistry_core::Invocation;

    fn registry() -> (InteractionRegistry, Arc<StaticAuthorities>, Arc<RecordingLedger>) {
        let oracle = Arc::new(StaticAuthorities::new(["ST1TEST"]));
        let ledger = Arc::new(RecordingLedger::new());
        let registry = InteractionRegistry::new(oracle.clone(), ledger.clone());
        registry.set_authority_contract("ST2TEST").unwrap();
        (registry, oracle, ledger)
    }

    fn ctx() -> Invocation {
        Invocation::new("ST1TEST", Height::new(3))
    }

    fn pair(a: u64, b: u64) -> NewInteraction {
        NewInteraction {
            drug_a: a,
            drug_b: b,
            severity: 1,
            description: "Moderate interaction".into(),
            effects: "Dizziness and nausea".into(),
            recommendations: "Monitor closely".into(),
            source_hash: vec![1; 32],
            category: "pharmacokinetic".into(),
            contraindicated: false,
            onset: 60,
            duration: 3600,
            evidence_level: 3,
            version: 1,
        }
    }

    fn changes(severity: u8, description: &str) -> InteractionChanges {
        InteractionChanges {
            severity,
            description: description.into(),
        }
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(Severity::from_level(0), Some(Severity::Minor));
        assert_eq!(Severity::from_level(2).map(Severity::level), Some(2));
        assert_eq!(Severity::from_level(3), None);
    }

    #[test]
    fn test_category_parse_is_closed() {
        for name in ["pharmacokinetic", "pharmacodynamic", "unknown"] {
            let category: InteractionCategory = name.parse().unwrap();
            assert_eq!(category.to_string(), name);
        }
        assert_eq!(
            "Pharmacokinetic".parse::<InteractionCategory>(),
            Err(InteractionError::InvalidCategory)
        );
    }

    #[test]
    fn test_register_reads_back_in_either_order() {
        let (registry, _, ledger) = registry();
        let key = registry.register(&ctx(), &pair(2, 1)).unwrap();
        assert_eq!(key, PairKey::new(1, 2));

        let record = registry.get(1, 2).unwrap();
        assert_eq!(record, registry.get(2, 1).unwrap());
        assert_eq!(record.severity, Severity::Moderate);
        assert_eq!(record.description, "Moderate interaction");
        assert_eq!(record.effects, "Dizziness and nausea");
        assert_eq!(record.recommendations, "Monitor closely");
        assert_eq!(record.source_hash, ContentHash::filled(1));
        assert_eq!(record.category, InteractionCategory::Pharmacokinetic);
        assert!(!record.contraindicated);
        assert_eq!(record.onset, 60);
        assert_eq!(record.duration, 3600);
        assert_eq!(record.evidence_level, 3);
        assert_eq!(record.version, 1);
        assert_eq!(record.creator, Principal::new("ST1TEST"));
        assert_eq!(record.timestamp, Height::new(3));
        assert!(record.active);

        assert_eq!(ledger.transfers(), vec![Transfer::new(100, "ST1TEST", "ST2TEST")]);
    }

    #[test]
    fn test_reversed_pair_is_duplicate() {
        let (registry, _, _) = registry();
        registry.register(&ctx(), &pair(1, 2)).unwrap();
        let err = registry.register(&ctx(), &pair(2, 1)).unwrap_err();
        assert_eq!(err, InteractionError::AlreadyExists);
        assert_eq!(err.code(), 106);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_self_pair_accepted() {
        let (registry, _, _) = registry();
        let key = registry.register(&ctx(), &pair(4, 4)).unwrap();
        assert_eq!(key, PairKey::new(4, 4));
        assert!(registry.exists(4, 4));
    }

    #[test]
    fn test_not_ready_after_uniqueness() {
        let oracle = Arc::new(StaticAuthorities::new(["ST1TEST"]));
        let ledger = Arc::new(RecordingLedger::new());
        let registry = InteractionRegistry::new(oracle, ledger);

        let err = registry.register(&ctx(), &pair(1, 2)).unwrap_err();
        assert_eq!(err, InteractionError::AuthorityNotReady);
        assert_eq!(err.code(), 109);
    }

    #[test]
    fn test_unauthorized_after_validation() {
        let (registry, oracle, _) = registry();
        oracle.clear();
        assert_eq!(
            registry.register(&ctx(), &pair(1, 2)).unwrap_err(),
            InteractionError::NotAuthorized
        );
        assert_eq!(
            registry.register(&ctx(), &pair(0, 2)).unwrap_err(),
            InteractionError::InvalidDrugId
        );
    }

    #[test]
    fn test_update_through_reversed_pair() {
        let (registry, _, _) = registry();
        registry.register(&ctx(), &pair(1, 2)).unwrap();

        let later = Invocation::new("ST1TEST", Height::new(8));
        registry
            .update(&later, 2, 1, changes(2, "Severe interaction"), 2)
            .unwrap();

        let record = registry.get(1, 2).unwrap();
        assert_eq!(record.severity, Severity::Severe);
        assert_eq!(record.description, "Severe interaction");
        assert_eq!(record.version, 2);
        assert_eq!(record.timestamp, Height::new(8));
        assert_eq!(record.effects, "Dizziness and nausea");

        let update = registry.last_update(1, 2).unwrap();
        assert_eq!(update.changes, changes(2, "Severe interaction"));
        assert_eq!(update.updater, Principal::new("ST1TEST"));
        assert_eq!(update.version, 2);
    }

    #[test]
    fn test_update_rejections_are_opaque() {
        let (registry, _, _) = registry();
        registry.register(&ctx(), &pair(1, 2)).unwrap();

        assert_eq!(
            registry.update(&ctx(), 5, 6, changes(1, "x"), 2),
            Err(UpdateRejected)
        );
        let stranger = Invocation::new("ST3FAKE", Height::new(1));
        assert_eq!(
            registry.update(&stranger, 1, 2, changes(1, "x"), 2),
            Err(UpdateRejected)
        );
        assert_eq!(
            registry.update(&ctx(), 1, 2, changes(3, "x"), 2),
            Err(UpdateRejected)
        );
        assert_eq!(
            registry.update(&ctx(), 1, 2, changes(1, ""), 2),
            Err(UpdateRejected)
        );
        assert_eq!(
            registry.update(&ctx(), 1, 2, changes(1, "x"), 1),
            Err(UpdateRejected)
        );
        assert!(registry.last_update(1, 2).is_none());
    }

    #[test]
    fn test_find_by_hash_is_latest_wins() {
        let (registry, _, _) = registry();
        registry.register(&ctx(), &pair(1, 2)).unwrap();
        registry.register(&ctx(), &pair(3, 4)).unwrap();

        assert_eq!(
            registry.find_by_hash(&ContentHash::filled(1)),
            Some(PairKey::new(3, 4))
        );
        assert_eq!(registry.find_by_hash(&ContentHash::filled(9)), None);
    }

    #[test]
    fn test_update_does_not_reclaim_shared_hash() {
        let (registry, _, _) = registry();
        registry.register(&ctx(), &pair(1, 2)).unwrap();
        registry.register(&ctx(), &pair(3, 4)).unwrap();

        registry
            .update(&ctx(), 1, 2, changes(2, "Severe interaction"), 2)
            .unwrap();

        assert_eq!(
            registry.find_by_hash(&ContentHash::filled(1)),
            Some(PairKey::new(3, 4))
        );
    }

    #[test]
    fn test_governance_and_projections() {
        let (registry, _, ledger) = registry();
        assert_eq!(registry.authority(), Some(Principal::new("ST2TEST")));
        assert_eq!(registry.max_records(), 100_000);

        registry.set_fee(0).unwrap();
        assert_eq!(registry.fee(), 0);
        registry.register(&ctx(), &pair(1, 2)).unwrap();
        assert_eq!(ledger.transfers(), vec![Transfer::new(0, "ST1TEST", "ST2TEST")]);
    }
}

//! DrugRegistry: authority-gated registry of drug records
//!
//! ## Create pipeline
//!
//! `register` runs, in order and under the registry lock:
//!
//! 1. capacity
//! 2. field checks ([`check_new_drug`])
//! 3. authorization: the caller must be a verified authority right now
//! 4. uniqueness of the name
//! 5. authority readiness: governance must have delegated
//! 6. fee transfer from the caller to the authority contract
//! 7. insert under the next sequential id
//!
//! Steps 6 and 7 form one transaction: a failed transfer leaves no trace.
//!
//! ## Update
//!
//! `update` lets the creator rename and recategorize a record under a
//! strictly greater version. Every failure is reported as the same
//! [`UpdateRejected`]; the reason is logged at debug level.
//!
//! ## Name index
//!
//! The name index is the only source of truth for name uniqueness. A rename
//! moves the index entry to the new name in the same commit that replaces
//! the record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rxregistry_core::{
    AuthorityOracle, CallContext, ContentHash, DrugError, DrugId, FeeLedger, GovernanceError,
    Height, Principal, Record, RegistrySettings, UpdateRecord, UpdateRejected, UpdateRejection,
};
use rxregistry_storage::{RegistryConfig, RegistryStore};

use crate::fees::FeeCollector;
use crate::gate::AuthorityGate;
use crate::validation::{check_drug_changes, check_new_drug};

/// A stored drug record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Sequential identifier
    pub id: DrugId,
    /// Unique name
    pub name: String,
    /// Therapeutic category
    pub category: String,
    /// Digest of the drug's specification document
    pub content_hash: ContentHash,
    /// Height of the create or the last update
    pub timestamp: Height,
    /// Principal that registered the drug
    pub creator: Principal,
    /// Always true; records are never deactivated
    pub active: bool,
    /// Dosage form (tablet, syrup, ...)
    pub dosage_form: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Approval date
    pub approval_date: u64,
    /// Expiry date
    pub expiry_date: u64,
    /// Classification code (for example an ATC code)
    pub classification_code: String,
    /// Indication
    pub indication: String,
    /// Contraindication
    pub contraindication: String,
    /// Side effects
    pub side_effects: String,
    /// Record version
    pub version: u64,
}

impl Record for DrugRecord {
    type Key = DrugId;
    type IndexKey = String;
    type Changes = DrugChanges;

    const KIND: &'static str = "drug";

    fn index_key(&self) -> String {
        self.name.clone()
    }

    fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    fn creator(&self) -> &Principal {
        &self.creator
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// A registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrug {
    /// Name, 1-100 characters, unique
    pub name: String,
    /// Category, 1-50 characters
    pub category: String,
    /// Content hash, exactly 32 bytes
    pub content_hash: Vec<u8>,
    /// Dosage form, at most 50 characters
    pub dosage_form: String,
    /// Manufacturer, at most 100 characters
    pub manufacturer: String,
    /// Approval date, positive
    pub approval_date: u64,
    /// Expiry date, positive
    pub expiry_date: u64,
    /// Classification code, at most 20 characters
    pub classification_code: String,
    /// Indication, at most 500 characters
    pub indication: String,
    /// Contraindication, at most 500 characters
    pub contraindication: String,
    /// Side effects, at most 1000 characters
    pub side_effects: String,
    /// Initial version, positive
    pub version: u64,
}

/// The fields a drug update writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugChanges {
    /// New name, 1-100 characters
    pub name: String,
    /// New category, 1-50 characters
    pub category: String,
}

/// Registry of drug records
///
/// Thread-safe: all mutations of one registry are serialized by its store.
#[derive(Debug)]
pub struct DrugRegistry {
    store: RegistryStore<DrugRecord>,
    gate: AuthorityGate,
    fees: FeeCollector,
}

impl DrugRegistry {
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
        DrugRegistry {
            store: RegistryStore::new(RegistryConfig::from_settings(settings)),
            gate: AuthorityGate::new(oracle),
            fees: FeeCollector::new(ledger),
        }
    }

    // ========== Governance ==========

    /// Delegate the authority contract (write-once)
    ///
    /// # Errors
    ///
    /// - `InvalidAuthority` for the burn address
    /// - `AuthorityAlreadySet` if already delegated
    pub fn set_authority_contract(
        &self,
        address: impl Into<Principal>,
    ) -> Result<(), GovernanceError> {
        let address = address.into();
        match self.store.set_authority(address.clone()) {
            Ok(()) => {
                info!(target: "rxregistry::governance", kind = DrugRecord::KIND, authority = %address, "Authority contract set");
                Ok(())
            }
            Err(e) => {
                debug!(target: "rxregistry::governance", kind = DrugRecord::KIND, authority = %address, error = %e, "Authority contract rejected");
                Err(e)
            }
        }
    }

    /// Change the registration fee
    ///
    /// # Errors
    ///
    /// `GovernanceNotReady` until the authority contract is set.
    pub fn set_fee(&self, fee: u64) -> Result<(), GovernanceError> {
        self.store.set_fee(fee)?;
        info!(target: "rxregistry::governance", kind = DrugRecord::KIND, fee, "Fee changed");
        Ok(())
    }

    /// Check whether `principal` is currently a verified authority
    pub fn is_verified_authority(&self, principal: &Principal) -> bool {
        self.gate.is_verified(principal)
    }

    // ========== Mutations ==========

    /// Register a new drug
    ///
    /// Returns the assigned id. On success exactly one fee transfer of the
    /// current fee has moved from the caller to the authority contract.
    ///
    /// # Errors
    ///
    /// The first failing rule of the create pipeline, as a coded
    /// [`DrugError`].
    pub fn register(&self, ctx: &impl CallContext, request: &NewDrug) -> Result<DrugId, DrugError> {
        let caller = ctx.caller();
        let height = ctx.height();

        let result = self.store.transaction(|txn| {
            if txn.is_full() {
                return Err(DrugError::CapacityExceeded);
            }
            let content_hash = check_new_drug(request)?;
            if !self.gate.is_verified(&caller) {
                return Err(DrugError::NotAuthorized);
            }
            if txn.lookup(&request.name).is_some() {
                return Err(DrugError::AlreadyExists);
            }
            let authority = txn
                .config()
                .authority()
                .get()
                .cloned()
                .ok_or(DrugError::AuthorityNotReady)?;

            self.fees
                .collect(DrugRecord::KIND, txn.config().fee(), &caller, &authority)?;

            let id = DrugId::new(txn.next_id());
            txn.insert(
                id,
                DrugRecord {
                    id,
                    name: request.name.clone(),
                    category: request.category.clone(),
                    content_hash,
                    timestamp: height,
                    creator: caller.clone(),
                    active: true,
                    dosage_form: request.dosage_form.clone(),
                    manufacturer: request.manufacturer.clone(),
                    approval_date: request.approval_date,
                    expiry_date: request.expiry_date,
                    classification_code: request.classification_code.clone(),
                    indication: request.indication.clone(),
                    contraindication: request.contraindication.clone(),
                    side_effects: request.side_effects.clone(),
                    version: request.version,
                },
            );
            Ok(id)
        });

        match &result {
            Ok(id) => {
                info!(target: "rxregistry::drug", %id, name = %request.name, creator = %caller, "Drug registered");
            }
            Err(e) => {
                debug!(target: "rxregistry::drug", code = e.code(), error = %e, name = %request.name, "Drug registration rejected");
            }
        }
        result
    }

    /// Rename and recategorize a drug
    ///
    /// Only the creator may update, and only to a version strictly greater
    /// than the stored one. The new name must be free or already belong to
    /// `id`.
    pub fn update(
        &self,
        ctx: &impl CallContext,
        id: DrugId,
        changes: DrugChanges,
        version: u64,
    ) -> Result<(), UpdateRejected> {
        let caller = ctx.caller();
        let height = ctx.height();

        let result = self.store.transaction(|txn| {
            let current = txn.get(&id).cloned().ok_or(UpdateRejection::NotFound)?;
            if current.creator != caller {
                return Err(UpdateRejection::NotCreator);
            }
            check_drug_changes(&changes)?;
            if version <= current.version {
                return Err(UpdateRejection::StaleVersion {
                    current: current.version,
                    proposed: version,
                });
            }
            if txn.lookup(&changes.name).is_some_and(|holder| holder != id) {
                return Err(UpdateRejection::KeyTaken);
            }

            let record = DrugRecord {
                name: changes.name.clone(),
                category: changes.category.clone(),
                timestamp: height,
                version,
                ..current
            };
            txn.replace(
                id,
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
                info!(target: "rxregistry::drug", %id, version, updater = %caller, "Drug updated");
                Ok(())
            }
            Err(reason) => {
                debug!(target: "rxregistry::drug", %id, version, %reason, "Drug update rejected");
                Err(reason.into())
            }
        }
    }

    // ========== Projections ==========

    /// Snapshot of the drug with `id`
    pub fn get(&self, id: DrugId) -> Option<DrugRecord> {
        self.store.get(&id)
    }

    /// Number of successful registrations
    pub fn count(&self) -> u64 {
        self.store.count()
    }

    /// Check whether a drug is registered under `name`
    pub fn exists(&self, name: &str) -> bool {
        self.store.contains_index(&name.to_string())
    }

    /// Id of the drug registered under `name`
    pub fn id_of(&self, name: &str) -> Option<DrugId> {
        self.store.lookup(&name.to_string())
    }

    /// Id of the most recent drug registered with `hash`
    pub fn find_by_hash(&self, hash: &ContentHash) -> Option<DrugId> {
        self.store.find_by_hash(hash)
    }

    /// Last update applied to the drug with `id`
    pub fn last_update(&self, id: DrugId) -> Option<UpdateRecord<DrugChanges>> {
        self.store.last_update(&id)
    }

    /// Current registration fee
    pub fn fee(&self) -> u64 {
        self.store.config().fee()
    }

    /// The delegated authority contract, if any
    pub fn authority(&self) -> Option<Principal> {
        self.store.config().authority().get().cloned()
    }

    /// Maximum number of drugs
    pub fn max_records(&self) -> u64 {
        self.store.config().max_records()
    }

    /// Id the next registration will receive
    pub fn next_id(&self) -> DrugId {
        DrugId::new(self.store.config().next_id())
    }
}

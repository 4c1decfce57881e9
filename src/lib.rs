//! rxregistry - authority-gated, versioned registries for drugs and drug interactions
//!
//! Two registries share one store design:
//!
//! - [`DrugRegistry`]: records keyed by a sequential [`DrugId`] and a unique name
//! - [`InteractionRegistry`]: records keyed by the canonical [`PairKey`] of two
//!   drug ids
//!
//! Creates pass an ordered validation pipeline, an authority check against an
//! injected [`AuthorityOracle`], a uniqueness check and a readiness check,
//! then pay the current fee through an injected [`FeeLedger`] in the same
//! transaction as the insert. Updates are creator-only, strictly
//! version-increasing, and fail with a single [`UpdateRejected`].
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use rxregistry::testing::{RecordingLedger, StaticAuthorities};
//! use rxregistry::{DrugRegistry, Height, Invocation, NewDrug};
//!
//! let oracle = Arc::new(StaticAuthorities::new(["ST1TEST"]));
//! let ledger = Arc::new(RecordingLedger::new());
//! let drugs = DrugRegistry::new(oracle, ledger.clone());
//! drugs.set_authority_contract("ST2TEST").unwrap();
//!
//! let ctx = Invocation::new("ST1TEST", Height::new(1));
//! let id = drugs
//!     .register(
//!         &ctx,
//!         &NewDrug {
//!             name: "Aspirin".into(),
//!             category: "Analgesic".into(),
//!             content_hash: vec![1; 32],
//!             dosage_form: "Tablet".into(),
//!             manufacturer: "Bayer".into(),
//!             approval_date: 1_234_567_890,
//!             expiry_date: 2_345_678_901,
//!             classification_code: "B01AC06".into(),
//!             indication: "Pain relief".into(),
//!             contraindication: "Bleeding disorders".into(),
//!             side_effects: "Nausea".into(),
//!             version: 1,
//!         },
//!     )
//!     .unwrap();
//!
//! assert_eq!(id.as_u64(), 0);
//! assert!(drugs.exists("Aspirin"));
//! assert_eq!(ledger.transfers().len(), 1);
//! ```
//!
//! # Architecture
//!
//! - `rxregistry-core`: value types, coded errors, limits, traits, config
//! - `rxregistry-storage`: the generic multi-index store and its transactions
//! - `rxregistry-primitives`: the two registries

pub use rxregistry_core::{
    config, limits, testing, AuthorityOracle, CallContext, Config, ConfigError, ContentHash,
    DrugError, DrugId, FeeLedger, GovernanceError, Height, InteractionError, Invocation, PairKey,
    Principal, RegistrySettings, TransferError, UpdateRecord, UpdateRejected, BURN_ADDRESS,
};
pub use rxregistry_primitives::{
    DrugChanges, DrugRecord, DrugRegistry, InteractionCategory, InteractionChanges,
    InteractionRecord, InteractionRegistry, NewDrug, NewInteraction, Severity,
};
pub use rxregistry_storage::{AuthoritySlot, RegistryConfig};

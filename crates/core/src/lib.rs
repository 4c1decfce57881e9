//! Core types and traits for rxregistry
//!
//! This crate defines the foundational types used throughout the system:
//! - Principal, Height, ContentHash: identity, time and digest values
//! - DrugId, PairKey: primary keys of the two registries
//! - UpdateRecord: latest-wins mutation history
//! - Error: coded create-path errors, the opaque update failure, governance errors
//! - Limits: field length and range limits
//! - Traits: Record, AuthorityOracle, FeeLedger, CallContext
//! - Config: `rxregistry.toml` loading
//! - Testing: deterministic oracle and ledger fakes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod limits;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{Config, ConfigError, RegistrySettings, CONFIG_FILE_NAME};
pub use error::{
    DrugError, GovernanceError, InteractionError, TransferError, UpdateRejected, UpdateRejection,
};
pub use traits::{AuthorityOracle, CallContext, FeeLedger, Record};
pub use types::{
    ContentHash, DrugId, Height, Invocation, PairKey, Principal, UpdateRecord, BURN_ADDRESS,
    HASH_LEN,
};

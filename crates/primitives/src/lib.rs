//! Registries layer for rxregistry
//!
//! Provides the two registries as facades over the generic store:
//! - **DrugRegistry**: drug records keyed by sequential id and unique name
//! - **InteractionRegistry**: interaction records keyed by an unordered pair
//!   of drug ids
//!
//! ## Design Principle: One Store, Two Record Kinds
//!
//! Both registries hold a `RegistryStore<R>` plus handles to the injected
//! authority oracle and fee ledger. They differ only in their record type,
//! their validation pipeline and their uniqueness key. Each registry owns
//! its own lock, counter, fee and authority slot.
//!
//! ## Transactions
//!
//! Every create and update runs inside one store transaction:
//!
//! ```rust,ignore
//! store.transaction(|txn| {
//!     // capacity, fields, authorization, uniqueness, readiness
//!     fees.collect(kind, txn.config().fee(), &caller, &authority)?;
//!     txn.insert(key, record);
//!     Ok(key)
//! })?;
//! ```
//!
//! A failure anywhere in the closure, including the fee transfer, discards
//! the staged writes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod drug;
pub mod fees;
pub mod gate;
pub mod interaction;
pub mod validation;

pub use drug::{DrugChanges, DrugRecord, DrugRegistry, NewDrug};
pub use fees::FeeCollector;
pub use gate::AuthorityGate;
pub use interaction::{
    InteractionCategory, InteractionChanges, InteractionRecord, InteractionRegistry,
    NewInteraction, Severity,
};

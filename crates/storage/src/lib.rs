//! Storage layer for rxregistry
//!
//! This crate implements the registry store with:
//! - RegistryStore: primary map plus uniqueness and hash indices behind one lock
//! - RegistryTxn: staged writes with read-your-writes, applied all-or-nothing
//! - LookupIndex: secondary key → primary key maps
//! - RegistryConfig: counter, capacity, fee and write-once authority slot
//!
//! The store is generic over [`rxregistry_core::Record`], so the drug and
//! interaction registries are two instantiations of the same code.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod governance;
pub mod index;
pub mod store;
pub mod txn;

#[cfg(test)]
mod fixture;

pub use governance::{AuthoritySlot, RegistryConfig};
pub use index::LookupIndex;
pub use store::RegistryStore;
pub use txn::RegistryTxn;

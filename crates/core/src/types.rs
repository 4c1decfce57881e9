//! Core value types shared by both registries
//!
//! This module defines the identity and addressing types:
//! - Principal: an account or contract address in the host environment
//! - Height: logical time supplied by the host context
//! - ContentHash: fixed 32-byte opaque digest
//! - DrugId: sequential entity identifier
//! - PairKey: canonical, order-independent key for a pair of entities
//! - UpdateRecord: latest-wins history of the last mutation of a record
//! - Invocation: the caller/height pair for a single request

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::CallContext;

/// Reserved null/burn address of the host environment.
///
/// Governance refuses to delegate authority to this address.
pub const BURN_ADDRESS: &str = "SP000000000000000000002Q6VF78";

/// Length in bytes of every content and source hash.
pub const HASH_LEN: usize = 32;

// =============================================================================
// Principal
// =============================================================================

/// An account or contract address
///
/// Principals are opaque to the registry: they are compared for equality
/// (creator checks, authority checks) and passed through to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from an address string
    pub fn new(address: impl Into<String>) -> Self {
        Principal(address.into())
    }

    /// The reserved burn address
    pub fn burn() -> Self {
        Principal(BURN_ADDRESS.to_string())
    }

    /// Check if this is the reserved burn address
    pub fn is_burn(&self) -> bool {
        self.0 == BURN_ADDRESS
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(address: &str) -> Self {
        Principal::new(address)
    }
}

impl From<String> for Principal {
    fn from(address: String) -> Self {
        Principal(address)
    }
}

// =============================================================================
// Height
// =============================================================================

/// Logical time stamp supplied by the host
///
/// Heights are monotonic within the host but opaque to the registry:
/// they are recorded on create and update, never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Height(u64);

impl Height {
    /// The first height
    pub const GENESIS: Height = Height(0);

    /// Create a height
    #[inline]
    pub const fn new(height: u64) -> Self {
        Height(height)
    }

    /// Get the raw height
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ContentHash
// =============================================================================

/// A 32-byte opaque digest
///
/// Stored as-is; the registry only checks its length on the way in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    /// Create a hash from exactly 32 bytes
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        ContentHash(bytes)
    }

    /// Create a hash with every byte set to `byte`
    pub const fn filled(byte: u8) -> Self {
        ContentHash([byte; HASH_LEN])
    }

    /// Create a hash from a slice
    ///
    /// Returns `None` unless the slice is exactly [`HASH_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; HASH_LEN]>::try_from(bytes).ok().map(ContentHash)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

// =============================================================================
// DrugId
// =============================================================================

/// Sequential identifier of a drug record, starting at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrugId(u64);

impl DrugId {
    /// Create an identifier
    #[inline]
    pub const fn new(id: u64) -> Self {
        DrugId(id)
    }

    /// Get the raw identifier
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// PairKey
// =============================================================================

/// Canonical key for an unordered pair of entity identifiers
///
/// ## Invariants
///
/// - `low <= high` always holds
/// - `PairKey::new(a, b) == PairKey::new(b, a)` for all `a`, `b`
///
/// The fields are private so that a non-canonical key cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: u64,
    high: u64,
}

impl PairKey {
    /// Derive the canonical key for `a` and `b` in either order
    #[inline]
    pub fn new(a: u64, b: u64) -> Self {
        PairKey {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The smaller identifier
    #[inline]
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// The larger identifier
    #[inline]
    pub const fn high(&self) -> u64 {
        self.high
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

// =============================================================================
// UpdateRecord
// =============================================================================

/// The last mutation applied to a record
///
/// One per record key, overwritten by every successful update.
/// This is not an append log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord<C> {
    /// The fields written by the update
    pub changes: C,
    /// The version the record moved to
    pub version: u64,
    /// Who applied the update
    pub updater: Principal,
    /// When the update was applied
    pub timestamp: Height,
}

// =============================================================================
// Invocation
// =============================================================================

/// Caller identity and logical time for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The calling principal
    pub caller: Principal,
    /// The height at which the request executes
    pub height: Height,
}

impl Invocation {
    /// Create an invocation context
    pub fn new(caller: impl Into<Principal>, height: Height) -> Self {
        Invocation {
            caller: caller.into(),
            height,
        }
    }
}

impl CallContext for Invocation {
    fn caller(&self) -> Principal {
        self.caller.clone()
    }

    fn height(&self) -> Height {
        self.height
    }
}

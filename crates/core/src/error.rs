//! Error types for rxregistry
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Two failure tiers
//!
//! - Create paths return a coded error ([`DrugError`], [`InteractionError`])
//!   naming exactly which rule failed. Codes are fixed and never reused.
//! - Update paths return [`UpdateRejected`], a single opaque failure.
//!   The reason ([`UpdateRejection`]) exists for diagnostics only and is
//!   never handed to the caller.

use thiserror::Error;

/// Failure reported by the value-transfer ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Payer balance does not cover the amount
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds {
        /// Amount requested
        needed: u64,
        /// Balance of the payer
        available: u64,
    },

    /// Payer and payee are the same principal
    #[error("sender and recipient are the same principal")]
    SenderIsRecipient,

    /// Ledger refused the transfer for another reason
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

impl TransferError {
    /// Ledger error code
    pub const fn code(&self) -> u32 {
        match self {
            TransferError::InsufficientFunds { .. } => 1,
            TransferError::SenderIsRecipient => 2,
            TransferError::Rejected(_) => 3,
        }
    }
}

/// Create-path failures of the drug registry
///
/// Variants are listed in the order the pipeline checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrugError {
    /// Registry holds `max_records` drugs already
    #[error("maximum number of drugs reached")]
    CapacityExceeded,

    /// Name is empty or longer than 100 characters
    #[error("invalid drug name")]
    InvalidName,

    /// Category is empty or longer than 50 characters
    #[error("invalid category")]
    InvalidCategory,

    /// Content hash is not exactly 32 bytes
    #[error("invalid content hash")]
    InvalidContentHash,

    /// Dosage form longer than 50 characters
    #[error("invalid dosage form")]
    InvalidDosageForm,

    /// Manufacturer longer than 100 characters
    #[error("invalid manufacturer")]
    InvalidManufacturer,

    /// Approval date is zero
    #[error("invalid approval date")]
    InvalidApprovalDate,

    /// Expiry date is zero
    #[error("invalid expiry date")]
    InvalidExpiryDate,

    /// Classification code longer than 20 characters
    #[error("invalid classification code")]
    InvalidClassificationCode,

    /// Indication longer than 500 characters
    #[error("invalid indication")]
    InvalidIndication,

    /// Contraindication longer than 500 characters
    #[error("invalid contraindication")]
    InvalidContraindication,

    /// Side effects longer than 1000 characters
    #[error("invalid side effects")]
    InvalidSideEffects,

    /// Version is zero
    #[error("invalid version")]
    InvalidVersion,

    /// Caller is not a verified authority
    #[error("caller is not a verified authority")]
    NotAuthorized,

    /// A drug with this name is already registered
    #[error("drug already exists")]
    AlreadyExists,

    /// Governance has not delegated the authority contract yet
    #[error("authority contract not set")]
    AuthorityNotReady,

    /// Registration fee could not be collected
    #[error("fee transfer failed: {0}")]
    FeeTransfer(#[from] TransferError),
}

impl DrugError {
    /// Fixed numeric code of the failed rule
    pub const fn code(&self) -> u32 {
        match self {
            DrugError::NotAuthorized => 100,
            DrugError::InvalidName => 101,
            DrugError::InvalidCategory => 102,
            DrugError::InvalidContentHash => 103,
            DrugError::AlreadyExists => 104,
            DrugError::AuthorityNotReady => 107,
            DrugError::CapacityExceeded => 110,
            DrugError::InvalidDosageForm => 112,
            DrugError::InvalidManufacturer => 113,
            DrugError::InvalidApprovalDate => 114,
            DrugError::InvalidExpiryDate => 115,
            DrugError::InvalidClassificationCode => 116,
            DrugError::InvalidIndication => 117,
            DrugError::InvalidContraindication => 118,
            DrugError::InvalidSideEffects => 119,
            DrugError::InvalidVersion => 120,
            DrugError::FeeTransfer(e) => e.code(),
        }
    }
}

/// Create-path failures of the interaction registry
///
/// Variants are listed in the order the pipeline checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// Registry holds `max_records` interactions already
    #[error("maximum number of interactions reached")]
    CapacityExceeded,

    /// One of the drug identifiers is zero
    #[error("invalid drug id")]
    InvalidDrugId,

    /// Severity outside 0..=2
    #[error("invalid severity")]
    InvalidSeverity,

    /// Description is empty or longer than 500 characters
    #[error("invalid description")]
    InvalidDescription,

    /// Effects are empty or longer than 1000 characters
    #[error("invalid effects")]
    InvalidEffects,

    /// Recommendations longer than 500 characters
    #[error("invalid recommendations")]
    InvalidRecommendations,

    /// Source hash is not exactly 32 bytes
    #[error("invalid source hash")]
    InvalidSourceHash,

    /// Category outside the closed set
    #[error("invalid interaction category")]
    InvalidCategory,

    /// Onset is negative
    #[error("invalid onset")]
    InvalidOnset,

    /// Duration is negative
    #[error("invalid duration")]
    InvalidDuration,

    /// Evidence level outside 0..=5
    #[error("invalid evidence level")]
    InvalidEvidenceLevel,

    /// Version is zero
    #[error("invalid version")]
    InvalidVersion,

    /// Caller is not a verified authority
    #[error("caller is not a verified authority")]
    NotAuthorized,

    /// An interaction for this unordered pair already exists
    #[error("interaction already exists")]
    AlreadyExists,

    /// Governance has not delegated the authority contract yet
    #[error("authority contract not set")]
    AuthorityNotReady,

    /// Registration fee could not be collected
    #[error("fee transfer failed: {0}")]
    FeeTransfer(#[from] TransferError),
}

impl InteractionError {
    /// Fixed numeric code of the failed rule
    pub const fn code(&self) -> u32 {
        match self {
            InteractionError::NotAuthorized => 100,
            InteractionError::InvalidDrugId => 101,
            InteractionError::InvalidSeverity => 102,
            InteractionError::InvalidDescription => 103,
            InteractionError::InvalidEffects => 104,
            InteractionError::InvalidRecommendations => 105,
            InteractionError::AlreadyExists => 106,
            InteractionError::AuthorityNotReady => 109,
            InteractionError::InvalidSourceHash => 110,
            InteractionError::InvalidVersion => 111,
            InteractionError::CapacityExceeded => 114,
            InteractionError::InvalidCategory => 115,
            InteractionError::InvalidOnset => 117,
            InteractionError::InvalidDuration => 118,
            InteractionError::InvalidEvidenceLevel => 119,
            InteractionError::FeeTransfer(e) => e.code(),
        }
    }
}

/// Governance failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    /// Address is the reserved burn address
    #[error("invalid authority: cannot delegate to the burn address")]
    InvalidAuthority,

    /// The authority contract was already delegated
    #[error("authority contract already set")]
    AuthorityAlreadySet,

    /// The authority contract has not been delegated yet
    #[error("governance not ready: authority contract not set")]
    GovernanceNotReady,
}

/// The single failure signal of every update path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("update rejected")]
pub struct UpdateRejected;

/// Why an update was rejected
///
/// Diagnostic only. Logged by the registries, never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateRejection {
    /// No record under the key
    #[error("record not found")]
    NotFound,

    /// Caller did not create the record
    #[error("caller is not the creator")]
    NotCreator,

    /// A mutable field failed its check
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// Proposed version does not exceed the current one
    #[error("stale version: current {current}, proposed {proposed}")]
    StaleVersion {
        /// Version currently stored
        current: u64,
        /// Version in the request
        proposed: u64,
    },

    /// The new uniqueness key belongs to another record
    #[error("key already taken by another record")]
    KeyTaken,
}

impl From<UpdateRejection> for UpdateRejected {
    fn from(_: UpdateRejection) -> Self {
        UpdateRejected
    }
}

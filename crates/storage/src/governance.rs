//! Per-registry governance state
//!
//! [`RegistryConfig`] is the single mutable configuration record of a
//! registry: the next-identifier counter, the capacity, the current fee, and
//! the write-once authority contract slot.
//!
//! ## Write-once authority
//!
//! [`AuthoritySlot`] is either `Unset` or `Set(address)`. The only
//! transition is `Unset → Set`; there is no setter on a populated slot and
//! no way back to `Unset`.

use rxregistry_core::{GovernanceError, Principal, RegistrySettings};

/// The authority contract slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthoritySlot {
    /// Governance has not delegated yet
    #[default]
    Unset,
    /// Delegated to this address for the registry's lifetime
    Set(Principal),
}

impl AuthoritySlot {
    /// The delegated address, if any
    pub fn get(&self) -> Option<&Principal> {
        match self {
            AuthoritySlot::Unset => None,
            AuthoritySlot::Set(address) => Some(address),
        }
    }

    /// Check if governance has delegated
    pub fn is_set(&self) -> bool {
        matches!(self, AuthoritySlot::Set(_))
    }

    /// Populate the slot
    ///
    /// # Errors
    ///
    /// - `InvalidAuthority` if `address` is the burn address
    /// - `AuthorityAlreadySet` if the slot is already populated
    pub(crate) fn install(&mut self, address: Principal) -> Result<(), GovernanceError> {
        if address.is_burn() {
            return Err(GovernanceError::InvalidAuthority);
        }
        match self {
            AuthoritySlot::Set(_) => Err(GovernanceError::AuthorityAlreadySet),
            AuthoritySlot::Unset => {
                *self = AuthoritySlot::Set(address);
                Ok(())
            }
        }
    }
}

/// Configuration record of one registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    next_id: u64,
    max_records: u64,
    fee: u64,
    authority: AuthoritySlot,
}

impl RegistryConfig {
    /// Fresh configuration: counter at 0, no authority
    pub fn new(max_records: u64, fee: u64) -> Self {
        RegistryConfig {
            next_id: 0,
            max_records,
            fee,
            authority: AuthoritySlot::Unset,
        }
    }

    /// Fresh configuration from file settings
    pub fn from_settings(settings: &RegistrySettings) -> Self {
        Self::new(settings.max_records, settings.fee)
    }

    /// Next identifier to assign; equals the number of successful creates
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Maximum number of records
    pub fn max_records(&self) -> u64 {
        self.max_records
    }

    /// Fee charged per successful create
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// The authority contract slot
    pub fn authority(&self) -> &AuthoritySlot {
        &self.authority
    }

    /// Delegate the authority contract (write-once)
    pub(crate) fn set_authority(&mut self, address: Principal) -> Result<(), GovernanceError> {
        self.authority.install(address)
    }

    /// Change the fee; requires a delegated authority
    pub(crate) fn set_fee(&mut self, fee: u64) -> Result<(), GovernanceError> {
        if !self.authority.is_set() {
            return Err(GovernanceError::GovernanceNotReady);
        }
        self.fee = fee;
        Ok(())
    }

    pub(crate) fn advance(&mut self) {
        self.next_id = self.next_id.saturating_add(1);
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::from_settings(&RegistrySettings::default())
    }
}

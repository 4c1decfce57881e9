//! AuthorityGate: the "is this caller a verified authority" predicate
//!
//! Wraps the injected [`AuthorityOracle`]. The answer is fetched on every
//! call and never cached, so revoking an authority in the oracle takes
//! effect on the next create.

use std::sync::Arc;

use rxregistry_core::{AuthorityOracle, Principal};
use tracing::trace;

/// Shared handle to the external authority oracle
#[derive(Clone)]
pub struct AuthorityGate {
    oracle: Arc<dyn AuthorityOracle>,
}

impl AuthorityGate {
    /// Wrap an oracle
    pub fn new(oracle: Arc<dyn AuthorityOracle>) -> Self {
        AuthorityGate { oracle }
    }

    /// Ask the oracle about `principal`
    pub fn is_verified(&self, principal: &Principal) -> bool {
        let verified = self.oracle.is_verified_authority(principal);
        trace!(target: "rxregistry::governance", %principal, verified, "Authority query");
        verified
    }
}

impl std::fmt::Debug for AuthorityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityGate").finish_non_exhaustive()
    }
}

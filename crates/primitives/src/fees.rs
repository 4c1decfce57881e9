//! FeeCollector: charges the creation fee through the injected ledger
//!
//! Called from inside a registry transaction, after every check has passed
//! and before the staged insert is applied. A ledger failure aborts the
//! transaction, so a create either pays and lands or does neither.

use std::sync::Arc;

use rxregistry_core::{FeeLedger, Principal, TransferError};
use tracing::{trace, warn};

/// Shared handle to the external value-transfer ledger
#[derive(Clone)]
pub struct FeeCollector {
    ledger: Arc<dyn FeeLedger>,
}

impl FeeCollector {
    /// Wrap a ledger
    pub fn new(ledger: Arc<dyn FeeLedger>) -> Self {
        FeeCollector { ledger }
    }

    /// Move `fee` from `payer` to `authority`
    ///
    /// Exactly one ledger call per invocation, including when `fee` is 0.
    pub fn collect(
        &self,
        kind: &'static str,
        fee: u64,
        payer: &Principal,
        authority: &Principal,
    ) -> Result<(), TransferError> {
        match self.ledger.transfer(fee, payer, authority) {
            Ok(()) => {
                trace!(target: "rxregistry::governance", kind, fee, %payer, %authority, "Fee collected");
                Ok(())
            }
            Err(e) => {
                warn!(target: "rxregistry::governance", kind, fee, %payer, %authority, error = %e, "Fee transfer failed, discarding create");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for FeeCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeCollector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxregistry_core::testing::{RecordingLedger, Transfer};

    #[test]
    fn test_collect_records_one_transfer() {
        let ledger = Arc::new(RecordingLedger::new());
        let fees = FeeCollector::new(ledger.clone());

        fees.collect("drug", 100, &Principal::new("ST1TEST"), &Principal::new("ST2TEST"))
            .unwrap();

        assert_eq!(ledger.transfers(), vec![Transfer::new(100, "ST1TEST", "ST2TEST")]);
    }

    #[test]
    fn test_collect_surfaces_ledger_failure() {
        let ledger = Arc::new(RecordingLedger::with_balances([("ST1TEST", 10)]));
        let fees = FeeCollector::new(ledger.clone());

        let err = fees
            .collect("drug", 100, &Principal::new("ST1TEST"), &Principal::new("ST2TEST"))
            .unwrap_err();

        assert_eq!(
            err,
            TransferError::InsufficientFunds {
                needed: 100,
                available: 10
            }
        );
        assert!(ledger.transfers().is_empty());
    }
}

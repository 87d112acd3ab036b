mod plain;

use checkout_operations::{CheckoutConfig, CheckoutOperation, OperationError};
use checkout_saga::{Outcome, SagaAuditLog};

pub(crate) use plain::PlainTextFormatter;

pub(crate) trait OutputFormatter {
    fn format_outcome(
        &self,
        outcome: &Outcome<CheckoutOperation, OperationError>,
        audit_log: &SagaAuditLog,
    ) -> String;

    fn format_policies(&self, config: &CheckoutConfig) -> String;
}

use std::fmt::Write as _;

use checkout_operations::{CheckoutConfig, CheckoutOperation, OperationError};
use checkout_saga::{Outcome, SagaAuditLog, SagaError, StepResult};

use super::OutputFormatter;

pub(crate) struct PlainTextFormatter;

impl PlainTextFormatter {
    fn format_results(output: &mut String, results: &[StepResult<CheckoutOperation>]) {
        let _ = writeln!(output, "Committed {} step(s):", results.len());
        for result in results {
            let _ = writeln!(
                output,
                "  {}: {} ({} attempt(s))",
                result.step, result.output, result.attempts_used
            );
        }
    }

    fn format_abort(output: &mut String, error: &SagaError<OperationError>) {
        let _ = writeln!(output, "Aborted: {error}");
        let _ = writeln!(output, "  caused by: {}", error.step_error());

        match error {
            SagaError::CompensationFailed {
                compensation_errors,
                ..
            } => {
                for compensation_error in compensation_errors {
                    let _ = writeln!(output, "  {compensation_error}");
                }
            }
            SagaError::CompensationHalted {
                compensation_error,
                not_compensated,
                ..
            } => {
                let _ = writeln!(output, "  {compensation_error}");
                let _ = writeln!(output, "  not compensated: {}", not_compensated.join(", "));
            }
            _ => {}
        }
    }

    fn format_audit(output: &mut String, audit_log: &SagaAuditLog) {
        if audit_log.records().is_empty() {
            return;
        }
        output.push_str("\nAudit:\n");
        for line in audit_log.summary().lines() {
            let _ = writeln!(output, "  {line}");
        }
    }
}

impl OutputFormatter for PlainTextFormatter {
    fn format_outcome(
        &self,
        outcome: &Outcome<CheckoutOperation, OperationError>,
        audit_log: &SagaAuditLog,
    ) -> String {
        let mut output = String::from("Transaction Management\n\n");

        match outcome {
            Ok(results) => Self::format_results(&mut output, results),
            Err(error) => Self::format_abort(&mut output, error),
        }
        Self::format_audit(&mut output, audit_log);

        let _ = writeln!(
            output,
            "\nTransaction Finished: Succeed = {}",
            outcome.is_ok()
        );
        output
    }

    fn format_policies(&self, config: &CheckoutConfig) -> String {
        let mut output = String::from("Retry policies:\n");
        for (operation, policy) in config.retry_policies() {
            let _ = writeln!(output, "  {operation}: {policy}");
        }
        let _ = writeln!(output, "\nSuccess rate: {}", config.success_rate().get());
        output
    }
}

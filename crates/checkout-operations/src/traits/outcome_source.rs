use crate::types::OperationKind;

/// Decides whether an attempt at a checkout operation succeeds.
///
/// Stands in for the external systems (payment gateway, coupon service,
/// order store) that the checkout talks to. Called once per attempt.
pub trait OutcomeSource: Send + Sync {
    fn succeeds(&self, operation: OperationKind) -> bool;
}

use std::sync::Arc;

use async_trait::async_trait;
use checkout_saga::{RetryPolicy, SagaStep};
use tracing::{debug, info};

use crate::error::OperationError;
use crate::traits::OutcomeSource;
use crate::types::CheckoutOperation;

/// One checkout operation, driven by an [`OutcomeSource`] that decides
/// whether each attempt goes through.
pub struct CheckoutStep<O> {
    operation: CheckoutOperation,
    policy: RetryPolicy,
    outcomes: Arc<O>,
}

impl<O> CheckoutStep<O> {
    pub fn new(operation: CheckoutOperation, policy: RetryPolicy, outcomes: Arc<O>) -> Self {
        Self {
            operation,
            policy,
            outcomes,
        }
    }

    #[must_use]
    pub fn operation(&self) -> CheckoutOperation {
        self.operation
    }
}

impl<O> Clone for CheckoutStep<O> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation,
            policy: self.policy,
            outcomes: Arc::clone(&self.outcomes),
        }
    }
}

#[async_trait]
impl<O> SagaStep for CheckoutStep<O>
where
    O: OutcomeSource + 'static,
{
    type Output = CheckoutOperation;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        self.operation.kind().as_str()
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn execute(&self) -> Result<Self::Output, Self::Error> {
        let kind = self.operation.kind();
        if !self.outcomes.succeeds(kind) {
            debug!(operation = %kind, "checkout operation rejected");
            return Err(OperationError::Failed { operation: kind });
        }

        info!(operation = %kind, detail = %self.operation, "checkout operation applied");
        Ok(self.operation)
    }

    async fn compensate(&self) -> Result<(), Self::Error> {
        info!(
            operation = %self.operation.kind(),
            "{}",
            self.operation.rollback_message()
        );
        Ok(())
    }

    fn compensation_description(&self) -> String {
        self.operation.rollback_message()
    }
}

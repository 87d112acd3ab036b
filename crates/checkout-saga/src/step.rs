use async_trait::async_trait;

use crate::policy::RetryPolicy;

/// A step in a saga that can be executed and compensated.
///
/// A step closes over everything it needs at construction time; the executor
/// never threads one step's output into another. Execution may be attempted
/// several times according to [`SagaStep::retry_policy`], so `execute` must be
/// safe to call again after a failed attempt.
///
/// # Type Parameters
///
/// - `Output`: Value produced by a successful execution
/// - `Error`: The error type for step failures
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Value produced by a successful execution.
    type Output: Send + 'static;

    /// Error type for step and compensation failures.
    type Error: Send + 'static;

    /// Human-readable name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Attempt limit and inter-attempt delay for this step.
    ///
    /// The default is a single attempt.
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::once()
    }

    /// Perform the forward action.
    ///
    /// # Errors
    ///
    /// Returns an error if this attempt fails. The executor decides whether
    /// another attempt follows.
    async fn execute(&self) -> Result<Self::Output, Self::Error>;

    /// Compensate (undo) the effect of a successful `execute()`.
    ///
    /// Called at most once, and only for steps whose execution succeeded.
    /// The default implementation is a no-op, suitable for read-only steps.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails.
    async fn compensate(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}

/// Type-erased step, for sequences mixing different step types.
pub type BoxedStep<T, E> = Box<dyn SagaStep<Output = T, Error = E>>;

#[async_trait]
impl<S> SagaStep for Box<S>
where
    S: SagaStep + ?Sized,
{
    type Output = S::Output;
    type Error = S::Error;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn retry_policy(&self) -> RetryPolicy {
        (**self).retry_policy()
    }

    async fn execute(&self) -> Result<Self::Output, Self::Error> {
        (**self).execute().await
    }

    async fn compensate(&self) -> Result<(), Self::Error> {
        (**self).compensate().await
    }

    fn compensation_description(&self) -> String {
        (**self).compensation_description()
    }
}

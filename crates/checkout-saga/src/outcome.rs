use crate::error::SagaError;

/// Result of one successfully executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult<T> {
    /// Name of the step.
    pub step: &'static str,
    /// Value returned by the successful attempt.
    pub output: T,
    /// Attempt number that succeeded, starting at 1.
    pub attempts_used: u32,
}

impl<T> StepResult<T> {
    /// Drop the step name and attempt count, keeping the output.
    pub fn into_output(self) -> T {
        self.output
    }
}

/// Final outcome of a saga.
///
/// `Ok` holds one result per step in sequence order. `Err` means the saga was
/// aborted and compensation ran.
pub type Outcome<T, E> = Result<Vec<StepResult<T>>, SagaError<E>>;

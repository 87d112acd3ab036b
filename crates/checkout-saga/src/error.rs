use std::fmt::Debug;

use thiserror::Error;

/// Error from building an invalid retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("a retry policy needs at least one attempt")]
    ZeroAttempts,
}

/// Error from a failed compensation operation.
#[derive(Debug, thiserror::Error)]
#[error("compensation failed for step '{step}': {description}")]
pub struct CompensationError<E> {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The underlying error.
    #[source]
    pub error: E,
}

/// Why a saga was aborted.
///
/// Every variant means the transaction did not commit. Compensation has been
/// attempted for every step that succeeded, except where
/// [`SagaError::CompensationHalted`] lists steps that were left alone.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step ran out of attempts and all compensations succeeded.
    #[error("step '{step}' failed after {attempts} attempt(s)")]
    StepExhausted {
        /// Name of the step that failed.
        step: String,
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        source: E,
    },

    /// A step ran out of attempts and some compensations also failed.
    #[error("step '{failed_step}' failed, and {} compensation(s) also failed", compensation_errors.len())]
    CompensationFailed {
        /// Name of the step that originally failed.
        failed_step: String,
        /// Number of attempts made on the failed step.
        attempts: u32,
        /// The error from the failed step's final attempt.
        step_error: E,
        /// Errors from failed compensations, in the order they happened.
        compensation_errors: Vec<CompensationError<E>>,
    },

    /// A step ran out of attempts and compensation stopped at the first
    /// compensation failure.
    #[error(
        "step '{failed_step}' failed, compensation halted at '{}' with {} step(s) not compensated",
        compensation_error.step,
        not_compensated.len()
    )]
    CompensationHalted {
        /// Name of the step that originally failed.
        failed_step: String,
        /// Number of attempts made on the failed step.
        attempts: u32,
        /// The error from the failed step's final attempt.
        step_error: E,
        /// The compensation that failed.
        #[source]
        compensation_error: CompensationError<E>,
        /// Steps that succeeded but were never compensated, most recent first.
        not_compensated: Vec<String>,
    },
}

impl<E: Debug> SagaError<E> {
    /// Name of the step whose exhaustion aborted the saga.
    #[must_use]
    pub fn failed_step(&self) -> &str {
        match self {
            Self::StepExhausted { step, .. } => step,
            Self::CompensationFailed { failed_step, .. }
            | Self::CompensationHalted { failed_step, .. } => failed_step,
        }
    }

    /// Number of attempts made on the failed step.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::StepExhausted { attempts, .. }
            | Self::CompensationFailed { attempts, .. }
            | Self::CompensationHalted { attempts, .. } => *attempts,
        }
    }

    /// The error from the failed step's final attempt.
    #[must_use]
    pub fn step_error(&self) -> &E {
        match self {
            Self::StepExhausted { source, .. } => source,
            Self::CompensationFailed { step_error, .. }
            | Self::CompensationHalted { step_error, .. } => step_error,
        }
    }

    /// Whether every successful step was compensated without error.
    #[must_use]
    pub fn fully_compensated(&self) -> bool {
        matches!(self, Self::StepExhausted { .. })
    }
}

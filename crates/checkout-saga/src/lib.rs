//! Saga executor for multi-step transactions.
//!
//! A transaction is a lazily produced sequence of steps. Each step is driven
//! through its own retry policy; when a step runs out of attempts, every step
//! that already succeeded is compensated in reverse order and no further step
//! is pulled from the sequence.

mod audit;
mod delay;
mod error;
mod executor;
mod outcome;
mod policy;
mod retry;
mod step;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use delay::{Delay, TokioDelay};
pub use error::{CompensationError, PolicyError, SagaError};
pub use executor::{CompensationPolicy, SagaExecutor};
pub use outcome::{Outcome, StepResult};
pub use policy::RetryPolicy;
pub use step::{BoxedStep, SagaStep};

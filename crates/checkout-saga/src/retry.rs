use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::delay::Delay;
use crate::outcome::StepResult;
use crate::step::SagaStep;

/// A step that failed on its last permitted attempt.
#[derive(Debug)]
pub(crate) struct StepExhausted<E> {
    pub(crate) attempts: u32,
    pub(crate) error: E,
}

/// Drive `step` through its retry policy.
///
/// Transient failures never leave this function; only exhaustion does.
pub(crate) async fn run_with_retry<S, D>(
    step: &S,
    delay: &D,
    audit_log: &mut SagaAuditLog,
    record: usize,
) -> Result<StepResult<S::Output>, StepExhausted<S::Error>>
where
    S: SagaStep + ?Sized,
    S::Error: std::fmt::Display,
    D: Delay + ?Sized,
{
    let policy = step.retry_policy();
    let mut attempt = 1;

    loop {
        audit_log.record_attempt(record);
        debug!(
            step = step.name(),
            attempt,
            max_attempts = policy.max_attempts(),
            "executing step"
        );

        match step.execute().await {
            Ok(output) => {
                return Ok(StepResult {
                    step: step.name(),
                    output,
                    attempts_used: attempt,
                });
            }
            Err(error) if policy.allows_retry_after(attempt) => {
                warn!(
                    step = step.name(),
                    attempt,
                    max_attempts = policy.max_attempts(),
                    delay_ms = u64::try_from(policy.delay().as_millis()).unwrap_or(u64::MAX),
                    %error,
                    "step attempt failed, retrying"
                );
                delay.wait(policy.delay()).await;
                attempt += 1;
            }
            Err(error) => {
                warn!(
                    step = step.name(),
                    attempts = attempt,
                    %error,
                    "step exhausted its retry policy"
                );
                return Err(StepExhausted {
                    attempts: attempt,
                    error,
                });
            }
        }
    }
}

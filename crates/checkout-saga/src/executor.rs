use std::fmt::{Debug, Display};

use tracing::{error, info};

use crate::audit::SagaAuditLog;
use crate::delay::{Delay, TokioDelay};
use crate::error::{CompensationError, SagaError};
use crate::outcome::Outcome;
use crate::retry::{StepExhausted, run_with_retry};
use crate::step::SagaStep;

/// What to do when a compensation itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompensationPolicy {
    /// Record the failure and keep compensating the remaining steps.
    #[default]
    BestEffort,
    /// Stop at the first failing compensation and report the steps left
    /// uncompensated.
    Halt,
}

/// Executes sagas: ordered sequences of compensable steps.
///
/// Steps are pulled from the sequence one at a time and each is driven
/// through its own retry policy. When a step exhausts its attempts, no further
/// step is pulled and every step that already succeeded is compensated in
/// reverse order (LIFO).
///
/// The executor holds no state between runs, so one executor can drive any
/// number of independent sagas, concurrently or not.
#[derive(Debug, Clone, Default)]
pub struct SagaExecutor<D = TokioDelay> {
    delay: D,
    compensation_policy: CompensationPolicy,
}

impl SagaExecutor<TokioDelay> {
    /// Create an executor that waits between retries on the tokio timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D> SagaExecutor<D>
where
    D: Delay,
{
    /// Create an executor with a custom wait primitive.
    #[must_use]
    pub fn with_delay(delay: D) -> Self {
        Self {
            delay,
            compensation_policy: CompensationPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_compensation_policy(mut self, policy: CompensationPolicy) -> Self {
        self.compensation_policy = policy;
        self
    }

    #[must_use]
    pub fn compensation_policy(&self) -> CompensationPolicy {
        self.compensation_policy
    }

    /// Execute a saga, returning the per-step results on success.
    ///
    /// The sequence is consumed lazily and at most once. On failure, every
    /// previously completed step is compensated in reverse order.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepExhausted` if a step runs out of attempts and all
    /// compensations succeed, `SagaError::CompensationFailed` or
    /// `SagaError::CompensationHalted` if some compensations also fail,
    /// depending on the compensation policy.
    pub async fn execute<I, S>(&self, sequence: I) -> Outcome<S::Output, S::Error>
    where
        I: IntoIterator<Item = S>,
        S: SagaStep,
        S::Error: Debug + Display,
    {
        let (outcome, _audit_log) = self.execute_internal(sequence).await;
        outcome
    }

    /// Execute a saga and return both the outcome and an audit log.
    ///
    /// The audit log tracks attempts, executions and compensations per step.
    pub async fn execute_with_audit<I, S>(
        &self,
        sequence: I,
    ) -> (Outcome<S::Output, S::Error>, SagaAuditLog)
    where
        I: IntoIterator<Item = S>,
        S: SagaStep,
        S::Error: Debug + Display,
    {
        self.execute_internal(sequence).await
    }

    async fn execute_internal<I, S>(
        &self,
        sequence: I,
    ) -> (Outcome<S::Output, S::Error>, SagaAuditLog)
    where
        I: IntoIterator<Item = S>,
        S: SagaStep,
        S::Error: Debug + Display,
    {
        let mut audit_log = SagaAuditLog::new();
        let mut executed: Vec<(usize, S)> = Vec::new();
        let mut results = Vec::new();

        for step in sequence {
            let record = audit_log.record_start(step.name());

            match run_with_retry(&step, &self.delay, &mut audit_log, record).await {
                Ok(result) => {
                    audit_log.record_success(record, step.compensation_description());
                    results.push(result);
                    executed.push((record, step));
                }
                Err(exhausted) => {
                    audit_log.record_failure(record);
                    let saga_error = self
                        .compensate(&mut audit_log, executed, step.name(), exhausted)
                        .await;
                    return (Err(saga_error), audit_log);
                }
            }
        }

        info!(steps = results.len(), "saga completed");
        (Ok(results), audit_log)
    }

    async fn compensate<S>(
        &self,
        audit_log: &mut SagaAuditLog,
        mut executed: Vec<(usize, S)>,
        failed_step: &str,
        exhausted: StepExhausted<S::Error>,
    ) -> SagaError<S::Error>
    where
        S: SagaStep,
        S::Error: Debug + Display,
    {
        info!(
            failed_step,
            to_compensate = executed.len(),
            "saga aborted, compensating completed steps"
        );

        let mut compensation_errors = Vec::new();

        while let Some((record, step)) = executed.pop() {
            let step_name = step.name();
            let description = step.compensation_description();

            match step.compensate().await {
                Ok(()) => {
                    info!(step = step_name, %description, "step compensated");
                    audit_log.record_compensated(record);
                }
                Err(error) => {
                    error!(step = step_name, %description, %error, "compensation failed");
                    audit_log.record_compensation_failed(record);
                    let compensation_error = CompensationError {
                        step: step_name.to_string(),
                        description,
                        error,
                    };

                    if self.compensation_policy == CompensationPolicy::Halt {
                        return Self::halt(
                            audit_log,
                            executed,
                            failed_step,
                            exhausted,
                            compensation_error,
                        );
                    }
                    compensation_errors.push(compensation_error);
                }
            }
        }

        if compensation_errors.is_empty() {
            SagaError::StepExhausted {
                step: failed_step.to_string(),
                attempts: exhausted.attempts,
                source: exhausted.error,
            }
        } else {
            SagaError::CompensationFailed {
                failed_step: failed_step.to_string(),
                attempts: exhausted.attempts,
                step_error: exhausted.error,
                compensation_errors,
            }
        }
    }

    fn halt<S>(
        audit_log: &mut SagaAuditLog,
        remaining: Vec<(usize, S)>,
        failed_step: &str,
        exhausted: StepExhausted<S::Error>,
        compensation_error: CompensationError<S::Error>,
    ) -> SagaError<S::Error>
    where
        S: SagaStep,
        S::Error: Debug,
    {
        let not_compensated = remaining
            .iter()
            .rev()
            .map(|(record, step)| {
                audit_log.record_not_compensated(*record);
                step.name().to_string()
            })
            .collect::<Vec<_>>();

        error!(
            failed_step,
            not_compensated = not_compensated.len(),
            "compensation halted"
        );

        SagaError::CompensationHalted {
            failed_step: failed_step.to_string(),
            attempts: exhausted.attempts,
            step_error: exhausted.error,
            compensation_error,
            not_compensated,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::audit::StepStatus;
    use crate::outcome::StepResult;
    use crate::policy::RetryPolicy;

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl Journal {
        fn push(&self, entry: String) {
            self.entries.lock().expect("lock").push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.entries.lock().expect("lock").clone()
        }
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct TestError(String);

    struct AddStep<'a> {
        name: &'static str,
        value: i32,
        journal: &'a Journal,
    }

    impl<'a> AddStep<'a> {
        fn new(name: &'static str, value: i32, journal: &'a Journal) -> Self {
            Self {
                name,
                value,
                journal,
            }
        }
    }

    #[async_trait]
    impl SagaStep for AddStep<'_> {
        type Output = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&self) -> Result<Self::Output, Self::Error> {
            self.journal.push(format!("execute {}", self.name));
            Ok(self.value)
        }

        async fn compensate(&self) -> Result<(), Self::Error> {
            self.journal.push(format!("compensate {}", self.name));
            Ok(())
        }
    }

    struct FailingStep<'a> {
        journal: &'a Journal,
        policy: RetryPolicy,
    }

    impl<'a> FailingStep<'a> {
        fn once(journal: &'a Journal) -> Self {
            Self {
                journal,
                policy: RetryPolicy::once(),
            }
        }
    }

    #[async_trait]
    impl SagaStep for FailingStep<'_> {
        type Output = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            "failing"
        }

        fn retry_policy(&self) -> RetryPolicy {
            self.policy
        }

        async fn execute(&self) -> Result<Self::Output, Self::Error> {
            self.journal.push("execute failing".to_string());
            Err(TestError("boom".to_string()))
        }

        async fn compensate(&self) -> Result<(), Self::Error> {
            self.journal.push("compensate failing".to_string());
            Ok(())
        }
    }

    struct FailingCompensationStep<'a> {
        name: &'static str,
        journal: &'a Journal,
    }

    impl<'a> FailingCompensationStep<'a> {
        fn new(name: &'static str, journal: &'a Journal) -> Self {
            Self { name, journal }
        }
    }

    #[async_trait]
    impl SagaStep for FailingCompensationStep<'_> {
        type Output = i32;
        type Error = TestError;

        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&self) -> Result<Self::Output, Self::Error> {
            Ok(0)
        }

        async fn compensate(&self) -> Result<(), Self::Error> {
            self.journal.push(format!("compensate {}", self.name));
            Err(TestError(format!("compensation failed for {}", self.name)))
        }
    }

    fn executor() -> SagaExecutor {
        SagaExecutor::new()
    }

    #[tokio::test]
    async fn executes_steps_in_order_and_collects_results() {
        let journal = Journal::default();
        let steps = vec![
            AddStep::new("a", 1, &journal),
            AddStep::new("b", 2, &journal),
        ];

        let results = executor().execute(steps).await.expect("saga succeeds");

        let outputs: Vec<_> = results.into_iter().map(StepResult::into_output).collect();
        assert_eq!(outputs, vec![1, 2]);
        assert_eq!(journal.entries(), vec!["execute a", "execute b"]);
    }

    #[tokio::test]
    async fn empty_sequence_succeeds_with_no_results() {
        let steps: Vec<AddStep<'_>> = Vec::new();

        let results = executor().execute(steps).await.expect("saga succeeds");

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn failure_compensates_in_reverse_and_skips_failed_step() {
        let journal = Journal::default();
        let steps: Vec<Box<dyn SagaStep<Output = i32, Error = TestError> + '_>> = vec![
            Box::new(AddStep::new("a", 1, &journal)),
            Box::new(AddStep::new("b", 2, &journal)),
            Box::new(FailingStep::once(&journal)),
        ];

        let err = executor().execute(steps).await.expect_err("saga fails");

        assert!(matches!(
            err,
            SagaError::StepExhausted { ref step, attempts: 1, .. } if step == "failing"
        ));
        assert_eq!(
            journal.entries(),
            vec![
                "execute a",
                "execute b",
                "execute failing",
                "compensate b",
                "compensate a",
            ]
        );
    }

    #[tokio::test]
    async fn best_effort_keeps_compensating_after_a_failure() {
        let journal = Journal::default();
        let steps: Vec<Box<dyn SagaStep<Output = i32, Error = TestError> + '_>> = vec![
            Box::new(AddStep::new("a", 1, &journal)),
            Box::new(FailingCompensationStep::new("b", &journal)),
            Box::new(FailingStep::once(&journal)),
        ];

        let (outcome, audit_log) = executor().execute_with_audit(steps).await;

        let err = outcome.expect_err("saga fails");
        match err {
            SagaError::CompensationFailed {
                failed_step,
                compensation_errors,
                ..
            } => {
                assert_eq!(failed_step, "failing");
                assert_eq!(compensation_errors.len(), 1);
                assert_eq!(compensation_errors[0].step, "b");
            }
            other => panic!("expected CompensationFailed, got {other:?}"),
        }
        assert!(journal.entries().contains(&"compensate a".to_string()));
        assert_eq!(audit_log.records()[0].status, StepStatus::Compensated);
        assert_eq!(audit_log.records()[1].status, StepStatus::CompensationFailed);
        assert_eq!(audit_log.records()[2].status, StepStatus::Failed);
    }

    #[tokio::test]
    async fn halt_policy_stops_at_first_failing_compensation() {
        let journal = Journal::default();
        let steps: Vec<Box<dyn SagaStep<Output = i32, Error = TestError> + '_>> = vec![
            Box::new(AddStep::new("a", 1, &journal)),
            Box::new(AddStep::new("b", 2, &journal)),
            Box::new(FailingCompensationStep::new("c", &journal)),
            Box::new(FailingStep::once(&journal)),
        ];

        let (outcome, audit_log) = executor()
            .with_compensation_policy(CompensationPolicy::Halt)
            .execute_with_audit(steps)
            .await;

        match outcome.expect_err("saga fails") {
            SagaError::CompensationHalted {
                compensation_error,
                not_compensated,
                ..
            } => {
                assert_eq!(compensation_error.step, "c");
                assert_eq!(not_compensated, vec!["b", "a"]);
            }
            other => panic!("expected CompensationHalted, got {other:?}"),
        }
        assert!(!journal.entries().contains(&"compensate b".to_string()));
        assert!(!journal.entries().contains(&"compensate a".to_string()));
        assert_eq!(audit_log.records()[0].status, StepStatus::NotCompensated);
        assert_eq!(audit_log.records()[1].status, StepStatus::NotCompensated);
        assert_eq!(audit_log.records()[2].status, StepStatus::CompensationFailed);
    }

    #[test]
    fn default_compensation_policy_is_best_effort() {
        assert_eq!(
            SagaExecutor::new().compensation_policy(),
            CompensationPolicy::BestEffort
        );
    }
}

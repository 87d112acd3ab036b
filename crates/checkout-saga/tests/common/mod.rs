#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use checkout_saga::{BoxedStep, RetryPolicy, SagaStep};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TestError(pub String);

/// Ordered record of everything the steps of one saga did.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Mutex<Vec<String>>,
}

impl Journal {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, entry: String) {
        self.entries.lock().expect("journal lock").push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("journal lock").clone()
    }

    pub fn compensations(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| e.strip_prefix("compensate ").map(str::to_string))
            .collect()
    }

    pub fn executions_of(&self, name: &str) -> usize {
        let prefix = format!("execute {name} #");
        self.entries()
            .iter()
            .filter(|e| e.starts_with(&prefix))
            .count()
    }
}

/// A step whose attempts succeed or fail according to a script.
///
/// Attempts beyond the end of the script fail.
pub struct ScriptedStep {
    name: &'static str,
    value: u32,
    script: Vec<bool>,
    policy: RetryPolicy,
    fail_compensation: bool,
    attempts: AtomicU32,
    journal: Arc<Journal>,
}

impl ScriptedStep {
    pub fn new(name: &'static str, journal: &Arc<Journal>) -> Self {
        Self {
            name,
            value: 0,
            script: vec![true],
            policy: RetryPolicy::once(),
            fail_compensation: false,
            attempts: AtomicU32::new(0),
            journal: Arc::clone(journal),
        }
    }

    pub fn value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn script(mut self, script: &[bool]) -> Self {
        self.script = script.to_vec();
        self
    }

    pub fn always_fails(self) -> Self {
        self.script(&[])
    }

    pub fn policy(mut self, max_attempts: u32, delay_ms: u64) -> Self {
        self.policy = RetryPolicy::try_new(max_attempts, delay_ms).expect("valid policy");
        self
    }

    pub fn failing_compensation(mut self) -> Self {
        self.fail_compensation = true;
        self
    }

    pub fn boxed(self) -> BoxedStep<u32, TestError> {
        Box::new(self)
    }
}

#[async_trait]
impl SagaStep for ScriptedStep {
    type Output = u32;
    type Error = TestError;

    fn name(&self) -> &'static str {
        self.name
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn execute(&self) -> Result<Self::Output, Self::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.journal.push(format!("execute {} #{attempt}", self.name));

        let index = usize::try_from(attempt - 1).expect("attempt fits usize");
        if self.script.get(index).copied().unwrap_or(false) {
            Ok(self.value)
        } else {
            Err(TestError(format!("{} failed on attempt {attempt}", self.name)))
        }
    }

    async fn compensate(&self) -> Result<(), Self::Error> {
        self.journal.push(format!("compensate {}", self.name));
        if self.fail_compensation {
            Err(TestError(format!("{} compensation failed", self.name)))
        } else {
            Ok(())
        }
    }

    fn compensation_description(&self) -> String {
        format!("roll back {}", self.name)
    }
}

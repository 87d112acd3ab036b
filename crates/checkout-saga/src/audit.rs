use std::time::Instant;

/// Status of a step in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Step is being attempted, or executed successfully.
    Executed,
    /// Step exhausted its retry policy.
    Failed,
    /// Step was compensated successfully.
    Compensated,
    /// Step compensation failed.
    CompensationFailed,
    /// Step succeeded but compensation halted before reaching it.
    NotCompensated,
}

/// Record of a step's execution in the saga.
#[derive(Debug)]
pub struct StepRecord {
    /// Name of the step.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// Number of execution attempts made so far.
    pub attempts: u32,
    /// When the first attempt started.
    pub started_at: Instant,
    /// When the step completed (execution or compensation).
    pub completed_at: Option<Instant>,
    /// Description of compensation (if applicable).
    pub compensation_description: Option<String>,
}

/// Audit log tracking all step executions in a saga.
///
/// Records are indexed by the position of the step in the sequence.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step being pulled from the sequence. Returns its index.
    pub(crate) fn record_start(&mut self, name: &str) -> usize {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            attempts: 0,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
        self.records.len() - 1
    }

    pub(crate) fn record_attempt(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.attempts += 1;
        }
    }

    pub(crate) fn record_failure(&mut self, index: usize) {
        self.update(index, StepStatus::Failed);
    }

    pub(crate) fn record_success(&mut self, index: usize, compensation_description: String) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        self.update(index, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize) {
        self.update(index, StepStatus::CompensationFailed);
    }

    pub(crate) fn record_not_compensated(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = StepStatus::NotCompensated;
        }
    }

    fn update(&mut self, index: usize, status: StepStatus) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    /// Get all records in the audit log, in sequence order.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Total number of execution attempts across all steps.
    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.records.iter().map(|r| r.attempts).sum()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                StepStatus::Executed => "✓",
                StepStatus::Failed => "✗",
                StepStatus::Compensated => "↩",
                StepStatus::CompensationFailed => "⚠",
                StepStatus::NotCompensated => "!",
            };
            lines.push(format!(
                "{status} {} ({} attempt(s))",
                record.name, record.attempts
            ));
        }
        lines.join("\n")
    }
}

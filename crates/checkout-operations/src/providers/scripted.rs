use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use crate::error::ConfigError;
use crate::traits::OutcomeSource;
use crate::types::OperationKind;

/// One entry of an outcome script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The next attempt succeeds.
    Pass,
    /// The next attempt fails.
    Fail,
    /// This and every later attempt fails.
    FailToEnd,
}

impl FromStr for Verdict {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            "fail-to-end" => Ok(Self::FailToEnd),
            other => Err(ConfigError::UnknownVerdict {
                verdict: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    remaining: VecDeque<Verdict>,
    calls: Vec<OperationKind>,
}

/// Replays a fixed sequence of verdicts, one per attempt.
///
/// Attempts made after the script runs out fail. Every call is recorded so a
/// run can be inspected afterwards.
#[derive(Debug, Default)]
pub struct ScriptedOutcomeSource {
    state: Mutex<ScriptState>,
}

impl ScriptedOutcomeSource {
    #[must_use]
    pub fn new(verdicts: impl IntoIterator<Item = Verdict>) -> Self {
        Self {
            state: Mutex::new(ScriptState {
                remaining: verdicts.into_iter().collect(),
                calls: Vec::new(),
            }),
        }
    }

    /// Parse a comma-separated script such as `pass,fail,fail-to-end`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownVerdict` for entries other than `pass`,
    /// `fail` and `fail-to-end`.
    pub fn parse(script: &str) -> Result<Self, ConfigError> {
        let verdicts = script
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(Verdict::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(verdicts))
    }

    /// Number of attempts answered so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Operations asked about, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<OperationKind> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutcomeSource for ScriptedOutcomeSource {
    fn succeeds(&self, operation: OperationKind) -> bool {
        let mut state = self.lock();
        state.calls.push(operation);

        match state.remaining.front().copied() {
            Some(Verdict::FailToEnd) | None => false,
            Some(verdict) => {
                state.remaining.pop_front();
                verdict == Verdict::Pass
            }
        }
    }
}

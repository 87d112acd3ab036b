use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::traits::{IdGenerator, OutcomeSource};
use crate::types::{OperationKind, SuccessRate};

/// Upper bound (exclusive) of generated identifiers.
pub const MAX_GENERATED_ID: u32 = 5_000;

/// Lets each attempt succeed with a fixed probability.
#[derive(Debug)]
pub struct RandomOutcomeSource {
    success_rate: SuccessRate,
    rng: Mutex<StdRng>,
}

impl RandomOutcomeSource {
    #[must_use]
    pub fn new(success_rate: SuccessRate) -> Self {
        Self::with_rng(success_rate, StdRng::from_entropy())
    }

    /// A reproducible source: the same seed yields the same verdicts.
    #[must_use]
    pub fn seeded(success_rate: SuccessRate, seed: u64) -> Self {
        Self::with_rng(success_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(success_rate: SuccessRate, rng: StdRng) -> Self {
        Self {
            success_rate,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn success_rate(&self) -> SuccessRate {
        self.success_rate
    }
}

impl OutcomeSource for RandomOutcomeSource {
    fn succeeds(&self, _operation: OperationKind) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_bool(self.success_rate.get())
    }
}

/// Draws identifiers uniformly from `0..MAX_GENERATED_ID`.
#[derive(Debug)]
pub struct RandomIds {
    rng: Mutex<StdRng>,
}

impl RandomIds {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..MAX_GENERATED_ID)
    }
}

use std::sync::atomic::{AtomicU32, Ordering};

use crate::traits::IdGenerator;

/// Hands out consecutive identifiers, starting from a fixed value.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU32,
    issued: AtomicU32,
}

impl SequentialIds {
    #[must_use]
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
            issued: AtomicU32::new(0),
        }
    }

    /// How many identifiers have been handed out so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u32 {
        self.issued.fetch_add(1, Ordering::SeqCst);
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

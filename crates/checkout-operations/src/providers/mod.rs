mod random;
mod scripted;
mod sequential;

pub use random::{MAX_GENERATED_ID, RandomIds, RandomOutcomeSource};
pub use scripted::{ScriptedOutcomeSource, Verdict};
pub use sequential::SequentialIds;

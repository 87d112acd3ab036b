mod id_generator;
mod outcome_source;

pub use id_generator::IdGenerator;
pub use outcome_source::OutcomeSource;

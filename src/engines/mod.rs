pub mod evaluation;
pub mod generation;
pub mod metrics;
pub mod query;

pub use evaluation::{Fitness, FitnessEvaluator, ScoredCandidate};
pub use generation::{generate, GenerationEngine, GenerationOutcome, GenerationStatus};
pub use query::ProteinQuery;

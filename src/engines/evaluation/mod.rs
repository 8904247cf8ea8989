pub mod fitness;

pub use fitness::{rank, Fitness, FitnessEvaluator, ScoredCandidate};

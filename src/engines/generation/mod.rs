pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use evolution_engine::{
    generate, ConvergenceReport, GenerationEngine, GenerationOutcome, GenerationPhase,
    GenerationStatus, GenerationSummary, ProgressCallback,
};
pub use operators::{delete_symbol, insert_symbol, mutate, recombine, substitute, MutationKind};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage, SilentProgressCallback,
};

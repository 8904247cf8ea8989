use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProteinDbError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Store is empty")]
    EmptyStore,

    #[error("Invalid metric '{0}': expected 'euclidean' or 'cosine'")]
    InvalidMetric(String),

    #[error("Degenerate vector: cosine similarity is undefined for a zero-norm vector")]
    DegenerateVector,

    #[error("Encoder failure: {0}")]
    EncoderFailure(String),

    #[error(
        "Convergence failure in generation {generation}: filled {filled}/{target} slots, \
         gave up after {attempts} consecutive rejections"
    )]
    ConvergenceFailure {
        generation: usize,
        filled: usize,
        target: usize,
        attempts: usize,
    },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProteinDbError>;

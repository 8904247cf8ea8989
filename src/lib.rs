//! Embedding-indexed protein sequence store with exact nearest-neighbour
//! search and an evolutionary generator for sequences near a target embedding.

pub mod config;
pub mod data;
pub mod encoding;
pub mod engines;
pub mod error;
pub mod types;

pub use data::{EmbeddingStore, SearchHit};
pub use encoding::{CompositionEncoder, Encoder, TimeoutEncoder};
pub use engines::generation::generate;
pub use error::{ProteinDbError, Result};
pub use types::{
    Alphabet, Embedding, Metric, ProteinMetadata, ProteinRecord, SequenceRecord, SimpleRecord,
};

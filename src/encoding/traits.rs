use crate::error::Result;
use crate::types::Embedding;
use std::sync::Arc;

/// Maps a sequence to a fixed-dimension embedding.
///
/// Implementations wrap an external model. From the store's and the generator's
/// point of view `encode` is a pure function; any failure must surface as
/// `ProteinDbError::EncoderFailure` rather than a default vector.
pub trait Encoder: Send + Sync {
    /// Length of every vector returned by `encode`
    fn dimension(&self) -> usize;

    fn encode(&self, sequence: &str) -> Result<Embedding>;
}

impl<E: Encoder + ?Sized> Encoder for Arc<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn encode(&self, sequence: &str) -> Result<Embedding> {
        (**self).encode(sequence)
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn encode(&self, sequence: &str) -> Result<Embedding> {
        (**self).encode(sequence)
    }
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn encode(&self, sequence: &str) -> Result<Embedding> {
        (**self).encode(sequence)
    }
}

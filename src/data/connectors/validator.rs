use crate::error::{ProteinDbError, Result};
use crate::types::{Alphabet, Embedding, SequenceRecord};

pub struct RecordValidator;

impl RecordValidator {
    /// Check one embedding against the store dimension.
    ///
    /// With no established dimension the embedding's own length becomes the
    /// expected one. Returns the dimension the store should hold afterwards.
    pub fn validate_embedding(embedding: &Embedding, expected: Option<usize>) -> Result<usize> {
        if embedding.dim() == 0 {
            return Err(ProteinDbError::InvalidRecord(
                "embedding must have at least one component".to_string(),
            ));
        }
        if embedding.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(ProteinDbError::InvalidRecord(
                "embedding contains non-finite values".to_string(),
            ));
        }

        match expected {
            Some(dim) if dim != embedding.dim() => Err(ProteinDbError::DimensionMismatch {
                expected: dim,
                actual: embedding.dim(),
            }),
            Some(dim) => Ok(dim),
            None => Ok(embedding.dim()),
        }
    }

    /// Validate a whole batch before any of it is applied.
    pub fn validate_batch<R: SequenceRecord>(
        records: &[R],
        expected: Option<usize>,
    ) -> Result<Option<usize>> {
        let mut dim = expected;
        for record in records {
            dim = Some(Self::validate_embedding(record.embedding(), dim)?);
        }
        Ok(dim)
    }

    /// Validate a query vector against an established dimension
    pub fn validate_query(query: &[f64], expected: usize) -> Result<()> {
        if query.len() != expected {
            return Err(ProteinDbError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }
        Ok(())
    }

    /// Symbols in `sequence` that are not part of `alphabet`, in order of first
    /// appearance. Lowercase letters count as their uppercase form.
    pub fn foreign_symbols(sequence: &str, alphabet: &Alphabet) -> Vec<char> {
        let mut found = Vec::new();
        for c in sequence.chars() {
            let known = alphabet.contains(c) || alphabet.contains(c.to_ascii_uppercase());
            if !known && !found.contains(&c) {
                found.push(c);
            }
        }
        found
    }
}

use crate::data::{EmbeddingStore, SearchHit};
use crate::encoding::Encoder;
use crate::error::Result;
use crate::types::{Metric, ProteinRecord, SequenceRecord};

/// Convenience queries over a store: encode-then-search for any record type,
/// metadata filters for full protein records.
pub struct ProteinQuery<'a, R: SequenceRecord, E> {
    store: &'a EmbeddingStore<R>,
    encoder: E,
}

impl<'a, R: SequenceRecord, E: Encoder> ProteinQuery<'a, R, E> {
    pub fn new(store: &'a EmbeddingStore<R>, encoder: E) -> Self {
        Self { store, encoder }
    }

    /// The `top` records whose embeddings are closest to `sequence`'s
    pub fn similar_sequence(&self, sequence: &str, top: usize) -> Result<Vec<SearchHit<'a, R>>> {
        let embedding = self.encoder.encode(sequence)?;
        self.store.nearest(embedding.as_slice(), top)
    }

    /// Records whose embeddings pass `threshold` under `metric` relative to
    /// `sequence`'s embedding. The metric name is checked before encoding.
    pub fn by_embedding(
        &self,
        sequence: &str,
        threshold: f64,
        metric: &str,
    ) -> Result<Vec<SearchHit<'a, R>>> {
        let metric: Metric = metric.parse()?;
        let embedding = self.encoder.encode(sequence)?;
        self.store.within(embedding.as_slice(), threshold, metric)
    }
}

fn contains_ignore_case(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(needle))
}

impl<'a, E> ProteinQuery<'a, ProteinRecord, E> {
    pub fn by_accession(&self, accession: &str) -> Vec<&'a ProteinRecord> {
        self.store
            .records()
            .iter()
            .filter(|r| r.accession() == Some(accession))
            .collect()
    }

    /// Case-insensitive substring match on the organism
    pub fn by_organism(&self, organism: &str) -> Vec<&'a ProteinRecord> {
        let needle = organism.to_lowercase();
        self.store
            .records()
            .iter()
            .filter(|r| contains_ignore_case(r.organism(), &needle))
            .collect()
    }

    /// Case-insensitive substring match on the description
    pub fn description_contains(&self, text: &str) -> Vec<&'a ProteinRecord> {
        let needle = text.to_lowercase();
        self.store
            .records()
            .iter()
            .filter(|r| contains_ignore_case(r.description(), &needle))
            .collect()
    }
}

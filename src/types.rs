use crate::engines::metrics::distance;
use crate::error::{ProteinDbError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 20 standard amino acids, in one-letter code.
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Fixed-dimension embedding of a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f64>);

impl Embedding {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn norm(&self) -> f64 {
        distance::norm(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn euclidean_distance(&self, other: &[f64]) -> Result<f64> {
        distance::euclidean(&self.0, other)
    }

    pub fn cosine_similarity(&self, other: &[f64]) -> Result<f64> {
        distance::cosine_similarity(&self.0, other)
    }

    pub fn rmse(&self, other: &[f64]) -> Result<f64> {
        distance::rmse(&self.0, other)
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl AsRef<[f64]> for Embedding {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Similarity predicate used by threshold queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Match when L2 distance <= threshold
    Euclidean,
    /// Match when cosine similarity >= threshold
    Cosine,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
        }
    }
}

impl FromStr for Metric {
    type Err = ProteinDbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "euclidean" => Ok(Self::Euclidean),
            "cosine" => Ok(Self::Cosine),
            other => Err(ProteinDbError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol set that mutation operators draw from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(ProteinDbError::Configuration(
                "Alphabet must contain at least one symbol".to_string(),
            ));
        }
        Ok(Self { symbols })
    }

    pub fn amino_acids() -> Self {
        Self {
            symbols: AMINO_ACIDS.chars().collect(),
        }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn position(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.position(symbol).is_some()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::amino_acids()
    }
}

/// Common view over the record variants a store can hold.
///
/// Records are immutable once built; replacing a record means inserting a new one.
pub trait SequenceRecord: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn sequence(&self) -> &str;
    fn embedding(&self) -> &Embedding;
}

/// Descriptive fields carried by full protein records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinMetadata {
    pub accession: Option<String>,
    pub description: Option<String>,
    pub locus: Option<String>,
    pub organism: Option<String>,
}

/// Full record: sequence, embedding and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinRecord {
    metadata: ProteinMetadata,
    sequence: String,
    embedding: Embedding,
}

impl ProteinRecord {
    pub fn new(
        metadata: ProteinMetadata,
        sequence: impl Into<String>,
        embedding: impl Into<Embedding>,
    ) -> Self {
        Self {
            metadata,
            sequence: sequence.into(),
            embedding: embedding.into(),
        }
    }

    pub fn metadata(&self) -> &ProteinMetadata {
        &self.metadata
    }

    pub fn accession(&self) -> Option<&str> {
        self.metadata.accession.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }

    pub fn locus(&self) -> Option<&str> {
        self.metadata.locus.as_deref()
    }

    pub fn organism(&self) -> Option<&str> {
        self.metadata.organism.as_deref()
    }
}

impl SequenceRecord for ProteinRecord {
    fn sequence(&self) -> &str {
        &self.sequence
    }

    fn embedding(&self) -> &Embedding {
        &self.embedding
    }
}

/// Simple record: sequence and embedding only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleRecord {
    sequence: String,
    embedding: Embedding,
}

impl SimpleRecord {
    pub fn new(sequence: impl Into<String>, embedding: impl Into<Embedding>) -> Self {
        Self {
            sequence: sequence.into(),
            embedding: embedding.into(),
        }
    }
}

impl SequenceRecord for SimpleRecord {
    fn sequence(&self) -> &str {
        &self.sequence
    }

    fn embedding(&self) -> &Embedding {
        &self.embedding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parsing() {
        assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);

        let err = "manhattan".parse::<Metric>().unwrap_err();
        assert!(matches!(err, ProteinDbError::InvalidMetric(name) if name == "manhattan"));
    }

    #[test]
    fn test_amino_acid_alphabet() {
        let alphabet = Alphabet::amino_acids();
        assert_eq!(alphabet.len(), 20);
        assert!(alphabet.contains('W'));
        assert!(!alphabet.contains('B'));
        assert!(Alphabet::new("").is_err());
    }

    #[test]
    fn test_record_serde_shape() {
        let record = SimpleRecord::new("MKV", vec![1.0, 0.0]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"sequence":"MKV","embedding":[1.0,0.0]}"#);

        let back: SimpleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

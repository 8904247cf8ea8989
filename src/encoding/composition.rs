use super::traits::Encoder;
use crate::data::RecordValidator;
use crate::error::{ProteinDbError, Result};
use crate::types::{Alphabet, Embedding};

/// Residue composition encoder.
///
/// Each component is the frequency of one alphabet symbol in the sequence,
/// optionally L2-normalised. Lowercase residues are accepted. The empty
/// sequence encodes to the zero vector.
#[derive(Debug, Clone)]
pub struct CompositionEncoder {
    alphabet: Alphabet,
    normalize: bool,
}

impl Default for CompositionEncoder {
    fn default() -> Self {
        Self::new(Alphabet::amino_acids(), true)
    }
}

impl CompositionEncoder {
    pub fn new(alphabet: Alphabet, normalize: bool) -> Self {
        Self { alphabet, normalize }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

impl Encoder for CompositionEncoder {
    fn dimension(&self) -> usize {
        self.alphabet.len()
    }

    fn encode(&self, sequence: &str) -> Result<Embedding> {
        let mut vector = vec![0.0; self.alphabet.len()];
        let mut total = 0usize;

        for (i, c) in sequence.chars().enumerate() {
            let slot = self
                .alphabet
                .position(c)
                .or_else(|| self.alphabet.position(c.to_ascii_uppercase()))
                .ok_or_else(|| {
                    let foreign = RecordValidator::foreign_symbols(sequence, &self.alphabet);
                    ProteinDbError::EncoderFailure(format!(
                        "symbol '{}' at position {} is not in the alphabet (foreign symbols: {})",
                        c,
                        i,
                        foreign.iter().collect::<String>()
                    ))
                })?;
            vector[slot] += 1.0;
            total += 1;
        }

        if total > 0 {
            for v in vector.iter_mut() {
                *v /= total as f64;
            }
        }

        if self.normalize {
            let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in vector.iter_mut() {
                    *v /= norm;
                }
            }
        }

        Ok(Embedding::new(vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_counts() {
        let encoder = CompositionEncoder::new(Alphabet::new("AC").unwrap(), false);
        let emb = encoder.encode("AAC").unwrap();
        assert_eq!(emb.as_slice(), &[2.0 / 3.0, 1.0 / 3.0]);
    }

    #[test]
    fn test_normalized_output_is_unit_length() {
        let encoder = CompositionEncoder::default();
        let emb = encoder.encode("MKVLAAGW").unwrap();
        assert_eq!(emb.dim(), 20);
        assert!((emb.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lowercase_accepted() {
        let encoder = CompositionEncoder::default();
        assert_eq!(encoder.encode("mkv").unwrap(), encoder.encode("MKV").unwrap());
    }

    #[test]
    fn test_empty_is_zero_vector() {
        let emb = CompositionEncoder::default().encode("").unwrap();
        assert!(emb.is_zero());
    }

    #[test]
    fn test_foreign_symbol_fails() {
        let err = CompositionEncoder::default().encode("MK*V").unwrap_err();
        assert!(matches!(err, ProteinDbError::EncoderFailure(msg) if msg.contains("position 2")));
    }

    #[test]
    fn test_failure_lists_every_foreign_symbol() {
        let err = CompositionEncoder::default().encode("mkXvB*X").unwrap_err();
        match err {
            ProteinDbError::EncoderFailure(msg) => {
                assert!(msg.contains("position 2"), "{}", msg);
                assert!(msg.contains("foreign symbols: XB*"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

use crate::encoding::Encoder;
use crate::engines::metrics::distance;
use crate::error::{ProteinDbError, Result};
use crate::types::Embedding;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Closeness of a candidate's embedding to the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    pub cosine: f64,
    pub rmse: f64,
}

impl Fitness {
    /// Ranking order: higher cosine first, then lower rmse.
    ///
    /// Any cosine gain outranks any rmse loss.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .cosine
            .total_cmp(&self.cosine)
            .then_with(|| self.rmse.total_cmp(&other.rmse))
    }

    pub fn cosine_distance(&self) -> f64 {
        1.0 - self.cosine
    }

    /// Offspring acceptance gate
    pub fn accepts(&self, cos_threshold: f64, rmse_threshold: f64) -> bool {
        self.cosine_distance() <= cos_threshold && self.rmse <= rmse_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub sequence: String,
    pub fitness: Fitness,
}

/// Stable sort by `Fitness::rank_cmp`; equal candidates keep their order.
pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| a.fitness.rank_cmp(&b.fitness));
}

/// Scores candidate sequences against one target embedding.
pub struct FitnessEvaluator<E> {
    encoder: E,
    target: Embedding,
}

impl<E: Encoder> FitnessEvaluator<E> {
    /// Fails if the target is empty, all zeros, or not the encoder's dimension.
    pub fn new(encoder: E, target: impl Into<Embedding>) -> Result<Self> {
        let target = target.into();
        if target.dim() != encoder.dimension() {
            return Err(ProteinDbError::DimensionMismatch {
                expected: encoder.dimension(),
                actual: target.dim(),
            });
        }
        if target.is_zero() {
            return Err(ProteinDbError::DegenerateVector);
        }
        Ok(Self { encoder, target })
    }

    pub fn target(&self) -> &Embedding {
        &self.target
    }

    pub fn score(&self, sequence: &str) -> Result<Fitness> {
        let embedding = self.encoder.encode(sequence)?;
        if embedding.dim() != self.target.dim() {
            return Err(ProteinDbError::DimensionMismatch {
                expected: self.target.dim(),
                actual: embedding.dim(),
            });
        }

        let cosine = distance::cosine_similarity(self.target.as_slice(), embedding.as_slice())?;
        let rmse = distance::rmse(self.target.as_slice(), embedding.as_slice())?;
        Ok(Fitness { cosine, rmse })
    }

    /// Score a batch, one result per input in input order
    pub fn score_all(&self, sequences: &[String], parallel: bool) -> Vec<Result<Fitness>> {
        if parallel {
            sequences.par_iter().map(|s| self.score(s)).collect()
        } else {
            sequences.iter().map(|s| self.score(s)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CompositionEncoder;
    use crate::types::Alphabet;

    fn two_letter_encoder() -> CompositionEncoder {
        CompositionEncoder::new(Alphabet::new("AC").unwrap(), false)
    }

    #[test]
    fn test_rank_prefers_cosine_over_rmse() {
        let mut candidates = vec![
            ScoredCandidate {
                sequence: "low-cos".to_string(),
                fitness: Fitness { cosine: 0.90, rmse: 0.01 },
            },
            ScoredCandidate {
                sequence: "high-cos".to_string(),
                fitness: Fitness { cosine: 0.91, rmse: 5.0 },
            },
            ScoredCandidate {
                sequence: "high-cos-better-rmse".to_string(),
                fitness: Fitness { cosine: 0.91, rmse: 1.0 },
            },
        ];
        rank(&mut candidates);
        let order: Vec<&str> = candidates.iter().map(|c| c.sequence.as_str()).collect();
        assert_eq!(order, vec!["high-cos-better-rmse", "high-cos", "low-cos"]);
    }

    #[test]
    fn test_accepts() {
        let f = Fitness { cosine: 0.95, rmse: 0.2 };
        assert!(f.accepts(0.05, 0.2));
        assert!(!f.accepts(0.04, 0.2));
        assert!(!f.accepts(0.1, 0.1));
    }

    #[test]
    fn test_exact_match_scores_perfectly() {
        let evaluator = FitnessEvaluator::new(two_letter_encoder(), vec![1.0, 0.0]).unwrap();
        let fitness = evaluator.score("AAA").unwrap();
        assert_eq!(fitness.cosine, 1.0);
        assert_eq!(fitness.rmse, 0.0);
    }

    #[test]
    fn test_target_validation() {
        assert!(matches!(
            FitnessEvaluator::new(two_letter_encoder(), vec![1.0, 0.0, 0.0]),
            Err(ProteinDbError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            FitnessEvaluator::new(two_letter_encoder(), vec![0.0, 0.0]),
            Err(ProteinDbError::DegenerateVector)
        ));
    }

    #[test]
    fn test_degenerate_and_encoder_errors_propagate() {
        let evaluator = FitnessEvaluator::new(two_letter_encoder(), vec![1.0, 0.0]).unwrap();
        assert!(matches!(evaluator.score(""), Err(ProteinDbError::DegenerateVector)));
        assert!(matches!(evaluator.score("AXC"), Err(ProteinDbError::EncoderFailure(_))));
    }

    #[test]
    fn test_score_all_preserves_order() {
        let evaluator = FitnessEvaluator::new(two_letter_encoder(), vec![1.0, 0.0]).unwrap();
        let sequences: Vec<String> = ["AAAA", "CCCC", "AACC"].map(String::from).to_vec();

        let serial: Vec<Fitness> = evaluator
            .score_all(&sequences, false)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        let parallel: Vec<Fitness> = evaluator
            .score_all(&sequences, true)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(serial, parallel);
        assert_eq!(serial[0].cosine, 1.0);
        assert_eq!(serial[1].cosine, 0.0);
    }
}

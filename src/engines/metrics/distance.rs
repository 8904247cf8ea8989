// src/engines/metrics/distance.rs
use crate::error::{ProteinDbError, Result};

fn check_dims(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(ProteinDbError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Squared L2 distance, no length check. Callers guarantee equal lengths.
pub(crate) fn squared_euclidean_unchecked(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dims(a, b)?;
    Ok(squared_euclidean_unchecked(a, b).sqrt())
}

/// Cosine similarity in [-1, 1]. Zero-norm input is a `DegenerateVector` error.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dims(a, b)?;
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return Err(ProteinDbError::DegenerateVector);
    }
    // Rounding can push |cos| a hair above 1
    Ok((dot(a, b) / denom).clamp(-1.0, 1.0))
}

pub fn rmse(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dims(a, b)?;
    if a.is_empty() {
        return Ok(0.0);
    }
    Ok((squared_euclidean_unchecked(a, b) / a.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_orthogonal_unit_vectors() {
        let d = euclidean(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!((d - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]).unwrap(), 1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]).unwrap(), -1.0);
    }

    #[test]
    fn test_cosine_zero_vector_is_degenerate() {
        let err = cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, ProteinDbError::DegenerateVector));
    }

    #[test]
    fn test_rmse() {
        assert_eq!(rmse(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
        // errors 2 and 0 -> sqrt(4 / 2)
        let r = rmse(&[3.0, 0.0], &[1.0, 0.0]).unwrap();
        assert!((r - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = euclidean(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ProteinDbError::DimensionMismatch { expected: 1, actual: 2 }
        ));
    }
}

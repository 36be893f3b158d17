//! Cosine similarity and vector contract checks.

use kbase_core::{Error, Result};

/// Calculate cosine similarity between two vectors
///
/// Returns `0.0` when either vector has zero magnitude, so degenerate
/// vectors still rank (at the bottom) instead of producing NaN.
/// Callers are expected to pass vectors of equal length; extra components
/// of the longer vector are ignored by the dot product.
///
/// Sums are accumulated in `f64` so large finite components cannot overflow.
pub fn cosine_similarity(vector_a: &[f32], vector_b: &[f32]) -> f32 {
    let dot_product: f64 = vector_a
        .iter()
        .zip(vector_b.iter())
        .map(|(left, right)| f64::from(*left) * f64::from(*right))
        .sum();
    let magnitude_a = magnitude(vector_a);
    let magnitude_b = magnitude(vector_b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0) as f32
}

/// Euclidean norm.
fn magnitude(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|component| {
            let wide = f64::from(*component);
            wide * wide
        })
        .sum::<f64>()
        .sqrt()
}

/// Rejects NaN and infinite components. `index` is `None` for the query.
pub(crate) fn ensure_finite(vector: &[f32], index: Option<usize>) -> Result<()> {
    if vector.iter().all(|component| component.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFiniteVector { index })
    }
}

/// Rejects a candidate whose length differs from the query's.
pub(crate) fn ensure_dimensions(expected: usize, candidate: &[f32], index: usize) -> Result<()> {
    if candidate.len() == expected {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            index,
            expected,
            actual: candidate.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identical_vectors() {
        let similarity = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((similarity - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_magnitude_does_not_matter() {
        let similarity = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]);
        assert!((similarity - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < EPSILON);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_large_components_do_not_overflow() {
        let large = [1e20, 0.0];
        assert!((cosine_similarity(&large, &large) - 1.0).abs() < EPSILON);
        assert!((cosine_similarity(&[1.0, 0.0], &large) - 1.0).abs() < EPSILON);
        assert!((cosine_similarity(&large, &[-1e20, 0.0]) + 1.0).abs() < EPSILON);
        assert!(cosine_similarity(&[f32::MAX, f32::MAX], &[f32::MAX, 0.0]).is_finite());
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[1.0, -2.5], None).is_ok());
        assert!(matches!(
            ensure_finite(&[1.0, f32::NAN], Some(4)),
            Err(Error::NonFiniteVector { index: Some(4) })
        ));
        assert!(matches!(
            ensure_finite(&[f32::INFINITY], None),
            Err(Error::NonFiniteVector { index: None })
        ));
    }

    #[test]
    fn test_ensure_dimensions() {
        assert!(ensure_dimensions(2, &[0.0, 1.0], 0).is_ok());
        assert!(matches!(
            ensure_dimensions(3, &[0.0, 1.0], 5),
            Err(Error::DimensionMismatch {
                index: 5,
                expected: 3,
                actual: 2
            })
        ));
    }
}

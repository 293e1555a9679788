//! Vector Similarity Functions
//!
//! Distance kernels shared by the ranking functions.
//! Sums are accumulated in f64: squares of any finite f32 fit there
//! without overflowing or flushing to zero.

/// Compute dot product of two vectors
///
/// Uses unrolled loop for better CPU performance.
#[inline]
pub(crate) fn dot_product(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let len = a.len();
    let mut sum = 0.0f64;

    // Process 4 elements at a time (manual unrolling)
    let chunks = len / 4;
    let remainder = len % 4;

    for i in 0..chunks {
        let idx = i * 4;
        sum += a[idx] as f64 * b[idx] as f64;
        sum += a[idx + 1] as f64 * b[idx + 1] as f64;
        sum += a[idx + 2] as f64 * b[idx + 2] as f64;
        sum += a[idx + 3] as f64 * b[idx + 3] as f64;
    }

    // Handle remainder
    for i in (len - remainder)..len {
        sum += a[i] as f64 * b[i] as f64;
    }

    sum
}

/// Euclidean (L2) norm
#[inline]
pub(crate) fn l2_norm(v: &[f32]) -> f64 {
    dot_product(v, v).sqrt()
}

/// Cosine similarity given both norms up front
///
/// Returns 0.0 when either norm is zero.
#[inline]
pub(crate) fn cosine_with_norms(a: &[f32], a_norm: f64, b: &[f32], b_norm: f64) -> f32 {
    let denom = a_norm * b_norm;
    if denom > 0.0 {
        (dot_product(a, b) / denom) as f32
    } else {
        0.0
    }
}

/// Compute Euclidean distance between two vectors
#[inline]
pub(crate) fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as f64 - y as f64).powi(2))
        .sum::<f64>()
        .sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
    }

    #[test]
    fn test_dot_product() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        assert!((dot_product(&a, &b) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_dot_product_unrolled_remainder() {
        let a: Vec<f32> = (1..=7).map(|x| x as f32).collect();
        let b = vec![1.0; 7];
        assert!((dot_product(&a, &b) - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_l2_norm() {
        assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-9);
        assert_eq!(l2_norm(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_l2_norm_extreme_magnitudes() {
        let big = l2_norm(&[1e20, 0.0]);
        assert!(big.is_finite());
        assert!((big / 1e20 - 1.0).abs() < 1e-6);

        let max = l2_norm(&[f32::MAX, f32::MAX]);
        assert!(max.is_finite());

        let tiny = l2_norm(&[1e-25, 0.0]);
        assert!(tiny > 0.0);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_extreme_magnitudes() {
        let big = [1e20, 0.0];
        assert!((cosine(&big, &big) - 1.0).abs() < 1e-6);

        let tiny = [1e-25, 0.0];
        assert!((cosine(&tiny, &big) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_euclidean_distance() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![3.0, 4.0, 0.0];
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_euclidean_distance_large_components() {
        let a = [3e19, 0.0];
        let b = [0.0, 4e19];
        let d = euclidean_distance(&a, &b);
        assert!(d.is_finite());
        assert!((d / 5e19 - 1.0).abs() < 1e-6);
    }
}

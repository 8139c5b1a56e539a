//! Cosine similarity over embedding rows.

use ndarray::{ArrayView1, ArrayView2};

/// Cosine similarity of two vectors, accumulated in f64.
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    dot / denom
}

/// Similarity of every row of `matrix` to `v`.
pub fn cosine_to_rows(matrix: ArrayView2<'_, f32>, v: ArrayView1<'_, f32>) -> Vec<f64> {
    matrix
        .rows()
        .into_iter()
        .map(|row| cosine_similarity(row, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_orthogonal() {
        let a = array![1.0f32, 2.0, 3.0];
        let b = array![0.0f32, 3.0, -2.0];
        assert!(approx_eq(cosine_similarity(a.view(), a.view()), 1.0));
        assert!(approx_eq(cosine_similarity(a.view(), b.view()), 0.0));
    }

    #[test]
    fn test_opposite() {
        let a = array![1.0f32, 0.0];
        let b = array![-2.0f32, 0.0];
        assert!(approx_eq(cosine_similarity(a.view(), b.view()), -1.0));
    }

    #[test]
    fn test_zero_norm_is_zero() {
        let a = array![0.0f32, 0.0];
        let b = array![1.0f32, 1.0];
        assert_eq!(cosine_similarity(a.view(), b.view()), 0.0);
        assert!(!cosine_similarity(a.view(), a.view()).is_nan());
    }

    #[test]
    fn test_rows() {
        let m = array![[1.0f32, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let sims = cosine_to_rows(m.view(), array![1.0f32, 0.0].view());
        assert!(approx_eq(sims[0], 1.0));
        assert!(approx_eq(sims[1], 0.0));
        assert!(approx_eq(sims[2], std::f64::consts::FRAC_1_SQRT_2));
    }
}

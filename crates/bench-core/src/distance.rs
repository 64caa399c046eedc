//! Distance helpers for embeddings and the flat index.

/// Dot product of two equal-length vectors.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Compute L2 (Euclidean) norm of a vector.
#[inline]
pub fn l2_norm(a: &[f32]) -> f32 {
    dot_product(a, a).sqrt()
}

/// Compute squared Euclidean distance between two vectors.
#[inline]
pub fn squared_euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

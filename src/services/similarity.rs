use rayon::prelude::*;

use crate::models::RatingsMatrix;

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Largest absolute component, 0.0 only for an all-zero vector
pub fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

/// A vector divided by its largest absolute component, with the norm of the result
///
/// Components of the scaled vector lie in [-1, 1], so neither the dot
/// product nor the norm can overflow or underflow to zero for any finite
/// non-zero input. `None` for an all-zero vector.
fn rescaled(v: &[f64]) -> Option<(Vec<f64>, f64)> {
    let scale = max_abs(v);
    if scale == 0.0 {
        return None;
    }
    let scaled: Vec<f64> = v.iter().map(|x| x / scale).collect();
    let norm = dot(&scaled, &scaled).sqrt();
    Some((scaled, norm))
}

/// Cosine similarity of two vectors, 0.0 when either is all zeros
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    match (rescaled(a), rescaled(b)) {
        (Some((a, norm_a)), Some((b, norm_b))) => cosine(&a, norm_a, &b, norm_b),
        _ => 0.0,
    }
}

#[inline]
fn cosine(a: &[f64], norm_a: f64, b: &[f64], norm_b: f64) -> f64 {
    let sim = (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    // Fold -0.0 into 0.0 so orthogonal rows compare equal under total ordering
    if sim == 0.0 {
        0.0
    } else {
        sim
    }
}

/// Pairwise cosine similarity between every row of a ratings matrix
///
/// Stored row-major as a flat `n * n` buffer. Symmetric; the diagonal is
/// 1.0 for non-zero rows and 0.0 for zero rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.values[i * self.size + j])
        } else {
            None
        }
    }

    /// Similarities of row `i` to every row, in row order
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            Some(&self.values[i * self.size..(i + 1) * self.size])
        } else {
            None
        }
    }
}

/// Computes the similarity matrix for a ratings matrix
///
/// O(n² · d) time and O(n²) space. Rows are rescaled once, then filled in
/// parallel; every entry goes through the same scalar routine so the output
/// does not depend on scheduling.
pub fn prepare(matrix: &RatingsMatrix) -> SimilarityMatrix {
    let size = matrix.len();
    let scaled: Vec<Option<(Vec<f64>, f64)>> =
        matrix.rows().par_iter().map(|row| rescaled(row)).collect();
    let mut values = vec![0.0; size * size];

    if size > 0 {
        values
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(i, out)| {
                let Some((a, norm_a)) = &scaled[i] else {
                    return;
                };
                for (j, cell) in out.iter_mut().enumerate() {
                    *cell = match &scaled[j] {
                        _ if i == j => 1.0,
                        Some((b, norm_b)) => cosine(a, *norm_a, b, *norm_b),
                        None => 0.0,
                    };
                }
            });
    }

    SimilarityMatrix { size, values }
}

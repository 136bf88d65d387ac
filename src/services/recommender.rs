use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{RatingsMatrix, Recommendation},
    services::similarity::{self, SimilarityMatrix},
};

/// Number of recommendations returned when the caller does not choose
pub const DEFAULT_TOP_K: usize = 5;

/// Answers "most similar movies" queries against a frozen catalog
///
/// Built once with [`Recommender::prepare`]; every query afterwards is a
/// read of the precomputed similarity matrix, so a single instance can be
/// shared across threads without locking.
#[derive(Debug)]
pub struct Recommender {
    ratings: Arc<RatingsMatrix>,
    similarity: SimilarityMatrix,
}

impl Recommender {
    /// Computes pairwise similarity for the catalog
    pub fn prepare(ratings: Arc<RatingsMatrix>) -> Self {
        let start = Instant::now();
        let similarity = similarity::prepare(&ratings);

        tracing::info!(
            movies = ratings.len(),
            dimension = ratings.dimension(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Similarity matrix prepared"
        );

        Self {
            ratings,
            similarity,
        }
    }

    /// Catalog titles in row order
    pub fn catalog(&self) -> &[String] {
        self.ratings.titles()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.ratings.contains(title)
    }

    /// Similarity between two catalog titles
    pub fn similarity(&self, a: &str, b: &str) -> AppResult<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        self.similarity
            .get(i, j)
            .ok_or_else(|| AppError::Internal(format!("no similarity entry for ({i}, {j})")))
    }

    /// Up to `k` titles most similar to `title`, best first, `title` itself excluded
    ///
    /// Equal scores keep catalog row order. Fails with `UnknownTitle` when the
    /// title is not in the catalog.
    pub fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<String>> {
        Ok(self
            .ranked(title, k)?
            .into_iter()
            .map(|(row, _)| self.title_at(row))
            .collect())
    }

    /// Same ranking as [`Recommender::recommend`], with rank and similarity attached
    pub fn recommend_scored(&self, title: &str, k: usize) -> AppResult<Vec<Recommendation>> {
        Ok(self
            .ranked(title, k)?
            .into_iter()
            .enumerate()
            .map(|(i, (row, similarity))| Recommendation {
                rank: i + 1,
                title: self.title_at(row),
                similarity,
            })
            .collect())
    }

    fn ranked(&self, title: &str, k: usize) -> AppResult<Vec<(usize, f64)>> {
        let query = self.position(title)?;
        let scores = self
            .similarity
            .row(query)
            .ok_or_else(|| AppError::Internal(format!("no similarity row for index {query}")))?;

        let mut candidates: Vec<(usize, f64)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(row, _)| *row != query)
            .collect();

        // sort_by is stable: ties stay in row order
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.truncate(k);

        tracing::debug!(title, k, returned = candidates.len(), "Recommendations ranked");

        Ok(candidates)
    }

    fn position(&self, title: &str) -> AppResult<usize> {
        self.ratings
            .position(title)
            .ok_or_else(|| AppError::UnknownTitle(title.to_string()))
    }

    fn title_at(&self, row: usize) -> String {
        self.ratings.titles()[row].clone()
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;

use crate::{
    error::AppResult,
    models::{RatingsArtifact, RatingsMatrix},
};

/// Reads and validates a ratings artifact without caching
///
/// Fails with `ArtifactNotFound` when the path does not exist and with
/// `ArtifactCorrupt` when the file cannot be decoded or breaks the table
/// invariants (duplicate titles, ragged rows, non-finite values).
pub fn load_ratings(path: impl AsRef<Path>) -> AppResult<RatingsMatrix> {
    let path = path.as_ref();
    let start = Instant::now();

    let artifact = RatingsArtifact::read_from(path)?;
    let matrix = RatingsMatrix::try_from(artifact)?;

    tracing::info!(
        path = %path.display(),
        movies = matrix.len(),
        dimension = matrix.dimension(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Ratings artifact loaded"
    );

    Ok(matrix)
}

/// Loads the ratings matrix for one artifact path at most once
///
/// The first successful `load` freezes the matrix; later calls hand out the
/// same shared handle without touching the file again. A failed load is not
/// cached, so a later call retries.
#[derive(Debug)]
pub struct RatingsStore {
    path: PathBuf,
    matrix: OnceCell<Arc<RatingsMatrix>>,
}

impl RatingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            matrix: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Arc<RatingsMatrix>> {
        self.matrix
            .get_or_try_init(|| load_ratings(&self.path).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.matrix.get().is_some()
    }
}

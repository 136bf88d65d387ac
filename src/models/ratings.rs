use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// On-disk layout of a precomputed ratings table
///
/// `ratings[i]` is the rating vector of `titles[i]`. Written by the offline
/// preparation step, either as bincode or as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingsArtifact {
    pub titles: Vec<String>,
    pub ratings: Vec<Vec<f64>>,
}

impl RatingsArtifact {
    pub fn save_bin(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads an artifact, picking the format from the file extension
    pub(crate) fn read_from(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::ArtifactNotFound(path.display().to_string()),
            _ => AppError::ArtifactCorrupt(format!("{}: {}", path.display(), e)),
        })?;
        let reader = BufReader::new(file);

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_reader(reader)
                .map_err(|e| AppError::ArtifactCorrupt(format!("{}: {}", path.display(), e)))
        } else {
            bincode::deserialize_from(reader)
                .map_err(|e| AppError::ArtifactCorrupt(format!("{}: {}", path.display(), e)))
        }
    }
}

/// Movie rating vectors indexed by title
///
/// Row labels are unique, every row has the same length and every cell is
/// finite. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingsMatrix {
    titles: Vec<String>,
    rows: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    dimension: usize,
}

impl RatingsMatrix {
    /// Builds a matrix from parallel title and row lists, enforcing the table invariants
    pub fn new(titles: Vec<String>, rows: Vec<Vec<f64>>) -> AppResult<Self> {
        if titles.len() != rows.len() {
            return Err(AppError::ArtifactCorrupt(format!(
                "{} titles but {} rating rows",
                titles.len(),
                rows.len()
            )));
        }

        let dimension = rows.first().map(Vec::len).unwrap_or(0);
        let mut index = HashMap::with_capacity(titles.len());

        for (i, (title, row)) in titles.iter().zip(&rows).enumerate() {
            if index.insert(title.clone(), i).is_some() {
                return Err(AppError::ArtifactCorrupt(format!(
                    "duplicate title '{}'",
                    title
                )));
            }
            if row.len() != dimension {
                return Err(AppError::ArtifactCorrupt(format!(
                    "row '{}' has {} values, expected {}",
                    title,
                    row.len(),
                    dimension
                )));
            }
            if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                return Err(AppError::ArtifactCorrupt(format!(
                    "row '{}' has a non-numeric value in column {}",
                    title, col
                )));
            }
        }

        Ok(Self {
            titles,
            rows,
            index,
            dimension,
        })
    }

    /// Number of movies in the catalog
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Length of every rating vector
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Titles in row order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn title(&self, row: usize) -> Option<&str> {
        self.titles.get(row).map(String::as_str)
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Row index of a title
    pub fn position(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }
}

impl TryFrom<RatingsArtifact> for RatingsMatrix {
    type Error = AppError;

    fn try_from(artifact: RatingsArtifact) -> AppResult<Self> {
        RatingsMatrix::new(artifact.titles, artifact.ratings)
    }
}

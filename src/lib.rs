pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult};
pub use models::{RatingsArtifact, RatingsMatrix, Recommendation, SessionState};
pub use services::{load_ratings, RatingsStore, Recommender, SimilarityMatrix, DEFAULT_TOP_K};

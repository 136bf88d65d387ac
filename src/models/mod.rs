use serde::{Deserialize, Serialize};

pub mod ratings;
pub mod session;

pub use ratings::{RatingsArtifact, RatingsMatrix};
pub use session::SessionState;

/// One ranked entry of a recommendation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// 1-based position in the list
    pub rank: usize,
    pub title: String,
    /// Cosine similarity to the queried title
    pub similarity: f64,
}

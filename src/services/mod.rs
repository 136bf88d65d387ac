pub mod ratings_store;
pub mod recommender;
pub mod similarity;

pub use ratings_store::{load_ratings, RatingsStore};
pub use recommender::{Recommender, DEFAULT_TOP_K};
pub use similarity::SimilarityMatrix;

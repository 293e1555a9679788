//! Vector Module
//!
//! Similarity kernels and exact nearest-neighbor ranking over a vector store.

mod batch;
mod engine;
mod nearest;
mod similarity;

pub use batch::{nearest_to_words, BatchConfig, BatchResult};
pub use engine::QueryEngine;
pub use nearest::{
    nearest_to_word, rank, rank_by_cosine_similarity, rank_by_euclidean_distance, Metric, Neighbor,
};
pub(crate) use similarity::l2_norm;

//! Storage
//!
//! Read-only word vector matrix and its word index.

mod vector_store;

pub use vector_store::{LoadReport, VectorStore};

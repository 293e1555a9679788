//! GLOVESTORE - In-Memory Word Embedding Store
//!
//! Loads pretrained word vectors (GloVe text format, plain or gzip) into a
//! fixed-capacity matrix and answers exact nearest-neighbor queries by
//! cosine similarity or Euclidean distance.
//!
//! ```no_run
//! use glovestore::{Metric, QueryEngine, StoreConfig};
//!
//! fn main() -> glovestore::Result<()> {
//!     let config = StoreConfig::default().with_capacity(50_000).with_dimension(50);
//!     let engine = QueryEngine::open("glove.6B.50d.txt.gz", &config)?;
//!
//!     for neighbor in engine.nearest_to_word("frog", 10, Metric::Cosine)? {
//!         println!("{:<16} {:.4}", neighbor.word, neighbor.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod source;
pub mod store;
pub mod vector;

pub use config::{Compression, DuplicatePolicy, StoreConfig};
pub use error::{GloveError, RecordFault, Result};
pub use metrics::Metrics;
pub use source::{open_path, IterSource, LineSource, RecordSource};
pub use store::{LoadReport, VectorStore};
pub use vector::{BatchConfig, Metric, Neighbor, QueryEngine};

//! Query Engine
//!
//! Shared entry point for callers: wraps a loaded store with query metrics.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::store::VectorStore;

use super::batch::{self, BatchConfig, BatchResult};
use super::nearest::{self, Metric, Neighbor};

/// Nearest-neighbor queries over a shared, read-only store
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<VectorStore>,
    metrics: Arc<Metrics>,
}

impl QueryEngine {
    /// Wrap a loaded store
    pub fn new(store: VectorStore) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Wrap a store already shared with other readers
    pub fn from_shared(store: Arc<VectorStore>) -> Self {
        Self {
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Load `path` and wrap the resulting store
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(VectorStore::from_path(path, config)?))
    }

    /// Words most like `query` under `metric`
    pub fn nearest_to_vector(
        &self,
        query: &[f32],
        n: usize,
        metric: Metric,
    ) -> Result<Vec<Neighbor<'_>>> {
        self.timed(metric, || nearest::rank(&self.store, query, n, metric))
    }

    /// Words most like `word` under `metric`; `word` itself ranks first
    pub fn nearest_to_word(&self, word: &str, n: usize, metric: Metric) -> Result<Vec<Neighbor<'_>>> {
        self.timed(metric, || {
            nearest::nearest_to_word(&self.store, word, n, metric)
        })
    }

    /// Neighbors of many words on a worker pool, in input order
    pub fn nearest_to_words<W>(&self, words: &[W], config: &BatchConfig) -> Result<Vec<BatchResult<'_>>>
    where
        W: AsRef<str> + Sync,
    {
        batch::nearest_to_words(&self.store, words, config, Some(&self.metrics))
    }

    /// Raw vector of `word`
    pub fn vector_of(&self, word: &str) -> Result<&[f32]> {
        self.store.get_vector(word)
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn timed<'a>(
        &'a self,
        metric: Metric,
        query: impl FnOnce() -> Result<Vec<Neighbor<'a>>>,
    ) -> Result<Vec<Neighbor<'a>>> {
        let start = Instant::now();
        let result = query();
        let elapsed = start.elapsed();

        debug!(
            "{} query over {} rows took {:?}",
            metric,
            self.store.len(),
            elapsed
        );
        self.metrics.record_query(metric, elapsed, result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GloveError;
    use crate::source::IterSource;
    use std::thread;

    fn engine() -> QueryEngine {
        let mut source = IterSource::new(vec!["cat 1.0 0.0", "dog 0.9 0.1", "car -1.0 0.0"]);
        QueryEngine::new(VectorStore::load(&mut source, &StoreConfig::new(3, 2)).unwrap())
    }

    #[test]
    fn test_nearest_to_word() {
        let engine = engine();
        let results = engine.nearest_to_word("cat", 2, Metric::Cosine).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].word, "cat");
        assert_eq!(results[1].word, "dog");
        assert_eq!(engine.metrics().total_queries(), 1);
    }

    #[test]
    fn test_nearest_to_vector() {
        let engine = engine();
        let results = engine
            .nearest_to_vector(&[-0.5, 0.0], 1, Metric::Euclidean)
            .unwrap();
        assert_eq!(results[0].word, "car");
    }

    #[test]
    fn test_failures_are_counted() {
        let engine = engine();
        assert!(matches!(
            engine.nearest_to_word("zebra", 3, Metric::Cosine),
            Err(GloveError::UnknownWord(_))
        ));
        assert!(matches!(
            engine.nearest_to_vector(&[0.0, 0.0], 3, Metric::Cosine),
            Err(GloveError::ZeroVector)
        ));
        assert_eq!(engine.metrics().failed_queries(), 2);
    }

    #[test]
    fn test_vector_of() {
        let engine = engine();
        assert_eq!(engine.vector_of("car").unwrap(), &[-1.0, 0.0]);
        assert!(engine.vector_of("cow").is_err());
    }

    #[test]
    fn test_concurrent_readers() {
        let engine = engine();
        let expected: Vec<String> = engine
            .nearest_to_word("dog", 3, Metric::Cosine)
            .unwrap()
            .iter()
            .map(|r| r.word.to_string())
            .collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                thread::spawn(move || {
                    (0..50)
                        .map(|_| {
                            engine
                                .nearest_to_word("dog", 3, Metric::Cosine)
                                .unwrap()
                                .iter()
                                .map(|r| r.word.to_string())
                                .collect::<Vec<_>>()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for result in handle.join().unwrap() {
                assert_eq!(result, expected);
            }
        }
        assert_eq!(engine.metrics().total_queries(), 401);
    }

    #[test]
    fn test_batch_through_engine() {
        let engine = engine();
        let config = BatchConfig::default().with_workers(2).with_n(1);
        let results = engine.nearest_to_words(&["dog", "car"], &config).unwrap();
        assert_eq!(results[0].as_ref().unwrap()[0].word, "dog");
        assert_eq!(results[1].as_ref().unwrap()[0].word, "car");
        assert_eq!(engine.metrics().total_queries(), 2);
    }
}

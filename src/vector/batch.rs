//! Batch Queries
//!
//! Answers many word queries at once on a pool of reader threads.
//! Workers share the store by reference; it is never written after load.

use crossbeam::channel;
use std::io;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{GloveError, Result};
use crate::metrics::Metrics;
use crate::store::VectorStore;

use super::nearest::{nearest_to_word, Metric, Neighbor};

/// Batch query configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads (0 = auto-detect)
    pub workers: usize,
    /// Results per query
    pub n: usize,
    /// Ranking metric
    pub metric: Metric,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            n: 10,
            metric: Metric::Cosine,
        }
    }
}

impl BatchConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

/// Outcome of one query in a batch
pub type BatchResult<'a> = Result<Vec<Neighbor<'a>>>;

/// Rank neighbors of every word in `words`, results in input order
pub fn nearest_to_words<'a, W>(
    store: &'a VectorStore,
    words: &[W],
    config: &BatchConfig,
    metrics: Option<&Metrics>,
) -> Result<Vec<BatchResult<'a>>>
where
    W: AsRef<str> + Sync,
{
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let workers = if config.workers == 0 {
        num_cpus::get()
    } else {
        config.workers
    }
    .min(words.len());

    info!("Running {} queries on {} workers", words.len(), workers);

    let (job_tx, job_rx) = channel::unbounded::<usize>();
    let (result_tx, result_rx) = channel::unbounded::<(usize, BatchResult<'a>)>();

    for i in 0..words.len() {
        // Receiver is alive, send cannot fail
        let _ = job_tx.send(i);
    }
    drop(job_tx);

    let (n, metric) = (config.n, config.metric);

    crossbeam::thread::scope(|scope| -> io::Result<()> {
        for id in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();

            scope
                .builder()
                .name(format!("batch-worker-{}", id))
                .spawn(move |_| {
                    while let Ok(i) = job_rx.recv() {
                        let start = Instant::now();
                        let result = nearest_to_word(store, words[i].as_ref(), n, metric);
                        if let Some(metrics) = metrics {
                            metrics.record_query(metric, start.elapsed(), result.is_ok());
                        }
                        if result_tx.send((i, result)).is_err() {
                            debug!("Worker {}: result channel closed", id);
                            break;
                        }
                    }
                })?;
        }
        Ok(())
    })
    .map_err(|_| GloveError::Io(io::Error::other("batch worker panicked")))??;

    drop(result_tx);

    let mut slots: Vec<Option<BatchResult<'a>>> = (0..words.len()).map(|_| None).collect();
    for (i, result) in result_rx.iter() {
        slots[i] = Some(result);
    }

    Ok(slots.into_iter().flatten().collect())
}

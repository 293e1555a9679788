//! Query Metrics
//!
//! Query counters and latency tracking.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::vector::Metric;

/// Metrics collector
#[derive(Debug)]
pub struct Metrics {
    /// Total queries answered
    total_queries: AtomicU64,

    /// Queries that returned an error
    failed_queries: AtomicU64,

    /// Queries per ranking metric
    queries_by_metric: RwLock<HashMap<Metric, u64>>,

    /// Latency tracking (simplified)
    latency_sum_us: AtomicU64,
    latency_count: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            total_queries: AtomicU64::new(0),
            failed_queries: AtomicU64::new(0),
            queries_by_metric: RwLock::new(HashMap::new()),
            latency_sum_us: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
        }
    }

    /// Record a ranking query
    pub fn record_query(&self, metric: Metric, latency: Duration, succeeded: bool) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failed_queries.fetch_add(1, Ordering::Relaxed);
        }

        *self.queries_by_metric.write().entry(metric).or_insert(0) += 1;

        let latency_us = latency.as_micros() as u64;
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        self.latency_min_us.fetch_min(latency_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    /// Get total query count
    pub fn total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    /// Get failed query count
    pub fn failed_queries(&self) -> u64 {
        self.failed_queries.load(Ordering::Relaxed)
    }

    /// Get queries by metric
    pub fn queries_by_metric(&self) -> HashMap<Metric, u64> {
        self.queries_by_metric.read().clone()
    }

    /// Get average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        let count = self.latency_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        sum as f64 / count as f64
    }

    /// Get min latency in microseconds
    pub fn min_latency_us(&self) -> u64 {
        let min = self.latency_min_us.load(Ordering::Relaxed);
        if min == u64::MAX {
            0
        } else {
            min
        }
    }

    /// Get max latency in microseconds
    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us.load(Ordering::Relaxed)
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        let by_metric = self.queries_by_metric();
        let counts: Vec<String> = Metric::ALL
            .iter()
            .map(|m| format!("{}={}", m, by_metric.get(m).copied().unwrap_or(0)))
            .collect();

        format!(
            "Queries: {} ({} failed) [{}] | Latency (µs): avg={:.1}, min={}, max={}",
            self.total_queries(),
            self.failed_queries(),
            counts.join(", "),
            self.avg_latency_us(),
            self.min_latency_us(),
            self.max_latency_us()
        )
    }
}

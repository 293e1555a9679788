//! Nearest-Neighbor Ranking
//!
//! Exact full-scan ranking of every loaded row against a query vector.
//! Results are ordered by score, with ties broken by row index so that
//! identical queries always produce identical lists.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{GloveError, Result};
use crate::store::VectorStore;

use super::similarity::{cosine_with_norms, euclidean_distance, l2_norm};

/// Scoring function used to rank rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Metric {
    /// Cosine similarity, higher is closer
    #[default]
    Cosine,
    /// Euclidean distance, lower is closer
    Euclidean,
}

impl Metric {
    /// Every metric, in display order
    pub const ALL: [Metric; 2] = [Metric::Cosine, Metric::Euclidean];

    /// Order two scores so that the closer one comes first
    fn closer_first(self, a: f32, b: f32) -> Ordering {
        match self {
            Metric::Cosine => b.total_cmp(&a),
            Metric::Euclidean => a.total_cmp(&b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cosine => write!(f, "cosine"),
            Metric::Euclidean => write!(f, "euclidean"),
        }
    }
}

/// A ranked row: its headword, row index and score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub word: &'a str,
    pub index: usize,
    pub score: f32,
}

/// Rank all rows by cosine similarity to `query`, most similar first
pub fn rank_by_cosine_similarity<'a>(
    store: &'a VectorStore,
    query: &[f32],
    n: usize,
) -> Result<Vec<Neighbor<'a>>> {
    check_dimension(store, query)?;

    let query_norm = l2_norm(query);
    if query_norm == 0.0 {
        return Err(GloveError::ZeroVector);
    }

    let scores = store
        .rows()
        .map(|(row, row_norm)| cosine_with_norms(row, row_norm, query, query_norm));
    top_n(store, scores, n, Metric::Cosine)
}

/// Rank all rows by Euclidean distance to `query`, nearest first
pub fn rank_by_euclidean_distance<'a>(
    store: &'a VectorStore,
    query: &[f32],
    n: usize,
) -> Result<Vec<Neighbor<'a>>> {
    check_dimension(store, query)?;

    let scores = store.rows().map(|(row, _)| euclidean_distance(row, query));
    top_n(store, scores, n, Metric::Euclidean)
}

/// Rank all rows against `query` with the chosen metric
pub fn rank<'a>(
    store: &'a VectorStore,
    query: &[f32],
    n: usize,
    metric: Metric,
) -> Result<Vec<Neighbor<'a>>> {
    match metric {
        Metric::Cosine => rank_by_cosine_similarity(store, query, n),
        Metric::Euclidean => rank_by_euclidean_distance(store, query, n),
    }
}

/// Rank all rows against the vector of `word`
pub fn nearest_to_word<'a>(
    store: &'a VectorStore,
    word: &str,
    n: usize,
    metric: Metric,
) -> Result<Vec<Neighbor<'a>>> {
    let query = store.get_vector(word)?;
    rank(store, query, n, metric)
}

fn check_dimension(store: &VectorStore, query: &[f32]) -> Result<()> {
    if query.len() != store.dimension() {
        return Err(GloveError::DimensionMismatch {
            expected: store.dimension(),
            actual: query.len(),
        });
    }
    Ok(())
}

/// Keep the `n` closest rows, ordered by score then row index
fn top_n<'a>(
    store: &'a VectorStore,
    scores: impl Iterator<Item = f32>,
    n: usize,
    metric: Metric,
) -> Result<Vec<Neighbor<'a>>> {
    if n == 0 {
        return Ok(Vec::new());
    }

    // -0.0 and 0.0 must tie under total_cmp
    let mut ranked: Vec<(usize, f32)> = scores
        .map(|s| if s == 0.0 { 0.0 } else { s })
        .enumerate()
        .collect();

    let order =
        |a: &(usize, f32), b: &(usize, f32)| metric.closer_first(a.1, b.1).then(a.0.cmp(&b.0));

    if n < ranked.len() {
        ranked.select_nth_unstable_by(n - 1, order);
        ranked.truncate(n);
    }
    ranked.sort_unstable_by(order);

    ranked
        .into_iter()
        .map(|(index, score)| {
            Ok(Neighbor {
                word: store.resolve(index)?,
                index,
                score,
            })
        })
        .collect()
}

//! Word Vector Store
//!
//! Fixed-capacity matrix of word vectors with a word <-> row mapping.
//! Built once from a record source and read-only afterwards.

use hashbrown::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{DuplicatePolicy, StoreConfig};
use crate::error::{GloveError, RecordFault, Result};
use crate::source::{self, RecordSource};
use crate::vector::l2_norm;

/// Summary of a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Records read from the source
    pub consumed: usize,
    /// Rows filled in the matrix
    pub loaded: usize,
    /// Loading stopped because `capacity` records were consumed
    pub at_capacity: bool,
}

/// Immutable in-memory word vector store
pub struct VectorStore {
    /// Word -> row index
    word_to_index: HashMap<String, usize>,
    /// Row index -> word, one entry per filled row
    index_to_word: Vec<String>,
    /// Row-major `capacity x dimension` arena; rows past `loaded` are unused
    matrix: Vec<f32>,
    /// L2 norm of each filled row
    norms: Vec<f64>,
    capacity: usize,
    dimension: usize,
    loaded: usize,
    report: LoadReport,
}

impl VectorStore {
    /// Create an empty store with a preallocated `capacity x dimension` matrix
    pub fn new(capacity: usize, dimension: usize) -> Result<Self> {
        StoreConfig::new(capacity, dimension).validate()?;

        let cells = capacity.checked_mul(dimension).ok_or_else(|| {
            GloveError::InvalidConfig(format!(
                "matrix of {} x {} cells is too large",
                capacity, dimension
            ))
        })?;

        let alloc_failed = |what: &str, e: &dyn fmt::Debug| {
            GloveError::InvalidConfig(format!(
                "cannot allocate {} for {} x {} store: {:?}",
                what, capacity, dimension, e
            ))
        };

        let mut word_to_index: HashMap<String, usize> = HashMap::new();
        word_to_index
            .try_reserve(capacity)
            .map_err(|e| alloc_failed("word index", &e))?;

        let mut index_to_word: Vec<String> = Vec::new();
        index_to_word
            .try_reserve_exact(capacity)
            .map_err(|e| alloc_failed("word list", &e))?;

        let mut norms: Vec<f64> = Vec::new();
        norms
            .try_reserve_exact(capacity)
            .map_err(|e| alloc_failed("norms", &e))?;

        let mut matrix: Vec<f32> = Vec::new();
        matrix
            .try_reserve_exact(cells)
            .map_err(|e| alloc_failed("matrix", &e))?;
        matrix.resize(cells, 0.0);

        Ok(Self {
            word_to_index,
            index_to_word,
            matrix,
            norms,
            capacity,
            dimension,
            loaded: 0,
            report: LoadReport::default(),
        })
    }

    /// Build a store from `source`, keeping at most `config.capacity` records.
    ///
    /// Records past the capacity are left unread; this is not an error.
    /// Any malformed record fails the whole load and no store is returned.
    pub fn load<S: RecordSource>(source: &mut S, config: &StoreConfig) -> Result<Self> {
        let mut store = Self::new(config.capacity, config.dimension)?;
        store.ingest(source, config.duplicates)?;
        Ok(store)
    }

    /// Open `path` (plain or gzip per `config.compression`) and load it
    pub fn from_path(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading word vectors from {:?}", path);
        let mut source = source::open_path(path, config.compression)?;
        Self::load(&mut source, config)
    }

    fn ingest<S: RecordSource>(&mut self, source: &mut S, duplicates: DuplicatePolicy) -> Result<()> {
        let start = Instant::now();
        let mut consumed = 0usize;
        let mut components = Vec::with_capacity(self.dimension);

        while consumed < self.capacity {
            let record = match source.next_record() {
                Some(record) => record?,
                None => break,
            };
            let position = consumed;
            consumed += 1;

            let word = parse_record(&record, self.dimension, &mut components)
                .map_err(|reason| GloveError::MalformedRecord {
                    row: position,
                    reason,
                })?;

            if let Some(&existing) = self.word_to_index.get(word) {
                match duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(GloveError::MalformedRecord {
                            row: position,
                            reason: RecordFault::DuplicateWord(word.to_string()),
                        });
                    }
                    DuplicatePolicy::Overwrite => {
                        debug!("Overwriting row {} for duplicate word {:?}", existing, word);
                        self.write_row(existing, &components);
                        self.norms[existing] = l2_norm(&components);
                        continue;
                    }
                }
            }

            let index = self.loaded;
            self.write_row(index, &components);
            self.norms.push(l2_norm(&components));
            self.word_to_index.insert(word.to_string(), index);
            self.index_to_word.push(word.to_string());
            self.loaded += 1;
        }

        self.report = LoadReport {
            consumed,
            loaded: self.loaded,
            at_capacity: consumed == self.capacity,
        };

        if self.report.at_capacity {
            info!(
                "Capacity of {} records reached; remaining records ignored",
                self.capacity
            );
        }
        info!(
            "Loaded {} vectors of dimension {} in {:?}",
            self.loaded,
            self.dimension,
            start.elapsed()
        );

        Ok(())
    }

    fn write_row(&mut self, index: usize, components: &[f32]) {
        let start = index * self.dimension;
        self.matrix[start..start + self.dimension].copy_from_slice(components);
    }

    /// Vector for `word`
    pub fn get_vector(&self, word: &str) -> Result<&[f32]> {
        let index = self.index_of(word)?;
        Ok(self.row_unchecked(index))
    }

    /// Row index for `word`
    pub fn index_of(&self, word: &str) -> Result<usize> {
        self.word_to_index
            .get(word)
            .copied()
            .ok_or_else(|| GloveError::UnknownWord(word.to_string()))
    }

    /// Word stored at row `index`
    pub fn resolve(&self, index: usize) -> Result<&str> {
        self.index_to_word
            .get(index)
            .map(String::as_str)
            .ok_or(GloveError::IndexOutOfRange {
                index,
                loaded: self.loaded,
            })
    }

    /// Vector stored at row `index`
    pub fn row(&self, index: usize) -> Result<&[f32]> {
        if index >= self.loaded {
            return Err(GloveError::IndexOutOfRange {
                index,
                loaded: self.loaded,
            });
        }
        Ok(self.row_unchecked(index))
    }

    fn row_unchecked(&self, index: usize) -> &[f32] {
        let start = index * self.dimension;
        &self.matrix[start..start + self.dimension]
    }

    /// Filled rows in index order, with their precomputed norms
    pub(crate) fn rows(&self) -> impl Iterator<Item = (&[f32], f64)> + '_ {
        self.matrix[..self.loaded * self.dimension]
            .chunks_exact(self.dimension)
            .zip(self.norms.iter().copied())
    }

    /// Whether `word` has a row
    pub fn contains(&self, word: &str) -> bool {
        self.word_to_index.contains_key(word)
    }

    /// Words in row order
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.index_to_word.iter().map(String::as_str)
    }

    /// Number of filled rows
    pub fn len(&self) -> usize {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Outcome of the load that built this store
    pub fn report(&self) -> LoadReport {
        self.report
    }
}

impl fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorStore")
            .field("loaded", &self.loaded)
            .field("capacity", &self.capacity)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Split a record into its word and `dimension` components.
///
/// Components are written into `components`; the returned word borrows `record`.
fn parse_record<'a>(
    record: &'a str,
    dimension: usize,
    components: &mut Vec<f32>,
) -> std::result::Result<&'a str, RecordFault> {
    components.clear();

    let mut fields = record.split_ascii_whitespace();
    let word = fields.next().ok_or(RecordFault::MissingFields {
        expected: dimension,
        actual: 0,
    })?;

    let mut column = 0;
    while let Some(field) = fields.next() {
        if column == dimension {
            return Err(RecordFault::ExtraFields {
                expected: dimension,
                actual: dimension + 1 + fields.count(),
            });
        }
        let value: f32 = field.parse().map_err(|_| RecordFault::InvalidNumber {
            column,
            value: field.to_string(),
        })?;
        if !value.is_finite() {
            return Err(RecordFault::NonFinite { column });
        }
        components.push(value);
        column += 1;
    }

    if components.len() < dimension {
        return Err(RecordFault::MissingFields {
            expected: dimension,
            actual: components.len(),
        });
    }

    Ok(word)
}

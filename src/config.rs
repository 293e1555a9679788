//! Store Configuration

use std::path::Path;

use crate::error::{GloveError, Result};

/// How the record file is encoded on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Compression {
    /// Gzip when the path ends in `.gz`, plain text otherwise
    #[default]
    Auto,
    Gzip,
    Plain,
}

impl Compression {
    /// Decide whether `path` should be read through a gzip decoder
    pub fn is_gzip(self, path: &Path) -> bool {
        match self {
            Compression::Gzip => true,
            Compression::Plain => false,
            Compression::Auto => path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("gz"))
                .unwrap_or(false),
        }
    }
}

/// What to do when a word appears a second time in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DuplicatePolicy {
    /// Fail the load with a malformed-record error
    #[default]
    Reject,
    /// Replace the earlier row in place, keeping its index
    Overwrite,
}

/// Vector store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of records to retain (longer sources are truncated)
    pub capacity: usize,

    /// Number of components per vector
    pub dimension: usize,

    /// Encoding of the record file
    pub compression: Compression,

    /// Handling of repeated words
    pub duplicates: DuplicatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 20_000,
            dimension: 200,
            compression: Compression::Auto,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

impl StoreConfig {
    pub fn new(capacity: usize, dimension: usize) -> Self {
        Self {
            capacity,
            dimension,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Reject zero capacity or dimension
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(GloveError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.dimension == 0 {
            return Err(GloveError::InvalidConfig(
                "dimension must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.capacity, 20_000);
        assert_eq!(config.dimension, 200);
        assert_eq!(config.compression, Compression::Auto);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let err = StoreConfig::new(0, 50).validate().unwrap_err();
        assert!(matches!(err, GloveError::InvalidConfig(_)));

        let err = StoreConfig::new(10, 0).validate().unwrap_err();
        assert!(matches!(err, GloveError::InvalidConfig(_)));
    }

    #[test]
    fn test_auto_compression() {
        assert!(Compression::Auto.is_gzip(Path::new("glove.6B.50d.txt.gz")));
        assert!(Compression::Auto.is_gzip(Path::new("vectors.GZ")));
        assert!(!Compression::Auto.is_gzip(Path::new("glove.6B.50d.txt")));
        assert!(Compression::Gzip.is_gzip(Path::new("glove.txt")));
        assert!(!Compression::Plain.is_gzip(Path::new("glove.txt.gz")));
    }
}

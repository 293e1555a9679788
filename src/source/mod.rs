//! Record Sources
//!
//! Line-oriented inputs for the vector store: one `<word> <c1> ... <cD>`
//! record per line, read from plain or gzip-compressed text.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::config::Compression;

/// A producer of text records, one per call, until end of input
pub trait RecordSource {
    /// Next record, `None` at end of input
    fn next_record(&mut self) -> Option<io::Result<String>>;
}

/// Record source over any buffered reader, one record per line
pub struct LineSource<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> RecordSource for LineSource<R> {
    fn next_record(&mut self) -> Option<io::Result<String>> {
        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.buf.trim_end_matches(['\n', '\r']);
                Some(Ok(line.to_string()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Record source over in-memory records
pub struct IterSource<I> {
    inner: I,
}

impl<I, S> IterSource<I>
where
    I: Iterator<Item = S>,
    S: Into<String>,
{
    pub fn new<T>(records: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            inner: records.into_iter(),
        }
    }
}

impl<I, S> RecordSource for IterSource<I>
where
    I: Iterator<Item = S>,
    S: Into<String>,
{
    fn next_record(&mut self) -> Option<io::Result<String>> {
        self.inner.next().map(|record| Ok(record.into()))
    }
}

/// Open a record file, decompressing it when `compression` says so
pub fn open_path(
    path: impl AsRef<Path>,
    compression: Compression,
) -> io::Result<LineSource<Box<dyn BufRead>>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let reader: Box<dyn BufRead> = if compression.is_gzip(path) {
        debug!("Opening {:?} as gzip", path);
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        debug!("Opening {:?} as plain text", path);
        Box::new(BufReader::new(file))
    };

    Ok(LineSource::new(reader))
}

use csv::{ReaderBuilder, Trim};
use lru::LruCache;
use memmap2::Mmap;
use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, info};

use crate::processor::{Dataset, InsightsError, Record, SourceError};

/// Storage access for tabular sources
///
/// Implementations turn a path into its rows, in source order, with every
/// field kept as text. [`DatasetCache`] is the only caller.
pub trait SourceReader {
    fn read(&self, path: &Path) -> Result<Vec<Record>, SourceError>;
}

/// Reads header + rows CSV files through a memory map
///
/// # Examples
///
/// ```rust
/// # use job_insights::processor::loader::CsvSource;
/// let source = CsvSource::new().with_delimiter(b';').with_trim(true);
/// let rows = source.parse_bytes(b"job_type;industry\n full time ;Finance\n").unwrap();
/// assert_eq!(rows[0].get("job_type"), Some("full time"));
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    /// Field delimiter (default: comma)
    delimiter: u8,
    /// Trim surrounding whitespace from headers and values
    trim: bool,
    /// Accept rows whose length differs from the header
    flexible: bool,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
            flexible: true,
        }
    }
}

impl CsvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// When disabled, a row with a different field count than the header is a
    /// [`SourceError::Csv`]. When enabled, short rows lack the trailing fields
    /// and surplus values are ignored.
    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Parses an in-memory CSV buffer whose first row names the fields
    pub fn parse_bytes(&self, buf: &[u8]) -> Result<Vec<Record>, SourceError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(self.flexible)
            .from_reader(buf);

        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record: Record = headers.iter().zip(row.iter()).collect();
            records.push(record);
        }

        Ok(records)
    }
}

impl SourceReader for CsvSource {
    fn read(&self, path: &Path) -> Result<Vec<Record>, SourceError> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }

        // SAFETY: the map is only read here and dropped before returning; records own their text.
        let mmap = unsafe { Mmap::map(&file)? };
        self.parse_bytes(&mmap[..])
    }
}

/// Path-keyed memo of loaded datasets
///
/// The first `load` of a path reads it through the [`SourceReader`]; every
/// later `load` of an equal path returns the same shared [`Dataset`]. Entries
/// are never evicted or refreshed. The lock is held across a miss, so
/// concurrent first loads of one path read storage once.
///
/// # Examples
///
/// ```rust,no_run
/// # use job_insights::processor::loader::DatasetCache;
/// let cache = DatasetCache::new();
/// let first = cache.load("jobs.csv").unwrap();
/// let again = cache.load("jobs.csv").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &again));
/// ```
#[derive(Debug)]
pub struct DatasetCache<S = CsvSource> {
    reader: S,
    datasets: Mutex<LruCache<PathBuf, Dataset>>,
}

impl DatasetCache<CsvSource> {
    pub fn new() -> Self {
        Self::with_reader(CsvSource::default())
    }
}

impl Default for DatasetCache<CsvSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SourceReader> DatasetCache<S> {
    pub fn with_reader(reader: S) -> Self {
        Self {
            reader,
            datasets: Mutex::new(LruCache::unbounded()),
        }
    }

    pub fn reader(&self) -> &S {
        &self.reader
    }

    /// Returns the dataset for `path`, reading it on first access
    ///
    /// # Errors
    /// [`InsightsError::Source`] if the reader fails. Failures are not
    /// remembered; the next call for the same path reads again.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset, InsightsError> {
        let key = path.as_ref().to_path_buf();
        let mut datasets = self.datasets.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(dataset) = datasets.peek(&key) {
            debug!(path = %key.display(), "dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        debug!(path = %key.display(), "dataset cache miss");
        let records = self.reader.read(&key)?;
        let dataset: Dataset = Arc::from(records);
        info!(path = %key.display(), rows = dataset.len(), "loaded dataset");

        datasets.put(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.datasets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&path.as_ref().to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.datasets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached dataset; outstanding `Arc`s stay valid
    pub fn clear(&self) {
        self.datasets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

use std::collections::HashSet;
use std::path::Path;

use crate::processor::{
    AggregateOp, Dataset, INDUSTRY, InsightsError, JOB_TYPE, MAX_SALARY, MIN_SALARY, Record,
    loader::{CsvSource, DatasetCache, SourceReader},
    salary::parse_salary,
};

/// Path-based queries over job posting datasets
///
/// Owns the [`DatasetCache`] it reads through, so each distinct path is
/// parsed once for the lifetime of this value.
///
/// # Examples
///
/// ```rust,no_run
/// # use job_insights::JobInsights;
/// let insights = JobInsights::new();
/// let types = insights.unique_job_types("data/jobs.csv").unwrap();
/// let top = insights.max_salary("data/jobs.csv").unwrap();
/// println!("{} job types, best paid band ends at {}", types.len(), top);
/// ```
#[derive(Debug)]
pub struct JobInsights<S = CsvSource> {
    cache: DatasetCache<S>,
}

impl JobInsights<CsvSource> {
    pub fn new() -> Self {
        Self::with_cache(DatasetCache::new())
    }
}

impl Default for JobInsights<CsvSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SourceReader> JobInsights<S> {
    pub fn with_cache(cache: DatasetCache<S>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &DatasetCache<S> {
        &self.cache
    }

    /// Every record of the source at `path`, in source order
    pub fn jobs(&self, path: impl AsRef<Path>) -> Result<Dataset, InsightsError> {
        self.cache.load(path)
    }

    /// Distinct `job_type` values in first-seen order
    pub fn unique_job_types(&self, path: impl AsRef<Path>) -> Result<Vec<String>, InsightsError> {
        let dataset = self.cache.load(path)?;
        Ok(unique_values(&dataset, JOB_TYPE, false))
    }

    /// Distinct non-empty `industry` values in first-seen order
    pub fn unique_industries(&self, path: impl AsRef<Path>) -> Result<Vec<String>, InsightsError> {
        let dataset = self.cache.load(path)?;
        Ok(unique_values(&dataset, INDUSTRY, true))
    }

    /// Largest valid `max_salary` in the source
    ///
    /// # Errors
    /// [`InsightsError::EmptyAggregate`] if no record has a numeric `max_salary`.
    pub fn max_salary(&self, path: impl AsRef<Path>) -> Result<i64, InsightsError> {
        self.salary_extremum(path.as_ref(), MAX_SALARY, AggregateOp::Max)
    }

    /// Smallest valid `min_salary` in the source
    ///
    /// # Errors
    /// [`InsightsError::EmptyAggregate`] if no record has a numeric `min_salary`.
    pub fn min_salary(&self, path: impl AsRef<Path>) -> Result<i64, InsightsError> {
        self.salary_extremum(path.as_ref(), MIN_SALARY, AggregateOp::Min)
    }

    fn salary_extremum(
        &self,
        path: &Path,
        field: &str,
        op: AggregateOp,
    ) -> Result<i64, InsightsError> {
        let dataset = self.cache.load(path)?;

        // non-numeric text is skipped, not reported
        let values = dataset
            .iter()
            .filter_map(|record| record.get(field))
            .filter_map(parse_salary);

        let result = match op {
            AggregateOp::Min => values.min(),
            AggregateOp::Max => values.max(),
        };

        result.ok_or_else(|| InsightsError::EmptyAggregate {
            field: field.to_string(),
        })
    }
}

/// Records whose `job_type` equals `job_type` exactly
pub fn filter_by_job_type(records: &[Record], job_type: &str) -> Vec<Record> {
    filter_by_field(records, JOB_TYPE, job_type)
}

/// Records whose `industry` equals `industry` exactly
pub fn filter_by_industry(records: &[Record], industry: &str) -> Vec<Record> {
    filter_by_field(records, INDUSTRY, industry)
}

fn filter_by_field(records: &[Record], field: &str, target: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record.get(field) == Some(target))
        .cloned()
        .collect()
}

fn unique_values(records: &[Record], field: &str, skip_empty: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for value in records.iter().filter_map(|record| record.get(field)) {
        if skip_empty && value.is_empty() {
            continue;
        }
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }

    out
}

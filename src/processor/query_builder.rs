use std::path::Path;

use crate::processor::insights::{JobInsights, filter_by_industry, filter_by_job_type};
use crate::processor::loader::SourceReader;
use crate::processor::salary::filter_by_salary_range;
use crate::processor::{Dataset, InsightsError, Record, Value};

/// One narrowing step of a [`JobQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobFilter {
    JobType(String),
    Industry(String),
    /// Half-open salary band containment, invalid records dropped
    SalaryRange(Value),
}

impl JobFilter {
    fn apply(&self, records: &[Record]) -> Vec<Record> {
        match self {
            JobFilter::JobType(job_type) => filter_by_job_type(records, job_type),
            JobFilter::Industry(industry) => filter_by_industry(records, industry),
            JobFilter::SalaryRange(salary) => filter_by_salary_range(records, salary),
        }
    }
}

/// Chains record filters over one dataset
///
/// Filters run in the order they were added and each keeps source order, so
/// the result is a stable subsequence of the dataset.
///
/// # Examples
///
/// ```rust,no_run
/// # use job_insights::JobInsights;
/// let insights = JobInsights::new();
/// let matches = insights
///     .query("data/jobs.csv")
///     .unwrap()
///     .job_type("full time")
///     .industry("Finance")
///     .salary(4000_i64)
///     .limit(10)
///     .execute();
/// ```
#[derive(Debug, Clone)]
pub struct JobQuery {
    dataset: Dataset,
    filters: Vec<JobFilter>,
    limit: Option<usize>,
}

impl JobQuery {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            filters: Vec::new(),
            limit: None,
        }
    }

    /// Add a filter step
    pub fn filter(mut self, filter: JobFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn job_type(self, job_type: &str) -> Self {
        self.filter(JobFilter::JobType(job_type.to_string()))
    }

    pub fn industry(self, industry: &str) -> Self {
        self.filter(JobFilter::Industry(industry.to_string()))
    }

    pub fn salary(self, salary: impl Into<Value>) -> Self {
        self.filter(JobFilter::SalaryRange(salary.into()))
    }

    /// Limit number of results
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn filters(&self) -> &[JobFilter] {
        &self.filters
    }

    /// Run every filter and return the surviving records
    pub fn execute(self) -> Vec<Record> {
        let mut filters = self.filters.iter();

        let mut records = match filters.next() {
            Some(first) => first.apply(&self.dataset),
            None => self.dataset.to_vec(),
        };

        for filter in filters {
            if records.is_empty() {
                break;
            }
            records = filter.apply(&records);
        }

        if let Some(n) = self.limit {
            records.truncate(n);
        }

        records
    }
}

impl<S: SourceReader> JobInsights<S> {
    /// Start a [`JobQuery`] over the dataset at `path`
    pub fn query(&self, path: impl AsRef<Path>) -> Result<JobQuery, InsightsError> {
        Ok(JobQuery::new(self.jobs(path)?))
    }
}

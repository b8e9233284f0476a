//! # JobInsights
//!
//! `job_insights` loads CSV datasets of job postings once and answers
//! category and salary questions about them. It supports:
//!
//! - Memory-mapped CSV loading, memoized per path
//! - Distinct job types and industries in first-seen order
//! - Stable filtering by job type, industry and salary band
//! - Minimum / maximum salary over dirty data (non-numeric text is skipped)
//!
//! # Salary bands
//!
//! A posting's `min_salary` is inclusive and its `max_salary` exclusive, so
//! bands that touch (`1000..2000`, `2000..3000`) never both match one salary.
//! [`matches_salary_range`] validates its inputs strictly; the
//! [`filter_by_salary_range`] wrapper drops invalid records instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use job_insights::{JobInsights, Value, filter_by_job_type, filter_by_salary_range};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let insights = JobInsights::new();
//!
//!     // First access parses the file, later queries reuse it
//!     let jobs = insights.jobs("data/jobs.csv")?;
//!     println!("Job types: {:?}", insights.unique_job_types("data/jobs.csv")?);
//!     println!("Industries: {:?}", insights.unique_industries("data/jobs.csv")?);
//!     println!(
//!         "Salaries: {}..{}",
//!         insights.min_salary("data/jobs.csv")?,
//!         insights.max_salary("data/jobs.csv")?
//!     );
//!
//!     let full_time = filter_by_job_type(&jobs, "full time");
//!     let in_band = filter_by_salary_range(&full_time, &Value::Int(4000));
//!     println!("{} full time jobs pay 4000", in_band.len());
//!
//!     Ok(())
//! }
//! ```

pub mod processor;

pub use processor::insights::{JobInsights, filter_by_industry, filter_by_job_type};
pub use processor::loader::{CsvSource, DatasetCache, SourceReader};
pub use processor::query_builder::{JobFilter, JobQuery};
pub use processor::salary::{Job, filter_by_salary_range, matches_salary_range};
pub use processor::{Dataset, InsightsError, Record, SourceError, ValidationError, Value};

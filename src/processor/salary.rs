use std::collections::HashMap;
use tracing::trace;

use crate::processor::{MAX_SALARY, MIN_SALARY, Record, ValidationError, Value};

/// A posting with typed fields, the input of [`matches_salary_range`]
///
/// Raw [`Record`]s only carry text; [`Job::from_record`] is the coercion step
/// that turns salary bounds into integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    fields: HashMap<String, Value>,
}

impl Job {
    pub fn new() -> Self {
        Job {
            fields: HashMap::new(),
        }
    }

    /// Coerces a raw record
    ///
    /// `min_salary` and `max_salary` become [`Value::Int`] when they are valid
    /// non-negative integer literals. Everything else, including unparseable
    /// bounds, is kept as [`Value::Str`].
    pub fn from_record(record: &Record) -> Self {
        let fields = record
            .fields()
            .iter()
            .map(|(name, text)| {
                let value = match name.as_str() {
                    MIN_SALARY | MAX_SALARY => match parse_salary(text) {
                        Some(v) => Value::Int(v),
                        None => Value::Str(text.clone()),
                    },
                    _ => Value::Str(text.clone()),
                };
                (name.clone(), value)
            })
            .collect();

        Job { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Job {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Job {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parses a non-negative integer literal: ASCII digits only, no sign, no
/// whitespace. Values that overflow `i64` are rejected.
pub fn parse_salary(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok()
}

/// Checks whether `salary` falls in the job's half-open band
/// `min_salary <= salary < max_salary`
///
/// # Errors
/// - [`ValidationError::SalaryNotInteger`] if `salary` is not [`Value::Int`]
/// - [`ValidationError::MissingBounds`] if either bound is absent
/// - [`ValidationError::BoundNotInteger`] if either bound is not [`Value::Int`]
/// - [`ValidationError::InvertedBounds`] if `min_salary > max_salary`
///
/// # Example
/// ```rust
/// # use job_insights::processor::{Value, salary::{Job, matches_salary_range}};
/// let job: Job = [("min_salary", 1000_i64), ("max_salary", 2000_i64)].into_iter().collect();
/// assert!(matches_salary_range(&job, &Value::Int(1000)).unwrap());
/// assert!(!matches_salary_range(&job, &Value::Int(2000)).unwrap());
/// ```
pub fn matches_salary_range(job: &Job, salary: &Value) -> Result<bool, ValidationError> {
    let Value::Int(salary) = *salary else {
        return Err(ValidationError::SalaryNotInteger);
    };

    let (Some(min), Some(max)) = (job.get(MIN_SALARY), job.get(MAX_SALARY)) else {
        return Err(ValidationError::MissingBounds);
    };

    let (Value::Int(min), Value::Int(max)) = (min, max) else {
        return Err(ValidationError::BoundNotInteger);
    };

    if min > max {
        return Err(ValidationError::InvertedBounds);
    }

    Ok(*min <= salary && salary < *max)
}

/// Keeps the records whose salary band contains `salary`
///
/// Records that fail validation (missing or non-numeric bounds, inverted
/// bounds) are dropped rather than reported, and so is everything when
/// `salary` itself is not an integer.
pub fn filter_by_salary_range(records: &[Record], salary: &Value) -> Vec<Record> {
    let mut out = Vec::new();
    for (row, record) in records.iter().enumerate() {
        match matches_salary_range(&Job::from_record(record), salary) {
            Ok(true) => out.push(record.clone()),
            Ok(false) => {}
            Err(err) => trace!(row, %err, "record skipped by salary filter"),
        }
    }
    out
}

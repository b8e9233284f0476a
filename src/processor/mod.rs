use std::collections::HashMap;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use thiserror::Error;

pub mod insights;
pub mod loader;
pub mod query_builder;
pub mod salary;

/// Column holding the contract type of a posting ("full time", "intern", ...)
pub const JOB_TYPE: &str = "job_type";
/// Column holding the industry; empty means unspecified
pub const INDUSTRY: &str = "industry";
/// Inclusive lower bound of the salary band
pub const MIN_SALARY: &str = "min_salary";
/// Exclusive upper bound of the salary band
pub const MAX_SALARY: &str = "max_salary";

/// Failure to read or parse a tabular source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Precondition failures of [`salary::matches_salary_range`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("salary must be an integer")]
    SalaryNotInteger,

    #[error("job missing salary bounds")]
    MissingBounds,

    #[error("salary bound is not an integer")]
    BoundNotInteger,

    #[error("min salary exceeds max salary")]
    InvertedBounds,
}

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no valid numeric values in column: {field}")]
    EmptyAggregate { field: String },
}

impl From<std::io::Error> for InsightsError {
    fn from(err: std::io::Error) -> Self {
        InsightsError::Source(SourceError::Io(err))
    }
}

impl From<csv::Error> for InsightsError {
    fn from(err: csv::Error) -> Self {
        InsightsError::Source(SourceError::Csv(err))
    }
}

/// Typed field value, used for salary arguments and coerced job bounds
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Text value
    Str(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Str(v) => v.hash(state),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// One row of a source, field name to raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            fields: HashMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Loaded source rows in source order, shared and never mutated
pub type Dataset = Arc<[Record]>;

/// Aggregate operations over salary columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_pairs() {
        let record: Record = [(JOB_TYPE, "intern"), (INDUSTRY, "")].into_iter().collect();
        assert_eq!(record.get(JOB_TYPE), Some("intern"));
        assert_eq!(record.get(INDUSTRY), Some(""));
        assert_eq!(record.get(MAX_SALARY), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::SalaryNotInteger.to_string(),
            "salary must be an integer"
        );
        assert_eq!(
            ValidationError::InvertedBounds.to_string(),
            "min salary exceeds max salary"
        );
        let err: InsightsError = ValidationError::MissingBounds.into();
        assert_eq!(err.to_string(), "job missing salary bounds");
    }

    #[test]
    fn test_value_equality_is_typed() {
        assert_eq!(Value::from(1000), Value::Int(1000));
        assert_ne!(Value::from("1000"), Value::Int(1000));
    }
}

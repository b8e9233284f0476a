use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use job_insights::processor::{MAX_SALARY, MIN_SALARY};
use job_insights::{
    CsvSource, DatasetCache, InsightsError, Job, JobInsights, Record, SourceError, SourceReader,
    ValidationError, Value, filter_by_industry, filter_by_job_type, filter_by_salary_range,
    matches_salary_range,
};

const JOBS_CSV: &str = "\
job_title,company,job_type,industry,min_salary,max_salary,date_posted
Front-End Developer,Acme,FULL_TIME,Information Technology,3000,5000,2020-05-08
Nurse,Saint Care,PART_TIME,Healthcare,1500,2500,2020-05-09
Analyst,\"Banks, Inc\",FULL_TIME,Finance,4000,8000,2020-05-10
Barista,Beans,PART_TIME,,invalid,1800,2020-05-11
Intern Developer,Acme,INTERN,Information Technology,800,,2020-05-12
Cashier,MegaMart,TEMPORARY,Retail,1200,1900,2020-05-13
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_jobs(csv: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", csv).unwrap();
    tmp
}

/// Serves a fixed CSV body for any path and counts storage reads
struct CountingSource {
    body: &'static str,
    reads: AtomicUsize,
}

impl SourceReader for CountingSource {
    fn read(&self, _path: &Path) -> Result<Vec<Record>, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        CsvSource::new().parse_bytes(self.body.as_bytes())
    }
}

fn counting_insights() -> JobInsights<CountingSource> {
    JobInsights::with_cache(DatasetCache::with_reader(CountingSource {
        body: JOBS_CSV,
        reads: AtomicUsize::new(0),
    }))
}

#[test]
fn test_distinct_values_from_file() {
    init_tracing();
    let tmp = write_jobs(JOBS_CSV);
    let insights = JobInsights::new();

    assert_eq!(
        insights.unique_job_types(tmp.path()).unwrap(),
        vec!["FULL_TIME", "PART_TIME", "INTERN", "TEMPORARY"]
    );
    assert_eq!(
        insights.unique_industries(tmp.path()).unwrap(),
        vec!["Information Technology", "Healthcare", "Finance", "Retail"]
    );
}

#[test]
fn test_salary_extrema_from_file() {
    init_tracing();
    let tmp = write_jobs(JOBS_CSV);
    let insights = JobInsights::new();

    assert_eq!(insights.max_salary(tmp.path()).unwrap(), 8000);
    assert_eq!(insights.min_salary(tmp.path()).unwrap(), 800);
}

#[test]
fn test_filters_compose_and_keep_order() {
    init_tracing();
    let tmp = write_jobs(JOBS_CSV);
    let insights = JobInsights::new();
    let jobs = insights.jobs(tmp.path()).unwrap();

    let full_time = filter_by_job_type(&jobs, "FULL_TIME");
    let titles: Vec<_> = full_time.iter().map(|r| r.get("job_title")).collect();
    assert_eq!(titles, vec![Some("Front-End Developer"), Some("Analyst")]);
    assert_eq!(full_time[1].get("company"), Some("Banks, Inc"));

    let it = filter_by_industry(&jobs, "Information Technology");
    assert_eq!(it.len(), 2);
    assert!(filter_by_industry(&jobs, "information technology").is_empty());

    let paid = filter_by_salary_range(&jobs, &Value::Int(1800));
    let titles: Vec<_> = paid.iter().map(|r| r.get("job_title")).collect();
    assert_eq!(titles, vec![Some("Nurse"), Some("Cashier")]);

    // the source dataset is untouched by filtering
    assert_eq!(jobs.len(), 6);
}

#[test]
fn test_salary_filter_skips_record_missing_max() {
    let well_formed: Record = [(MIN_SALARY, "1000"), (MAX_SALARY, "2000")]
        .into_iter()
        .collect();
    let missing_max: Record = [(MIN_SALARY, "1000")].into_iter().collect();

    let result = filter_by_salary_range(
        &[well_formed.clone(), missing_max],
        &Value::Int(1500),
    );
    assert_eq!(result, vec![well_formed]);
}

#[test]
fn test_matcher_on_coerced_record() {
    let record: Record = [(MIN_SALARY, "1000"), (MAX_SALARY, "2000")]
        .into_iter()
        .collect();
    let job = Job::from_record(&record);

    assert_eq!(matches_salary_range(&job, &Value::Int(1000)), Ok(true));
    assert_eq!(matches_salary_range(&job, &Value::Int(2000)), Ok(false));
    assert_eq!(matches_salary_range(&job, &Value::Int(999)), Ok(false));
    assert_eq!(
        matches_salary_range(&job, &Value::from("1000")),
        Err(ValidationError::SalaryNotInteger)
    );

    let inverted: Job = [(MIN_SALARY, 2000_i64), (MAX_SALARY, 1000_i64)]
        .into_iter()
        .collect();
    assert_eq!(
        matches_salary_range(&inverted, &Value::Int(1500)),
        Err(ValidationError::InvertedBounds)
    );
}

#[test]
fn test_loader_reads_storage_once() {
    init_tracing();
    let insights = counting_insights();

    let first = insights.jobs("jobs.csv").unwrap();
    let second = insights.jobs("jobs.csv").unwrap();
    insights.unique_job_types("jobs.csv").unwrap();
    insights.max_salary("jobs.csv").unwrap();

    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(insights.cache().reader().reads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_reset_between_runs() {
    let insights = counting_insights();
    insights.jobs("jobs.csv").unwrap();
    insights.cache().clear();
    insights.jobs("jobs.csv").unwrap();
    assert_eq!(insights.cache().reader().reads.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_aggregate_error() {
    let tmp = write_jobs("job_type,min_salary,max_salary\nINTERN,n/a,n/a\nINTERN,-1,-1\n");
    let insights = JobInsights::new();

    assert!(matches!(
        insights.max_salary(tmp.path()),
        Err(InsightsError::EmptyAggregate { .. })
    ));
    assert!(matches!(
        insights.min_salary(tmp.path()),
        Err(InsightsError::EmptyAggregate { .. })
    ));
}

#[test]
fn test_query_builder_over_file() {
    let tmp = write_jobs(JOBS_CSV);
    let insights = JobInsights::new();

    let result = insights
        .query(tmp.path())
        .unwrap()
        .job_type("FULL_TIME")
        .salary(4500_i64)
        .execute();

    assert_eq!(result.len(), 2);
    assert_eq!(result[1].get("job_title"), Some("Analyst"));
}

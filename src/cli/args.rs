use crate::core::RetryPolicy;
use crate::strategy::BatchConfig;
use crate::types::{ReportError, SourceEvent};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Build monthly account reports from uploaded transaction files
#[derive(Parser, Debug)]
#[command(name = "account-report-engine")]
#[command(
    about = "Normalize an uploaded transaction file, persist it with its report, and notify",
    long_about = None
)]
pub struct CliArgs {
    /// Object-created notification event (JSON file)
    #[arg(
        long = "event",
        value_name = "FILE",
        conflicts_with_all = ["container", "key"],
        help = "Path to an object-created notification event in JSON"
    )]
    pub event: Option<PathBuf>,

    /// Container holding the source object
    #[arg(long = "container", value_name = "NAME", requires = "key")]
    pub container: Option<String>,

    /// Key of the source object
    #[arg(long = "key", value_name = "KEY", requires = "container")]
    pub key: Option<String>,

    /// Root directory under which containers are resolved
    #[arg(
        long = "source-root",
        value_name = "DIR",
        env = "REPORT_SOURCE_ROOT",
        default_value = "."
    )]
    pub source_root: PathBuf,

    /// SQLite database receiving transactions and reports
    #[arg(long = "database", value_name = "PATH", env = "TRANSACTIONS_DB")]
    pub database: PathBuf,

    /// Spool directory acting as the notification queue
    #[arg(long = "outbox", value_name = "DIR", env = "EMAIL_NOTIFICATIONS_QUEUE_DIR")]
    pub outbox: PathBuf,

    /// Additional send attempts after a failed notification
    #[arg(long = "max-retries", value_name = "COUNT", default_value_t = 3)]
    pub max_retries: u32,

    /// Base delay between notification attempts, in milliseconds
    #[arg(long = "retry-delay-ms", value_name = "MILLIS", default_value_t = 200)]
    pub retry_delay_ms: u64,

    /// Processing strategy used to normalize and aggregate rows
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for synchronous or 'async' for batched concurrent aggregation"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads aggregating batches (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// `BatchConfig::new` with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size()),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches()),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    /// Resolve the source event from `--event` or `--container`/`--key`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEvent` if the event file cannot be read or parsed, or
    /// if neither form was given.
    pub fn source_event(&self) -> Result<SourceEvent, ReportError> {
        if let Some(path) = &self.event {
            let json = fs::read_to_string(path).map_err(|e| {
                ReportError::invalid_event(format!("cannot read {}: {}", path.display(), e))
            })?;
            return SourceEvent::from_json(&json);
        }

        match (&self.container, &self.key) {
            (Some(container), Some(key)) => Ok(SourceEvent::new(container, key)),
            _ => Err(ReportError::invalid_event(
                "either --event or both --container and --key are required",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASE: [&str; 5] = [
        "program",
        "--database",
        "reports.db",
        "--outbox",
        "outbox",
    ];

    fn parse(extra: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(BASE.iter().chain(extra.iter()).copied())
    }

    #[rstest]
    #[case::default_strategy(&[], StrategyType::Sync)]
    #[case::explicit_sync(&["--strategy", "sync"], StrategyType::Sync)]
    #[case::explicit_async(&["--strategy", "async"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        assert_eq!(parse(args).unwrap().strategy, expected);
    }

    #[rstest]
    #[case::batch_size(&["--batch-size", "2000"], Some(2000), None)]
    #[case::max_concurrent(&["--max-concurrent", "8"], None, Some(8))]
    #[case::no_options(&[], None, None)]
    #[case::all_options(
        &["--strategy", "async", "--batch-size", "2000", "--max-concurrent", "8"],
        Some(2000),
        Some(8)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = parse(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    #[rstest]
    #[case::all_defaults(&[], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["--batch-size", "2000"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["--max-concurrent", "8"], 1000, 8)]
    #[case::zero_batch_size(&["--batch-size", "0"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["--max-concurrent", "0"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = parse(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size(), expected_batch_size);
        assert_eq!(config.max_concurrent_batches(), expected_max_concurrent);
    }

    #[rstest]
    #[case::defaults(&[], 3, 200)]
    #[case::custom(&["--max-retries", "0", "--retry-delay-ms", "5"], 0, 5)]
    fn test_retry_policy(
        #[case] args: &[&str],
        #[case] max_retries: u32,
        #[case] delay_ms: u64,
    ) {
        let policy = parse(args).unwrap().retry_policy();
        assert_eq!(policy.max_retries, max_retries);
        assert_eq!(policy.retry_delay, Duration::from_millis(delay_ms));
    }

    #[test]
    fn test_source_event_from_container_and_key() {
        let parsed = parse(&["--container", "uploads", "--key", "1_a_b.csv"]).unwrap();
        assert_eq!(
            parsed.source_event().unwrap(),
            SourceEvent::new("uploads", "1_a_b.csv")
        );
    }

    #[test]
    fn test_source_event_from_event_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Records":[{{"s3":{{"bucket":{{"name":"uploads"}},"object":{{"key":"7_x_y.csv"}}}}}}]}}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let parsed = parse(&["--event", &path]).unwrap();
        assert_eq!(
            parsed.source_event().unwrap(),
            SourceEvent::new("uploads", "7_x_y.csv")
        );
    }

    #[test]
    fn test_source_event_missing() {
        let parsed = parse(&[]).unwrap();
        assert!(matches!(
            parsed.source_event(),
            Err(ReportError::InvalidEvent { .. })
        ));
    }

    #[rstest]
    #[case::invalid_strategy(&["--strategy", "invalid"])]
    #[case::container_without_key(&["--container", "uploads"])]
    #[case::event_and_key(&["--event", "e.json", "--container", "c", "--key", "k"])]
    #[case::negative_retries(&["--max-retries", "-1"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn test_missing_database_is_error() {
        let result = CliArgs::try_parse_from(["program", "--outbox", "outbox"]);
        if std::env::var_os("TRANSACTIONS_DB").is_none() {
            assert!(result.is_err());
        }
    }
}

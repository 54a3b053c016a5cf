//! Account Report Engine CLI
//!
//! Processes one uploaded transaction file: normalizes its rows, computes the
//! account report, persists both atomically, and queues a notification.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --event event.json --database reports.db --outbox outbox/
//! cargo run -- --container uploads --key 424248018_transactions_report.csv \
//!     --source-root data/ --database reports.db --outbox outbox/
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 --event event.json
//! ```
//!
//! `--database` and `--outbox` may be supplied through `TRANSACTIONS_DB` and
//! `EMAIL_NOTIFICATIONS_QUEUE_DIR`. Logs go to stderr and are filtered with
//! `RUST_LOG` (default `info`); the outcome line goes to stdout.
//!
//! # Exit Codes
//!
//! - 0: Report persisted (notification may still have failed, see the outcome line)
//! - 1: Invocation failed, nothing was persisted

use account_report_engine::cli::{self, CliArgs};
use account_report_engine::core::{NotificationDispatcher, ReportPipeline, SqliteReportStore};
use account_report_engine::io::{FsObjectSource, SpoolQueue};
use account_report_engine::strategy;
use account_report_engine::types::ReportError;
use std::process;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    match run(&args) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!(error = %e, "invocation failed");
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run(args: &CliArgs) -> Result<String, ReportError> {
    let event = args.source_event()?;
    // Resolved before the store and outbox touch the filesystem
    let account_number = event.account_number()?;
    debug!(account_number = %account_number, "resolved account");

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let store = SqliteReportStore::open(&args.database)?;
    let outbox = SpoolQueue::open(&args.outbox).map_err(|e| {
        ReportError::runtime(format!(
            "cannot open outbox {}: {}",
            args.outbox.display(),
            e
        ))
    })?;

    let mut pipeline = ReportPipeline::new(
        Box::new(FsObjectSource::new(&args.source_root)),
        strategy,
        Box::new(store),
        NotificationDispatcher::new(Box::new(outbox), args.retry_policy()),
    );

    let outcome = pipeline.run(&event)?;
    Ok(outcome.summary())
}

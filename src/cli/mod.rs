// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Required values may also come from the environment (`TRANSACTIONS_DB`,
/// `EMAIL_NOTIFICATIONS_QUEUE_DIR`, `REPORT_SOURCE_ROOT`). If parsing fails,
/// clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

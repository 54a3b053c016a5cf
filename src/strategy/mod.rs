//! Processing strategy module for report computation
//!
//! This module defines the Strategy pattern for turning source bytes into a
//! normalized batch and its `AccountReport`, encompassing both row reading and
//! aggregation. Different implementations (synchronous, asynchronous batch)
//! can be selected at runtime and produce identical reports.

use crate::cli::StrategyType;
use crate::types::{AccountReport, ReportError, TransactionRecord};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Result of processing one source object
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBatch {
    /// Normalized records in source order
    pub records: Vec<TransactionRecord>,
    /// Report derived from `records`
    pub report: AccountReport,
    /// Whether the first row was detected as a header
    pub header_skipped: bool,
}

/// Processing strategy trait for report computation
pub trait ProcessingStrategy: Send + Sync {
    /// Normalize `source` and aggregate it into a report for `account_number`
    ///
    /// # Arguments
    ///
    /// * `account_number` - Account derived from the object key
    /// * `key` - Object key, used in error messages
    /// * `source` - Raw bytes of the source object
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A row cannot be tokenized or normalized (`MalformedRow`)
    /// - No data rows remain after header detection (`EmptyBatch`)
    /// - A running sum overflows (`ArithmeticOverflow`)
    fn process(
        &self,
        account_number: &str,
        key: &str,
        source: &[u8],
    ) -> Result<ProcessedBatch, ReportError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

//! Asynchronous batch processing strategy
//!
//! Multi-threaded implementation of the ProcessingStrategy trait. Rows are read
//! with csv-async, normalized as a whole, and then aggregated in batches with
//! period-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncRowReader (batch CSV reading)
//!     ├── csv_format::normalize (header detection, conversion)
//!     └── BatchProcessor (period partitioning + tasks)
//!         └── ConcurrentAggregator (DashMap of accumulators)
//! ```
//!
//! Normalization happens before any aggregation, so a malformed row anywhere
//! in the source aborts the batch exactly as the sync strategy does.

use crate::core::r#async::{BatchProcessor, ConcurrentAggregator};
use crate::io::async_reader::AsyncRowReader;
use crate::io::csv_format::normalize;
use crate::strategy::{ProcessedBatch, ProcessingStrategy};
use crate::types::ReportError;
use futures::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for batch processing
///
/// Both values are always at least one; `new` replaces zeros with defaults.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    batch_size: usize,
    max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }

    /// Number of records per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of worker threads aggregating batches
    pub fn max_concurrent_batches(&self) -> usize {
        self.max_concurrent_batches
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process the source through the async pipeline
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads all rows in batches using AsyncRowReader
    /// 3. Normalizes the rows (whole batch, fail fast)
    /// 4. Aggregates records batch by batch through the BatchProcessor
    /// 5. Builds the report from the concurrent accumulators
    fn process(
        &self,
        account_number: &str,
        key: &str,
        source: &[u8],
    ) -> Result<ProcessedBatch, ReportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| ReportError::runtime(format!("failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let mut reader = AsyncRowReader::new(Cursor::new(source.to_vec()));
            let rows = reader.read_all(self.config.batch_size).await?;
            let normalized = normalize(rows)?;

            if normalized.records.is_empty() {
                return Err(ReportError::empty_batch(key));
            }

            let aggregator = Arc::new(ConcurrentAggregator::new());
            let processor = BatchProcessor::new(Arc::clone(&aggregator));

            for batch in normalized.records.chunks(self.config.batch_size) {
                processor.process_batch(batch.to_vec()).await?;
            }

            debug!(
                records = normalized.records.len(),
                periods = aggregator.period_count(),
                header_skipped = normalized.header_skipped,
                "aggregated source rows"
            );

            let report = aggregator.finish(account_number)?;

            Ok(ProcessedBatch {
                records: normalized.records,
                report,
                header_skipped: normalized.header_skipped,
            })
        })
    }
}

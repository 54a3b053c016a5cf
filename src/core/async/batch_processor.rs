//! Batch processing with period-based partitioning
//!
//! This module provides the `BatchProcessor`, which splits a batch of records
//! by `(year, month)` and accumulates each partition on its own tokio task.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<ConcurrentAggregator>  (shared DashMap of accumulators)
//! ```
//!
//! Each partition is summed locally and merged into the shared aggregator once,
//! so lock traffic is one merge per period per batch.

use std::collections::HashMap;
use std::sync::Arc;

use super::ConcurrentAggregator;
use crate::core::aggregator::Accumulator;
use crate::types::{Period, ReportError, TransactionRecord};
use futures::future::join_all;

/// Batch processor with period-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    aggregator: Arc<ConcurrentAggregator>,
}

impl BatchProcessor {
    pub fn new(aggregator: Arc<ConcurrentAggregator>) -> Self {
        Self { aggregator }
    }

    /// Partition a batch by `(year, month)`
    ///
    /// Every record appears in exactly one partition.
    pub fn partition_by_period(
        &self,
        batch: Vec<TransactionRecord>,
    ) -> HashMap<Period, Vec<TransactionRecord>> {
        let mut partitions: HashMap<Period, Vec<TransactionRecord>> = HashMap::new();

        for record in batch {
            partitions.entry(record.period()).or_default().push(record);
        }

        partitions
    }

    /// Accumulate one batch
    ///
    /// Spawns one task per period partition and waits for all of them before
    /// returning. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the first accumulation error, or `Runtime` if a task panicked.
    pub async fn process_batch(&self, batch: Vec<TransactionRecord>) -> Result<(), ReportError> {
        let handles: Vec<_> = self
            .partition_by_period(batch)
            .into_iter()
            .map(|(period, records)| {
                let aggregator = Arc::clone(&self.aggregator);
                tokio::spawn(async move {
                    let mut partial = Accumulator::default();
                    for record in &records {
                        partial.add(record)?;
                    }
                    aggregator.merge(period, &partial)
                })
            })
            .collect();

        for result in join_all(handles).await {
            result.map_err(|e| ReportError::runtime(format!("aggregation task failed: {}", e)))??;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::aggregate;
    use crate::types::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;

    fn record(id: u32, date: &str, cents: i64) -> TransactionRecord {
        TransactionRecord {
            account_number: "1".to_string(),
            timestamp: NaiveDateTime::parse_from_str(&format!("{} 00:00:00", date), TIMESTAMP_FORMAT)
                .unwrap(),
            amount: Decimal::new(cents, 2),
            transaction_id: format!("tx{}", id),
        }
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            record(1, "2023-01-05", 1000),
            record(2, "2023-01-09", -250),
            record(3, "2023-07-01", 0),
            record(4, "2024-03-02", -1999),
            record(5, "2024-03-03", 4550),
            record(6, "2022-12-31", 1),
        ]
    }

    #[test]
    fn test_partition_by_period() {
        let processor = BatchProcessor::new(Arc::new(ConcurrentAggregator::new()));
        let partitions = processor.partition_by_period(sample());

        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions[&(2023, 1)].len(), 2);
        assert_eq!(partitions[&(2024, 3)].len(), 2);
        let total: usize = partitions.values().map(Vec::len).sum();
        assert_eq!(total, 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batches_match_sequential_report() {
        let aggregator = Arc::new(ConcurrentAggregator::new());
        let processor = BatchProcessor::new(Arc::clone(&aggregator));

        let records = sample();
        for chunk in records.chunks(2) {
            processor.process_batch(chunk.to_vec()).await.unwrap();
        }

        let concurrent = aggregator.finish("1").unwrap();
        let sequential = aggregate("1", &records).unwrap();
        assert_eq!(concurrent, sequential);
    }

    #[tokio::test]
    async fn test_overflow_propagates() {
        let aggregator = Arc::new(ConcurrentAggregator::new());
        let processor = BatchProcessor::new(Arc::clone(&aggregator));

        let mut big = record(1, "2023-01-01", 0);
        big.amount = Decimal::MAX;
        let result = processor.process_batch(vec![big.clone(), big]).await;

        assert!(matches!(
            result,
            Err(ReportError::ArithmeticOverflow { .. })
        ));
    }
}

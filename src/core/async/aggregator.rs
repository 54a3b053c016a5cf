//! Thread-safe report aggregation
//!
//! `ConcurrentAggregator` keeps one `Accumulator` per `(year, month)` in a
//! `DashMap`, so tasks working on different periods never contend, and tasks
//! merging into the same period are serialized by the entry lock.
//!
//! Because bucket accumulation is exact and commutative, the report built here
//! is identical to the one built by the sequential `ReportAggregator`.

use crate::core::aggregator::{build_report, Accumulator};
use crate::types::{AccountReport, Period, ReportError};
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Concurrent per-period accumulator store
#[derive(Debug, Default)]
pub struct ConcurrentAggregator {
    buckets: DashMap<Period, Accumulator>,
}

impl ConcurrentAggregator {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Merge a partial accumulator into the bucket for `period`
    ///
    /// The entry stays locked while merging, so concurrent merges into the
    /// same period never lose updates.
    pub fn merge(&self, period: Period, partial: &Accumulator) -> Result<(), ReportError> {
        let mut entry = self.buckets.entry(period).or_default();
        entry.value_mut().merge(partial)
    }

    /// Number of distinct periods seen so far
    pub fn period_count(&self) -> usize {
        self.buckets.len()
    }

    /// Build the report from a snapshot of all buckets
    pub fn finish(&self, account_number: &str) -> Result<AccountReport, ReportError> {
        let snapshot: BTreeMap<Period, Accumulator> = self
            .buckets
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        build_report(
            account_number,
            snapshot.iter().map(|(period, bucket)| (*period, bucket)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::thread;

    fn partial(count: usize, cents: i64) -> Accumulator {
        Accumulator {
            count,
            total: Decimal::new(cents, 2),
            debit_count: 0,
            debit_sum: Decimal::ZERO,
            credit_count: count,
            credit_sum: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_merge_same_period() {
        let aggregator = ConcurrentAggregator::new();
        aggregator.merge((2023, 1), &partial(1, 100)).unwrap();
        aggregator.merge((2023, 1), &partial(2, 300)).unwrap();

        let report = aggregator.finish("1").unwrap();
        let stats = report.monthly_breakdown[&2023].get(1).unwrap();
        assert_eq!(stats.transaction_count, 3);
        assert_eq!(stats.credit_average, Decimal::new(133, 2));
        assert_eq!(report.total_balance, Decimal::new(400, 2));
    }

    #[test]
    fn test_concurrent_merges_do_not_lose_updates() {
        let aggregator = Arc::new(ConcurrentAggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let aggregator = Arc::clone(&aggregator);
                thread::spawn(move || {
                    for _ in 0..100 {
                        aggregator.merge((2023, 1 + (i % 2)), &partial(1, 1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(aggregator.period_count(), 2);
        let report = aggregator.finish("1").unwrap();
        assert_eq!(report.transaction_count(), 800);
        assert_eq!(report.total_balance, Decimal::new(800, 2));
    }

    #[test]
    fn test_empty_aggregator() {
        let report = ConcurrentAggregator::new().finish("1").unwrap();
        assert_eq!(report.total_balance, Decimal::ZERO);
        assert!(report.monthly_breakdown.is_empty());
    }
}

//! Synchronous processing strategy
//!
//! Single-threaded implementation of the ProcessingStrategy trait. It delegates:
//! - tokenization to `SyncReader`
//! - header detection and record conversion to `csv_format::normalize`
//! - report computation to `aggregator::aggregate`

use crate::core::aggregator::aggregate;
use crate::io::csv_format::normalize;
use crate::io::sync_reader::read_rows;
use crate::strategy::{ProcessedBatch, ProcessingStrategy};
use crate::types::ReportError;
use tracing::debug;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```
/// use account_report_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
///
/// let source = b"account,date,amount,id\n424248018,2023-01-15 10:00:00,-10.00,tx1\n";
/// let batch = SyncProcessingStrategy
///     .process("424248018", "424248018_transactions_report.csv", source)
///     .unwrap();
///
/// assert!(batch.header_skipped);
/// assert_eq!(batch.records.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        account_number: &str,
        key: &str,
        source: &[u8],
    ) -> Result<ProcessedBatch, ReportError> {
        let rows = read_rows(source)?;
        let normalized = normalize(rows)?;

        if normalized.records.is_empty() {
            return Err(ReportError::empty_batch(key));
        }

        debug!(
            records = normalized.records.len(),
            header_skipped = normalized.header_skipped,
            "normalized source rows"
        );

        let report = aggregate(account_number, &normalized.records)?;

        Ok(ProcessedBatch {
            records: normalized.records,
            report,
            header_skipped: normalized.header_skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    const KEY: &str = "424248018_transactions_report.csv";

    #[test]
    fn test_sync_strategy_builds_report() {
        let source = "account,date,amount,id\n\
                      424248018,2023-01-15 10:00:00,-10.00,tx1\n\
                      424248018,2023-01-20 10:00:00,-20.00,tx2\n\
                      424248018,2024-03-02 10:00:00,5.00,tx3\n";

        let batch = SyncProcessingStrategy
            .process("424248018", KEY, source.as_bytes())
            .unwrap();

        assert!(batch.header_skipped);
        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.report.account_number, "424248018");
        assert_eq!(batch.report.total_balance, Decimal::new(-2500, 2));
        assert_eq!(batch.report.average_debit_amount, Decimal::new(-1500, 2));
        assert_eq!(batch.report.average_credit_amount, Decimal::new(500, 2));
        assert_eq!(batch.report.monthly_breakdown.len(), 2);
    }

    #[test]
    fn test_sync_strategy_keeps_headerless_first_row() {
        let source = "123,2023-01-01 00:00:00,10.00,tx1\n";
        let batch = SyncProcessingStrategy
            .process("123", "123_a_b.csv", source.as_bytes())
            .unwrap();

        assert!(!batch.header_skipped);
        assert_eq!(batch.records.len(), 1);
    }

    #[rstest]
    #[case::no_bytes("")]
    #[case::header_only("account,date,amount,id\n")]
    fn test_sync_strategy_empty_batch(#[case] source: &str) {
        let result = SyncProcessingStrategy.process("1", KEY, source.as_bytes());
        assert_eq!(result, Err(ReportError::empty_batch(KEY)));
    }

    #[test]
    fn test_sync_strategy_rejects_malformed_batch() {
        let source = "account,date,amount,id\n\
                      1,2023-01-15 10:00:00,1.00,tx1\n\
                      1,2023-01-15 10:00:00,abc,tx2\n";
        let result = SyncProcessingStrategy.process("1", KEY, source.as_bytes());
        assert!(matches!(
            result,
            Err(ReportError::MalformedRow { line: Some(3), .. })
        ));
    }

    #[test]
    fn test_malformed_line_counts_blank_lines() {
        let source = "account,date,amount,id\n\n\
                      1,2023-01-15 10:00:00,1.00,tx1\n\
                      1,2023-01-15 10:00:00,abc,tx2\n";
        let result = SyncProcessingStrategy.process("1", KEY, source.as_bytes());
        assert!(matches!(
            result,
            Err(ReportError::MalformedRow { line: Some(4), .. })
        ));
    }
}

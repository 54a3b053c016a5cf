//! Report aggregation engine
//!
//! This module turns normalized transaction records into an `AccountReport`.
//! Aggregation is pure and deterministic: no I/O, no shared state.
//!
//! The engine enforces these rules:
//! - `total_balance` is the sum of every amount, rounded to 2 decimals
//! - debit/credit averages cover amounts `< 0` / `> 0`; zero amounts count
//!   towards totals but towards neither average
//! - every record lands in exactly one `(year, month)` bucket, and every
//!   observed year is present in the breakdown
//!
//! Accumulation is exact decimal arithmetic, so buckets can be merged in any
//! order without changing the result. The concurrent aggregator relies on it.

use crate::types::{
    round_currency, AccountReport, MonthlyBreakdown, MonthlyStats, Period, ReportError,
    TransactionRecord,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Running sums for one bucket of transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    pub count: usize,
    pub total: Decimal,
    pub debit_count: usize,
    pub debit_sum: Decimal,
    pub credit_count: usize,
    pub credit_sum: Decimal,
}

impl Accumulator {
    /// Add one record's amount
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a running sum leaves the decimal range.
    /// The accumulator is left unchanged in that case.
    pub fn add(&mut self, record: &TransactionRecord) -> Result<(), ReportError> {
        let total = checked_sum(self.total, record.amount, "total balance")?;

        if record.is_debit() {
            self.debit_sum = checked_sum(self.debit_sum, record.amount, "debit sum")?;
            self.debit_count += 1;
        } else if record.is_credit() {
            self.credit_sum = checked_sum(self.credit_sum, record.amount, "credit sum")?;
            self.credit_count += 1;
        }

        self.total = total;
        self.count += 1;
        Ok(())
    }

    /// Fold another accumulator into this one
    ///
    /// On overflow the accumulator is left unchanged.
    pub fn merge(&mut self, other: &Accumulator) -> Result<(), ReportError> {
        let total = checked_sum(self.total, other.total, "total balance")?;
        let debit_sum = checked_sum(self.debit_sum, other.debit_sum, "debit sum")?;
        let credit_sum = checked_sum(self.credit_sum, other.credit_sum, "credit sum")?;

        self.count += other.count;
        self.debit_count += other.debit_count;
        self.credit_count += other.credit_count;
        self.total = total;
        self.debit_sum = debit_sum;
        self.credit_sum = credit_sum;
        Ok(())
    }

    pub fn debit_average(&self) -> Decimal {
        average(self.debit_sum, self.debit_count)
    }

    pub fn credit_average(&self) -> Decimal {
        average(self.credit_sum, self.credit_count)
    }

    pub fn to_monthly_stats(&self) -> MonthlyStats {
        MonthlyStats {
            transaction_count: self.count,
            debit_count: self.debit_count,
            debit_average: self.debit_average(),
            credit_count: self.credit_count,
            credit_average: self.credit_average(),
        }
    }
}

fn checked_sum(left: Decimal, right: Decimal, operation: &str) -> Result<Decimal, ReportError> {
    left.checked_add(right)
        .ok_or_else(|| ReportError::arithmetic_overflow(operation))
}

/// Mean of a subset rounded to 2 decimals, zero for an empty subset
pub fn average(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round_currency(sum / Decimal::from(count))
}

/// Build a report from per-period accumulators
///
/// Account-level figures are the merge of all buckets, since every record
/// belongs to exactly one bucket.
pub fn build_report<'a, I>(account_number: &str, buckets: I) -> Result<AccountReport, ReportError>
where
    I: IntoIterator<Item = (Period, &'a Accumulator)>,
{
    let mut overall = Accumulator::default();
    let mut monthly_breakdown = MonthlyBreakdown::new();

    for ((year, month), bucket) in buckets {
        overall.merge(bucket)?;
        monthly_breakdown
            .entry(year)
            .or_default()
            .insert(month, bucket.to_monthly_stats());
    }

    Ok(AccountReport {
        account_number: account_number.to_string(),
        total_balance: round_currency(overall.total),
        average_debit_amount: overall.debit_average(),
        average_credit_amount: overall.credit_average(),
        monthly_breakdown,
    })
}

/// Sequential report aggregator
///
/// Records are added one at a time; `finish` produces the report.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    buckets: BTreeMap<Period, Accumulator>,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to its `(year, month)` bucket
    pub fn add(&mut self, record: &TransactionRecord) -> Result<(), ReportError> {
        self.buckets.entry(record.period()).or_default().add(record)
    }

    /// Accumulated buckets, ordered by period
    pub fn buckets(&self) -> &BTreeMap<Period, Accumulator> {
        &self.buckets
    }

    pub fn finish(&self, account_number: &str) -> Result<AccountReport, ReportError> {
        build_report(
            account_number,
            self.buckets.iter().map(|(period, bucket)| (*period, bucket)),
        )
    }
}

/// Aggregate a batch of records into an `AccountReport`
pub fn aggregate(
    account_number: &str,
    records: &[TransactionRecord],
) -> Result<AccountReport, ReportError> {
    let mut aggregator = ReportAggregator::new();
    for record in records {
        aggregator.add(record)?;
    }
    aggregator.finish(account_number)
}

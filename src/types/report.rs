//! Report types for the account report engine
//!
//! `AccountReport` is derived once per invocation, written once to storage and
//! serialized once to the notification channel. Field names in the serialized
//! form follow the external report schema.

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Round a monetary value to two decimal places
///
/// Uses banker's rounding (midpoint to even), the `Decimal::round_dp` default.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Aggregate statistics for one `(year, month)` bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    /// Number of transactions in the month (debits, credits and zero amounts)
    #[serde(rename = "month_transactions_count")]
    pub transaction_count: usize,

    #[serde(rename = "debit_transactions_count")]
    pub debit_count: usize,

    /// Mean debit amount, rounded to 2 decimals; zero when there are no debits
    #[serde(
        rename = "debit_transaction_month_avg",
        with = "rust_decimal::serde::float"
    )]
    pub debit_average: Decimal,

    #[serde(rename = "credit_transactions_count")]
    pub credit_count: usize,

    /// Mean credit amount, rounded to 2 decimals; zero when there are no credits
    #[serde(
        rename = "credit_transaction_month_avg",
        with = "rust_decimal::serde::float"
    )]
    pub credit_average: Decimal,
}

/// Monthly statistics for a single year
///
/// Months are always iterated and serialized in descending month order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearBreakdown {
    months: BTreeMap<u32, MonthlyStats>,
}

impl YearBreakdown {
    pub fn insert(&mut self, month: u32, stats: MonthlyStats) {
        self.months.insert(month, stats);
    }

    pub fn get(&self, month: u32) -> Option<&MonthlyStats> {
        self.months.get(&month)
    }

    /// Months with their statistics, latest month first
    pub fn months(&self) -> impl Iterator<Item = (u32, &MonthlyStats)> {
        self.months.iter().rev().map(|(month, stats)| (*month, stats))
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl Serialize for YearBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.months.len()))?;
        for (month, stats) in self.months() {
            map.serialize_entry(&month, stats)?;
        }
        map.end()
    }
}

/// Per-year monthly statistics, every observed year present
pub type MonthlyBreakdown = BTreeMap<i32, YearBreakdown>;

/// Derived financial summary of one account's batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub account_number: String,

    /// Sum of all amounts rounded to 2 decimals
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub average_debit_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub average_credit_amount: Decimal,

    #[serde(rename = "monthly_transactions")]
    pub monthly_breakdown: MonthlyBreakdown,
}

impl AccountReport {
    /// Canonical JSON message body for the notification channel
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// JSON blob of the monthly breakdown for storage columns without nesting
    pub fn monthly_breakdown_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.monthly_breakdown)
    }

    /// Total number of transactions across all months
    pub fn transaction_count(&self) -> usize {
        self.monthly_breakdown
            .values()
            .flat_map(|year| year.months())
            .map(|(_, stats)| stats.transaction_count)
            .sum()
    }
}

//! Transaction-related types for the account report engine
//!
//! This module defines the normalized transaction record produced from raw
//! source rows and consumed by aggregation and persistence.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;

/// Timestamp layout used by source rows and by the transactions table
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar bucket a transaction falls into: `(year, month)`
pub type Period = (i32, u32);

/// Normalized transaction record
///
/// Created once per invocation from an input row and never mutated afterwards.
/// The sign of `amount` classifies the record: negative is a debit, positive
/// is a credit, zero is neither.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Account number as written in the row (field 0)
    pub account_number: String,

    /// When the transaction happened (field 1)
    pub timestamp: NaiveDateTime,

    /// Signed transaction amount (field 2)
    pub amount: Decimal,

    /// Provider transaction identifier (field 3)
    pub transaction_id: String,
}

impl TransactionRecord {
    /// Whether the record is a debit (negative amount)
    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Whether the record is a credit (positive amount)
    pub fn is_credit(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// The `(year, month)` bucket derived from the timestamp
    pub fn period(&self) -> Period {
        (self.timestamp.year(), self.timestamp.month())
    }

    /// Timestamp rendered in the source layout
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

//! Row normalization for transaction sources
//!
//! This module centralizes all source format concerns, providing:
//! - Header detection on the first row
//! - Conversion from raw rows to `TransactionRecord`s
//! - Whole-batch normalization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Row Layout
//!
//! Field positions are fixed: index 0 = account number, 1 = timestamp
//! (`YYYY-MM-DD HH:MM:SS`), 2 = amount, 3 = transaction id.
//!
//! # Header Detection
//!
//! The first row is a header when every field is non-numeric text. This is a
//! positional heuristic, not a declared schema: a header whose fields all look
//! numeric would be treated as data and then rejected as malformed.

use crate::types::{ReportError, TransactionRecord, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

/// One tokenized source row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based source line the row starts on
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }
}

/// Minimum number of fields in a data row
pub const MIN_FIELDS: usize = 4;

/// Normalized records of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    /// Records in source order
    pub records: Vec<TransactionRecord>,
    /// Whether the first row was detected as a header and excluded
    pub header_skipped: bool,
}

fn is_numeric(field: &str) -> bool {
    Decimal::from_str(field.trim()).is_ok()
}

/// Whether a row looks like a header (every field is non-numeric text)
pub fn looks_like_header(row: &[String]) -> bool {
    !row.is_empty() && row.iter().all(|field| !is_numeric(field))
}

/// Convert a raw row into a TransactionRecord
///
/// # Arguments
///
/// * `row` - The tokenized row
/// * `line` - 1-based source line, used in error messages
///
/// # Errors
///
/// Returns `MalformedRow` if the row has fewer than four fields, the
/// timestamp does not match `YYYY-MM-DD HH:MM:SS`, the amount is not a
/// decimal number, or the transaction id is empty.
pub fn convert_row(row: &[String], line: u64) -> Result<TransactionRecord, ReportError> {
    if row.len() < MIN_FIELDS {
        return Err(ReportError::malformed_row(
            Some(line),
            format!("expected at least {} fields, found {}", MIN_FIELDS, row.len()),
        ));
    }

    let timestamp = NaiveDateTime::parse_from_str(row[1].trim(), TIMESTAMP_FORMAT).map_err(|e| {
        ReportError::malformed_row(Some(line), format!("invalid timestamp '{}': {}", row[1], e))
    })?;

    let amount = Decimal::from_str(row[2].trim()).map_err(|_| {
        ReportError::malformed_row(Some(line), format!("invalid amount '{}'", row[2]))
    })?;

    let transaction_id = row[3].trim();
    if transaction_id.is_empty() {
        return Err(ReportError::malformed_row(
            Some(line),
            "missing transaction id",
        ));
    }

    Ok(TransactionRecord {
        account_number: row[0].trim().to_string(),
        timestamp,
        amount,
        transaction_id: transaction_id.to_string(),
    })
}

/// Normalize a batch of raw rows
///
/// Detects and drops a header row, then converts every remaining row. The
/// first malformed row aborts the whole batch.
pub fn normalize(rows: Vec<RawRow>) -> Result<NormalizedBatch, ReportError> {
    let header_skipped = rows.first().is_some_and(|row| looks_like_header(&row.fields));
    let skip = usize::from(header_skipped);

    let records = rows
        .iter()
        .skip(skip)
        .map(|row| convert_row(&row.fields, row.line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NormalizedBatch {
        records,
        header_skipped,
    })
}

//! Atomic persistence of transactions and reports
//!
//! This module provides the SQLite-backed `ReportStore`. Both collections are
//! written inside one `rusqlite::Transaction`:
//!
//! - the transaction rows are inserted first, then the report row
//! - the unit is committed only after both inserts succeed
//! - any error returns early, dropping the transaction, which rolls it back
//!
//! Readers therefore never observe transactions without their report, or a
//! report without its transactions.
//!
//! # Failure Categories
//!
//! SQLite constraint failures (duplicate transaction id, failing triggers)
//! become `ConstraintViolation`; everything else becomes `StorageUnavailable`.

use crate::core::ReportStore;
use crate::types::{AccountReport, ReportError, TransactionRecord};
use rusqlite::{params, Connection, ErrorCode};
use std::path::Path;
use tracing::{error, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_number TEXT NOT NULL,
    amount TEXT NOT NULL,
    transaction_id TEXT NOT NULL UNIQUE,
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_number TEXT NOT NULL,
    total_balance TEXT NOT NULL,
    average_debit_amount TEXT NOT NULL,
    average_credit_amount TEXT NOT NULL,
    monthly_transactions TEXT NOT NULL
);
"#;

/// Classify a SQLite error into the report error taxonomy
pub fn storage_error(err: rusqlite::Error) -> ReportError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => ReportError::constraint_violation(err.to_string()),
        _ => ReportError::storage_unavailable(err.to_string()),
    }
}

/// Stored report row, as read back for verification
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub account_number: String,
    pub total_balance: String,
    pub average_debit_amount: String,
    pub average_credit_amount: String,
    pub monthly_transactions: String,
}

/// SQLite report store
///
/// Owns one connection for the lifetime of an invocation.
#[derive(Debug)]
pub struct SqliteReportStore {
    conn: Connection,
}

impl SqliteReportStore {
    /// Open (or create) the database at `path` and ensure both tables exist
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        let conn = Connection::open(path).map_err(storage_error)?;
        Self::from_connection(conn)
    }

    /// In-memory store, mostly useful for tests
    pub fn open_in_memory() -> Result<Self, ReportError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, ReportError> {
        conn.execute_batch(SCHEMA).map_err(storage_error)?;
        Ok(Self { conn })
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of stored transaction rows for an account
    pub fn transaction_count(&self, account_number: &str) -> Result<usize, ReportError> {
        self.count("transactions", account_number)
    }

    /// Number of stored reports for an account
    pub fn report_count(&self, account_number: &str) -> Result<usize, ReportError> {
        self.count("reports", account_number)
    }

    fn count(&self, table: &str, account_number: &str) -> Result<usize, ReportError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE account_number = ?1", table);
        let count: i64 = self
            .conn
            .query_row(&sql, params![account_number], |row| row.get(0))
            .map_err(storage_error)?;
        Ok(count as usize)
    }

    /// Most recently stored report for an account
    pub fn latest_report(&self, account_number: &str) -> Result<Option<StoredReport>, ReportError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT account_number, total_balance, average_debit_amount, \
                 average_credit_amount, monthly_transactions \
                 FROM reports WHERE account_number = ?1 ORDER BY id DESC LIMIT 1",
            )
            .map_err(storage_error)?;

        let mut rows = stmt
            .query_map(params![account_number], |row| {
                Ok(StoredReport {
                    account_number: row.get(0)?,
                    total_balance: row.get(1)?,
                    average_debit_amount: row.get(2)?,
                    average_credit_amount: row.get(3)?,
                    monthly_transactions: row.get(4)?,
                })
            })
            .map_err(storage_error)?;

        let latest = rows.next().transpose().map_err(storage_error)?;
        Ok(latest)
    }

    fn write_unit(
        &mut self,
        account_number: &str,
        records: &[TransactionRecord],
        report: &AccountReport,
        monthly_transactions: &str,
    ) -> Result<(), ReportError> {
        let tx = self.conn.transaction().map_err(storage_error)?;

        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO transactions (account_number, amount, transaction_id, date) \
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(storage_error)?;

            for record in records {
                insert
                    .execute(params![
                        account_number,
                        record.amount.to_string(),
                        record.transaction_id,
                        record.formatted_timestamp(),
                    ])
                    .map_err(storage_error)?;
            }
        }

        tx.execute(
            "INSERT INTO reports (account_number, total_balance, average_debit_amount, \
             average_credit_amount, monthly_transactions) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                report.account_number,
                format!("{:.2}", report.total_balance),
                format!("{:.2}", report.average_debit_amount),
                format!("{:.2}", report.average_credit_amount),
                monthly_transactions,
            ],
        )
        .map_err(storage_error)?;

        tx.commit().map_err(storage_error)
    }
}

impl ReportStore for SqliteReportStore {
    fn persist(
        &mut self,
        account_number: &str,
        records: &[TransactionRecord],
        report: &AccountReport,
    ) -> Result<(), ReportError> {
        let monthly_transactions = report.monthly_breakdown_json()?;

        info!(
            account = account_number,
            transactions = records.len(),
            "inserting transactions and report"
        );

        match self.write_unit(account_number, records, report, &monthly_transactions) {
            Ok(()) => {
                info!(account = account_number, "transactions and report committed");
                Ok(())
            }
            Err(e) => {
                error!(account = account_number, error = %e, "persistence rolled back");
                Err(e)
            }
        }
    }
}

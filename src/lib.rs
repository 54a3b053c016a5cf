//! Account Report Engine Library
//! # Overview
//!
//! This library turns an uploaded transaction file into a per-account report,
//! persists the raw transactions together with the report, and notifies a
//! downstream mailer. Rows can be processed with a sync or an async strategy;
//! both produce identical reports.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (SourceEvent, TransactionRecord, AccountReport, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::aggregator`] - Totals, averages and the monthly breakdown
//!   - [`core::persistence`] - Atomic SQLite persistence
//!   - [`core::notifier`] - Notification dispatch with bounded retry
//!   - [`core::pipeline`] - Invocation orchestration
//! - [`io`] - Source retrieval, row readers and normalization, message spool
//! - [`strategy`] - Pluggable sync and async processing strategies
//!
//! # Invocation Flow
//!
//! - **Resolve**: Derive the account number from the object key `<account>_<x>_<y>`
//! - **Fetch**: Read the object bytes from the source
//! - **Normalize**: Skip a detected header row, parse rows into records (fail fast)
//! - **Aggregate**: Total balance, debit and credit averages, per-month statistics
//! - **Persist**: Write transactions and report in one transaction
//! - **Notify**: Send the report JSON, retrying transient failures
//!
//! # Failure Semantics
//!
//! Every failure before persistence aborts the invocation with nothing written.
//! A notification failure after a successful persist is reported but is not
//! fatal.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    aggregate, NotificationDispatcher, Outcome, ReportPipeline, RetryPolicy, SqliteReportStore,
};
pub use io::{FsObjectSource, SpoolQueue};
pub use types::{
    AccountReport, MonthlyStats, ReportError, SourceEvent, TransactionRecord, YearBreakdown,
};

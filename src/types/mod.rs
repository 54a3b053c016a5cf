//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `event`: Source event and account number derivation
//! - `transaction`: Normalized transaction records
//! - `report`: Account report and monthly statistics
//! - `error`: Error types for the report engine

pub mod error;
pub mod event;
pub mod report;
pub mod transaction;

pub use error::ReportError;
pub use event::{derive_account_number, SourceEvent};
pub use report::{round_currency, AccountReport, MonthlyBreakdown, MonthlyStats, YearBreakdown};
pub use transaction::{Period, TransactionRecord, TIMESTAMP_FORMAT};

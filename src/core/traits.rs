//! Core traits for the collaborators of a report invocation
//!
//! This module defines the seams between the report engine and the outside
//! world: where source bytes come from, where the batch is persisted, and where
//! notifications are sent. Each invocation receives explicit handles, so tests
//! can substitute fakes without touching global state.

use crate::types::{AccountReport, ReportError, TransactionRecord};
use thiserror::Error;

/// Trait for retrieving source objects
pub trait ObjectSource {
    /// Fetch the full contents of `key` in `container`
    ///
    /// Implementations must map every failure to `SourceRetrieval`.
    fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, ReportError>;
}

/// Trait for persisting a processed batch
///
/// `persist` writes the raw transactions and the computed report as one
/// atomic unit: after it returns, either both are visible or neither is.
pub trait ReportStore {
    /// Persist transactions and report for `account_number`
    ///
    /// # Errors
    ///
    /// - `ConstraintViolation` if a write violates a storage constraint
    /// - `StorageUnavailable` for any connectivity or transport failure
    fn persist(
        &mut self,
        account_number: &str,
        records: &[TransactionRecord],
        report: &AccountReport,
    ) -> Result<(), ReportError>;
}

/// Failure reported by a messaging endpoint for a single send
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The send may succeed if attempted again
    #[error("transient send failure: {0}")]
    Transient(String),

    /// Retrying cannot succeed
    #[error("permanent send failure: {0}")]
    Permanent(String),
}

/// Trait for delivering message bodies to a messaging endpoint
pub trait MessageSender {
    /// Send an opaque message body, returning the provider-assigned message id
    fn send(&self, body: &str) -> Result<String, SendError>;
}

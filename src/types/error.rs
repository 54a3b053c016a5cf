//! Error types for the account report engine
//!
//! This module defines every error that can terminate or degrade a report
//! invocation. Errors are designed to be descriptive for operators reading the
//! process output.
//!
//! # Error Categories
//!
//! - **Input Errors**: Invalid event, unreadable source object, unresolvable account
//! - **Row Errors**: Malformed rows, empty batches
//! - **Storage Errors**: Constraint violations, unavailable storage
//! - **Notification Errors**: Delivery failure after exhausting retries (soft failure)

use thiserror::Error;

/// Main error type for the report engine
///
/// Each variant includes enough context to identify the failing object,
/// row, or collaborator. Every variant except `NotificationDelivery` is
/// terminal for the invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The triggering event could not be interpreted
    #[error("Invalid event: {message}")]
    InvalidEvent {
        /// Description of what was missing or malformed
        message: String,
    },

    /// The source object bytes could not be read
    ///
    /// Fail fast: nothing has been normalized or written yet.
    #[error("Unable to retrieve source object {container}/{key}: {message}")]
    SourceRetrieval {
        /// Container (bucket) name
        container: String,
        /// Object key
        key: String,
        /// Description of the retrieval failure
        message: String,
    },

    /// A row could not be parsed into a transaction record
    ///
    /// Aborts the whole batch, no partial report is produced.
    #[error("Malformed row{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MalformedRow {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The object key does not follow the `<account>_<x>_<y>` convention
    #[error("Unable to determine the account number for object key '{key}'")]
    UnresolvableAccount {
        /// The object key that could not be resolved
        key: String,
    },

    /// No data rows remained after header detection
    #[error("Source object {key} contains no transaction rows")]
    EmptyBatch {
        /// The object key of the empty batch
        key: String,
    },

    /// Decimal arithmetic exceeded the representable range
    #[error("Arithmetic overflow while computing {operation}")]
    ArithmeticOverflow {
        /// Computation that would overflow
        operation: String,
    },

    /// A write violated a storage constraint (e.g. duplicate transaction id)
    ///
    /// The whole unit is rolled back.
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        /// Storage-provided description
        message: String,
    },

    /// Storage could not be reached or failed during the write
    ///
    /// The whole unit is rolled back.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// Storage-provided description
        message: String,
    },

    /// The notification could not be delivered after all attempts
    #[error("Notification not delivered after {attempts} attempt(s): {message}")]
    NotificationDelivery {
        /// Number of send attempts made
        attempts: u32,
        /// Last error reported by the messaging endpoint
        message: String,
    },

    /// The report could not be serialized
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },

    /// The async runtime failed (runtime construction, task panics)
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },
}

// Conversion from csv::Error to ReportError
impl From<csv::Error> for ReportError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        ReportError::MalformedRow {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for ReportError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReportError::MalformedRow {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(error: serde_json::Error) -> Self {
        ReportError::Serialization {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ReportError {
    /// Create an InvalidEvent error
    pub fn invalid_event(message: impl Into<String>) -> Self {
        ReportError::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create a SourceRetrieval error
    pub fn source_retrieval(container: &str, key: &str, message: impl Into<String>) -> Self {
        ReportError::SourceRetrieval {
            container: container.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create a MalformedRow error
    pub fn malformed_row(line: Option<u64>, message: impl Into<String>) -> Self {
        ReportError::MalformedRow {
            line,
            message: message.into(),
        }
    }

    /// Create an UnresolvableAccount error
    pub fn unresolvable_account(key: &str) -> Self {
        ReportError::UnresolvableAccount {
            key: key.to_string(),
        }
    }

    /// Create an EmptyBatch error
    pub fn empty_batch(key: &str) -> Self {
        ReportError::EmptyBatch {
            key: key.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        ReportError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create a ConstraintViolation error
    pub fn constraint_violation(message: impl Into<String>) -> Self {
        ReportError::ConstraintViolation {
            message: message.into(),
        }
    }

    /// Create a StorageUnavailable error
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        ReportError::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a NotificationDelivery error
    pub fn notification_delivery(attempts: u32, message: impl Into<String>) -> Self {
        ReportError::NotificationDelivery {
            attempts,
            message: message.into(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        ReportError::Runtime {
            message: message.into(),
        }
    }

    /// Whether this error came from the persistence layer
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            ReportError::ConstraintViolation { .. } | ReportError::StorageUnavailable { .. }
        )
    }

    /// Process exit code for this error when it terminates an invocation
    ///
    /// Notification failures are soft and never terminate the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::NotificationDelivery { .. } => 0,
            _ => 1,
        }
    }
}

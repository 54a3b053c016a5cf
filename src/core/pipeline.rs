//! Invocation orchestration
//!
//! `ReportPipeline` runs one event end to end:
//!
//! ```text
//! SourceEvent
//!     ├── derive_account_number(key)      (before any I/O)
//!     ├── ObjectSource::fetch
//!     ├── ProcessingStrategy::process     (normalize + aggregate)
//!     ├── ReportStore::persist            (atomic)
//!     └── NotificationDispatcher::dispatch (soft failure)
//! ```
//!
//! Every stage before notification is fatal: its error is returned and later
//! stages never run. A delivery failure after a successful persist is reported
//! through `Outcome::PersistedNotNotified`.

use crate::core::{NotificationDispatcher, ObjectSource, ReportStore};
use crate::strategy::ProcessingStrategy;
use crate::types::{ReportError, SourceEvent};
use tracing::{info, warn};

/// Result of an invocation that reached persistence
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Report persisted and notification accepted
    Notified {
        account_number: String,
        message_id: String,
    },
    /// Report persisted but the notification could not be delivered
    PersistedNotNotified {
        account_number: String,
        reason: ReportError,
    },
}

impl Outcome {
    pub fn account_number(&self) -> &str {
        match self {
            Outcome::Notified { account_number, .. }
            | Outcome::PersistedNotNotified { account_number, .. } => account_number,
        }
    }

    /// True when both persistence and notification succeeded
    pub fn is_fully_successful(&self) -> bool {
        matches!(self, Outcome::Notified { .. })
    }

    /// One-line summary for the process output
    pub fn summary(&self) -> String {
        match self {
            Outcome::Notified {
                account_number,
                message_id,
            } => format!(
                "report for account {} persisted, notification {} sent",
                account_number, message_id
            ),
            Outcome::PersistedNotNotified {
                account_number,
                reason,
            } => format!(
                "report for account {} persisted, notification not sent: {}",
                account_number, reason
            ),
        }
    }
}

/// Runs events through fetch, process, persist and notify
pub struct ReportPipeline {
    source: Box<dyn ObjectSource>,
    strategy: Box<dyn ProcessingStrategy>,
    store: Box<dyn ReportStore>,
    dispatcher: NotificationDispatcher,
}

impl ReportPipeline {
    pub fn new(
        source: Box<dyn ObjectSource>,
        strategy: Box<dyn ProcessingStrategy>,
        store: Box<dyn ReportStore>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            source,
            strategy,
            store,
            dispatcher,
        }
    }

    /// Process one event
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: `UnresolvableAccount`, `SourceRetrieval`,
    /// `MalformedRow`, `EmptyBatch`, `ArithmeticOverflow`, `ConstraintViolation`
    /// or `StorageUnavailable`. Nothing is persisted when an error is returned.
    pub fn run(&mut self, event: &SourceEvent) -> Result<Outcome, ReportError> {
        let account_number = event.account_number()?;
        info!(
            container = %event.container,
            key = %event.key,
            account_number = %account_number,
            "processing source object"
        );

        let bytes = self.source.fetch(&event.container, &event.key)?;
        let batch = self.strategy.process(&account_number, &event.key, &bytes)?;

        info!(
            account_number = %account_number,
            records = batch.records.len(),
            header_skipped = batch.header_skipped,
            total_balance = %batch.report.total_balance,
            "report computed"
        );

        self.store
            .persist(&account_number, &batch.records, &batch.report)?;

        match self.dispatcher.dispatch(&batch.report) {
            Ok(message_id) => Ok(Outcome::Notified {
                account_number,
                message_id,
            }),
            Err(reason) => {
                warn!(
                    account_number = %account_number,
                    error = %reason,
                    "report persisted without notification"
                );
                Ok(Outcome::PersistedNotNotified {
                    account_number,
                    reason,
                })
            }
        }
    }
}

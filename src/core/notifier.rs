//! Notification dispatch with bounded retry
//!
//! The dispatcher serializes an `AccountReport` to its canonical JSON form and
//! hands it to a `MessageSender`. Transient failures are retried in a plain
//! loop with an explicit attempt counter: at most `1 + max_retries` sends are
//! made, each retry waiting `retry_delay * attempt`.
//!
//! Delivery failure is a soft failure. `dispatch` returns an error value but
//! never aborts the process and never touches persisted data.

use crate::core::{MessageSender, SendError};
use crate::types::{AccountReport, ReportError};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Retry policy for notification delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failed send
    pub max_retries: u32,
    /// Base delay between attempts, multiplied by the attempt number
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Upper bound on send attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

/// Delivers reports to a messaging endpoint
pub struct NotificationDispatcher {
    sender: Box<dyn MessageSender>,
    policy: RetryPolicy,
}

impl NotificationDispatcher {
    pub fn new(sender: Box<dyn MessageSender>, policy: RetryPolicy) -> Self {
        Self { sender, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Serialize and send a report
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - the provider-assigned id of the accepted message
    /// * `Err(NotificationDelivery)` - retries exhausted or a permanent failure
    /// * `Err(Serialization)` - the report could not be encoded
    pub fn dispatch(&self, report: &AccountReport) -> Result<String, ReportError> {
        let body = report.to_json()?;
        self.send_with_retry(&body)
    }

    /// Send a message body, retrying transient failures
    pub fn send_with_retry(&self, body: &str) -> Result<String, ReportError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            match self.sender.send(body) {
                Ok(message_id) => {
                    info!(message_id = %message_id, attempt, "notification sent");
                    return Ok(message_id);
                }
                Err(SendError::Permanent(message)) => {
                    error!(attempt, error = %message, "notification rejected, not retrying");
                    return Err(ReportError::notification_delivery(attempt, message));
                }
                Err(SendError::Transient(message)) if attempt < max_attempts => {
                    warn!(attempt, error = %message, "sending notification failed, retrying");
                    thread::sleep(self.policy.delay_after(attempt));
                    attempt += 1;
                }
                Err(SendError::Transient(message)) => {
                    error!(
                        attempts = attempt,
                        max_retries = self.policy.max_retries,
                        error = %message,
                        "notification not sent, retries exhausted"
                    );
                    return Err(ReportError::notification_delivery(attempt, message));
                }
            }
        }
    }
}

//! Core business logic module
//!
//! This module contains the report processing components:
//! - `traits` - Seams for the object source, report store and message sender
//! - `aggregator` - Report aggregation engine
//! - `persistence` - Atomic SQLite persistence
//! - `notifier` - Notification dispatch with bounded retry
//! - `pipeline` - Invocation orchestration
//! - `async` - Concurrent aggregation components

pub mod aggregator;
pub mod r#async;
pub mod notifier;
pub mod persistence;
pub mod pipeline;
pub mod traits;

pub use aggregator::{aggregate, Accumulator, ReportAggregator};
pub use notifier::{NotificationDispatcher, RetryPolicy};
pub use persistence::SqliteReportStore;
pub use pipeline::{Outcome, ReportPipeline};
pub use r#async::{BatchProcessor, ConcurrentAggregator};
pub use traits::{MessageSender, ObjectSource, ReportStore, SendError};

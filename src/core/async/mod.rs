//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent implementations of report
//! aggregation using DashMap for fine-grained locking.
//!
//! - **ConcurrentAggregator**: Thread-safe per-period accumulators
//! - **BatchProcessor**: Period partitioning and task fan-out per batch
//!
//! Operations on different periods proceed in parallel; merges into the same
//! period are serialized by the map entry lock.

pub mod aggregator;
pub mod batch_processor;

pub use aggregator::ConcurrentAggregator;
pub use batch_processor::BatchProcessor;

//! I/O module
//!
//! Handles source retrieval, row tokenization and normalization, and the
//! outbound message spool.
//!
//! # Components
//!
//! - `csv_format` - Row normalization (header detection, record conversion)
//! - `sync_reader` - Synchronous row reader with iterator interface
//! - `async_reader` - Asynchronous row reader with batch reading interface
//! - `source` - Filesystem-backed object source
//! - `outbox` - Spool-directory messaging endpoint

pub mod async_reader;
pub mod csv_format;
pub mod outbox;
pub mod source;
pub mod sync_reader;

pub use async_reader::AsyncRowReader;
pub use csv_format::{convert_row, looks_like_header, normalize, NormalizedBatch, RawRow};
pub use outbox::SpoolQueue;
pub use source::FsObjectSource;
pub use sync_reader::{read_rows, SyncReader};

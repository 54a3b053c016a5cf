//! Asynchronous row reader with batch interface
//!
//! Tokenizes source bytes into raw rows using csv-async. Supports batch reading
//! for the async processing strategy.
//!
//! # Architecture
//!
//! ```text
//! Source bytes → AsyncRowReader → Batches of RawRows
//!                     ↓
//!              csv_format module
//!              (normalize, convert_row)
//! ```

use crate::io::csv_format::RawRow;
use crate::types::ReportError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV row reader
pub struct AsyncRowReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    rows_read: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncRowReader<R> {
    /// Create a new AsyncRowReader from an async reader
    ///
    /// Configured like the sync reader: headerless, trimmed, flexible.
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            rows_read: 0,
        }
    }

    /// Read a batch of raw rows
    ///
    /// Reads up to `batch_size` rows. Returns an empty vector at end of input.
    ///
    /// # Errors
    ///
    /// Tokenization errors are returned immediately as `MalformedRow`; the
    /// batch is aborted rather than skipping the row.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<RawRow>, ReportError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.records();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => {
                    self.rows_read += 1;
                    let line = record.position().map_or(self.rows_read, |pos| pos.line());
                    batch.push(RawRow::new(line, record.iter().map(str::to_string).collect()));
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }

        Ok(batch)
    }

    /// Read all remaining rows
    ///
    /// A `batch_size` of zero is read as one.
    pub async fn read_all(&mut self, batch_size: usize) -> Result<Vec<RawRow>, ReportError> {
        let batch_size = batch_size.max(1);
        let mut rows = Vec::new();

        loop {
            let batch = self.read_batch(batch_size).await?;
            if batch.is_empty() {
                break;
            }
            rows.extend(batch);
        }

        Ok(rows)
    }
}

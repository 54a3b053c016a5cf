//! Synchronous row reader with iterator interface
//!
//! Tokenizes source bytes into raw rows. Header detection and type conversion
//! are left to the csv_format module.
//!
//! # Design
//!
//! The SyncReader wraps a headerless `csv::Reader`, so the first row reaches
//! the normalizer untouched and the header heuristic can decide about it.
//! Rows may have any number of fields; the normalizer validates them.
//!
//! ```no_run
//! use account_report_engine::io::sync_reader::SyncReader;
//!
//! let bytes = std::fs::read("424248018_transactions_report.csv").unwrap();
//! for result in SyncReader::new(&bytes[..]) {
//!     match result {
//!         Ok(row) => println!("Row: {:?}", row),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::RawRow;
use crate::types::ReportError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// Synchronous CSV row reader
#[derive(Debug)]
pub struct SyncReader<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    rows_read: u64,
}

impl<R: Read> SyncReader<R> {
    /// Create a new SyncReader over any byte source
    ///
    /// The CSV reader is configured to:
    /// - Treat every row as data (no implicit header)
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts
    pub fn new(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(source);

        Self {
            reader,
            record: StringRecord::new(),
            rows_read: 0,
        }
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<RawRow, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_read += 1;
                let line = self
                    .record
                    .position()
                    .map_or(self.rows_read, |pos| pos.line());
                let fields = self.record.iter().map(str::to_string).collect();
                Some(Ok(RawRow::new(line, fields)))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Read every row of an in-memory source
///
/// Stops at the first tokenization error.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>, ReportError> {
    SyncReader::new(bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_header_as_plain_row() {
        let rows = read_rows(b"account,date,amount,id\n123,2023-01-01 00:00:00,10.00,tx1\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["account", "date", "amount", "id"]);
        assert_eq!(rows[1].fields[3], "tx1");
    }

    #[test]
    fn test_trims_fields_and_allows_short_rows() {
        let rows = read_rows(b"  123 , 2023-01-01 00:00:00 ,  1.5 , tx1 \n123,x\n").unwrap();
        assert_eq!(rows[0].fields, vec!["123", "2023-01-01 00:00:00", "1.5", "tx1"]);
        assert_eq!(rows[1].fields.len(), 2);
    }

    #[test]
    fn test_empty_source() {
        assert!(read_rows(b"").unwrap().is_empty());
    }

    #[test]
    fn test_rows_carry_source_lines() {
        let source = b"a,b,c,d\n\n1,\"x\ny\",3,4\n5,6,7,8\n";
        let rows = read_rows(source).unwrap();

        let lines: Vec<u64> = rows.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
        assert_eq!(rows[1].fields[1], "x\ny");
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let result = read_rows(b"a,b,c,d\n123,\xff\xfe,1.0,tx1\n");
        assert!(matches!(
            result,
            Err(ReportError::MalformedRow { line: Some(2), .. })
        ));
    }
}

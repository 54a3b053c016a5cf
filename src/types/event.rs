//! Source event types
//!
//! An invocation is triggered by an object-created notification. Only the
//! container name and object key of the first record are consumed.

use super::error::ReportError;
use serde::Deserialize;

/// Identifies the source object of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    /// Bucket-like container name
    pub container: String,
    /// Object key/path within the container
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct NotificationEvent {
    #[serde(rename = "Records", default)]
    records: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    s3: StorageEntity,
}

#[derive(Debug, Deserialize)]
struct StorageEntity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

impl SourceEvent {
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Parse an object-created notification event
    ///
    /// # Errors
    ///
    /// Returns `InvalidEvent` if the JSON is malformed, has no records, or the
    /// first record lacks a bucket name or object key.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let event: NotificationEvent = serde_json::from_str(json)
            .map_err(|e| ReportError::invalid_event(format!("unreadable event: {}", e)))?;

        let record = event
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::invalid_event("event contains no records"))?;

        if record.s3.bucket.name.is_empty() || record.s3.object.key.is_empty() {
            return Err(ReportError::invalid_event(
                "event record has an empty bucket name or object key",
            ));
        }

        Ok(Self {
            container: record.s3.bucket.name,
            key: record.s3.object.key,
        })
    }

    /// Account number encoded in the object key
    pub fn account_number(&self) -> Result<String, ReportError> {
        derive_account_number(&self.key)
    }
}

/// Derive the account number from an object key
///
/// The key must consist of exactly three `_`-delimited segments
/// (`<account>_<x>_<y>`); the first segment is the account number.
///
/// # Errors
///
/// Returns `UnresolvableAccount` for any other shape, or when the first
/// segment is empty.
pub fn derive_account_number(key: &str) -> Result<String, ReportError> {
    let parts: Vec<&str> = key.split('_').collect();

    match parts.as_slice() {
        [account, _, _] if !account.is_empty() => Ok(account.to_string()),
        _ => Err(ReportError::unresolvable_account(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EVENT: &str = r#"{
        "Records": [{
            "eventSource": "aws:s3",
            "s3": {
                "bucket": {"name": "raw-csv-public-bucket", "arn": "arn:aws:s3:::example-bucket"},
                "object": {"key": "424248018_transactions_report.csv", "size": 1024}
            }
        }]
    }"#;

    #[test]
    fn test_from_json_extracts_container_and_key() {
        let event = SourceEvent::from_json(EVENT).unwrap();
        assert_eq!(event.container, "raw-csv-public-bucket");
        assert_eq!(event.key, "424248018_transactions_report.csv");
        assert_eq!(event.account_number().unwrap(), "424248018");
    }

    #[rstest]
    #[case::not_json("not json")]
    #[case::no_records(r#"{"Records": []}"#)]
    #[case::missing_records(r#"{}"#)]
    #[case::missing_key(r#"{"Records": [{"s3": {"bucket": {"name": "b"}, "object": {}}}]}"#)]
    #[case::empty_bucket(r#"{"Records": [{"s3": {"bucket": {"name": ""}, "object": {"key": "a_b_c"}}}]}"#)]
    fn test_from_json_rejects_invalid_events(#[case] json: &str) {
        let result = SourceEvent::from_json(json);
        assert!(matches!(result, Err(ReportError::InvalidEvent { .. })));
    }

    #[rstest]
    #[case::standard("424248018_transactions_report.csv", "424248018")]
    #[case::no_extension("42_a_b", "42")]
    fn test_derive_account_number(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(derive_account_number(key).unwrap(), expected);
    }

    #[rstest]
    #[case::no_underscores("bad-name.csv")]
    #[case::two_segments("424248018_report.csv")]
    #[case::four_segments("424248018_transactions_2023_report.csv")]
    #[case::empty_account("_transactions_report.csv")]
    #[case::empty_key("")]
    fn test_derive_account_number_unresolvable(#[case] key: &str) {
        assert_eq!(
            derive_account_number(key),
            Err(ReportError::unresolvable_account(key))
        );
    }
}

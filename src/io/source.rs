//! Filesystem-backed object source
//!
//! Containers are directories below a root directory, objects are files inside
//! them: `<root>/<container>/<key>`.

use crate::core::ObjectSource;
use crate::types::ReportError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Object source reading containers from a local directory tree
#[derive(Debug, Clone)]
pub struct FsObjectSource {
    root: PathBuf,
}

impl FsObjectSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the on-disk path of an object
    ///
    /// Keys may contain `/` separators but never escape the container.
    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf, ReportError> {
        let escapes = |part: &str| {
            Path::new(part)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        };

        if container.is_empty() || key.is_empty() || escapes(container) || escapes(key) {
            return Err(ReportError::source_retrieval(
                container,
                key,
                "container and key must be plain relative names",
            ));
        }

        Ok(self.root.join(container).join(key))
    }
}

impl ObjectSource for FsObjectSource {
    fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, ReportError> {
        let path = self.object_path(container, key)?;
        let bytes = fs::read(&path)
            .map_err(|e| ReportError::source_retrieval(container, key, e.to_string()))?;

        debug!(path = %path.display(), size = bytes.len(), "read source object");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_reads_object() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("raw")).unwrap();
        fs::write(root.path().join("raw").join("1_a_b.csv"), "data").unwrap();

        let source = FsObjectSource::new(root.path());
        assert_eq!(source.fetch("raw", "1_a_b.csv").unwrap(), b"data");
    }

    #[test]
    fn test_fetch_missing_object() {
        let root = TempDir::new().unwrap();
        let source = FsObjectSource::new(root.path());

        let result = source.fetch("raw", "1_a_b.csv");
        assert!(matches!(
            result,
            Err(ReportError::SourceRetrieval { ref container, ref key, .. })
                if container == "raw" && key == "1_a_b.csv"
        ));
    }

    #[rstest]
    #[case::parent_container("..", "1_a_b.csv")]
    #[case::parent_key("raw", "../1_a_b.csv")]
    #[case::absolute_key("raw", "/etc/passwd")]
    #[case::empty_key("raw", "")]
    fn test_fetch_rejects_escaping_paths(#[case] container: &str, #[case] key: &str) {
        let root = TempDir::new().unwrap();
        let source = FsObjectSource::new(root.path());
        assert!(matches!(
            source.fetch(container, key),
            Err(ReportError::SourceRetrieval { .. })
        ));
    }
}

//! Binary-level tests
//!
//! These tests run the compiled `account-report-engine` executable and check
//! its exit code, its outcome line, and what it leaves on disk.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process::{Command, Output};
    use tempfile::TempDir;

    const CONTAINER: &str = "uploads";

    struct Paths {
        _dir: TempDir,
        source_root: PathBuf,
        database: PathBuf,
        outbox: PathBuf,
    }

    fn paths() -> Paths {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let source_root = dir.path().join("objects");
        fs::create_dir_all(source_root.join(CONTAINER)).expect("Failed to create container");
        Paths {
            source_root,
            database: dir.path().join("reports.db"),
            outbox: dir.path().join("outbox"),
            _dir: dir,
        }
    }

    fn run_binary(paths: &Paths, key: &str) -> Output {
        Command::new(env!("CARGO_BIN_EXE_account-report-engine"))
            .arg("--container")
            .arg(CONTAINER)
            .arg("--key")
            .arg(key)
            .arg("--source-root")
            .arg(&paths.source_root)
            .arg("--database")
            .arg(&paths.database)
            .arg("--outbox")
            .arg(&paths.outbox)
            .arg("--retry-delay-ms")
            .arg("0")
            .env_remove("TRANSACTIONS_DB")
            .env_remove("EMAIL_NOTIFICATIONS_QUEUE_DIR")
            .env_remove("REPORT_SOURCE_ROOT")
            .output()
            .expect("Failed to run binary")
    }

    fn upload(paths: &Paths, fixture_name: &str, key: &str) {
        let input_path = format!("tests/fixtures/{}/input.csv", fixture_name);
        fs::copy(&input_path, paths.source_root.join(CONTAINER).join(key))
            .unwrap_or_else(|e| panic!("Failed to upload {}: {}", input_path, e));
    }

    #[test]
    fn test_unresolvable_key_creates_nothing() {
        let paths = paths();
        upload(&paths, "happy_path", "bad-name.csv");

        let output = run_binary(&paths, "bad-name.csv");

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("bad-name.csv"));
        assert!(!paths.database.exists(), "database was created");
        assert!(!paths.outbox.exists(), "outbox was created");
    }

    #[test]
    fn test_successful_run_exits_zero() {
        let paths = paths();
        upload(&paths, "happy_path", "424248018_transactions_report.csv");

        let output = run_binary(&paths, "424248018_transactions_report.csv");

        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("report for account 424248018 persisted"), "{}", stdout);
        assert!(paths.database.exists());
        assert_eq!(fs::read_dir(&paths.outbox).unwrap().count(), 1);
    }

    #[test]
    fn test_malformed_source_exits_one() {
        let paths = paths();
        upload(&paths, "malformed_row", "5_bad_rows.csv");

        let output = run_binary(&paths, "5_bad_rows.csv");

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("line 3"));
    }
}

//! Integration tests for the oc CLI
//!
//! These tests drive the built binary. Profile management tests run against
//! a temporary config directory; object tests additionally require an
//! S3-compatible server described by environment variables.
//!
//! Run with:
//! ```bash
//! # Point the tests at a server (e.g. a local MinIO/RustFS container)
//! export TEST_OBS_ENDPOINT=http://localhost:9000
//! export TEST_OBS_ACCESS_KEY=accesskey
//! export TEST_OBS_SECRET_KEY=secretkey
//! export TEST_OBS_BUCKET=oc-test
//!
//! cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::{Command, Output};
use tempfile::TempDir;

/// Get the path to the oc binary
fn oc_binary() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_oc") {
        return std::path::PathBuf::from(path);
    }

    // Try debug first, then release
    let debug = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/debug/oc");

    if debug.exists() {
        return debug;
    }

    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/release/oc")
}

/// Run oc with an isolated config directory
fn run_oc(args: &[&str], config_dir: &std::path::Path) -> Output {
    let mut cmd = Command::new(oc_binary());
    cmd.args(args);
    cmd.env("OC_CONFIG_DIR", config_dir);
    cmd.output().expect("Failed to execute oc command")
}

/// Get storage test configuration from environment
fn get_test_config() -> Option<(String, String, String, String)> {
    let endpoint = std::env::var("TEST_OBS_ENDPOINT").ok()?;
    let access_key = std::env::var("TEST_OBS_ACCESS_KEY").ok()?;
    let secret_key = std::env::var("TEST_OBS_SECRET_KEY").ok()?;
    let bucket = std::env::var("TEST_OBS_BUCKET").ok()?;
    Some((endpoint, access_key, secret_key, bucket))
}

/// Set up a "default" profile pointing at the test server
fn setup_with_profile() -> Option<TempDir> {
    let (endpoint, access_key, secret_key, bucket) = get_test_config()?;
    let config_dir = tempfile::tempdir().ok()?;

    let output = run_oc(
        &[
            "profile",
            "set",
            "default",
            &endpoint,
            &access_key,
            &secret_key,
            &bucket,
        ],
        config_dir.path(),
    );

    if !output.status.success() {
        eprintln!(
            "Failed to set profile: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    Some(config_dir)
}

mod profile_management {
    use super::*;

    #[test]
    fn test_profile_set_list_remove() {
        let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

        // Set a profile
        let output = run_oc(
            &[
                "profile",
                "set",
                "test",
                "obs.example.com",
                "ak",
                "sk",
                "my-bucket",
                "--json",
            ],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Failed to set profile: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        // List shows it, without the secret key
        let output = run_oc(&["profile", "list", "--json"], config_dir.path());
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("test"));
        assert!(stdout.contains("obs.example.com"));
        assert!(stdout.contains("my-bucket"));
        assert!(!stdout.contains("sk"), "Secret key leaked into listing");

        // Remove it
        let output = run_oc(&["profile", "remove", "test", "--json"], config_dir.path());
        assert!(output.status.success());

        // Removing again fails with NotFound (5)
        let output = run_oc(&["profile", "remove", "test"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_profile_set_rejects_bad_directory() {
        let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let output = run_oc(
            &[
                "profile",
                "set",
                "test",
                "obs.example.com",
                "ak",
                "sk",
                "my-bucket",
                "--directory",
                "/uploads",
            ],
            config_dir.path(),
        );
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_missing_profile_is_not_found() {
        let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let output = run_oc(
            &["get", "https://obs.example.com/bucket/key.txt"],
            config_dir.path(),
        );
        assert_eq!(output.status.code(), Some(5));
    }
}

mod object_operations {
    use super::*;

    #[test]
    fn test_put_and_get_round_trip() {
        let config_dir = match setup_with_profile() {
            Some(v) => v,
            None => {
                eprintln!("Skipping: storage test config not available");
                return;
            }
        };

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = work_dir.path().join("roundtrip.txt");
        std::fs::write(&src, "Hello, object storage!").unwrap();

        // Upload
        let output = run_oc(
            &["put", src.to_str().unwrap(), "--json"],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Failed to upload: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        // The JSON output carries the object URL
        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        let file_url = parsed["file_url"].as_str().unwrap().to_string();
        assert!(file_url.contains("roundtrip.txt"));

        // Download by that URL
        let dest = work_dir.path().join("downloaded.txt");
        let output = run_oc(
            &["get", &file_url, "-o", dest.to_str().unwrap(), "--json"],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Failed to download: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "Hello, object storage!"
        );
    }

    #[test]
    fn test_mput_uploads_batch() {
        let config_dir = match setup_with_profile() {
            Some(v) => v,
            None => {
                eprintln!("Skipping: storage test config not available");
                return;
            }
        };

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        for i in 0..3 {
            std::fs::write(work_dir.path().join(format!("file{i}.txt")), "x").unwrap();
        }

        let pattern = format!("{}/*.txt", work_dir.path().display());
        let output = run_oc(&["mput", &pattern, "--json"], config_dir.path());
        assert!(
            output.status.success(),
            "Batch upload failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(parsed["success_count"], 3);
        assert_eq!(parsed["error_count"], 0);
    }

    #[test]
    fn test_mget_reports_partial_failure() {
        let config_dir = match setup_with_profile() {
            Some(v) => v,
            None => {
                eprintln!("Skipping: storage test config not available");
                return;
            }
        };

        let (endpoint, ..) = get_test_config().unwrap();
        let host = endpoint
            .trim_start_matches("http://")
            .trim_start_matches("https://");

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = format!("{endpoint}/no-such-bucket/no-such-key.txt");
        let mismatched = format!("https://elsewhere.invalid/{host}/key.txt");

        let output = run_oc(
            &[
                "mget",
                &missing,
                &mismatched,
                "--out-dir",
                work_dir.path().to_str().unwrap(),
                "--json",
            ],
            config_dir.path(),
        );

        // Both items fail, siblings processed independently
        assert_eq!(output.status.code(), Some(6));
        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(parsed["error_count"], 2);
    }
}

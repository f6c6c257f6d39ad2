//! mput command - Upload multiple files
//!
//! Expands glob patterns, uploads each match independently, and reports a
//! per-file summary. A failed item never aborts its siblings.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use oc_core::{
    build_object_key, DirectoryStrategy, Endpoint, KeyParams, NamingStrategy, ObjectLocation,
    ObjectStore as _, SystemClock,
};
use oc_s3::StorageClient;

use super::MAX_BATCH_ITEMS;
use crate::exit_code::ExitCode;
use crate::output::{BatchProgress, Formatter, OutputConfig};

/// Upload multiple files
#[derive(Args, Debug)]
pub struct MputArgs {
    /// Files or glob patterns to upload (at most 10 files per batch)
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Profile to use
    #[arg(short = 'P', long, default_value = "default")]
    pub profile: String,

    /// Target directory within the bucket (overrides the profile default)
    #[arg(long)]
    pub directory: Option<String>,

    /// Filename mode: filename or filename_timestamp
    #[arg(long)]
    pub filename_mode: Option<String>,

    /// Directory mode: no_subdirectory, yyyy_mm_dd_hierarchy or yyyy_mm_dd_combined
    #[arg(long)]
    pub directory_mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct ItemOutput {
    status: &'static str,
    file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct MputOutput {
    status: &'static str,
    success_count: usize,
    error_count: usize,
    files: Vec<ItemOutput>,
}

/// Execute the mput command
pub async fn execute(args: MputArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let profile = match super::load_profile(&args.profile, &formatter) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let files = match expand_patterns(&args.patterns) {
        Ok(f) => f,
        Err(message) => {
            formatter.error(&message);
            return ExitCode::UsageError;
        }
    };

    if files.is_empty() {
        formatter.error("No files to upload");
        return ExitCode::UsageError;
    }

    if files.len() > MAX_BATCH_ITEMS {
        formatter.error(&format!(
            "At most {MAX_BATCH_ITEMS} files per batch ({} matched)",
            files.len()
        ));
        return ExitCode::UsageError;
    }

    let endpoint = match Endpoint::parse(&profile.endpoint) {
        Ok(ep) => ep,
        Err(e) => {
            formatter.error(&format!("Invalid endpoint '{}': {e}", profile.endpoint));
            return ExitCode::from_error(&e);
        }
    };

    let client = match StorageClient::new(&profile).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            return ExitCode::NetworkError;
        }
    };

    let naming = NamingStrategy::from_flag(
        args.filename_mode.as_deref().unwrap_or(&profile.filename_mode),
    );
    let layout = DirectoryStrategy::from_flag(
        args.directory_mode
            .as_deref()
            .unwrap_or(&profile.directory_mode),
    );
    let directory = args.directory.as_deref().unwrap_or(&profile.directory);

    let progress = BatchProgress::new(&output_config, files.len() as u64);
    let mut results = Vec::with_capacity(files.len());

    for file in &files {
        let display_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());

        let result = upload_one(
            &client, &endpoint, &profile.bucket, file, directory, naming, layout,
        )
        .await;

        results.push(match result {
            Ok(item) => item,
            Err(error) => ItemOutput {
                status: "error",
                file_name: display_name.clone(),
                size_bytes: None,
                file_type: None,
                file_url: None,
                error: Some(error),
            },
        });
        progress.tick(&display_name);
    }
    progress.finish();

    let success_count = results.iter().filter(|r| r.status == "success").count();
    let error_count = results.len() - success_count;

    if formatter.is_json() {
        let output = MputOutput {
            status: "completed",
            success_count,
            error_count,
            files: results,
        };
        formatter.json(&output);
    } else {
        formatter.println("Batch upload complete");
        formatter.println(&format!("Succeeded: {success_count} file(s)"));
        formatter.println(&format!("Failed: {error_count} file(s)"));

        if success_count > 0 {
            formatter.println("");
            formatter.println("Uploaded files:");
            for result in results.iter().filter(|r| r.status == "success") {
                formatter.println(&format!(
                    "- {} ({} bytes, {})",
                    result.file_name,
                    result.size_bytes.unwrap_or(0),
                    result.file_type.as_deref().unwrap_or("unknown"),
                ));
            }
        }

        if error_count > 0 {
            formatter.println("");
            formatter.println("Failed files:");
            for result in results.iter().filter(|r| r.status == "error") {
                formatter.println(&format!(
                    "- {}: {}",
                    result.file_name,
                    result.error.as_deref().unwrap_or("unknown error"),
                ));
            }
        }
    }

    if error_count > 0 {
        ExitCode::PartialFailure
    } else {
        ExitCode::Success
    }
}

async fn upload_one(
    client: &StorageClient,
    endpoint: &Endpoint,
    bucket: &str,
    file: &std::path::Path,
    directory: &str,
    naming: NamingStrategy,
    layout: DirectoryStrategy,
) -> Result<ItemOutput, String> {
    let data = std::fs::read(file).map_err(|e| format!("failed to read file: {e}"))?;

    let source_name = file.file_name().map(|n| n.to_string_lossy());
    let params = KeyParams {
        source_name: source_name.as_deref(),
        explicit_name: None,
        directory,
        naming,
        layout,
    };
    let key = build_object_key(&params, &SystemClock);
    let location = ObjectLocation::new(bucket, &key);

    let content_type: Option<String> = mime_guess::from_path(file)
        .first()
        .map(|m| m.essence_str().to_string());

    let info = client
        .put_object(&location, data, content_type.as_deref())
        .await
        .map_err(|e| e.to_string())?;

    Ok(ItemOutput {
        status: "success",
        file_name: location.base_name().to_string(),
        size_bytes: Some(info.size_bytes),
        file_type: content_type,
        file_url: Some(endpoint.object_url(bucket, &key)),
        error: None,
    })
}

/// Expand glob patterns into a file list.
///
/// A pattern that matches nothing is an error rather than a silent no-op, so
/// a typo doesn't look like a successful empty batch.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for pattern in patterns {
        let entries =
            glob::glob(pattern).map_err(|e| format!("Invalid pattern '{pattern}': {e}"))?;

        let mut matched = false;
        for entry in entries {
            let path = entry.map_err(|e| format!("Failed to read '{pattern}': {e}"))?;
            if path.is_file() {
                files.push(path);
            }
            matched = true;
        }

        if !matched {
            return Err(format!("No files match '{pattern}'"));
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_patterns_literal_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let files = expand_patterns(&[file.to_string_lossy().to_string()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_expand_patterns_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::write(dir.path().join("b.txt"), "x").unwrap();
        std::fs::write(dir.path().join("c.log"), "x").unwrap();

        let pattern = format!("{}/*.txt", dir.path().display());
        let files = expand_patterns(&[pattern]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_expand_patterns_no_match_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.none", dir.path().display());
        let result = expand_patterns(&[pattern]);
        assert!(result.is_err());
    }
}

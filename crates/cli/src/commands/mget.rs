//! mget command - Fetch multiple stored files by URL
//!
//! URL lists may be given as separate arguments or as a single
//! `;`-separated string. Each URL is processed independently; one bad URL
//! only fails that item.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use oc_core::{key::file_extension, mime_for, resolve_object_url, Endpoint, ObjectStore as _};
use oc_s3::StorageClient;

use super::MAX_BATCH_ITEMS;
use crate::exit_code::ExitCode;
use crate::output::{BatchProgress, Formatter, OutputConfig};

/// Fallback content type when the service reports none
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fetch multiple stored files by URL
#[derive(Args, Debug)]
pub struct MgetArgs {
    /// Object URLs, separate arguments or `;`-separated (at most 10)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Profile to use
    #[arg(short = 'P', long, default_value = "default")]
    pub profile: String,

    /// Directory to save files into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct ItemOutput {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_size_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_size_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<String>,
    file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct MgetOutput {
    status: &'static str,
    success_count: usize,
    error_count: usize,
    files: Vec<ItemOutput>,
}

/// Execute the mget command
pub async fn execute(args: MgetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let urls = split_urls(&args.urls);
    if urls.is_empty() {
        formatter.error("No URLs to fetch");
        return ExitCode::UsageError;
    }

    if urls.len() > MAX_BATCH_ITEMS {
        formatter.error(&format!(
            "At most {MAX_BATCH_ITEMS} URLs per batch ({} given)",
            urls.len()
        ));
        return ExitCode::UsageError;
    }

    let profile = match super::load_profile(&args.profile, &formatter) {
        Ok(p) => p,
        Err(code) => return code,
    };

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

    let progress = BatchProgress::new(&output_config, urls.len() as u64);
    let mut results = Vec::with_capacity(urls.len());

    for url in &urls {
        let result = fetch_one(&client, &endpoint, url, &args.out_dir).await;
        results.push(match result {
            Ok(item) => item,
            Err(error) => ItemOutput {
                status: "error",
                file_name: None,
                file_size_bytes: None,
                file_size_mb: None,
                file_type: None,
                file_url: url.clone(),
                error: Some(error),
            },
        });
        progress.tick(url);
    }
    progress.finish();

    let success_count = results.iter().filter(|r| r.status == "success").count();
    let error_count = results.len() - success_count;

    if formatter.is_json() {
        let output = MgetOutput {
            status: "completed",
            success_count,
            error_count,
            files: results,
        };
        formatter.json(&output);
    } else {
        formatter.println("Batch download complete");
        formatter.println(&format!("Succeeded: {success_count} file(s)"));
        formatter.println(&format!("Failed: {error_count} file(s)"));

        if success_count > 0 {
            formatter.println("");
            formatter.println("Downloaded files:");
            for result in results.iter().filter(|r| r.status == "success") {
                formatter.println(&format!(
                    "- File name: {}",
                    result.file_name.as_deref().unwrap_or("unknown")
                ));
                formatter.println(&format!(
                    "  File size: {} MB ({} bytes)",
                    result.file_size_mb.unwrap_or(0.0),
                    result.file_size_bytes.unwrap_or(0)
                ));
                formatter.println(&format!(
                    "  File type: {}",
                    result.file_type.as_deref().unwrap_or("unknown")
                ));
                formatter.println(&format!("  File URL: {}", result.file_url));
            }
        }

        if error_count > 0 {
            formatter.println("");
            formatter.println("Failed files:");
            for result in results.iter().filter(|r| r.status == "error") {
                formatter.println(&format!(
                    "- {}: {}",
                    result.file_url,
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

async fn fetch_one(
    client: &StorageClient,
    endpoint: &Endpoint,
    url: &str,
    out_dir: &std::path::Path,
) -> Result<ItemOutput, String> {
    let location = resolve_object_url(endpoint, url).map_err(|e| e.to_string())?;

    let data = client
        .get_object(&location)
        .await
        .map_err(|e| e.to_string())?;

    let file_name = location.base_name().to_string();
    let file_type = mime_for(
        file_extension(&file_name).unwrap_or_default(),
        data.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE),
    );

    let dest = out_dir.join(&file_name);
    super::get::write_local(&dest, &data.bytes).map_err(|e| format!("failed to write file: {e}"))?;

    let size = data.bytes.len();
    Ok(ItemOutput {
        status: "success",
        file_name: Some(file_name),
        file_size_bytes: Some(size),
        file_size_mb: Some(size_mb(size)),
        file_type: Some(file_type),
        file_url: url.to_string(),
        error: None,
    })
}

/// Size in megabytes, rounded to two decimals
fn size_mb(bytes: usize) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Split URL arguments on `;`, trimming whitespace and dropping empties
fn split_urls(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(';'))
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_urls_separate_args() {
        let urls = split_urls(&["https://a/b/c".into(), "https://a/b/d".into()]);
        assert_eq!(urls, vec!["https://a/b/c", "https://a/b/d"]);
    }

    #[test]
    fn test_split_urls_semicolon_list() {
        let urls = split_urls(&["https://a/b/c; https://a/b/d ;".into()]);
        assert_eq!(urls, vec!["https://a/b/c", "https://a/b/d"]);
    }

    #[test]
    fn test_split_urls_drops_empty() {
        let urls = split_urls(&[";;".into(), "  ".into()]);
        assert!(urls.is_empty());
    }

    #[test]
    fn test_size_mb_rounding() {
        assert_eq!(size_mb(1024 * 1024), 1.0);
        assert_eq!(size_mb(1536 * 1024), 1.5);
        assert_eq!(size_mb(0), 0.0);
    }
}

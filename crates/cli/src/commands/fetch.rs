//! fetch command - Download a public file by URL
//!
//! Plain HTTP GET without storage credentials. The content type from the
//! response headers is corrected from the file extension.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use oc_core::{key::file_extension, mime_for};
use oc_s3::fetch_public;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Fallback content type when the response carries none
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Name used when the URL path has no file name to borrow
const FALLBACK_FILE_NAME: &str = "downloaded_file";

/// Download a public file by URL
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// File URL
    pub url: String,

    /// Output file or directory (defaults to the URL's base name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FetchOutput {
    status: &'static str,
    file_name: String,
    size_bytes: usize,
    file_size_mb: f64,
    file_type: String,
    source_url: String,
    saved_to: String,
}

/// Execute the fetch command
pub async fn execute(args: FetchArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let file_name = match url_base_name(&args.url) {
        Ok(name) => name,
        Err(e) => {
            formatter.error(&format!("Invalid URL '{}': {e}", args.url));
            return ExitCode::UsageError;
        }
    };

    let data = match fetch_public(&args.url).await {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("Failed to download {}: {e}", args.url));
            return ExitCode::from_error(&e);
        }
    };

    let file_type = mime_for(
        file_extension(&file_name).unwrap_or_default(),
        data.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE),
    );

    let dest = match &args.output {
        Some(path) if path.is_dir() => path.join(&file_name),
        Some(path) => path.clone(),
        None => PathBuf::from(&file_name),
    };

    if let Err(e) = super::get::write_local(&dest, &data.bytes) {
        formatter.error(&format!("Failed to write {}: {e}", dest.display()));
        return ExitCode::GeneralError;
    }

    let size = data.bytes.len();
    let size_mb = (size as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;

    if formatter.is_json() {
        let output = FetchOutput {
            status: "success",
            file_name,
            size_bytes: size,
            file_size_mb: size_mb,
            file_type,
            source_url: args.url.clone(),
            saved_to: dest.display().to_string(),
        };
        formatter.json(&output);
    } else {
        formatter.success(&format!("File downloaded successfully: {file_name}"));
        formatter.println(&format!("File size: {size_mb} MB ({size} bytes)"));
        formatter.println(&format!("File type: {file_type}"));
        formatter.println(&format!("Source URL: {}", args.url));
        formatter.println(&format!("Saved to: {}", dest.display()));
    }

    ExitCode::Success
}

/// Base name of a URL's path, or a fallback when the path has none
fn url_base_name(raw_url: &str) -> Result<String, url::ParseError> {
    let url = url::Url::parse(raw_url)?;
    let name = url
        .path()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    if name.is_empty() {
        Ok(FALLBACK_FILE_NAME.to_string())
    } else {
        Ok(name)
    }
}

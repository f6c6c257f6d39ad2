//! get command - Fetch a stored file by its URL
//!
//! Resolves the URL against the profile's endpoint (path-style or
//! virtual-host-style), downloads the object, and writes it locally with a
//! content type corrected from the file extension.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use oc_core::{key::file_extension, mime_for, resolve_object_url, Endpoint, ObjectStore as _};
use oc_s3::StorageClient;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Fallback content type when the service reports none
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fetch a stored file by its URL
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object URL (path-style or virtual-host-style)
    pub url: String,

    /// Profile to use
    #[arg(short = 'P', long, default_value = "default")]
    pub profile: String,

    /// Output file or directory (defaults to the object's base name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    file_name: String,
    size_bytes: usize,
    size_human: String,
    file_type: String,
    saved_to: String,
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

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

    let location = match resolve_object_url(&endpoint, &args.url) {
        Ok(loc) => loc,
        Err(e) => {
            formatter.error(&e.to_string());
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

    let data = match client.get_object(&location).await {
        Ok(d) => d,
        Err(e) => {
            let err_str = e.to_string();
            if err_str.contains("AccessDenied") {
                formatter.error(&format!("Access denied: {}", args.url));
                return ExitCode::AuthError;
            }
            formatter.error(&format!("Failed to get {}: {e}", args.url));
            return ExitCode::from_error(&e);
        }
    };

    let file_name = location.base_name().to_string();
    let file_type = mime_for(
        file_extension(&file_name).unwrap_or_default(),
        data.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE),
    );

    let dest = match &args.output {
        Some(path) if path.is_dir() => path.join(&file_name),
        Some(path) => path.clone(),
        None => PathBuf::from(&file_name),
    };

    if let Err(e) = write_local(&dest, &data.bytes) {
        formatter.error(&format!("Failed to write {}: {e}", dest.display()));
        return ExitCode::GeneralError;
    }

    let size = data.bytes.len();
    if formatter.is_json() {
        let output = GetOutput {
            status: "success",
            file_name,
            size_bytes: size,
            size_human: humansize::format_size(size as u64, humansize::BINARY),
            file_type,
            saved_to: dest.display().to_string(),
        };
        formatter.json(&output);
    } else {
        formatter.success(&format!("File downloaded successfully: {file_name}"));
        formatter.println(&format!(
            "File size: {} bytes ({})",
            size,
            humansize::format_size(size as u64, humansize::BINARY)
        ));
        formatter.println(&format!("File type: {file_type}"));
        formatter.println(&format!("Saved to: {}", dest.display()));
    }

    ExitCode::Success
}

/// Write bytes to a local path, creating parent directories as needed
pub(super) fn write_local(dest: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(dest, bytes)
}

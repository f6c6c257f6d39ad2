//! put command - Upload a file
//!
//! Reads a local file, derives its object key from the configured naming and
//! directory modes, and uploads it to the profile's bucket.

use clap::Args;
use serde::Serialize;

use oc_core::{
    build_object_key, DirectoryStrategy, Endpoint, KeyParams, NamingStrategy, ObjectLocation,
    ObjectStore as _, SystemClock,
};
use oc_s3::StorageClient;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub file: std::path::PathBuf,

    /// Profile to use
    #[arg(short = 'P', long, default_value = "default")]
    pub profile: String,

    /// Target directory within the bucket (overrides the profile default)
    #[arg(long)]
    pub directory: Option<String>,

    /// Object name override (extension appended when missing)
    #[arg(long)]
    pub filename: Option<String>,

    /// Filename mode: filename or filename_timestamp
    #[arg(long)]
    pub filename_mode: Option<String>,

    /// Directory mode: no_subdirectory, yyyy_mm_dd_hierarchy or yyyy_mm_dd_combined
    #[arg(long)]
    pub directory_mode: Option<String>,

    /// Content type for the uploaded file (guessed from the path by default)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    file_name: String,
    size_bytes: i64,
    size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<String>,
    file_url: String,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let profile = match super::load_profile(&args.profile, &formatter) {
        Ok(p) => p,
        Err(code) => return code,
    };

    if !args.file.is_file() {
        formatter.error(&format!("File not found: {}", args.file.display()));
        return ExitCode::NotFound;
    }

    let data = match std::fs::read(&args.file) {
        Ok(d) => d,
        Err(e) => {
            formatter.error(&format!("Failed to read {}: {e}", args.file.display()));
            return ExitCode::GeneralError;
        }
    };

    let endpoint = match Endpoint::parse(&profile.endpoint) {
        Ok(ep) => ep,
        Err(e) => {
            formatter.error(&format!("Invalid endpoint '{}': {e}", profile.endpoint));
            return ExitCode::from_error(&e);
        }
    };

    let source_name = args.file.file_name().map(|n| n.to_string_lossy());
    let params = KeyParams {
        source_name: source_name.as_deref(),
        explicit_name: args.filename.as_deref(),
        directory: args.directory.as_deref().unwrap_or(&profile.directory),
        naming: NamingStrategy::from_flag(
            args.filename_mode.as_deref().unwrap_or(&profile.filename_mode),
        ),
        layout: DirectoryStrategy::from_flag(
            args.directory_mode
                .as_deref()
                .unwrap_or(&profile.directory_mode),
        ),
    };
    let key = build_object_key(&params, &SystemClock);
    let location = ObjectLocation::new(&profile.bucket, &key);

    let guessed_type: Option<String> = mime_guess::from_path(&args.file)
        .first()
        .map(|m| m.essence_str().to_string());
    let content_type = args.content_type.as_deref().or(guessed_type.as_deref());

    let client = match StorageClient::new(&profile).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            return ExitCode::NetworkError;
        }
    };

    match client
        .put_object(&location, data, content_type)
        .await
    {
        Ok(info) => {
            let file_url = endpoint.object_url(&profile.bucket, &key);
            if formatter.is_json() {
                let output = PutOutput {
                    status: "success",
                    file_name: location.base_name().to_string(),
                    size_bytes: info.size_bytes,
                    size_human: info.size_human,
                    file_type: content_type.map(|ct| ct.to_string()),
                    file_url,
                };
                formatter.json(&output);
            } else {
                formatter.success("File uploaded successfully");
                formatter.println(&format!("File name: {}", location.base_name()));
                formatter.println(&format!(
                    "File size: {} bytes ({})",
                    info.size_bytes, info.size_human
                ));
                if let Some(ct) = content_type {
                    formatter.println(&format!("File type: {ct}"));
                }
                formatter.println(&format!("File URL: {file_url}"));
            }
            ExitCode::Success
        }
        Err(e) => {
            let err_str = e.to_string();
            if err_str.contains("AccessDenied") {
                formatter.error(&format!("Access denied uploading {key}"));
                ExitCode::AuthError
            } else {
                formatter.error(&format!("Failed to upload {key}: {e}"));
                ExitCode::from_error(&e)
            }
        }
    }
}

//! Profile management commands
//!
//! Profiles are named credential sets for an object-storage endpoint:
//! connection details, the target bucket, and default upload conventions.
//! `verify` checks the credentials against the live service.

use clap::Subcommand;
use serde::Serialize;

use oc_core::{Error, ObjectStore as _, Profile, ProfileManager};
use oc_s3::StorageClient;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands for managing storage credentials
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),

    /// Verify a profile against the live service
    Verify(VerifyArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "default", "prod")
    pub name: String,

    /// Service endpoint (e.g., "obs.cn-north-4.myhuaweicloud.com")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Target bucket for uploads
    pub bucket: String,

    /// Region passed to the SDK
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Default upload directory
    #[arg(long, default_value = "")]
    pub directory: String,

    /// Default filename mode: filename or filename_timestamp
    #[arg(long, default_value = "filename")]
    pub filename_mode: String,

    /// Default directory mode: no_subdirectory, yyyy_mm_dd_hierarchy or yyyy_mm_dd_combined
    #[arg(long, default_value = "no_subdirectory")]
    pub directory_mode: String,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including defaults
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// Arguments for the `profile verify` command
#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    /// Name of the profile to verify
    #[arg(default_value = "default")]
    pub name: String,
}

/// JSON output for profile list
#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

/// Profile information for JSON output (without secrets)
#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    endpoint: String,
    bucket: String,
    region: String,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            endpoint: profile.endpoint.clone(),
            bucket: profile.bucket.clone(),
            region: profile.region.clone(),
        }
    }
}

/// JSON output for profile set/remove/verify operations
#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to load profiles: {e}"));
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        ProfileCommands::Set(args) => set(args, &manager, &formatter),
        ProfileCommands::List(args) => list(args, &manager, &formatter),
        ProfileCommands::Remove(args) => remove(args, &manager, &formatter),
        ProfileCommands::Verify(args) => verify(args, &manager, &formatter).await,
    }
}

fn set(args: SetArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let mut profile = Profile::new(
        &args.name,
        &args.endpoint,
        &args.access_key,
        &args.secret_key,
        &args.bucket,
    );
    profile.region = args.region;
    profile.directory = args.directory;
    profile.filename_mode = args.filename_mode;
    profile.directory_mode = args.directory_mode;

    if let Err(e) = profile.validate() {
        formatter.error(&e.to_string());
        return ExitCode::from_error(&e);
    }

    if let Err(e) = manager.set(profile) {
        formatter.error(&format!("Failed to save profile: {e}"));
        return ExitCode::GeneralError;
    }

    if formatter.is_json() {
        formatter.json(&ProfileOperationOutput {
            success: true,
            profile: args.name.clone(),
            message: "profile saved".into(),
        });
    } else {
        formatter.success(&format!("Profile '{}' saved", args.name));
    }
    ExitCode::Success
}

fn list(args: ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profiles = match manager.list() {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&format!("Failed to list profiles: {e}"));
            return ExitCode::GeneralError;
        }
    };

    if formatter.is_json() {
        formatter.json(&ProfileListOutput {
            profiles: profiles.iter().map(ProfileInfo::from).collect(),
        });
        return ExitCode::Success;
    }

    if profiles.is_empty() {
        formatter.println("No profiles configured. Add one with: oc profile set");
        return ExitCode::Success;
    }

    for profile in &profiles {
        if args.long {
            formatter.println(&format!(
                "{}\n  endpoint: {}\n  bucket: {}\n  region: {}\n  directory: {}\n  filename_mode: {}\n  directory_mode: {}",
                profile.name,
                profile.endpoint,
                profile.bucket,
                profile.region,
                if profile.directory.is_empty() { "(none)" } else { &profile.directory },
                profile.filename_mode,
                profile.directory_mode,
            ));
        } else {
            formatter.println(&format!(
                "{} -> {}/{}",
                profile.name, profile.endpoint, profile.bucket
            ));
        }
    }
    ExitCode::Success
}

fn remove(args: RemoveArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name.clone(),
                    message: "profile removed".into(),
                });
            } else {
                formatter.success(&format!("Profile '{}' removed", args.name));
            }
            ExitCode::Success
        }
        Err(Error::ProfileNotFound(name)) => {
            formatter.error(&format!("Profile '{name}' not found"));
            ExitCode::NotFound
        }
        Err(e) => {
            formatter.error(&format!("Failed to remove profile: {e}"));
            ExitCode::GeneralError
        }
    }
}

async fn verify(args: VerifyArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profile = match manager.get(&args.name) {
        Ok(p) => p,
        Err(_) => {
            formatter.error(&format!("Profile '{}' not found", args.name));
            return ExitCode::NotFound;
        }
    };

    if let Err(e) = profile.validate() {
        formatter.error(&format!("Profile '{}' is incomplete: {e}", args.name));
        return ExitCode::from_error(&e);
    }

    let client = match StorageClient::new(&profile).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            return ExitCode::NetworkError;
        }
    };

    match client.bucket_exists(&profile.bucket).await {
        Ok(true) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name.clone(),
                    message: format!("bucket '{}' is accessible", profile.bucket),
                });
            } else {
                formatter.success(&format!(
                    "Credentials verified: bucket '{}' is accessible",
                    profile.bucket
                ));
            }
            ExitCode::Success
        }
        Ok(false) => {
            formatter.error(&format!("Bucket not found: {}", profile.bucket));
            ExitCode::NotFound
        }
        Err(Error::Auth(_)) => {
            formatter.error("Invalid access key or secret key");
            ExitCode::AuthError
        }
        Err(e) => {
            formatter.error(&format!("Verification failed: {e}"));
            ExitCode::NetworkError
        }
    }
}

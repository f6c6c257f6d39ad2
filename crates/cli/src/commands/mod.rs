//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations. Each
//! tool command loads a credential profile, validates it, and talks to the
//! storage service through the oc-s3 adapter.

use clap::{Parser, Subcommand};

use oc_core::{Profile, ProfileManager};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod fetch;
mod get;
mod mget;
mod mput;
mod profile;
mod put;

/// Maximum number of items a single batch command will process
pub const MAX_BATCH_ITEMS: usize = 10;

/// oc - OBS/S3 file tool CLI
///
/// Uploads and fetches files on OBS/S3-compatible object storage, plus
/// public-URL downloads.
#[derive(Parser, Debug)]
#[command(name = "oc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indication
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage credential profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Upload a file
    Put(put::PutArgs),

    /// Upload multiple files
    Mput(mput::MputArgs),

    /// Fetch a stored file by its URL
    Get(get::GetArgs),

    /// Fetch multiple stored files by URL
    Mget(mget::MgetArgs),

    /// Download a public file by URL
    Fetch(fetch::FetchArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Profile(cmd) => profile::execute(cmd, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Mput(args) => mput::execute(args, output_config).await,
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Mget(args) => mget::execute(args, output_config).await,
        Commands::Fetch(args) => fetch::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Load a profile by name and check it is usable for storage operations.
///
/// On failure the error is already printed; the caller just returns the
/// exit code.
fn load_profile(name: &str, formatter: &Formatter) -> Result<Profile, ExitCode> {
    let manager = match ProfileManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to load profiles: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };

    let profile = match manager.get(name) {
        Ok(p) => p,
        Err(_) => {
            formatter.error(&format!(
                "Profile '{name}' not found. Configure one with: oc profile set"
            ));
            return Err(ExitCode::NotFound);
        }
    };

    if let Err(e) = profile.validate() {
        formatter.error(&format!("Profile '{name}' is incomplete: {e}"));
        return Err(ExitCode::from_error(&e));
    }

    tracing::debug!(profile = name, endpoint = %profile.endpoint, "profile loaded");
    Ok(profile)
}

//! Credential profile management
//!
//! Profiles are named credential sets for an object-storage service:
//! endpoint, access keys, target bucket, and the default upload conventions.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// A named credential set for an OBS/S3-compatible endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Service endpoint, scheme optional (e.g. "obs.cn-north-4.example.com")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Target bucket for uploads
    pub bucket: String,

    /// Region passed to the SDK
    #[serde(default = "default_region")]
    pub region: String,

    /// Default upload directory, possibly empty
    #[serde(default)]
    pub directory: String,

    /// Default filename mode: "filename" or "filename_timestamp"
    #[serde(default = "default_filename_mode")]
    pub filename_mode: String,

    /// Default directory mode: "no_subdirectory", "yyyy_mm_dd_hierarchy",
    /// or "yyyy_mm_dd_combined"
    #[serde(default = "default_directory_mode")]
    pub directory_mode: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_filename_mode() -> String {
    "filename".to_string()
}

fn default_directory_mode() -> String {
    "no_subdirectory".to_string()
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            bucket: bucket.into(),
            region: default_region(),
            directory: String::new(),
            filename_mode: default_filename_mode(),
            directory_mode: default_directory_mode(),
        }
    }

    /// Check that the profile is usable for storage operations.
    ///
    /// The four credential fields must be non-empty, and the default
    /// directory must not start with a space, `/`, or `\`.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("endpoint", &self.endpoint),
            ("bucket", &self.bucket),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{field} must not be empty")));
            }
        }

        if self.directory.starts_with([' ', '/', '\\']) {
            return Err(Error::Config(
                "directory must not start with a space, '/' or '\\'".into(),
            ));
        }

        Ok(())
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }
}

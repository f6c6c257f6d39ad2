//! Error types for oc-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for oc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for oc-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration field missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object URL could not be resolved against the configured endpoint
    #[error("URL parse error: {0}")]
    UrlParse(String),

    /// URL syntax error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,                  // UsageError
            Error::UrlParse(_) => 2,                // UsageError
            Error::InvalidUrl(_) => 2,              // UsageError
            Error::Network(_) => 3,                 // NetworkError
            Error::Auth(_) => 4,                    // AuthError
            Error::NotFound(_) => 5,                // NotFound
            Error::ProfileNotFound(_) => 5,         // NotFound
            _ => 1,                                 // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::UrlParse("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::ProfileNotFound("obs".into());
        assert_eq!(err.to_string(), "Profile not found: obs");

        let err = Error::UrlParse("host mismatch".into());
        assert_eq!(err.to_string(), "URL parse error: host mismatch");
    }
}

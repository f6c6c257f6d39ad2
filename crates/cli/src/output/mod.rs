//! Output formatting utilities
//!
//! Formatters for CLI output in both human-readable and JSON formats, plus
//! the progress indicator used by the batch commands.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::BatchProgress;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress indication
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

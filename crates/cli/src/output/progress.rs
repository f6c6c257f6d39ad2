//! Progress indication for batch operations
//!
//! The batch commands process up to ten items per invocation; the indicator
//! counts items rather than bytes. In quiet or JSON mode, progress is
//! suppressed.

use super::OutputConfig;

/// Item-counting progress bar for batch uploads and downloads
#[derive(Debug)]
pub struct BatchProgress {
    bar: Option<indicatif::ProgressBar>,
}

impl BatchProgress {
    /// Create a progress bar over `total` items
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        let bar = if config.quiet || config.json || config.no_progress {
            None
        } else {
            let bar = indicatif::ProgressBar::new(total);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                    .expect("valid template")
                    .progress_chars("#>-"),
            );
            Some(bar)
        };

        Self { bar }
    }

    /// Record one completed item
    pub fn tick(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_suppressed_in_json_mode() {
        let config = OutputConfig {
            json: true,
            ..Default::default()
        };
        let progress = BatchProgress::new(&config, 5);
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_progress_suppressed_when_disabled() {
        let config = OutputConfig {
            no_progress: true,
            ..Default::default()
        };
        let progress = BatchProgress::new(&config, 5);
        assert!(progress.bar.is_none());
    }
}

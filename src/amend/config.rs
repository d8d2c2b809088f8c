//! Amendment session configuration
//!
//! Configuration options for an `AmendmentLoop`.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default pause between two scans
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for an amendment session
///
/// Use the builder pattern to configure the session:
///
/// ```ignore
/// let config = AmendConfig::new("policy.yaml")
///     .with_scan_interval(Duration::from_millis(500))
///     .with_timeout(Duration::from_secs(30))
///     .with_output_path("amended.yaml");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AmendConfig {
    /// Policy file loaded at session start
    pub policy_path: PathBuf,

    /// Where the amended policy is written (defaults to `policy_path`)
    pub output_path: Option<PathBuf>,

    /// Pause between two scans
    pub scan_interval: Duration,

    /// Session length; `None` runs until cancelled
    pub timeout: Option<Duration>,
}

impl AmendConfig {
    /// Create a configuration for the given policy file
    pub fn new(policy_path: impl Into<PathBuf>) -> Self {
        Self {
            policy_path: policy_path.into(),
            output_path: None,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            timeout: None,
        }
    }

    /// Set the pause between scans
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    /// Set the session time-out
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Write the amended policy somewhere other than the source file
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Destination of the amended policy
    pub fn save_path(&self) -> &Path {
        self.output_path.as_deref().unwrap_or(&self.policy_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AmendConfig::new("policy.yaml");
        assert_eq!(config.scan_interval, DEFAULT_SCAN_INTERVAL);
        assert_eq!(config.timeout, None);
        assert_eq!(config.save_path(), Path::new("policy.yaml"));
    }

    #[test]
    fn test_builder() {
        let config = AmendConfig::new("policy.yaml")
            .with_scan_interval(Duration::from_millis(250))
            .with_timeout(Duration::from_secs(5))
            .with_output_path("out.json");
        assert_eq!(config.scan_interval, Duration::from_millis(250));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.save_path(), Path::new("out.json"));
    }
}

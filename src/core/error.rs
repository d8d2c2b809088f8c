//! Amendment engine error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while amending a policy
#[derive(Error, Debug)]
pub enum AmendError {
    /// Policy file does not exist
    #[error("Package policy file not found: {}", .0.display())]
    PolicyFileNotFound(PathBuf),

    /// Policy file exists but could not be parsed or validated
    #[error("Package policy file not valid: {}: {reason}", .path.display())]
    PolicyFileInvalid {
        /// Path of the offending file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Writing the amended policy failed
    #[error("Failed to save policy file {}: {source}", .path.display())]
    PolicySave {
        /// Destination path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// The topology observer could not be queried
    #[error("Topology query failed: {0}")]
    TopologyQuery(String),

    /// Operator answered something other than yes/no
    #[error("Invalid operator input: {0:?}")]
    InvalidOperatorInput(String),

    /// Operator input stream reached end of file
    #[error("Operator input closed")]
    InputClosed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AmendError {
    /// Create a policy-invalid error for the given path
    pub fn invalid_policy(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AmendError::PolicyFileInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AmendError::PolicyFileNotFound(_) => 2,
            AmendError::PolicyFileInvalid { .. } => 3,
            AmendError::InvalidConfig(_) => 4,
            _ => 1,
        }
    }
}

/// Result type alias for amendment operations
pub type AmendResult<T> = Result<T, AmendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AmendError::PolicyFileNotFound(PathBuf::from("bar.yaml"));
        assert_eq!(err.to_string(), "Package policy file not found: bar.yaml");

        let err = AmendError::invalid_policy("policy.json", "missing profiles");
        assert_eq!(
            err.to_string(),
            "Package policy file not valid: policy.json: missing profiles"
        );

        let err = AmendError::InputClosed;
        assert_eq!(err.to_string(), "Operator input closed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let amend_err: AmendError = io_err.into();
        assert!(matches!(amend_err, AmendError::Io(_)));
    }

    #[test]
    fn test_exit_codes_are_distinct_for_startup_failures() {
        let not_found = AmendError::PolicyFileNotFound(PathBuf::from("a"));
        let invalid = AmendError::invalid_policy("a", "b");
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(invalid.exit_code(), 3);
        assert_eq!(AmendError::InputClosed.exit_code(), 1);
    }
}

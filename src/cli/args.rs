//! Command line arguments for `amend-policy`

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::amend::AmendConfig;
use crate::core::{AmendError, AmendResult};

/// Interactively add missing permissions to a policy file.
///
/// Watches the communication graph and asks, for every interaction the
/// policy does not already allow, whether it should be allowed.
#[derive(Parser, Debug, Clone)]
#[command(name = "amend-policy", version, about)]
pub struct AmendPolicyArgs {
    /// Path of the policy file (.json, .yaml or .yml)
    #[arg(value_name = "POLICY_FILE_PATH")]
    pub policy_file: PathBuf,

    /// Graph snapshot describing live nodes; re-read at every scan
    #[arg(long, short = 'g', value_name = "SNAPSHOT")]
    pub graph: PathBuf,

    /// Seconds between two scans
    #[arg(long, short = 'r', value_name = "SECONDS", default_value_t = 1.0)]
    pub rate: f64,

    /// Seconds to monitor before finishing (runs until interrupted if omitted)
    #[arg(long = "time-out", short = 't', value_name = "SECONDS")]
    pub time_out: Option<f64>,

    /// Write the amended policy here instead of over the input file
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AmendPolicyArgs {
    /// Build the session configuration
    pub fn to_config(&self) -> AmendResult<AmendConfig> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(AmendError::InvalidConfig(format!(
                "--rate must be a positive number of seconds, got {}",
                self.rate
            )));
        }

        let mut config = AmendConfig::new(&self.policy_file)
            .with_scan_interval(Duration::from_secs_f64(self.rate));

        if let Some(time_out) = self.time_out {
            if !time_out.is_finite() || time_out < 0.0 {
                return Err(AmendError::InvalidConfig(format!(
                    "--time-out must be a non-negative number of seconds, got {}",
                    time_out
                )));
            }
            config = config.with_timeout(Duration::from_secs_f64(time_out));
        }

        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }

        Ok(config)
    }
}

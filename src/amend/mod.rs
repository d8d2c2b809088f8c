//! Amendment session
//!
//! - `AmendConfig` - builder-style session configuration
//! - `AmendmentLoop` - the scan/prompt/sleep state machine

pub mod config;
pub mod controller;

pub use config::{AmendConfig, DEFAULT_SCAN_INTERVAL};
pub use controller::AmendmentLoop;

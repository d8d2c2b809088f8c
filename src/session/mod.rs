//! Per-session state
//!
//! - `SeenCache` - interactions already resolved in this session
//! - `filter_new` - picks the interactions of a scan that need the operator
//! - `SessionReport` - summary produced when a session terminates

pub mod cache;
pub mod report;

pub use cache::{filter_new, SeenCache};
pub use report::SessionReport;

//! Permission evaluation
//!
//! This module decides what an existing policy says about an interaction:
//! - `match_profile` collects the ALLOW/DENY qualifiers a profile contributes
//! - `Decision::reduce` combines them with deny-overrides precedence
//! - `classify` applies both over every profile of the interaction's node
//!
//! ## Example
//!
//! ```rust,ignore
//! use policy_amender::permissions::{classify, Decision};
//!
//! match classify(&document, &interaction) {
//!     Decision::Allow => { /* already granted */ }
//!     Decision::Deny | Decision::NotSpecified => { /* ask the operator */ }
//! }
//! ```

mod decision;
mod matcher;

pub use decision::Decision;
pub use matcher::{classify, match_profile, profile_decision};

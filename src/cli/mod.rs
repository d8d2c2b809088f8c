//! Terminal front end
//!
//! - `AmendPolicyArgs` - `clap` command line
//! - `OperatorSurface` / `Verdict` - how the loop asks the operator
//! - `Console` - colored terminal implementation of the operator surface

pub mod args;
pub mod console;
pub mod operator;

pub use args::AmendPolicyArgs;
pub use console::{policy_status, Console};
pub use operator::{parse_verdict, OperatorSurface, Verdict};

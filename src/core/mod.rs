//! Core types for the amendment engine
//!
//! This module provides the fundamental types used throughout the crate:
//! - `LoopState` / `TerminationReason` - Amendment loop lifecycle
//! - `AmendError` - Error types

pub mod error;
pub mod state;

pub use error::{AmendError, AmendResult};
pub use state::{LoopState, TerminationReason};

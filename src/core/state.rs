//! Amendment loop state types

use serde::{Deserialize, Serialize};

/// Current state of an amendment loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Querying the topology and classifying what it reports
    Scanning,

    /// Waiting for the operator to adjudicate one interaction
    Prompting,

    /// Session is over; nothing else will be scanned
    Terminated,
}

impl LoopState {
    /// Check if the loop has reached its terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Terminated)
    }
}

impl Default for LoopState {
    fn default() -> Self {
        LoopState::Scanning
    }
}

/// Why a session reached `Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The configured time-out elapsed
    Timeout,
    /// An external interrupt was received
    Cancelled,
    /// The operator input stream was closed
    InputClosed,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Timeout => write!(f, "time-out reached"),
            TerminationReason::Cancelled => write!(f, "interrupted"),
            TerminationReason::InputClosed => write!(f, "operator input closed"),
        }
    }
}

//! Operator interaction surface
//!
//! The amendment loop asks an `OperatorSurface` about every interaction the
//! policy leaves undecided.

use async_trait::async_trait;

use crate::core::{AmendError, AmendResult};
use crate::graph::Interaction;
use crate::permissions::Decision;

/// The operator's answer to one prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Add an ALLOW rule for the interaction
    Accept,
    /// Leave the policy unchanged
    Reject,
}

/// Parse one line of operator input
///
/// Empty input, `y` and `yes` accept; `n` and `no` reject. Case and
/// surrounding whitespace are ignored.
pub fn parse_verdict(input: &str) -> AmendResult<Verdict> {
    match input.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Ok(Verdict::Accept),
        "n" | "no" => Ok(Verdict::Reject),
        _ => Err(AmendError::InvalidOperatorInput(input.trim().to_string())),
    }
}

/// Trait for anything that can adjudicate an interaction
#[async_trait]
pub trait OperatorSurface: Send {
    /// Ask about one interaction
    ///
    /// `current` is what the policy decides for the interaction today, either
    /// `Deny` or `NotSpecified`. Implementations re-prompt on invalid input
    /// and return `AmendError::InputClosed` when no more answers can arrive.
    async fn prompt(
        &mut self,
        interaction: &Interaction,
        current: Decision,
    ) -> AmendResult<Verdict>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accept() {
        for input in ["", "y", "Y", "yes", " YES ", "\n"] {
            assert_eq!(parse_verdict(input).unwrap(), Verdict::Accept, "{:?}", input);
        }
    }

    #[test]
    fn test_parse_reject() {
        for input in ["n", "N", "no", "No\n"] {
            assert_eq!(parse_verdict(input).unwrap(), Verdict::Reject, "{:?}", input);
        }
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_verdict("maybe").unwrap_err();
        assert!(matches!(err, AmendError::InvalidOperatorInput(ref s) if s == "maybe"));
        assert!(parse_verdict("yess").is_err());
    }
}

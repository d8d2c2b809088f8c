//! Decisions and deny-overrides reduction

use serde::{Deserialize, Serialize};

use crate::policy::Qualifier;

/// Final classification of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Some rule grants it and none denies it
    Allow,
    /// At least one rule denies it
    Deny,
    /// No rule mentions it
    NotSpecified,
}

impl Decision {
    /// Combine decisions with deny-overrides precedence
    ///
    /// `Deny` beats `Allow`, which beats `NotSpecified`. An empty input is
    /// `NotSpecified`.
    pub fn reduce<I>(decisions: I) -> Decision
    where
        I: IntoIterator,
        I::Item: Into<Decision>,
    {
        let mut result = Decision::NotSpecified;
        for decision in decisions {
            match decision.into() {
                Decision::Deny => return Decision::Deny,
                Decision::Allow => result = Decision::Allow,
                Decision::NotSpecified => {}
            }
        }
        result
    }

    /// Whether the interaction needs no operator confirmation
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<Qualifier> for Decision {
    fn from(qualifier: Qualifier) -> Self {
        match qualifier {
            Qualifier::Allow => Decision::Allow,
            Qualifier::Deny => Decision::Deny,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Allow => write!(f, "allowed"),
            Decision::Deny => write!(f, "denied"),
            Decision::NotSpecified => write!(f, "not specified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Decision::*;

    #[test]
    fn test_empty_is_not_specified() {
        assert_eq!(Decision::reduce(Vec::<Decision>::new()), NotSpecified);
    }

    #[test]
    fn test_deny_dominates() {
        assert_eq!(Decision::reduce([Allow, Deny]), Deny);
        assert_eq!(Decision::reduce([Deny, Allow, NotSpecified]), Deny);
        assert_eq!(Decision::reduce([NotSpecified, Deny]), Deny);
    }

    #[test]
    fn test_allow_dominates_not_specified() {
        assert_eq!(Decision::reduce([NotSpecified, Allow]), Allow);
        assert_eq!(Decision::reduce([Allow]), Allow);
        assert_eq!(Decision::reduce([NotSpecified, NotSpecified]), NotSpecified);
    }

    #[test]
    fn test_reduce_is_commutative_and_idempotent() {
        let inputs: [&[Decision]; 5] = [
            &[],
            &[Allow],
            &[Deny, Allow],
            &[NotSpecified, Allow, Allow],
            &[NotSpecified],
        ];
        for input in inputs {
            let forward = Decision::reduce(input.iter().copied());
            let backward = Decision::reduce(input.iter().rev().copied());
            assert_eq!(forward, backward);
            assert_eq!(Decision::reduce([forward]), forward);
        }
    }

    #[test]
    fn test_reduce_qualifiers() {
        assert_eq!(Decision::reduce([Qualifier::Allow, Qualifier::Deny]), Deny);
        assert_eq!(Decision::reduce([Qualifier::Allow]), Allow);
        assert_eq!(Decision::reduce(Vec::<Qualifier>::new()), NotSpecified);
    }
}

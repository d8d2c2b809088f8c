//! Seen-interaction cache
//!
//! Remembers every interaction that was auto-resolved or answered by the
//! operator so it is never surfaced twice in one session. The cache only
//! grows.

use std::collections::HashSet;

use crate::graph::Interaction;
use crate::permissions::{classify, Decision};
use crate::policy::PolicyDocument;

/// Interactions already resolved in this session
#[derive(Debug, Default)]
pub struct SeenCache {
    seen: HashSet<Interaction>,
}

impl SeenCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the interaction was already resolved
    pub fn contains(&self, interaction: &Interaction) -> bool {
        self.seen.contains(interaction)
    }

    /// Remember an interaction; returns false if it was already present
    pub fn insert(&mut self, interaction: Interaction) -> bool {
        self.seen.insert(interaction)
    }

    /// Number of resolved interactions
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing was resolved yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Iterate over resolved interactions
    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.seen.iter()
    }
}

/// Select the interactions of a batch that need the operator
///
/// Duplicates inside the batch are collapsed, keeping first-seen order.
/// Interactions the document already allows are cached here without being
/// surfaced; everything else is returned uncached, to be cached once the
/// operator answers.
pub fn filter_new(
    observed: &[Interaction],
    cache: &mut SeenCache,
    document: &PolicyDocument,
) -> Vec<Interaction> {
    let mut in_batch = HashSet::new();
    let mut surfaced = Vec::new();

    for interaction in observed {
        if cache.contains(interaction) || !in_batch.insert(interaction) {
            continue;
        }

        match classify(document, interaction) {
            Decision::Allow => {
                tracing::debug!("Already allowed: {}", interaction);
                cache.insert(interaction.clone());
            }
            decision => {
                tracing::debug!("Needs adjudication ({}): {}", decision, interaction);
                surfaced.push(interaction.clone());
            }
        }
    }

    surfaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Direction, EndpointIdentity, InteractionKind};
    use crate::policy::{PermissionGroup, Profile, Qualifier};

    fn topic(direction: Direction, expression: &str) -> Interaction {
        Interaction::new(
            EndpointIdentity::new("node", "/ns"),
            InteractionKind::Topic,
            direction,
            expression,
        )
    }

    fn publish_group(qualifier: Qualifier, expression: &str) -> PermissionGroup {
        PermissionGroup::new(InteractionKind::Topic, Direction::Publish, qualifier)
            .with_expression(expression)
    }

    fn test_document() -> PolicyDocument {
        PolicyDocument::new().with_profile(
            Profile::new("/ns", "node")
                .with_group(publish_group(Qualifier::Allow, "allowed"))
                .with_group(publish_group(Qualifier::Deny, "denied")),
        )
    }

    #[test]
    fn test_auto_accept_is_cached_not_surfaced() {
        let mut cache = SeenCache::new();
        let allowed = topic(Direction::Publish, "allowed");

        let surfaced = filter_new(&[allowed.clone()], &mut cache, &test_document());
        assert!(surfaced.is_empty());
        assert!(cache.contains(&allowed));
    }

    #[test]
    fn test_denied_and_unspecified_are_surfaced_uncached() {
        let mut cache = SeenCache::new();
        let denied = topic(Direction::Publish, "denied");
        let unknown = topic(Direction::Subscribe, "unknown");

        let surfaced = filter_new(&[denied.clone(), unknown.clone()], &mut cache, &test_document());
        assert_eq!(surfaced, vec![denied.clone(), unknown.clone()]);
        assert!(cache.is_empty());

        // Unanswered interactions come back on the next pass
        let again = filter_new(&[unknown.clone()], &mut cache, &test_document());
        assert_eq!(again, vec![unknown]);
    }

    #[test]
    fn test_batch_duplicates_are_collapsed() {
        let mut cache = SeenCache::new();
        let unknown = topic(Direction::Subscribe, "unknown");
        let other = topic(Direction::Subscribe, "other");

        let surfaced = filter_new(
            &[unknown.clone(), other.clone(), unknown.clone()],
            &mut cache,
            &test_document(),
        );
        assert_eq!(surfaced, vec![unknown, other]);
    }

    #[test]
    fn test_cached_interactions_never_resurface() {
        let mut cache = SeenCache::new();
        let unknown = topic(Direction::Subscribe, "unknown");
        cache.insert(unknown.clone());

        for _ in 0..3 {
            let surfaced = filter_new(&[unknown.clone()], &mut cache, &test_document());
            assert!(surfaced.is_empty());
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut cache = SeenCache::new();
        assert!(cache.insert(topic(Direction::Publish, "a")));
        assert!(!cache.insert(topic(Direction::Publish, "a")));
        assert_eq!(cache.iter().count(), 1);
    }
}

//! Rule matching and interaction classification
//!
//! Classification is two-level: each matching profile is reduced to its own
//! decision, then the per-profile decisions are reduced again. A profile
//! that both allows and denies a name is therefore denied before it is
//! combined with any other profile.

use std::collections::BTreeSet;

use super::decision::Decision;
use crate::graph::{resolve, Interaction};
use crate::policy::{PolicyDocument, Profile, Qualifier};

/// Qualifiers contributed by the profile's groups that match the interaction
pub fn match_profile(profile: &Profile, interaction: &Interaction) -> BTreeSet<Qualifier> {
    let endpoint = &interaction.endpoint;
    let fqn = resolve(endpoint, &interaction.expression);

    profile
        .permissions
        .iter()
        .filter(|group| group.applies_to(interaction))
        .filter(|group| group.expressions.iter().any(|pattern| resolve(endpoint, pattern) == fqn))
        .map(|group| group.qualifier)
        .collect()
}

/// Decision of a single profile for the interaction
pub fn profile_decision(profile: &Profile, interaction: &Interaction) -> Decision {
    Decision::reduce(match_profile(profile, interaction))
}

/// Decision of the whole document for the interaction
pub fn classify(document: &PolicyDocument, interaction: &Interaction) -> Decision {
    let decision = Decision::reduce(
        document
            .profiles_for(interaction)
            .map(|profile| profile_decision(profile, interaction)),
    );
    tracing::trace!("Classified {} as {}", interaction, decision);
    decision
}

//! Policy document model
//!
//! A document holds profiles; a profile holds the permission groups of one
//! `(namespace, node)` pair; a group grants or denies one kind/direction for
//! a list of expression patterns.

use serde::{Deserialize, Serialize};

use crate::graph::{relative_expression, resolve, Direction, Interaction, InteractionKind};

/// Default policy document version
pub const POLICY_VERSION: &str = "0.2.0";

/// Qualifier attached to a permission group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qualifier {
    #[serde(rename = "ALLOW")]
    Allow,
    #[serde(rename = "DENY")]
    Deny,
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Qualifier::Allow => write!(f, "ALLOW"),
            Qualifier::Deny => write!(f, "DENY"),
        }
    }
}

/// Rules for one kind/direction with a single qualifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionGroup {
    /// Topic or service
    pub kind: InteractionKind,
    /// Direction within the kind
    pub direction: Direction,
    /// ALLOW or DENY
    pub qualifier: Qualifier,
    /// Expression patterns covered by this group
    pub expressions: Vec<String>,
}

impl PermissionGroup {
    /// Create an empty group
    pub fn new(kind: InteractionKind, direction: Direction, qualifier: Qualifier) -> Self {
        Self {
            kind,
            direction,
            qualifier,
            expressions: Vec::new(),
        }
    }

    /// Add an expression pattern
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expressions.push(expression.into());
        self
    }

    /// Whether this group governs the interaction's kind and direction
    pub fn applies_to(&self, interaction: &Interaction) -> bool {
        self.kind == interaction.kind && self.direction == interaction.direction
    }
}

/// Permission rules scoped to one `(namespace, node)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Namespace of the node
    #[serde(rename = "ns")]
    pub namespace: String,
    /// Base name of the node
    pub node: String,
    /// Permission groups, in document order
    #[serde(default)]
    pub permissions: Vec<PermissionGroup>,
}

impl Profile {
    /// Create an empty profile
    pub fn new(namespace: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            node: node.into(),
            permissions: Vec::new(),
        }
    }

    /// Add a permission group
    pub fn with_group(mut self, group: PermissionGroup) -> Self {
        self.permissions.push(group);
        self
    }

    /// Whether this profile governs the interaction's endpoint
    pub fn applies_to(&self, interaction: &Interaction) -> bool {
        self.namespace == interaction.endpoint.namespace && self.node == interaction.endpoint.name
    }
}

/// Ordered collection of profiles
///
/// Unknown keys are rejected at every level, and `profiles` and
/// `expressions` must be present even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    /// Document format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Profiles, in document order
    pub profiles: Vec<Profile>,
}

fn default_version() -> String {
    POLICY_VERSION.to_string()
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            profiles: Vec::new(),
        }
    }
}

impl PolicyDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Profiles governing the interaction's endpoint
    pub fn profiles_for<'a>(
        &'a self,
        interaction: &'a Interaction,
    ) -> impl Iterator<Item = &'a Profile> + 'a {
        self.profiles.iter().filter(move |p| p.applies_to(interaction))
    }

    /// Check structural rules that serde cannot express
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        for (index, profile) in self.profiles.iter().enumerate() {
            if profile.node.is_empty() {
                return Err(format!("profile {} has an empty node name", index));
            }
            for group in &profile.permissions {
                if !group.kind.supports(group.direction) {
                    return Err(format!(
                        "profile {}{}{}: {} groups cannot use direction {}",
                        profile.namespace,
                        if profile.namespace.ends_with('/') { "" } else { "/" },
                        profile.node,
                        group.kind,
                        group.direction
                    ));
                }
            }
        }
        Ok(())
    }

    /// Record a rule for `interaction` with the given qualifier
    ///
    /// Reuses the first matching profile and group, creating minimal ones
    /// when missing. The stored pattern is the shortest expression that
    /// resolves to the interaction's name. Returns false when an existing
    /// pattern in the target group already covers the name.
    pub fn add_permission(&mut self, interaction: &Interaction, qualifier: Qualifier) -> bool {
        let endpoint = &interaction.endpoint;
        let fqn = interaction.resolved_name();

        let profile_index = match self.profiles.iter().position(|p| p.applies_to(interaction)) {
            Some(index) => index,
            None => {
                self.profiles.push(Profile::new(&endpoint.namespace, &endpoint.name));
                self.profiles.len() - 1
            }
        };
        let profile = &mut self.profiles[profile_index];

        let group_index = match profile
            .permissions
            .iter()
            .position(|g| g.applies_to(interaction) && g.qualifier == qualifier)
        {
            Some(index) => index,
            None => {
                profile
                    .permissions
                    .push(PermissionGroup::new(interaction.kind, interaction.direction, qualifier));
                profile.permissions.len() - 1
            }
        };
        let group = &mut profile.permissions[group_index];

        if group.expressions.iter().any(|e| resolve(endpoint, e) == fqn) {
            return false;
        }

        let expression = relative_expression(endpoint, &fqn);
        tracing::info!(
            "Adding {} {} {} rule for {}: {}",
            interaction.kind,
            interaction.direction,
            qualifier,
            endpoint,
            expression
        );
        group.expressions.push(expression);
        true
    }
}

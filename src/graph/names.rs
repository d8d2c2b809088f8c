//! Endpoint identities and name resolution
//!
//! Expressions found in policies and in the live graph come in four forms:
//! - absolute: `/ns/chatter`
//! - scheme-prefixed: `rostopic://ns/chatter`
//! - private: `~chatter` (under the endpoint's own name)
//! - relative: `chatter` (under the endpoint's namespace)
//!
//! `resolve` turns any of them into a fully qualified name for one endpoint.

use serde::{Deserialize, Serialize};

/// Scheme prefixes stripped during resolution
pub const SCHEME_PREFIXES: &[&str] = &["rostopic://", "rosservice://"];

/// Identity of a communicating participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EndpointIdentity {
    /// Base name of the node
    pub name: String,
    /// Namespace the node lives in
    pub namespace: String,
    /// Namespace and name joined
    pub fully_qualified_name: String,
}

impl EndpointIdentity {
    /// Create an identity, deriving the fully qualified name
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        let namespace = namespace.into();
        let fully_qualified_name = if namespace.ends_with('/') {
            format!("{}{}", namespace, name)
        } else {
            format!("{}/{}", namespace, name)
        };
        Self {
            name,
            namespace,
            fully_qualified_name,
        }
    }

    /// Create an identity with an explicit fully qualified name
    pub fn with_fqn(
        name: impl Into<String>,
        namespace: impl Into<String>,
        fully_qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            fully_qualified_name: fully_qualified_name.into(),
        }
    }
}

impl std::fmt::Display for EndpointIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fully_qualified_name)
    }
}

/// Resolve an expression to a fully qualified name for `endpoint`
///
/// An empty expression is treated as relative and yields `namespace + "/"`.
pub fn resolve(endpoint: &EndpointIdentity, expression: &str) -> String {
    if expression.starts_with('/') {
        return expression.to_string();
    }

    for prefix in SCHEME_PREFIXES {
        if let Some(rest) = expression.strip_prefix(prefix) {
            return format!("/{}", rest);
        }
    }

    if let Some(private) = expression.strip_prefix('~') {
        return format!("{}/{}", endpoint.fully_qualified_name, private);
    }

    format!("{}/{}", endpoint.namespace, expression)
}

/// Shortest expression that resolves back to `fqn` for `endpoint`
///
/// Prefers the private form, then the namespace-relative form, and falls
/// back to the absolute name when neither round-trips.
pub fn relative_expression(endpoint: &EndpointIdentity, fqn: &str) -> String {
    let mut candidates = Vec::with_capacity(2);

    if let Some(rest) = strip_scope(fqn, &endpoint.fully_qualified_name) {
        candidates.push(format!("~{}", rest));
    }
    if let Some(rest) = strip_scope(fqn, &endpoint.namespace) {
        candidates.push(rest.to_string());
    }

    candidates
        .into_iter()
        .find(|candidate| resolve(endpoint, candidate) == fqn)
        .unwrap_or_else(|| fqn.to_string())
}

fn strip_scope<'a>(fqn: &'a str, scope: &str) -> Option<&'a str> {
    let scope = scope.trim_end_matches('/');
    let rest = fqn.strip_prefix(scope)?.strip_prefix('/')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

//! Observed interactions between an endpoint and a named channel

use serde::{Deserialize, Serialize};

use super::names::{resolve, EndpointIdentity};

/// Communication kind of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Pub/sub topic
    Topic,
    /// Request/reply service
    Service,
}

impl InteractionKind {
    /// Directions that make sense for this kind
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            InteractionKind::Topic => &[Direction::Publish, Direction::Subscribe],
            InteractionKind::Service => &[Direction::Reply, Direction::Request],
        }
    }

    /// Check whether `direction` belongs to this kind
    pub fn supports(&self, direction: Direction) -> bool {
        self.directions().contains(&direction)
    }

    /// Lowercase name used in policies and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Topic => "topic",
            InteractionKind::Service => "service",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an interaction within its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Topic publisher
    Publish,
    /// Topic subscriber
    Subscribe,
    /// Service server
    Reply,
    /// Service client
    Request,
}

impl Direction {
    /// Lowercase name used in policies and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Publish => "publish",
            Direction::Subscribe => "subscribe",
            Direction::Reply => "reply",
            Direction::Request => "request",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed instance of an endpoint using a named channel
///
/// Equality and hashing cover all four fields; this is the key of the
/// seen-interaction cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    /// Endpoint that was observed
    pub endpoint: EndpointIdentity,
    /// Topic or service
    pub kind: InteractionKind,
    /// Publish, subscribe, reply or request
    pub direction: Direction,
    /// Channel name as reported by the observer
    pub expression: String,
}

impl Interaction {
    /// Create a new interaction
    pub fn new(
        endpoint: EndpointIdentity,
        kind: InteractionKind,
        direction: Direction,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            kind,
            direction,
            expression: expression.into(),
        }
    }

    /// Fully qualified channel name for this interaction's endpoint
    pub fn resolved_name(&self) -> String {
        resolve(&self.endpoint, &self.expression)
    }
}

impl std::fmt::Display for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.endpoint,
            self.kind,
            self.direction,
            self.resolved_name()
        )
    }
}

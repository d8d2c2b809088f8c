//! Topology observer
//!
//! Abstraction over the live communication graph, plus a snapshot-backed
//! implementation that re-reads a JSON or YAML description of the graph on
//! every scan.

use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::interaction::{Direction, Interaction, InteractionKind};
use super::names::EndpointIdentity;
use crate::core::{AmendError, AmendResult};
use crate::policy::DocumentFormat;

/// Trait for sources of live graph activity
///
/// Every method may fail; the amendment loop treats a failure as an empty
/// scan and tries again on the next iteration.
#[async_trait]
pub trait TopologyProvider: Send + Sync {
    /// Refresh the provider's view of the graph
    ///
    /// Called once at the start of every scan. Static providers keep the
    /// default no-op.
    async fn refresh(&self) -> Result<()> {
        Ok(())
    }

    /// All endpoints currently alive
    async fn list_endpoints(&self) -> Result<Vec<EndpointIdentity>>;

    /// Topics the endpoint subscribes to
    async fn subscriptions_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>>;

    /// Topics the endpoint publishes
    async fn publications_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>>;

    /// Services the endpoint serves
    async fn services_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>>;

    /// Services the endpoint calls
    async fn clients_of(&self, _endpoint: &EndpointIdentity) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Query a provider for every interaction it currently reports
///
/// Produces one interaction per (endpoint, kind, direction, expression).
pub async fn collect_interactions(
    provider: &dyn TopologyProvider,
) -> AmendResult<Vec<Interaction>> {
    let query =
        |e: anyhow::Error| AmendError::TopologyQuery(format!("{}: {:#}", provider.name(), e));

    provider.refresh().await.map_err(query)?;
    let endpoints = provider.list_endpoints().await.map_err(query)?;

    let mut interactions = Vec::new();
    for endpoint in endpoints {
        let groups = [
            (
                InteractionKind::Topic,
                Direction::Subscribe,
                provider.subscriptions_of(&endpoint).await.map_err(query)?,
            ),
            (
                InteractionKind::Topic,
                Direction::Publish,
                provider.publications_of(&endpoint).await.map_err(query)?,
            ),
            (
                InteractionKind::Service,
                Direction::Reply,
                provider.services_of(&endpoint).await.map_err(query)?,
            ),
            (
                InteractionKind::Service,
                Direction::Request,
                provider.clients_of(&endpoint).await.map_err(query)?,
            ),
        ];

        for (kind, direction, expressions) in groups {
            for expression in expressions {
                interactions.push(Interaction::new(endpoint.clone(), kind, direction, expression));
            }
        }
    }

    tracing::debug!(
        "Topology provider {} reported {} interactions",
        provider.name(),
        interactions.len()
    );
    Ok(interactions)
}

/// One node as described in a graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeActivity {
    /// Base name of the node
    pub name: String,

    /// Namespace of the node
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Topics published
    #[serde(default)]
    pub publishers: Vec<String>,

    /// Topics subscribed
    #[serde(default)]
    pub subscriptions: Vec<String>,

    /// Services served
    #[serde(default)]
    pub services: Vec<String>,

    /// Services called
    #[serde(default)]
    pub clients: Vec<String>,
}

fn default_namespace() -> String {
    "/".to_string()
}

impl NodeActivity {
    /// Create an idle node
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Add a published topic
    pub fn publishing(mut self, topic: impl Into<String>) -> Self {
        self.publishers.push(topic.into());
        self
    }

    /// Add a subscribed topic
    pub fn subscribing(mut self, topic: impl Into<String>) -> Self {
        self.subscriptions.push(topic.into());
        self
    }

    /// Add a served service
    pub fn serving(mut self, service: impl Into<String>) -> Self {
        self.services.push(service.into());
        self
    }

    /// Add a called service
    pub fn calling(mut self, service: impl Into<String>) -> Self {
        self.clients.push(service.into());
        self
    }

    /// Identity of this node
    pub fn identity(&self) -> EndpointIdentity {
        EndpointIdentity::new(&self.name, &self.namespace)
    }
}

/// Point-in-time description of the communication graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes alive at snapshot time
    #[serde(default)]
    pub nodes: Vec<NodeActivity>,
}

impl GraphSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node
    pub fn with_node(mut self, node: NodeActivity) -> Self {
        self.nodes.push(node);
        self
    }

    fn node(&self, endpoint: &EndpointIdentity) -> Option<&NodeActivity> {
        self.nodes
            .iter()
            .find(|n| n.name == endpoint.name && n.namespace == endpoint.namespace)
    }
}

/// Topology provider backed by a graph snapshot
///
/// When created from a file the snapshot is re-read on every refresh, so an
/// external tool can keep the file current while a session runs.
#[derive(Debug)]
pub struct SnapshotTopology {
    source: Option<PathBuf>,
    snapshot: RwLock<GraphSnapshot>,
}

impl SnapshotTopology {
    /// Create a provider that reads `path` on every refresh
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            snapshot: RwLock::new(GraphSnapshot::default()),
        }
    }

    /// Create a provider over a fixed in-memory snapshot
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        Self {
            source: None,
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Replace the in-memory snapshot
    pub fn replace(&self, snapshot: GraphSnapshot) -> Result<()> {
        let mut current = self
            .snapshot
            .write()
            .map_err(|_| anyhow!("graph snapshot lock poisoned"))?;
        *current = snapshot;
        Ok(())
    }

    fn activity_of<F>(&self, endpoint: &EndpointIdentity, select: F) -> Result<Vec<String>>
    where
        F: Fn(&NodeActivity) -> &Vec<String>,
    {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| anyhow!("graph snapshot lock poisoned"))?;
        Ok(snapshot.node(endpoint).map(|n| select(n).clone()).unwrap_or_default())
    }
}

#[async_trait]
impl TopologyProvider for SnapshotTopology {
    async fn refresh(&self) -> Result<()> {
        let Some(path) = &self.source else {
            return Ok(());
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading graph snapshot {}", path.display()))?;
        let snapshot: GraphSnapshot = DocumentFormat::from_path(path)
            .parse(&content)
            .with_context(|| format!("parsing graph snapshot {}", path.display()))?;

        tracing::debug!("Loaded graph snapshot with {} nodes", snapshot.nodes.len());
        self.replace(snapshot)
    }

    async fn list_endpoints(&self) -> Result<Vec<EndpointIdentity>> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| anyhow!("graph snapshot lock poisoned"))?;
        Ok(snapshot.nodes.iter().map(NodeActivity::identity).collect())
    }

    async fn subscriptions_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>> {
        self.activity_of(endpoint, |n| &n.subscriptions)
    }

    async fn publications_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>> {
        self.activity_of(endpoint, |n| &n.publishers)
    }

    async fn services_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>> {
        self.activity_of(endpoint, |n| &n.services)
    }

    async fn clients_of(&self, endpoint: &EndpointIdentity) -> Result<Vec<String>> {
        self.activity_of(endpoint, |n| &n.clients)
    }

    fn name(&self) -> &str {
        "snapshot"
    }
}

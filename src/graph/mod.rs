//! Communication graph model
//!
//! Endpoint identities, name resolution, observed interactions and the
//! topology observer that reports them.

pub mod interaction;
pub mod names;
pub mod observer;

pub use interaction::{Direction, Interaction, InteractionKind};
pub use names::{relative_expression, resolve, EndpointIdentity};
pub use observer::{
    collect_interactions, GraphSnapshot, NodeActivity, SnapshotTopology, TopologyProvider,
};

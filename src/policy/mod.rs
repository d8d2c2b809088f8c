//! Policy documents and their on-disk store

pub mod document;
pub mod store;

pub use document::{PermissionGroup, PolicyDocument, Profile, Qualifier, POLICY_VERSION};
pub use store::{DocumentFormat, PolicyStore};

//! Policy storage helpers
//!
//! Handles reading and writing policy documents to disk. The format follows
//! the file extension: `.yaml`/`.yml` files are YAML, everything else JSON.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::document::PolicyDocument;
use crate::core::{AmendError, AmendResult};

/// On-disk encoding of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }

    /// Parse a value from text
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> anyhow::Result<T> {
        Ok(match self {
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        })
    }

    /// Render a value as text
    pub fn render<T: Serialize>(&self, value: &T) -> anyhow::Result<String> {
        Ok(match self {
            DocumentFormat::Json => {
                let mut json = serde_json::to_string_pretty(value)?;
                json.push('\n');
                json
            }
            DocumentFormat::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

/// Loads and saves policy documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyStore;

impl PolicyStore {
    /// Create a new policy store
    pub fn new() -> Self {
        Self
    }

    /// Load a policy document
    ///
    /// A missing file is `PolicyFileNotFound`; anything unreadable,
    /// unparsable or structurally wrong is `PolicyFileInvalid`.
    pub fn load(&self, path: &Path) -> AmendResult<PolicyDocument> {
        if !path.is_file() {
            return Err(AmendError::PolicyFileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AmendError::invalid_policy(path, e.to_string()))?;
        let document: PolicyDocument = DocumentFormat::from_path(path)
            .parse(&content)
            .map_err(|e| AmendError::invalid_policy(path, e.to_string()))?;
        document
            .validate()
            .map_err(|reason| AmendError::invalid_policy(path, reason))?;

        tracing::info!(
            "Loaded policy {} with {} profiles",
            path.display(),
            document.profiles.len()
        );
        Ok(document)
    }

    /// Save a policy document, replacing any existing file
    pub fn save(&self, document: &PolicyDocument, path: &Path) -> AmendResult<()> {
        let save_error = |source: std::io::Error| AmendError::PolicySave {
            path: path.to_path_buf(),
            source,
        };

        let content = DocumentFormat::from_path(path).render(document).map_err(|e| {
            save_error(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })?;

        let file = File::create(path).map_err(save_error)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes()).map_err(save_error)?;
        writer.flush().map_err(save_error)?;

        tracing::info!("Saved policy to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Direction, InteractionKind};
    use crate::policy::document::{PermissionGroup, Profile, Qualifier, POLICY_VERSION};
    use tempfile::TempDir;

    const TEST_POLICY: &str = r#"
version: 0.2.0
profiles:
  - ns: /ns
    node: node
    permissions:
      - kind: topic
        direction: publish
        qualifier: ALLOW
        expressions: [parameter_events]
      - kind: topic
        direction: publish
        qualifier: DENY
        expressions: [denied_topic]
      - kind: service
        direction: reply
        qualifier: ALLOW
        expressions: [~get_parameters, ~set_parameters]
"#;

    fn create_test_store() -> (PolicyStore, TempDir) {
        (PolicyStore::new(), TempDir::new().unwrap())
    }

    #[test]
    fn test_load_yaml_policy() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("policy.yaml");
        fs::write(&path, TEST_POLICY).unwrap();

        let doc = store.load(&path).unwrap();
        assert_eq!(doc.version, "0.2.0");
        assert_eq!(doc.profiles.len(), 1);
        let profile = &doc.profiles[0];
        assert_eq!(profile.namespace, "/ns");
        assert_eq!(profile.permissions.len(), 3);
        assert_eq!(profile.permissions[1].qualifier, Qualifier::Deny);
        assert_eq!(profile.permissions[2].expressions, vec!["~get_parameters", "~set_parameters"]);
    }

    #[test]
    fn test_save_load_json() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("policy.json");
        let doc = PolicyDocument::new().with_profile(Profile::new("/ns", "node").with_group(
            PermissionGroup::new(InteractionKind::Topic, Direction::Subscribe, Qualifier::Allow)
                .with_expression("chatter"),
        ));

        store.save(&doc, &path).unwrap();
        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded, doc);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"ns\": \"/ns\""));
        assert!(raw.contains("\"qualifier\": \"ALLOW\""));
    }

    #[test]
    fn test_load_missing_file() {
        let (store, temp) = create_test_store();
        let err = store.load(&temp.path().join("bar.yaml")).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileNotFound(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("invalid_policy.json");
        fs::write(&path, "{ \"profiles\": [ { \"ns\": ").unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_load_rejects_unknown_qualifier() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("policy.yml");
        fs::write(
            &path,
            r#"profiles:
  - ns: /ns
    node: node
    permissions:
      - kind: topic
        direction: publish
        qualifier: MAYBE
        expressions: []
"#,
        )
        .unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_load_rejects_mismatched_direction() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("policy.yaml");
        fs::write(
            &path,
            r#"profiles:
  - ns: /ns
    node: node
    permissions:
      - kind: service
        direction: publish
        qualifier: ALLOW
        expressions: []
"#,
        )
        .unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_load_rejects_other_yaml_documents() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("settings.yaml");
        fs::write(&path, "log_level: debug\nworkers: 4\n").unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_load_rejects_graph_snapshot() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("graph.json");
        fs::write(
            &path,
            r#"{ "nodes": [ { "name": "node", "namespace": "/ns", "publishers": ["chatter"] } ] }"#,
        )
        .unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_load_rejects_misspelled_expressions_key() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("policy.yaml");
        fs::write(
            &path,
            r#"profiles:
  - ns: /ns
    node: node
    permissions:
      - kind: topic
        direction: subscribe
        qualifier: DENY
        expresions: [secret]
"#,
        )
        .unwrap();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_load_empty_policy() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("policy.json");
        fs::write(&path, r#"{ "profiles": [] }"#).unwrap();

        let doc = store.load(&path).unwrap();
        assert!(doc.profiles.is_empty());
        assert_eq!(doc.version, POLICY_VERSION);

        let path = temp.path().join("no_profiles.json");
        fs::write(&path, r#"{ "version": "0.2.0" }"#).unwrap();
        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, AmendError::PolicyFileInvalid { .. }));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let (store, temp) = create_test_store();
        let path = temp.path().join("nope").join("policy.json");
        let err = store.save(&PolicyDocument::new(), &path).unwrap_err();
        assert!(matches!(err, AmendError::PolicySave { .. }));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("policy")), DocumentFormat::Json);
    }
}

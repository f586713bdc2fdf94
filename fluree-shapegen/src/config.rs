//! Generator configuration
//!
//! Loaded from TOML or built in code. Every field has a default, so a config
//! file only needs the values it changes:
//!
//! ```toml
//! runtime_crate = "fluree_shapegen_runtime"
//! default_identifier_prefix = "urn:example:"
//!
//! [identifier_overrides.Person]
//! strategy = "sha256"
//! prefix = "urn:example:person:"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShapegenConfig {
    /// Crate path the generated module imports as `rt`
    pub runtime_crate: String,
    /// Prefix of minted identifiers; the type name and `:` are appended
    pub default_identifier_prefix: String,
    /// Identifier strategy overrides, keyed by shape IRI or type name
    pub identifier_overrides: BTreeMap<String, IdentifierOverride>,
    /// Build shapes on the rayon pool
    pub parallel: bool,
    /// Extra banner lines for the generated module
    pub header: Option<String>,
}

impl Default for ShapegenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "fluree_shapegen_runtime".to_string(),
            default_identifier_prefix: "urn:shapegen:".to_string(),
            identifier_overrides: BTreeMap::new(),
            parallel: true,
            header: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentifierOverride {
    pub strategy: OverrideStrategy,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStrategy {
    /// Caller must always supply the identifier
    Explicit,
    /// Blank node unless the caller supplies one
    Blank,
    /// Random UUID under the prefix
    Uuid,
    /// Content hash under the prefix
    Sha256,
}

impl ShapegenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    pub fn with_identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_identifier_prefix = prefix.into();
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, ov: IdentifierOverride) -> Self {
        self.identifier_overrides.insert(key.into(), ov);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Override for a shape, looked up by IRI first, then by type name
    pub fn identifier_override(&self, iri: &str, name: &str) -> Option<&IdentifierOverride> {
        self.identifier_overrides
            .get(iri)
            .or_else(|| self.identifier_overrides.get(name))
    }

    /// Default prefix for minted identifiers of `type_name`
    pub fn minted_prefix(&self, type_name: &str) -> String {
        format!("{}{}:", self.default_identifier_prefix, type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ShapegenConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShapegenConfig::default());
        assert_eq!(config.minted_prefix("Person"), "urn:shapegen:Person:");
    }

    #[test]
    fn test_overrides_from_toml() {
        let config = ShapegenConfig::from_toml_str(
            r#"
            runtime_crate = "crate::rt"
            parallel = false

            [identifier_overrides."http://example.org/PersonShape"]
            strategy = "sha256"
            prefix = "urn:p:"

            [identifier_overrides.Tag]
            strategy = "explicit"
            "#,
        )
        .unwrap();
        assert_eq!(config.runtime_crate, "crate::rt");
        assert!(!config.parallel);

        let person = config
            .identifier_override("http://example.org/PersonShape", "Person")
            .unwrap();
        assert_eq!(person.strategy, OverrideStrategy::Sha256);
        assert_eq!(person.prefix.as_deref(), Some("urn:p:"));

        let tag = config.identifier_override("http://example.org/TagShape", "Tag").unwrap();
        assert_eq!(tag.strategy, OverrideStrategy::Explicit);
        assert!(config.identifier_override("x", "Other").is_none());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(ShapegenConfig::from_toml_str("paralel = true").is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapegen.toml");
        std::fs::write(&path, "header = \"generated for tests\"").unwrap();
        let config = ShapegenConfig::from_path(&path).unwrap();
        assert_eq!(config.header.as_deref(), Some("generated for tests"));

        let missing = ShapegenConfig::from_path(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}

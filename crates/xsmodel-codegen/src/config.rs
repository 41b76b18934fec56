//! # Generator Configuration
//!
//! Settings for one generation run, loaded from YAML or JSON. Every field
//! has a default, so an empty file (or no file) yields the `validated`
//! format with the built-in temporal overrides.
//!
//! ```yaml
//! format: validated
//! populate_by_name: true
//! stop_words: [validate, model]
//! alias_overrides:
//!   MarketDocument.createdDateTime:
//!     serialization: created
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alias::AliasOverride;
use crate::error::CodegenError;
use crate::types::TypeOverride;

/// Name of the format used when nothing else is configured.
pub const DEFAULT_FORMAT: &str = "validated";

/// Crate path generated code imports temporal types from.
pub const DEFAULT_RUNTIME_CRATE: &str = "xsmodel_core";

/// Settings that control code generation behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output format name, resolved against the registry once per run.
    pub format: String,

    /// Crate path for `use {runtime_crate}::EsmpDateTime;` and friends.
    pub runtime_crate: String,

    /// Also accept the Rust identifier as an input key.
    ///
    /// **Default: true.** Generated fields then deserialize from either the
    /// schema name or the field identifier.
    pub populate_by_name: bool,

    /// Emit `#[serde(deny_unknown_fields)]` on classes without a base.
    ///
    /// **Default: false.** Unknown keys are ignored, matching the lenient
    /// behavior of XML bindings. Classes that flatten a base never get the
    /// attribute, since serde does not support it together with `flatten`.
    pub deny_unknown_fields: bool,

    /// Extra words treated as reserved when deriving field identifiers.
    pub stop_words: Vec<String>,

    /// Ordered temporal type rules; first match wins.
    pub type_overrides: Vec<TypeOverride>,

    /// Per-field alias replacements keyed by `Class.attribute`.
    pub alias_overrides: BTreeMap<String, AliasOverride>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            populate_by_name: true,
            deny_unknown_fields: false,
            stop_words: vec!["validate".to_string()],
            type_overrides: TypeOverride::defaults(),
            alias_overrides: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let config_err = |reason: String| CodegenError::Config {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .map_err(|e| config_err(e.to_string()))?;

        tracing::debug!(path = %path.display(), format = %config.format, "loaded generator config");
        Ok(config)
    }

    /// Parse YAML. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, CodegenError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse JSON.
    pub fn from_json_str(content: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replace the format name.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// The configured alias override for `class.attr`, if any.
    pub fn alias_override(&self, class: &str, attr: &str) -> Option<&AliasOverride> {
        self.alias_overrides.get(&format!("{class}.{attr}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TemporalKind;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.format, "validated");
        assert_eq!(config.runtime_crate, "xsmodel_core");
        assert!(config.populate_by_name);
        assert!(!config.deny_unknown_fields);
        assert_eq!(config.stop_words, vec!["validate".to_string()]);
        assert_eq!(config.type_overrides.len(), 3);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(GeneratorConfig::from_yaml_str("").unwrap(), GeneratorConfig::default());
        assert_eq!(GeneratorConfig::from_yaml_str("{}").unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
format: plain
alias_overrides:
  MarketDocument.createdDateTime:
    serialization: created
type_overrides:
  - names: [validFrom]
    target: esmp-datetime
"#;
        let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.format, "plain");
        assert!(config.populate_by_name);
        assert_eq!(config.type_overrides.len(), 1);
        assert_eq!(config.type_overrides[0].target, TemporalKind::EsmpDatetime);

        let over = config.alias_override("MarketDocument", "createdDateTime").unwrap();
        assert_eq!(over.serialization.as_deref(), Some("created"));
        assert_eq!(over.validation, None);
        assert!(config.alias_override("MarketDocument", "mRID").is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = GeneratorConfig::from_yaml_str("formatt: plain\n").unwrap_err();
        assert!(matches!(err, CodegenError::Yaml(_)));
    }

    #[test]
    fn load_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"format": "plain", "deny_unknown_fields": true}"#).unwrap();
        let config = GeneratorConfig::load(&json).unwrap();
        assert_eq!(config.format, "plain");
        assert!(config.deny_unknown_fields);

        let yaml = dir.path().join("config.yaml");
        std::fs::write(&yaml, "stop_words: [validate, model]\n").unwrap();
        let config = GeneratorConfig::load(&yaml).unwrap();
        assert_eq!(config.stop_words.len(), 2);

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "populate_by_name: sometimes\n").unwrap();
        assert!(matches!(
            GeneratorConfig::load(&bad),
            Err(CodegenError::Config { .. })
        ));
    }

    #[test]
    fn with_format_overrides() {
        let config = GeneratorConfig::default().with_format("plain");
        assert_eq!(config.format, "plain");
    }
}

//! # Field Alias Mapping
//!
//! Every generated field keeps two names apart: the Rust identifier used in
//! code and the schema name used at the boundary. The boundary side is an
//! [`AliasPair`]: one name for serialization, one accepted on input. Both
//! default to the original schema name, so a generated model serializes to
//! exactly the keys the schema defines.

use serde::{Deserialize, Serialize};

/// Boundary-facing names for one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasPair {
    /// Key emitted when serializing.
    pub serialization: String,
    /// Key accepted when deserializing.
    pub validation: String,
}

/// A configured replacement for one or both sides of an [`AliasPair`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasOverride {
    pub serialization: Option<String>,
    pub validation: Option<String>,
}

impl AliasPair {
    /// Both sides equal to the schema name.
    pub fn for_schema_name(name: &str) -> Self {
        Self {
            serialization: name.to_string(),
            validation: name.to_string(),
        }
    }

    /// The schema-name default with any configured side replaced.
    pub fn with_override(name: &str, over: &AliasOverride) -> Self {
        Self {
            serialization: over.serialization.clone().unwrap_or_else(|| name.to_string()),
            validation: over.validation.clone().unwrap_or_else(|| name.to_string()),
        }
    }

    /// Both sides are the same name.
    pub fn is_symmetric(&self) -> bool {
        self.serialization == self.validation
    }
}

/// One schema-derived field, as the emitter sees it.
///
/// `schema_name` is fixed at construction; the identifier and aliases are
/// derived from it once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    schema_name: String,
    /// Generated Rust identifier.
    pub ident: String,
    /// Boundary names.
    pub aliases: AliasPair,
    /// Module-level function supplying the schema default, when the field
    /// has one the emitter can express.
    pub default_fn: Option<String>,
}

impl FieldDescriptor {
    pub fn new(schema_name: impl Into<String>, ident: impl Into<String>, aliases: AliasPair) -> Self {
        Self {
            schema_name: schema_name.into(),
            ident: ident.into(),
            aliases,
            default_fn: None,
        }
    }

    /// The original schema name.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// True when the identifier differs from either alias, i.e. when the
    /// emitted field needs rename metadata at all.
    pub fn needs_rename(&self) -> bool {
        self.ident != self.aliases.serialization || self.ident != self.aliases.validation
    }
}

//! # Schema Model
//!
//! The resolved class tree handed to an output format. Producing it (XSD
//! parsing, type resolution, flattening) is the upstream generator's job;
//! this module only loads it from YAML or JSON and checks that it is
//! internally consistent.
//!
//! ```yaml
//! module: market_document
//! classes:
//!   - name: MarketDocument
//!     attrs:
//!       - name: mRID
//!         types: ["{http://www.w3.org/2001/XMLSchema}string"]
//!       - name: createdDateTime
//!         types: ["xs:dateTime"]
//!       - name: Period
//!         types: [TimePeriod]
//!         max_occurs: unbounded
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::naming::TypeIdents;

/// XML Schema namespace, in `{ns}local` qualified-name form.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// A resolved schema: one generated module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Module name (used in the generated header).
    pub module: String,
    /// Optional module documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Classes in emission order.
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

/// Kind of generated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// A complex type with fields.
    #[default]
    Complex,
    /// A simple type restricted to enumerated values.
    Enumeration,
}

/// One class in the schema model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    /// Class name as it appears in the schema.
    pub name: String,
    /// Complex type or enumeration.
    #[serde(default)]
    pub kind: ClassKind,
    /// Base class this one extends, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Documentation from the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Attributes (fields or enumeration values).
    #[serde(default)]
    pub attrs: Vec<AttrSpec>,
}

/// The XML construct an attribute came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrTag {
    /// Child element.
    #[default]
    Element,
    /// XML attribute.
    Attribute,
    /// Choice between several element types.
    Choice,
    /// Enumeration value.
    Enumeration,
    /// Simple content extension.
    Extension,
}

/// Upper bound of an attribute's occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OccursRepr", into = "OccursRepr")]
pub enum MaxOccurs {
    /// At most this many.
    Bounded(u32),
    /// `maxOccurs="unbounded"`.
    Unbounded,
}

impl Default for MaxOccurs {
    fn default() -> Self {
        Self::Bounded(1)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OccursRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<OccursRepr> for MaxOccurs {
    type Error = String;

    fn try_from(repr: OccursRepr) -> Result<Self, Self::Error> {
        match repr {
            OccursRepr::Count(n) => Ok(Self::Bounded(n)),
            OccursRepr::Keyword(k) if k == "unbounded" => Ok(Self::Unbounded),
            OccursRepr::Keyword(k) => Err(format!("expected a count or \"unbounded\", got {k:?}")),
        }
    }
}

impl From<MaxOccurs> for OccursRepr {
    fn from(value: MaxOccurs) -> Self {
        match value {
            MaxOccurs::Bounded(n) => Self::Count(n),
            MaxOccurs::Unbounded => Self::Keyword("unbounded".to_string()),
        }
    }
}

/// A qualified type name: `{namespace}local`, `prefix:local`, or a bare
/// class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    /// The local part of the name.
    pub fn local_name(&self) -> &str {
        let name = self.0.as_str();
        if let Some(rest) = name.strip_prefix('{') {
            return rest.split_once('}').map(|(_, local)| local).unwrap_or(name);
        }
        name.split_once(':').map(|(_, local)| local).unwrap_or(name)
    }

    /// The XSD builtin local name, if this refers to one.
    pub fn xsd_local(&self) -> Option<&str> {
        let name = self.0.as_str();
        if let Some(rest) = name.strip_prefix('{') {
            let (ns, local) = rest.split_once('}')?;
            return (ns == XSD_NAMESPACE).then_some(local);
        }
        name.strip_prefix("xs:").or_else(|| name.strip_prefix("xsd:"))
    }

    /// True for XSD builtin types.
    pub fn is_builtin(&self) -> bool {
        self.xsd_local().is_some()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn one() -> u32 {
    1
}

/// One attribute of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrSpec {
    /// Original schema name.
    pub name: String,
    /// The XML construct this attribute came from.
    #[serde(default)]
    pub tag: AttrTag,
    /// Candidate types; the first one is primary.
    #[serde(default)]
    pub types: Vec<TypeRef>,
    /// `minOccurs`.
    #[serde(default = "one")]
    pub min_occurs: u32,
    /// `maxOccurs`.
    #[serde(default)]
    pub max_occurs: MaxOccurs,
    /// `nillable="true"`.
    #[serde(default)]
    pub nillable: bool,
    /// Default value (for enumerations: the wire value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// The default is fixed.
    #[serde(default)]
    pub fixed: bool,
    /// `use="prohibited"`.
    #[serde(default)]
    pub prohibited: bool,
    /// Documentation from the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl AttrSpec {
    /// `minOccurs="0"`.
    pub fn is_optional(&self) -> bool {
        self.min_occurs == 0
    }

    /// More than one occurrence is allowed.
    pub fn is_list(&self) -> bool {
        match self.max_occurs {
            MaxOccurs::Bounded(n) => n > 1,
            MaxOccurs::Unbounded => true,
        }
    }

    /// The primary type.
    pub fn primary_type(&self) -> Option<&TypeRef> {
        self.types.first()
    }

    /// The enumeration wire value: the default if given, else the name.
    pub fn wire_value(&self) -> &str {
        self.default.as_deref().unwrap_or(&self.name)
    }
}

impl SchemaModel {
    /// Load a model from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::ModelLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let model = if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .map_err(|e| match e {
            CodegenError::Model(reason) => CodegenError::ModelLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!(
            path = %path.display(),
            classes = model.classes.len(),
            "loaded schema model"
        );
        Ok(model)
    }

    /// Parse and validate a YAML model.
    pub fn from_yaml_str(content: &str) -> Result<Self, CodegenError> {
        let model: Self =
            serde_yaml::from_str(content).map_err(|e| CodegenError::Model(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate a JSON model.
    pub fn from_json_str(content: &str) -> Result<Self, CodegenError> {
        let model: Self =
            serde_json::from_str(content).map_err(|e| CodegenError::Model(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Find a class by schema name.
    pub fn class(&self, name: &str) -> Option<&ClassSpec> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Rust type identifiers for every class, in model order.
    pub fn type_idents(&self) -> TypeIdents {
        TypeIdents::allocate(self.classes.iter().map(|c| c.name.as_str()))
    }

    /// Check structural consistency: unique class names, known references,
    /// and at least one type per field attribute.
    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.module.trim().is_empty() {
            return Err(CodegenError::Model("module name must not be empty".to_string()));
        }

        let mut names = BTreeSet::new();
        for class in &self.classes {
            if class.name.is_empty() {
                return Err(CodegenError::Model("class name must not be empty".to_string()));
            }
            if !names.insert(class.name.as_str()) {
                return Err(CodegenError::Model(format!(
                    "duplicate class name {:?}",
                    class.name
                )));
            }
        }

        for class in &self.classes {
            if let Some(parent) = &class.extends {
                if !names.contains(parent.as_str()) {
                    return Err(CodegenError::Model(format!(
                        "class {:?} extends unknown class {parent:?}",
                        class.name
                    )));
                }
            }
            for attr in &class.attrs {
                if attr.name.is_empty() {
                    return Err(CodegenError::Model(format!(
                        "class {:?} has an attribute with an empty name",
                        class.name
                    )));
                }
                if class.kind == ClassKind::Enumeration {
                    continue;
                }
                if attr.types.is_empty() && !attr.prohibited {
                    return Err(CodegenError::Model(format!(
                        "attribute {}.{} has no types",
                        class.name, attr.name
                    )));
                }
                for ty in &attr.types {
                    if !ty.is_builtin() && !names.contains(ty.local_name()) {
                        return Err(CodegenError::Model(format!(
                            "attribute {}.{} references unknown type {ty}",
                            class.name, attr.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"
module: market_document
classes:
  - name: MarketDocument
    help: A market document.
    attrs:
      - name: mRID
        types: ["{http://www.w3.org/2001/XMLSchema}string"]
      - name: Period
        types: [TimePeriod]
        max_occurs: unbounded
      - name: revisionNumber
        types: ["xs:int"]
        min_occurs: 0
  - name: TimePeriod
    attrs:
      - name: start
        types: ["xs:dateTime"]
  - name: Status
    kind: enumeration
    attrs:
      - name: A01
        tag: enumeration
      - name: intermediate
        tag: enumeration
        default: A02
"#;

    #[test]
    fn parses_yaml_model() {
        let model = SchemaModel::from_yaml_str(MODEL).unwrap();
        assert_eq!(model.module, "market_document");
        assert_eq!(model.classes.len(), 3);

        let doc = model.class("MarketDocument").unwrap();
        assert_eq!(doc.kind, ClassKind::Complex);
        assert_eq!(doc.attrs[0].tag, AttrTag::Element);
        assert!(doc.attrs[1].is_list());
        assert!(doc.attrs[2].is_optional());
        assert!(!doc.attrs[0].is_optional());

        let status = model.class("Status").unwrap();
        assert_eq!(status.kind, ClassKind::Enumeration);
        assert_eq!(status.attrs[0].wire_value(), "A01");
        assert_eq!(status.attrs[1].wire_value(), "A02");
    }

    #[test]
    fn type_ref_names() {
        let qualified = TypeRef(format!("{{{XSD_NAMESPACE}}}duration"));
        assert_eq!(qualified.xsd_local(), Some("duration"));
        assert_eq!(qualified.local_name(), "duration");

        let prefixed = TypeRef("xs:string".to_string());
        assert_eq!(prefixed.xsd_local(), Some("string"));

        let other_ns = TypeRef("{urn:iec62325}Point".to_string());
        assert_eq!(other_ns.xsd_local(), None);
        assert_eq!(other_ns.local_name(), "Point");

        let bare = TypeRef("TimePeriod".to_string());
        assert!(!bare.is_builtin());
        assert_eq!(bare.local_name(), "TimePeriod");
    }

    #[test]
    fn rejects_unknown_reference() {
        let yaml = r#"
module: m
classes:
  - name: A
    attrs:
      - name: b
        types: [B]
"#;
        let err = SchemaModel::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown type B"), "{err}");
    }

    #[test]
    fn rejects_duplicate_class() {
        let yaml = "module: m\nclasses:\n  - name: A\n  - name: A\n";
        assert!(SchemaModel::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn colliding_class_names_get_distinct_idents() {
        let yaml = "module: m\nclasses:\n  - name: MarketDocument\n  - name: market_document\n";
        let model = SchemaModel::from_yaml_str(yaml).unwrap();
        let types = model.type_idents();
        assert_eq!(types.get("MarketDocument"), "MarketDocument");
        assert_eq!(types.get("market_document"), "MarketDocument2");
    }

    #[test]
    fn rejects_unknown_parent() {
        let yaml = "module: m\nclasses:\n  - name: A\n    extends: Missing\n";
        assert!(SchemaModel::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn rejects_untyped_field() {
        let yaml = "module: m\nclasses:\n  - name: A\n    attrs:\n      - name: x\n";
        assert!(SchemaModel::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn rejects_bad_max_occurs() {
        let yaml = r#"
module: m
classes:
  - name: A
    attrs:
      - name: x
        types: ["xs:string"]
        max_occurs: many
"#;
        assert!(SchemaModel::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn json_and_yaml_agree() {
        let yaml = SchemaModel::from_yaml_str(MODEL).unwrap();
        let json = serde_json::to_string(&yaml).unwrap();
        let back = SchemaModel::from_json_str(&json).unwrap();
        assert_eq!(back, yaml);
    }

    #[test]
    fn load_picks_parser_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{"module": "m", "classes": [{"name": "A"}]}"#).unwrap();
        let model = SchemaModel::load(&path).unwrap();
        assert_eq!(model.classes[0].name, "A");

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            SchemaModel::load(&missing),
            Err(CodegenError::ModelLoad { .. })
        ));
    }
}

//! # Output Formats
//!
//! An output format decides, class by class and field by field, what the
//! emitter writes: which derives a type carries, what Rust type a field
//! gets, which serde metadata sits on it, and which imports the module
//! needs. The emitter owns layout and ordering; the format owns every
//! per-field decision.
//!
//! Two formats ship with the crate:
//!
//! - [`PlainFormat`] (`plain`, built in): serde structs with generic types
//!   and no alias metadata.
//! - [`ValidatedFormat`] (`validated`): schema-name aliases on every field
//!   plus temporal type overrides from `xsmodel-core`.
//!
//! # Implementing a format
//!
//! ```ignore
//! struct Strict;
//!
//! impl OutputFormat for Strict {
//!     fn name(&self) -> &str { "strict" }
//!     fn description(&self) -> &str { "plain, but rejects unknown keys" }
//!     fn post_meta_hook(&self, _: &ClassSpec, _: &GeneratorConfig) -> Option<String> {
//!         Some("#[serde(deny_unknown_fields)]".to_string())
//!     }
//! }
//!
//! registry.register(Box::new(Strict))?;
//! ```

mod plain;
mod validated;

pub use plain::PlainFormat;
pub use validated::ValidatedFormat;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::alias::{AliasPair, FieldDescriptor};
use crate::config::GeneratorConfig;
use crate::model::{AttrSpec, AttrTag, ClassKind, ClassSpec, MaxOccurs, SchemaModel};
use crate::naming::TypeIdents;
use crate::types::{builtin_rust_type, TemporalKind};

/// Imports a format may need: module path → imported name → body patterns.
///
/// A name is imported only when one of its patterns occurs in the rendered
/// body. Both levels are sorted, so emission order is stable.
pub type ImportTable = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Everything a field-level hook may consult.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub model: &'a SchemaModel,
    /// Model-wide type identifiers, used for class references.
    pub types: &'a TypeIdents,
    pub class: &'a ClassSpec,
    pub attr: &'a AttrSpec,
    pub config: &'a GeneratorConfig,
}

/// A schema default expressed as a Rust expression of a builtin type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralDefault {
    /// Unwrapped field type, e.g. `String` or `u32`.
    pub rust_type: &'static str,
    /// Expression returning the default value.
    pub expr: String,
}

/// A code generation output format.
///
/// Default methods produce plain serde output; a format overrides only the
/// hooks it customizes.
pub trait OutputFormat: Send + Sync {
    /// Unique registry name.
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Derives for a generated type.
    fn class_derives(&self, class: &ClassSpec) -> Vec<&'static str> {
        match class.kind {
            ClassKind::Complex => vec!["Debug", "Clone", "PartialEq", "Serialize", "Deserialize"],
            ClassKind::Enumeration => vec![
                "Debug",
                "Clone",
                "Copy",
                "PartialEq",
                "Eq",
                "Hash",
                "Serialize",
                "Deserialize",
            ],
        }
    }

    /// Extra attribute lines placed after the derive, before the type.
    fn post_meta_hook(&self, _class: &ClassSpec, _config: &GeneratorConfig) -> Option<String> {
        None
    }

    /// Temporal type to use instead of the generic mapping, if any.
    fn resolve_temporal(&self, _ctx: &FieldContext<'_>) -> Option<TemporalKind> {
        None
    }

    /// Full Rust type of a field, including `Vec`/`Option` wrapping.
    fn field_type(&self, ctx: &FieldContext<'_>) -> String {
        generic_field_type(ctx, self.resolve_temporal(ctx))
    }

    /// Boundary names for a field. `None` keeps the Rust identifier as the
    /// wire name.
    fn field_aliases(&self, _ctx: &FieldContext<'_>) -> Option<AliasPair> {
        None
    }

    /// Items for the field's `#[serde(...)]` attribute, in order.
    fn field_attributes(&self, ctx: &FieldContext<'_>, field: &FieldDescriptor) -> Vec<String> {
        shaping_attributes(ctx.attr, field)
    }

    /// Imports this format's output may need.
    fn import_patterns(&self, _config: &GeneratorConfig) -> ImportTable {
        serde_imports()
    }
}

/// `serde::{Deserialize, Serialize}`, needed by every format.
pub fn serde_imports() -> ImportTable {
    let mut serde = BTreeMap::new();
    serde.insert("Deserialize".to_string(), vec!["Deserialize".to_string()]);
    serde.insert("Serialize".to_string(), vec!["Serialize".to_string()]);

    let mut table = ImportTable::new();
    table.insert("serde".to_string(), serde);
    table
}

/// Body patterns that indicate a field typed `name`.
pub fn type_patterns(name: &str) -> Vec<String> {
    vec![format!(": {name},"), format!("<{name}>")]
}

/// The generic field type: temporal override or builtin/class mapping,
/// wrapped for occurrence.
pub fn generic_field_type(ctx: &FieldContext<'_>, temporal: Option<TemporalKind>) -> String {
    let attr = ctx.attr;
    if attr.prohibited {
        return "Option<()>".to_string();
    }

    if let Some(default) = literal_default(ctx, temporal) {
        return default.rust_type.to_string();
    }

    let base = match temporal {
        Some(kind) => kind.type_name().to_string(),
        None => base_type(ctx),
    };

    if attr.is_list() {
        format!("Vec<{base}>")
    } else if attr.is_optional() || attr.nillable {
        format!("Option<{base}>")
    } else {
        base
    }
}

/// The unwrapped type of the primary type reference.
fn base_type(ctx: &FieldContext<'_>) -> String {
    let Some(primary) = ctx.attr.primary_type() else {
        return "String".to_string();
    };

    if let Some(local) = primary.xsd_local() {
        return match builtin_rust_type(local) {
            Some(ty) => ty.to_string(),
            None => {
                tracing::warn!(
                    class = %ctx.class.name,
                    attr = %ctx.attr.name,
                    xsd_type = %local,
                    "unmapped XSD builtin, using String"
                );
                "String".to_string()
            }
        };
    }

    let target = primary.local_name();
    let ident = ctx.types.get(target);
    if !ctx.attr.is_list() && reaches(ctx.model, target, &ctx.class.name) {
        format!("Box<{ident}>")
    } else {
        ident
    }
}

/// True when `from` contains `to` by value, directly or through other
/// classes. Lists are heap-allocated and never count.
fn reaches(model: &SchemaModel, from: &str, to: &str) -> bool {
    let mut stack = vec![from];
    let mut seen = std::collections::BTreeSet::new();
    while let Some(name) = stack.pop() {
        if name == to {
            return true;
        }
        if !seen.insert(name) {
            continue;
        }
        let Some(class) = model.class(name) else {
            continue;
        };
        if let Some(parent) = &class.extends {
            stack.push(parent.as_str());
        }
        for attr in &class.attrs {
            if attr.prohibited || attr.max_occurs != MaxOccurs::Bounded(1) {
                continue;
            }
            if let Some(ty) = attr.primary_type().filter(|t| !t.is_builtin()) {
                stack.push(ty.local_name());
            }
        }
    }
    false
}

/// The schema default of a single builtin-typed field, when it can be
/// written as a Rust literal.
///
/// Defaults on class, enumeration, temporal, list and choice fields are not
/// expressed; the emitter documents them instead.
pub fn literal_default(
    ctx: &FieldContext<'_>,
    temporal: Option<TemporalKind>,
) -> Option<LiteralDefault> {
    let attr = ctx.attr;
    let value = attr.default.as_deref()?;
    if attr.prohibited || attr.is_list() || temporal.is_some() {
        return None;
    }
    if attr.tag == AttrTag::Choice && attr.types.len() > 1 {
        return None;
    }
    let rust_type = builtin_rust_type(attr.primary_type()?.xsd_local()?)?;
    let expr = match rust_type {
        "String" => Some(format!("{value:?}.to_string()")),
        "bool" => match value.trim() {
            "true" | "1" => Some("true".to_string()),
            "false" | "0" => Some("false".to_string()),
            _ => None,
        },
        "i8" => int_literal::<i8>(value),
        "i16" => int_literal::<i16>(value),
        "i32" => int_literal::<i32>(value),
        "i64" => int_literal::<i64>(value),
        "u8" => int_literal::<u8>(value),
        "u16" => int_literal::<u16>(value),
        "u32" => int_literal::<u32>(value),
        "u64" => int_literal::<u64>(value),
        "f32" => value
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| format!("{v:?}")),
        "f64" => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| format!("{v:?}")),
        _ => None,
    };
    expr.map(|expr| LiteralDefault { rust_type, expr })
}

fn int_literal<T: FromStr + Display>(value: &str) -> Option<String> {
    value.trim().parse::<T>().ok().map(|n| n.to_string())
}

/// serde items that follow from occurrence and defaults.
pub fn shaping_attributes(attr: &AttrSpec, field: &FieldDescriptor) -> Vec<String> {
    if attr.prohibited {
        return vec!["skip".to_string()];
    }
    if let Some(default_fn) = &field.default_fn {
        return vec![format!("default = {default_fn:?}")];
    }
    if attr.is_list() {
        vec![
            "default".to_string(),
            "skip_serializing_if = \"Vec::is_empty\"".to_string(),
        ]
    } else if attr.is_optional() || attr.nillable {
        vec![
            "default".to_string(),
            "skip_serializing_if = \"Option::is_none\"".to_string(),
        ]
    } else {
        Vec::new()
    }
}

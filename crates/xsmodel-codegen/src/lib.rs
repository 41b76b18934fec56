//! # xsmodel-codegen - Output Formats for Schema-Model Code Generation
//!
//! Turns a resolved schema model (classes with typed attributes, loaded
//! from YAML or JSON) into a Rust module of serde-derived types.
//!
//! ## Pipeline
//!
//! 1. [`GeneratorConfig`] names the output format and carries the alias and
//!    temporal-type settings.
//! 2. [`GenerationRun::new`] resolves that format in a [`FormatRegistry`]
//!    once.
//! 3. [`GenerationRun::render`] walks the [`SchemaModel`] in order and
//!    asks the format, per class and per field, for derives, types, serde
//!    metadata and imports.
//!
//! ## Formats
//!
//! - `plain` (built in): generic field types, Rust identifiers on the wire.
//! - `validated`: every field keeps its schema name as its wire name via
//!   `#[serde(rename(...))]`, and configured fields are typed with the
//!   temporal wrappers from `xsmodel-core` (`EsmpDateTime`,
//!   `YmdhmDateTime`, `ValidatedXmlDuration`).
//!
//! ## Key Design Principles
//!
//! 1. **Explicit registry.** Formats are selected by name from a registry
//!    value, never by import side effects. The process-wide
//!    [`default_registry`] is built once and is read-only afterwards.
//!
//! 2. **One format per run.** Every decision in a run comes from the format
//!    resolved at its start.
//!
//! 3. **Deterministic output.** Same model, same config, same bytes.
//!
//! ## Crate Policy
//!
//! - Depends only on `xsmodel-core` internally.
//! - No XML Schema parsing here; the model arrives already resolved.
//! - No `.unwrap()` outside tests.

pub mod alias;
pub mod config;
pub mod emit;
pub mod error;
pub mod format;
pub mod model;
pub mod naming;
pub mod registry;
pub mod types;

pub use alias::{AliasOverride, AliasPair, FieldDescriptor};
pub use config::GeneratorConfig;
pub use emit::{generate, GenerationRun};
pub use error::{CodegenError, RegistryError};
pub use format::{
    FieldContext, ImportTable, LiteralDefault, OutputFormat, PlainFormat, ValidatedFormat,
};
pub use model::{AttrSpec, AttrTag, ClassKind, ClassSpec, MaxOccurs, SchemaModel, TypeRef};
pub use naming::{sanitize_field_ident, sanitize_type_ident, TypeIdents};
pub use registry::{default_registry, FormatRegistry, BUILTIN_FORMATS};
pub use types::{TemporalKind, TypeOverride};

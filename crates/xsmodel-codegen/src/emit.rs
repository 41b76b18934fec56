//! # Module Emission
//!
//! A [`GenerationRun`] renders one [`SchemaModel`] into one Rust module.
//! The output format is resolved from the registry exactly once, when the
//! run is created; every class and field in the run goes through that
//! format's hooks, so a module never mixes metadata from two formats.
//!
//! Output is a pure function of (model, config, format): classes in model
//! order, fields in attribute order, imports sorted, default functions
//! last. Rendering the same model twice produces byte-identical text.

use std::fmt::Write as _;

use crate::alias::{AliasPair, FieldDescriptor};
use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::format::{literal_default, FieldContext, LiteralDefault, OutputFormat};
use crate::model::{AttrTag, ClassKind, ClassSpec, SchemaModel};
use crate::naming::{sanitize_field_ident, sanitize_type_ident, IdentAllocator, TypeIdents};
use crate::registry::{default_registry, FormatRegistry};

/// Field name used for a flattened base class.
pub const BASE_FIELD: &str = "base";

const INDENT: &str = "    ";

/// One generation run bound to a single output format.
pub struct GenerationRun<'a> {
    format: &'a dyn OutputFormat,
    config: &'a GeneratorConfig,
}

impl<'a> GenerationRun<'a> {
    /// Resolve `config.format` in `registry`.
    pub fn new(
        registry: &'a FormatRegistry,
        config: &'a GeneratorConfig,
    ) -> Result<Self, CodegenError> {
        let format = registry.get(&config.format)?;
        tracing::debug!(format = %format.name(), "resolved output format");
        Ok(Self { format, config })
    }

    /// Name of the format this run uses.
    pub fn format_name(&self) -> &str {
        self.format.name()
    }

    /// Field descriptors for `class`, in attribute order, with identifiers
    /// unique within the class. Default functions are only assigned while
    /// rendering.
    pub fn describe_fields(&self, model: &SchemaModel, class: &ClassSpec) -> Vec<FieldDescriptor> {
        self.fields_for(model, &model.type_idents(), class)
    }

    fn fields_for(
        &self,
        model: &SchemaModel,
        types: &TypeIdents,
        class: &ClassSpec,
    ) -> Vec<FieldDescriptor> {
        let mut scope = IdentAllocator::new();
        if class.extends.is_some() {
            scope.reserve(BASE_FIELD);
        }

        class
            .attrs
            .iter()
            .map(|attr| {
                let candidate = sanitize_field_ident(&attr.name, &self.config.stop_words);
                let ident = scope.allocate(candidate, "_");
                let ctx = FieldContext {
                    model,
                    types,
                    class,
                    attr,
                    config: self.config,
                };
                let aliases = self
                    .format
                    .field_aliases(&ctx)
                    .unwrap_or_else(|| AliasPair::for_schema_name(&ident));
                FieldDescriptor::new(attr.name.clone(), ident, aliases)
            })
            .collect()
    }

    /// Render the whole module.
    pub fn render(&self, model: &SchemaModel) -> Result<String, CodegenError> {
        model.validate()?;

        let types = model.type_idents();
        let mut defaults = DefaultFns::default();
        let mut body = String::new();
        for (i, class) in model.classes.iter().enumerate() {
            if i > 0 {
                body.push('\n');
            }
            match class.kind {
                ClassKind::Complex => {
                    self.render_struct(&mut body, model, &types, class, &mut defaults)
                }
                ClassKind::Enumeration => self.render_enum(&mut body, &types, class),
            }
        }
        defaults.render(&mut body);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "//! Generated by xsmodel ({} format). Do not edit by hand.",
            self.format.name()
        );
        let _ = writeln!(out, "//!");
        let _ = writeln!(out, "//! Module `{}`.", model.module);
        if let Some(doc) = &model.doc {
            let _ = writeln!(out, "//!");
            for line in doc.trim().lines() {
                push_comment_line(&mut out, "", "//!", line);
            }
        }

        let imports = self.render_imports(&body);
        if !imports.is_empty() {
            out.push('\n');
            out.push_str(&imports);
        }
        if !body.is_empty() {
            out.push('\n');
            out.push_str(&body);
        }

        tracing::info!(
            module = %model.module,
            format = %self.format.name(),
            classes = model.classes.len(),
            bytes = out.len(),
            "rendered module"
        );
        Ok(out)
    }

    fn render_struct(
        &self,
        out: &mut String,
        model: &SchemaModel,
        types: &TypeIdents,
        class: &ClassSpec,
        defaults: &mut DefaultFns,
    ) {
        let mut fields = self.fields_for(model, types, class);
        let type_ident = types.get(&class.name);
        tracing::debug!(class = %class.name, fields = fields.len(), "rendering struct");

        if let Some(help) = &class.help {
            push_doc(out, "", help);
        }
        self.push_type_meta(out, class);
        let _ = writeln!(out, "pub struct {type_ident} {{");

        if let Some(parent) = &class.extends {
            let _ = writeln!(out, "{INDENT}#[serde(flatten)]");
            let _ = writeln!(out, "{INDENT}pub {BASE_FIELD}: {},", types.get(parent));
        }

        for (attr, field) in class.attrs.iter().zip(fields.iter_mut()) {
            let ctx = FieldContext {
                model,
                types,
                class,
                attr,
                config: self.config,
            };
            let literal = literal_default(&ctx, self.format.resolve_temporal(&ctx));

            if let Some(help) = &attr.help {
                push_doc(out, INDENT, help);
            }
            if attr.tag == AttrTag::Choice && attr.types.len() > 1 {
                let choices: Vec<String> = attr
                    .types
                    .iter()
                    .map(|t| format!("`{}`", t.local_name()))
                    .collect();
                push_doc(out, INDENT, &format!("Choice of: {}.", choices.join(", ")));
            }
            match (literal, &attr.default) {
                (Some(literal), _) => {
                    field.default_fn = Some(defaults.add(&type_ident, &field.ident, literal));
                }
                (None, Some(value)) => {
                    tracing::debug!(
                        class = %class.name,
                        attr = %attr.name,
                        default = %value,
                        "schema default has no literal form, documenting it"
                    );
                    let label = if attr.fixed { "Fixed value" } else { "Default value" };
                    push_doc(out, INDENT, &format!("{label}: `{value}`."));
                }
                (None, _) => {}
            }

            let items = self.format.field_attributes(&ctx, field);
            if !items.is_empty() {
                let _ = writeln!(out, "{INDENT}#[serde({})]", items.join(", "));
            }
            let _ = writeln!(out, "{INDENT}pub {}: {},", field.ident, self.format.field_type(&ctx));
        }
        out.push_str("}\n");
    }

    fn render_enum(&self, out: &mut String, types: &TypeIdents, class: &ClassSpec) {
        tracing::debug!(class = %class.name, variants = class.attrs.len(), "rendering enum");

        if let Some(help) = &class.help {
            push_doc(out, "", help);
        }
        self.push_type_meta(out, class);
        let _ = writeln!(out, "pub enum {} {{", types.get(&class.name));

        let mut scope = IdentAllocator::new();
        for attr in &class.attrs {
            let ident = scope.allocate(sanitize_type_ident(&attr.name), "");
            let wire = attr.wire_value();
            if let Some(help) = &attr.help {
                push_doc(out, INDENT, help);
            }
            if ident != wire {
                let _ = writeln!(out, "{INDENT}#[serde(rename = {wire:?})]");
            }
            let _ = writeln!(out, "{INDENT}{ident},");
        }
        out.push_str("}\n");
    }

    fn push_type_meta(&self, out: &mut String, class: &ClassSpec) {
        let derives = self.format.class_derives(class);
        let _ = writeln!(out, "#[derive({})]", derives.join(", "));
        if let Some(meta) = self.format.post_meta_hook(class, self.config) {
            out.push_str(meta.trim_end());
            out.push('\n');
        }
    }

    /// `use` lines for every import whose pattern occurs in `body`.
    fn render_imports(&self, body: &str) -> String {
        let mut out = String::new();
        for (module, names) in self.format.import_patterns(self.config) {
            let used: Vec<&str> = names
                .iter()
                .filter(|(_, patterns)| patterns.iter().any(|p| body.contains(p.as_str())))
                .map(|(name, _)| name.as_str())
                .collect();
            match used.as_slice() {
                [] => {}
                [single] => {
                    let _ = writeln!(out, "use {module}::{single};");
                }
                many => {
                    let _ = writeln!(out, "use {module}::{{{}}};", many.join(", "));
                }
            }
        }
        out
    }
}

/// Functions backing `#[serde(default = "...")]` on defaulted fields,
/// collected across one module.
#[derive(Debug, Default)]
struct DefaultFns {
    scope: IdentAllocator,
    items: Vec<(String, LiteralDefault)>,
}

impl DefaultFns {
    /// Register a default for `type_ident.field_ident`; returns the function
    /// name, unique within the module.
    fn add(&mut self, type_ident: &str, field_ident: &str, literal: LiteralDefault) -> String {
        let owner = sanitize_field_ident(type_ident, &[]);
        let name = self.scope.allocate(format!("default_{owner}_{field_ident}"), "_");
        self.items.push((name.clone(), literal));
        name
    }

    fn render(&self, out: &mut String) {
        for (name, literal) in &self.items {
            out.push('\n');
            let _ = writeln!(out, "fn {name}() -> {} {{", literal.rust_type);
            let _ = writeln!(out, "{INDENT}{}", literal.expr);
            out.push_str("}\n");
        }
    }
}

/// Render `model` with the process-wide registry.
pub fn generate(model: &SchemaModel, config: &GeneratorConfig) -> Result<String, CodegenError> {
    GenerationRun::new(default_registry(), config)?.render(model)
}

fn push_doc(out: &mut String, indent: &str, text: &str) {
    for line in text.trim().lines() {
        push_comment_line(out, indent, "///", line);
    }
}

fn push_comment_line(out: &mut String, indent: &str, marker: &str, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        let _ = writeln!(out, "{indent}{marker}");
    } else {
        let _ = writeln!(out, "{indent}{marker} {line}");
    }
}

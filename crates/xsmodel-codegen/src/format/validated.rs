//! The `validated` format: schema names on the wire, temporal types where
//! configured.

use std::collections::BTreeMap;

use super::{
    serde_imports, shaping_attributes, type_patterns, FieldContext, ImportTable, OutputFormat,
};
use crate::alias::{AliasPair, FieldDescriptor};
use crate::config::GeneratorConfig;
use crate::model::{AttrTag, ClassKind, ClassSpec};
use crate::types::{resolve_override, TemporalKind};

/// Alias metadata plus temporal type overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedFormat;

impl OutputFormat for ValidatedFormat {
    fn name(&self) -> &str {
        "validated"
    }

    fn description(&self) -> &str {
        "schema-name aliases on every field and validated temporal types"
    }

    fn post_meta_hook(&self, class: &ClassSpec, config: &GeneratorConfig) -> Option<String> {
        let eligible = class.kind == ClassKind::Complex && class.extends.is_none();
        (config.deny_unknown_fields && eligible).then(|| "#[serde(deny_unknown_fields)]".to_string())
    }

    fn resolve_temporal(&self, ctx: &FieldContext<'_>) -> Option<TemporalKind> {
        if ctx.attr.prohibited || ctx.attr.tag == AttrTag::Choice {
            return None;
        }
        resolve_override(&ctx.config.type_overrides, ctx.attr)
    }

    fn field_aliases(&self, ctx: &FieldContext<'_>) -> Option<AliasPair> {
        let name = ctx.attr.name.as_str();
        let pair = match ctx.config.alias_override(&ctx.class.name, name) {
            Some(over) => AliasPair::with_override(name, over),
            None => AliasPair::for_schema_name(name),
        };
        Some(pair)
    }

    fn field_attributes(&self, ctx: &FieldContext<'_>, field: &FieldDescriptor) -> Vec<String> {
        if ctx.attr.prohibited {
            return shaping_attributes(ctx.attr, field);
        }

        let mut items = Vec::new();
        if field.needs_rename() {
            items.push(format!(
                "rename(serialize = {:?}, deserialize = {:?})",
                field.aliases.serialization, field.aliases.validation
            ));
            // The identifier must not shadow another field's schema name.
            let shadows = ctx
                .class
                .attrs
                .iter()
                .any(|other| other.name != ctx.attr.name && other.name == field.ident);
            if ctx.config.populate_by_name && field.ident != field.aliases.validation && !shadows {
                items.push(format!("alias = {:?}", field.ident));
            }
        }
        items.extend(shaping_attributes(ctx.attr, field));
        items
    }

    fn import_patterns(&self, config: &GeneratorConfig) -> ImportTable {
        let mut table = serde_imports();
        let runtime: BTreeMap<String, Vec<String>> = TemporalKind::ALL
            .iter()
            .map(|kind| (kind.type_name().to_string(), type_patterns(kind.type_name())))
            .collect();
        table.insert(config.runtime_crate.clone(), runtime);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaModel;
    use crate::naming::sanitize_field_ident;

    const MODEL: &str = r#"
module: m
classes:
  - name: Series
    attrs:
      - name: createdDateTime
        types: ["xs:dateTime"]
      - name: start
        types: ["xs:string"]
      - name: resolution
        types: ["xs:duration"]
        min_occurs: 0
      - name: quantity
        types: ["xs:double"]
      - name: legacy
        types: ["xs:duration"]
        prohibited: true
      - name: payload
        tag: choice
        types: ["xs:duration", "xs:string"]
  - name: Child
    extends: Series
"#;

    fn run<R>(
        config: &GeneratorConfig,
        class: &str,
        attr: &str,
        f: impl FnOnce(&FieldContext<'_>) -> R,
    ) -> R {
        let model = SchemaModel::from_yaml_str(MODEL).unwrap();
        let types = model.type_idents();
        let class = model.class(class).unwrap();
        let attr = class.attrs.iter().find(|a| a.name == attr).unwrap();
        let ctx = FieldContext {
            model: &model,
            types: &types,
            class,
            attr,
            config,
        };
        f(&ctx)
    }

    fn descriptor(ctx: &FieldContext<'_>) -> FieldDescriptor {
        let ident = sanitize_field_ident(&ctx.attr.name, &ctx.config.stop_words);
        let aliases = ValidatedFormat
            .field_aliases(ctx)
            .unwrap_or_else(|| AliasPair::for_schema_name(&ident));
        FieldDescriptor::new(ctx.attr.name.clone(), ident, aliases)
    }

    #[test]
    fn temporal_overrides_apply() {
        let config = GeneratorConfig::default();
        let ty = |attr: &str| run(&config, "Series", attr, |c| ValidatedFormat.field_type(c));
        assert_eq!(ty("createdDateTime"), "EsmpDateTime");
        assert_eq!(ty("start"), "YmdhmDateTime");
        assert_eq!(ty("resolution"), "Option<ValidatedXmlDuration>");
        assert_eq!(ty("quantity"), "f64");
    }

    #[test]
    fn prohibited_and_choice_skip_overrides() {
        let config = GeneratorConfig::default();
        let ty = |attr: &str| run(&config, "Series", attr, |c| ValidatedFormat.field_type(c));
        assert_eq!(ty("legacy"), "Option<()>");
        assert_eq!(ty("payload"), "String");
    }

    #[test]
    fn rename_metadata_with_populate_by_name() {
        let config = GeneratorConfig::default();
        let items = run(&config, "Series", "createdDateTime", |c| {
            ValidatedFormat.field_attributes(c, &descriptor(c))
        });
        assert_eq!(
            items,
            vec![
                "rename(serialize = \"createdDateTime\", deserialize = \"createdDateTime\")",
                "alias = \"created_date_time\"",
            ]
        );
    }

    #[test]
    fn no_rename_when_names_coincide() {
        let config = GeneratorConfig::default();
        let items = run(&config, "Series", "start", |c| {
            ValidatedFormat.field_attributes(c, &descriptor(c))
        });
        assert!(items.is_empty());
    }

    #[test]
    fn populate_by_name_off_drops_alias() {
        let config = GeneratorConfig {
            populate_by_name: false,
            ..GeneratorConfig::default()
        };
        let items = run(&config, "Series", "createdDateTime", |c| {
            ValidatedFormat.field_attributes(c, &descriptor(c))
        });
        assert_eq!(items.len(), 1);
        assert!(items[0].starts_with("rename("));
    }

    #[test]
    fn configured_override_changes_one_side() {
        let yaml = "alias_overrides:\n  Series.start:\n    serialization: begin\n";
        let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
        let items = run(&config, "Series", "start", |c| {
            ValidatedFormat.field_attributes(c, &descriptor(c))
        });
        assert_eq!(
            items,
            vec!["rename(serialize = \"begin\", deserialize = \"start\")"]
        );
    }

    #[test]
    fn optional_fields_keep_shaping_after_rename() {
        let config = GeneratorConfig::default();
        let items = run(&config, "Series", "resolution", |c| {
            ValidatedFormat.field_attributes(c, &descriptor(c))
        });
        assert_eq!(items, vec!["default", "skip_serializing_if = \"Option::is_none\""]);
    }

    #[test]
    fn deny_unknown_fields_only_without_base() {
        let model = SchemaModel::from_yaml_str(MODEL).unwrap();
        let mut config = GeneratorConfig::default();
        let series = model.class("Series").unwrap();
        let child = model.class("Child").unwrap();
        assert_eq!(ValidatedFormat.post_meta_hook(series, &config), None);

        config.deny_unknown_fields = true;
        assert_eq!(
            ValidatedFormat.post_meta_hook(series, &config).as_deref(),
            Some("#[serde(deny_unknown_fields)]")
        );
        assert_eq!(ValidatedFormat.post_meta_hook(child, &config), None);
    }

    #[test]
    fn imports_use_runtime_crate() {
        let config = GeneratorConfig {
            runtime_crate: "runtime::time".to_string(),
            ..GeneratorConfig::default()
        };
        let table = ValidatedFormat.import_patterns(&config);
        let runtime = &table["runtime::time"];
        assert!(runtime.contains_key("EsmpDateTime"));
        assert!(runtime.contains_key("ValidatedXmlDuration"));
        assert!(table.contains_key("serde"));
    }
}

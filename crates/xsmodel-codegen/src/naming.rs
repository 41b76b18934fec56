//! # Identifier Sanitization
//!
//! Schema names are free-form (`mRID`, `createdDateTime`,
//! `time_Period.timeInterval`, `type`). Generated code needs Rust
//! identifiers: snake_case for fields, UpperCamelCase for types and
//! variants, never a keyword.
//!
//! Case conversion is `convert_case`; punctuation runs are turned into word
//! breaks first, and the keyword, stop-word and leading-digit rules are
//! applied on top. A name that is already a valid identifier of the right
//! case is returned unchanged, so sanitizing a sanitized name is a no-op.

use std::collections::{BTreeMap, BTreeSet};

use convert_case::{Case, Casing};

/// Strict and reserved Rust keywords, including edition-2024 `gen`.
pub const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Type names generated code already has in scope.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Self", "Box", "Option", "Result", "String", "Vec", "Serialize", "Deserialize",
    "EsmpDateTime", "YmdhmDateTime", "ValidatedXmlDuration",
];

/// Suffix appended to field names that collide with a reserved word.
const FIELD_RESERVED_SUFFIX: &str = "_value";

/// Suffix appended to type names that collide with a reserved name.
const TYPE_RESERVED_SUFFIX: &str = "Type";

/// Prefix for names that would start with a digit.
const FIELD_DIGIT_PREFIX: &str = "value_";
const TYPE_DIGIT_PREFIX: &str = "Value";

/// Derive a snake_case field identifier from a schema name.
///
/// `stop_words` extends the keyword list (the default configuration adds
/// `validate`).
pub fn sanitize_field_ident(name: &str, stop_words: &[String]) -> String {
    let reserved = |s: &str| RUST_KEYWORDS.contains(&s) || stop_words.iter().any(|w| w == s);

    if is_snake_ident(name) && !reserved(name) {
        return name.to_string();
    }

    let mut ident = words(name).to_case(Case::Snake);
    if ident.is_empty() {
        ident = "value".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, FIELD_DIGIT_PREFIX);
    }
    if reserved(&ident) {
        ident.push_str(FIELD_RESERVED_SUFFIX);
    }
    ident
}

/// Derive an UpperCamelCase type or variant identifier from a schema name.
pub fn sanitize_type_ident(name: &str) -> String {
    let reserved = |s: &str| RESERVED_TYPE_NAMES.contains(&s);

    if is_camel_ident(name) && !reserved(name) {
        return name.to_string();
    }

    let mut ident = words(name).to_case(Case::Pascal);
    if ident.is_empty() {
        ident = TYPE_DIGIT_PREFIX.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, TYPE_DIGIT_PREFIX);
    }
    if reserved(&ident) {
        ident.push_str(TYPE_RESERVED_SUFFIX);
    }
    ident
}

/// `[a-z_][a-z0-9_]*`, not `_` alone.
pub fn is_snake_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// `[A-Z][A-Za-z0-9]*`.
pub fn is_camel_ident(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Replace every run of non-ASCII-alphanumeric characters with one space,
/// so `.`, `-` and non-Latin letters all act as word breaks.
fn words(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hands out identifiers unique within one scope (a struct's fields or an
/// enum's variants), suffixing a counter on collision.
#[derive(Debug, Default)]
pub struct IdentAllocator {
    taken: BTreeSet<String>,
}

impl IdentAllocator {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier as used without allocating it.
    pub fn reserve(&mut self, ident: &str) {
        self.taken.insert(ident.to_string());
    }

    /// Allocate `candidate`, or `candidate{sep}2`, `candidate{sep}3`, ...
    pub fn allocate(&mut self, candidate: String, sep: &str) -> String {
        if self.taken.insert(candidate.clone()) {
            return candidate;
        }
        let mut n = 2usize;
        loop {
            let next = format!("{candidate}{sep}{n}");
            if self.taken.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }
}

/// Type identifiers for every class of one model, unique model-wide.
///
/// Allocated in model order, so the first class keeps the plain sanitized
/// name and a later class that sanitizes to the same identifier gets a
/// numeric suffix (`MarketDocument`, `MarketDocument2`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeIdents {
    by_name: BTreeMap<String, String>,
}

impl TypeIdents {
    /// Allocate identifiers for `names`, in order.
    pub fn allocate<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scope = IdentAllocator::new();
        let mut by_name = BTreeMap::new();
        for name in names {
            if by_name.contains_key(name) {
                continue;
            }
            let ident = scope.allocate(sanitize_type_ident(name), "");
            by_name.insert(name.to_string(), ident);
        }
        Self { by_name }
    }

    /// Identifier for the class `name`. Names outside the model fall back to
    /// plain sanitization.
    pub fn get(&self, name: &str) -> String {
        self.by_name
            .get(name)
            .cloned()
            .unwrap_or_else(|| sanitize_type_ident(name))
    }
}

//! # Output Format Registry
//!
//! Output formats are looked up by name. A registry starts with the
//! built-in formats; callers register their own before generating. Names
//! are unique and built-in names cannot be taken by a registered format.
//!
//! [`default_registry`] is the process-wide registry the CLI uses: built
//! once on first access with the built-ins plus `validated`, and never
//! mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::RegistryError;
use crate::format::{OutputFormat, PlainFormat, ValidatedFormat};

/// Names reserved by built-in formats.
pub const BUILTIN_FORMATS: &[&str] = &["plain"];

/// Output formats by name.
#[derive(Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn OutputFormat>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in formats.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(Box::new(PlainFormat));
        registry
    }

    fn insert(&mut self, format: Box<dyn OutputFormat>) {
        self.formats.insert(format.name().to_string(), format);
    }

    /// Register a format.
    ///
    /// # Errors
    ///
    /// Rejects empty names, names of built-in formats, and names already
    /// registered.
    pub fn register(&mut self, format: Box<dyn OutputFormat>) -> Result<(), RegistryError> {
        let name = format.name();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if BUILTIN_FORMATS.contains(&name) {
            return Err(RegistryError::Reserved(name.to_string()));
        }
        if self.formats.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        tracing::debug!(format = %name, "registered output format");
        self.insert(format);
        Ok(())
    }

    /// Look up a format by name.
    pub fn get(&self, name: &str) -> Result<&dyn OutputFormat, RegistryError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.formats.keys().map(String::as_str).collect()
    }

    /// Registered formats in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn OutputFormat> {
        self.formats.values().map(|f| f.as_ref())
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

/// The process-wide registry: built-ins plus `validated`.
pub fn default_registry() -> &'static FormatRegistry {
    static REGISTRY: OnceLock<FormatRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = FormatRegistry::with_builtins();
        registry.insert(Box::new(ValidatedFormat));
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl OutputFormat for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test format"
        }
    }

    #[test]
    fn builtins_present() {
        let registry = FormatRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["plain"]);
        assert_eq!(registry.get("plain").unwrap().name(), "plain");
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = FormatRegistry::with_builtins();
        registry.register(Box::new(ValidatedFormat)).unwrap();
        registry.register(Box::new(Named("strict"))).unwrap();
        assert_eq!(registry.names(), vec!["plain", "strict", "validated"]);
        assert_eq!(registry.get("strict").unwrap().description(), "test format");
    }

    #[test]
    fn rejects_reserved_name() {
        let mut registry = FormatRegistry::with_builtins();
        assert_eq!(
            registry.register(Box::new(Named("plain"))),
            Err(RegistryError::Reserved("plain".to_string()))
        );
        // Reserved even when the built-in is absent.
        let mut empty = FormatRegistry::new();
        assert!(matches!(
            empty.register(Box::new(Named("plain"))),
            Err(RegistryError::Reserved(_))
        ));
    }

    #[test]
    fn rejects_duplicate_and_empty() {
        let mut registry = FormatRegistry::with_builtins();
        registry.register(Box::new(Named("strict"))).unwrap();
        assert_eq!(
            registry.register(Box::new(Named("strict"))),
            Err(RegistryError::Duplicate("strict".to_string()))
        );
        assert_eq!(
            registry.register(Box::new(Named("  "))),
            Err(RegistryError::EmptyName)
        );
    }

    #[test]
    fn unknown_lists_available() {
        let registry = FormatRegistry::with_builtins();
        let err = registry.get("pydantic").err().unwrap();
        assert_eq!(
            err,
            RegistryError::Unknown {
                name: "pydantic".to_string(),
                available: "plain".to_string(),
            }
        );
        assert!(err.to_string().contains("available: plain"));
    }

    #[test]
    fn default_registry_is_shared() {
        let a = default_registry();
        let b = default_registry();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.names(), vec!["plain", "validated"]);
    }
}

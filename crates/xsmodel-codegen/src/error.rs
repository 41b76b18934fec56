//! # Error Types
//!
//! Errors raised while loading schema models and configuration, resolving
//! output formats, and emitting code.

use thiserror::Error;

/// Errors returned by code generation operations.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The schema model file could not be read or parsed.
    #[error("failed to load schema model {path}: {reason}")]
    ModelLoad {
        /// Path of the model file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema model is structurally inconsistent.
    #[error("invalid schema model: {0}")]
    Model(String),

    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// Output format lookup or registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the output-format registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A format with an empty name was registered.
    #[error("output format name must not be empty")]
    EmptyName,

    /// The name belongs to a built-in format.
    #[error("output format name {0:?} is reserved by a built-in format")]
    Reserved(String),

    /// A format with this name is already registered.
    #[error("output format {0:?} is already registered")]
    Duplicate(String),

    /// No format is registered under this name.
    #[error("unknown output format {name:?} (available: {available})")]
    Unknown {
        /// The requested name.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },
}

//! # Error Types
//!
//! Errors raised by the runtime types that generated models import. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Temporal validation errors always name the profile that rejected the
//!   value and carry the offending input verbatim.
//! - When a value arrives through serde, the error is surfaced as a
//!   field-level deserialization error, so the caller sees which field failed.

use thiserror::Error;

/// A raw or native temporal value does not satisfy its profile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The input is not a well-formed value of the base representation.
    #[error("{profile}: malformed value {input:?}: {reason} (expected {expected})")]
    Malformed {
        /// Profile name (e.g. "esmp-datetime").
        profile: &'static str,
        /// The rejected input.
        input: String,
        /// What went wrong.
        reason: String,
        /// Human-readable format hint for the profile.
        expected: &'static str,
    },

    /// A component the profile requires is absent.
    #[error("{profile}: {input:?} is missing the {component} (expected {expected})")]
    MissingComponent {
        /// Profile name.
        profile: &'static str,
        /// The rejected input.
        input: String,
        /// The absent component, e.g. "timezone offset".
        component: &'static str,
        /// Human-readable format hint for the profile.
        expected: &'static str,
    },

    /// A component the profile forbids is present.
    #[error("{profile}: {input:?} must not contain {component} (expected {expected})")]
    ForbiddenComponent {
        /// Profile name.
        profile: &'static str,
        /// The rejected input.
        input: String,
        /// The forbidden component, e.g. "seconds".
        component: &'static str,
        /// Human-readable format hint for the profile.
        expected: &'static str,
    },

    /// The value does not fit the base representation's range.
    #[error("{profile}: {input:?} is out of range")]
    OutOfRange {
        /// Profile name.
        profile: &'static str,
        /// The rejected input.
        input: String,
    },
}

impl TemporalError {
    /// Name of the profile that produced this error.
    pub fn profile(&self) -> &'static str {
        match self {
            Self::Malformed { profile, .. }
            | Self::MissingComponent { profile, .. }
            | Self::ForbiddenComponent { profile, .. }
            | Self::OutOfRange { profile, .. } => profile,
        }
    }

    /// The rejected input text.
    pub fn input(&self) -> &str {
        match self {
            Self::Malformed { input, .. }
            | Self::MissingComponent { input, .. }
            | Self::ForbiddenComponent { input, .. }
            | Self::OutOfRange { input, .. } => input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_profile_and_component() {
        let err = TemporalError::ForbiddenComponent {
            profile: "ymdhm-datetime",
            input: "2024-01-01T10:00:30".to_string(),
            component: "seconds",
            expected: "YYYY-MM-DDTHH:MMZ",
        };
        let msg = err.to_string();
        assert!(msg.starts_with("ymdhm-datetime:"));
        assert!(msg.contains("must not contain seconds"));
        assert_eq!(err.profile(), "ymdhm-datetime");
        assert_eq!(err.input(), "2024-01-01T10:00:30");
    }
}

//! # Type Mapping
//!
//! Maps XSD builtin types onto Rust types, and selected fields onto the
//! temporal types from `xsmodel-core`.
//!
//! The builtin map is deliberately conservative: anything whose lexical
//! space does not fit a Rust primitive exactly (decimals, dates, binary
//! blobs, `anyType`) stays a `String`. Temporal precision is opted into per
//! field through [`TypeOverride`] rules, not inferred from the XSD type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use xsmodel_core::{
    BaseKind, EsmpDateTime, MarketTimestamp, MinuteTimestamp, RestrictedDuration, TemporalError,
    TemporalProfile, ValidatedXmlDuration, YmdhmDateTime,
};

use crate::model::{AttrSpec, AttrTag};

/// Rust type for an XSD builtin local name.
///
/// Returns `None` for names outside the XSD builtin set; callers fall back
/// to `String` and log the miss.
pub fn builtin_rust_type(xsd_local: &str) -> Option<&'static str> {
    let ty = match xsd_local {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "NMTOKEN"
        | "NMTOKENS" | "ID" | "IDREF" | "IDREFS" | "ENTITY" | "ENTITIES" | "anyURI" | "QName"
        | "NOTATION" => "String",
        "boolean" => "bool",
        "byte" => "i8",
        "short" => "i16",
        "int" => "i32",
        "long" | "integer" | "negativeInteger" | "nonPositiveInteger" => "i64",
        "unsignedByte" => "u8",
        "unsignedShort" => "u16",
        "unsignedInt" => "u32",
        "unsignedLong" | "positiveInteger" | "nonNegativeInteger" => "u64",
        "float" => "f32",
        "double" => "f64",
        "decimal" | "dateTime" | "dateTimeStamp" | "date" | "time" | "duration"
        | "dayTimeDuration" | "yearMonthDuration" | "gYear" | "gYearMonth" | "gMonth"
        | "gMonthDay" | "gDay" | "base64Binary" | "hexBinary" | "anyType"
        | "anySimpleType" | "anyAtomicType" => "String",
        _ => return None,
    };
    Some(ty)
}

/// The temporal types generated code can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporalKind {
    /// `ValidatedXmlDuration`: time-only durations.
    RestrictedDuration,
    /// `EsmpDateTime`: second precision, explicit offset.
    EsmpDatetime,
    /// `YmdhmDateTime`: minute precision.
    YmdhmDatetime,
}

impl TemporalKind {
    /// Every kind, in declaration order.
    pub const ALL: [TemporalKind; 3] = [
        TemporalKind::RestrictedDuration,
        TemporalKind::EsmpDatetime,
        TemporalKind::YmdhmDatetime,
    ];

    /// Name of the runtime type generated code imports.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::RestrictedDuration => RestrictedDuration::TYPE_NAME,
            Self::EsmpDatetime => MarketTimestamp::TYPE_NAME,
            Self::YmdhmDatetime => MinuteTimestamp::TYPE_NAME,
        }
    }

    /// Profile name, as used in errors and configuration.
    pub fn profile_name(self) -> &'static str {
        match self {
            Self::RestrictedDuration => RestrictedDuration::NAME,
            Self::EsmpDatetime => MarketTimestamp::NAME,
            Self::YmdhmDatetime => MinuteTimestamp::NAME,
        }
    }

    /// Accepted lexical form.
    pub fn format_hint(self) -> &'static str {
        match self {
            Self::RestrictedDuration => RestrictedDuration::FORMAT_HINT,
            Self::EsmpDatetime => MarketTimestamp::FORMAT_HINT,
            Self::YmdhmDatetime => MinuteTimestamp::FORMAT_HINT,
        }
    }

    /// Whether the profile wraps a point in time or a duration.
    pub fn base(self) -> BaseKind {
        match self {
            Self::RestrictedDuration => RestrictedDuration::BASE,
            Self::EsmpDatetime => MarketTimestamp::BASE,
            Self::YmdhmDatetime => MinuteTimestamp::BASE,
        }
    }

    /// Validate `raw` against this profile and return its canonical form.
    pub fn canonicalize(self, raw: &str) -> Result<String, TemporalError> {
        match self {
            Self::RestrictedDuration => ValidatedXmlDuration::parse(raw).map(|v| v.render()),
            Self::EsmpDatetime => EsmpDateTime::parse(raw).map(|v| v.render()),
            Self::YmdhmDatetime => YmdhmDateTime::parse(raw).map(|v| v.render()),
        }
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_name())
    }
}

impl FromStr for TemporalKind {
    type Err = String;

    /// Accepts the profile name or a short form (`duration`, `esmp`, `ymdhm`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restricted-duration" | "duration" => Ok(Self::RestrictedDuration),
            "esmp-datetime" | "esmp" => Ok(Self::EsmpDatetime),
            "ymdhm-datetime" | "ymdhm" => Ok(Self::YmdhmDatetime),
            other => Err(format!(
                "unknown temporal profile {other:?} (expected duration, esmp or ymdhm)"
            )),
        }
    }
}

/// A rule pointing matching attributes at a temporal type.
///
/// Every present criterion must hold: `tag` equal, attribute name in
/// `names`, primary type's XSD local name equal to `xsd_type`. A rule with
/// no criteria matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<AttrTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xsd_type: Option<String>,
    pub target: TemporalKind,
}

impl TypeOverride {
    /// True when `attr` satisfies every criterion of this rule.
    pub fn matches(&self, attr: &AttrSpec) -> bool {
        if self.tag.is_none() && self.names.is_empty() && self.xsd_type.is_none() {
            return false;
        }
        if self.tag.is_some_and(|tag| tag != attr.tag) {
            return false;
        }
        if !self.names.is_empty() && !self.names.iter().any(|n| *n == attr.name) {
            return false;
        }
        if let Some(xsd) = &self.xsd_type {
            let primary = attr.primary_type().and_then(|t| t.xsd_local());
            if primary != Some(xsd.as_str()) {
                return false;
            }
        }
        true
    }

    /// The built-in rules for market-document schemas.
    pub fn defaults() -> Vec<TypeOverride> {
        vec![
            TypeOverride {
                tag: Some(AttrTag::Element),
                names: vec!["createdDateTime".to_string()],
                xsd_type: None,
                target: TemporalKind::EsmpDatetime,
            },
            TypeOverride {
                tag: Some(AttrTag::Element),
                names: vec!["start".to_string(), "end".to_string()],
                xsd_type: None,
                target: TemporalKind::YmdhmDatetime,
            },
            TypeOverride {
                tag: None,
                names: Vec::new(),
                xsd_type: Some("duration".to_string()),
                target: TemporalKind::RestrictedDuration,
            },
        ]
    }
}

/// The first matching rule's target.
///
/// Later rules are consulted only when earlier ones do not match, so the
/// duration rule never overrides a name-based rule.
pub fn resolve_override(rules: &[TypeOverride], attr: &AttrSpec) -> Option<TemporalKind> {
    rules.iter().find(|rule| rule.matches(attr)).map(|rule| rule.target)
}

//! # Temporal Profiles
//!
//! Generated models use these types wherever a schema field needs a stricter
//! or differently shaped representation than its generic XSD type implies.
//!
//! A profile pairs a base representation with a parse rule and a render
//! rule. [`Temporal<P>`] is the single wrapper type; the three aliases below
//! are what generated code imports:
//!
//! | Alias | Profile | Base | Accepts | Canonical form |
//! |-------|---------|------|---------|----------------|
//! | [`ValidatedXmlDuration`] | [`RestrictedDuration`] | [`XmlDuration`] | `PT1H30M`, `PT0.5S` | as written |
//! | [`EsmpDateTime`] | [`MarketTimestamp`] | `DateTime<Utc>` | `2024-01-01T10:00:00+01:00` | `2024-01-01T09:00:00Z` |
//! | [`YmdhmDateTime`] | [`MinuteTimestamp`] | `DateTime<Utc>` | `2024-01-01T10:00` | `2024-01-01T10:00Z` |
//!
//! ## Invariant
//!
//! A `Temporal<P>` can only be obtained through `P::parse` or `P::check`, so
//! every value in a model already satisfies its profile. Validation happens
//! at construction; serde deserialization goes through the same path and
//! reports failures as field-level errors.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Timelike, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::duration::XmlDuration;
use crate::error::TemporalError;

/// The base representation a profile wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    /// A point in time.
    PointInTime,
    /// A signed length of time.
    Duration,
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PointInTime => "point in time",
            Self::Duration => "duration",
        })
    }
}

/// A named parse/validate/render rule over a temporal base value.
pub trait TemporalProfile {
    /// The base representation.
    type Value: Clone + fmt::Debug + PartialEq + Eq + Hash + Ord;

    /// Stable profile name used in error messages.
    const NAME: &'static str;

    /// Name under which generated code refers to the wrapped type.
    const TYPE_NAME: &'static str;

    /// Human-readable description of the accepted lexical form.
    const FORMAT_HINT: &'static str;

    /// Which base representation this profile wraps.
    const BASE: BaseKind;

    /// Parse raw text into the base representation, applying the
    /// profile's structural rule.
    fn parse(raw: &str) -> Result<Self::Value, TemporalError>;

    /// Validate a natively constructed base value.
    fn check(value: &Self::Value) -> Result<(), TemporalError>;

    /// Render a value in the profile's canonical text form.
    fn render(value: &Self::Value) -> String;

    /// JSON Schema fragment describing the wire form.
    fn json_schema() -> Value;
}

/// A base value that has passed its profile's validation.
pub struct Temporal<P: TemporalProfile> {
    value: P::Value,
    _profile: PhantomData<fn() -> P>,
}

/// Duration without calendar-date components.
pub type ValidatedXmlDuration = Temporal<RestrictedDuration>;

/// Second-precision timestamp with a mandatory timezone.
pub type EsmpDateTime = Temporal<MarketTimestamp>;

/// Minute-precision timestamp without seconds.
pub type YmdhmDateTime = Temporal<MinuteTimestamp>;

impl<P: TemporalProfile> Temporal<P> {
    /// Wrap a native base value after checking it against the profile.
    pub fn new(value: P::Value) -> Result<Self, TemporalError> {
        P::check(&value)?;
        Ok(Self::wrap(value))
    }

    /// Parse and validate raw text.
    pub fn parse(raw: &str) -> Result<Self, TemporalError> {
        P::parse(raw).map(Self::wrap)
    }

    fn wrap(value: P::Value) -> Self {
        Self {
            value,
            _profile: PhantomData,
        }
    }

    /// Access the base value.
    pub fn get(&self) -> &P::Value {
        &self.value
    }

    /// Consume the wrapper, returning the base value.
    pub fn into_inner(self) -> P::Value {
        self.value
    }

    /// Render in the profile's canonical form.
    pub fn render(&self) -> String {
        P::render(&self.value)
    }

    /// Name of the profile.
    pub fn profile_name() -> &'static str {
        P::NAME
    }

    /// Base representation of the profile.
    pub fn base_kind() -> BaseKind {
        P::BASE
    }
}

impl ValidatedXmlDuration {
    /// Build from a `TimeDelta`; the result is always time-only.
    pub fn from_time_delta(delta: TimeDelta) -> Self {
        Self::wrap(XmlDuration::from_time_delta(delta))
    }

    /// Convert to a `TimeDelta`. `None` on overflow.
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        self.value.to_time_delta()
    }
}

impl<P: TemporalProfile<Value = DateTime<Utc>>> Temporal<P> {
    /// Wrap a timezone-aware value, converting it to UTC first.
    pub fn from_datetime<Tz: chrono::TimeZone>(dt: DateTime<Tz>) -> Result<Self, TemporalError> {
        Self::new(dt.with_timezone(&Utc))
    }
}

impl<P: TemporalProfile> Clone for Temporal<P> {
    fn clone(&self) -> Self {
        Self::wrap(self.value.clone())
    }
}

impl<P: TemporalProfile> fmt::Debug for Temporal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(P::TYPE_NAME).field(&self.value).finish()
    }
}

impl<P: TemporalProfile> PartialEq for Temporal<P> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<P: TemporalProfile> Eq for Temporal<P> {}

impl<P: TemporalProfile> PartialOrd for Temporal<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: TemporalProfile> Ord for Temporal<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<P: TemporalProfile> Hash for Temporal<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<P: TemporalProfile> fmt::Display for Temporal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<P: TemporalProfile> FromStr for Temporal<P> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<P: TemporalProfile> TryFrom<&str> for Temporal<P> {
    type Error = TemporalError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl<P: TemporalProfile> Serialize for Temporal<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl<'de, P: TemporalProfile> Deserialize<'de> for Temporal<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Restricted duration
// ---------------------------------------------------------------------------

/// Time-of-day scale durations: hours, minutes and (fractional) seconds only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictedDuration {}

impl TemporalProfile for RestrictedDuration {
    type Value = XmlDuration;

    const NAME: &'static str = "restricted-duration";
    const TYPE_NAME: &'static str = "ValidatedXmlDuration";
    const FORMAT_HINT: &'static str = "[-]PTnHnMnS (e.g. PT15M)";
    const BASE: BaseKind = BaseKind::Duration;

    fn parse(raw: &str) -> Result<XmlDuration, TemporalError> {
        let value = XmlDuration::parse_for(raw, Self::NAME, Self::FORMAT_HINT)?;
        reject_date_components(&value, raw)?;
        Ok(value)
    }

    fn check(value: &XmlDuration) -> Result<(), TemporalError> {
        reject_date_components(value, &value.to_string())
    }

    fn render(value: &XmlDuration) -> String {
        value.to_string()
    }

    fn json_schema() -> Value {
        json!({
            "type": "string",
            "format": "duration",
            "pattern": r"^-?PT(?:\d+H(?:\d+M)?(?:\d+(?:\.\d+)?S)?|\d+M(?:\d+(?:\.\d+)?S)?|\d+(?:\.\d+)?S)$",
            "description": "An ISO 8601 duration without date components (e.g. 'PT15M' for 15 minutes, 'PT2H30M' for 2 hours 30 minutes)."
        })
    }
}

fn reject_date_components(value: &XmlDuration, raw: &str) -> Result<(), TemporalError> {
    match value.date_designators().first().copied() {
        None => Ok(()),
        Some(first) => Err(TemporalError::ForbiddenComponent {
            profile: RestrictedDuration::NAME,
            input: raw.to_string(),
            component: first,
            expected: RestrictedDuration::FORMAT_HINT,
        }),
    }
}

// ---------------------------------------------------------------------------
// Profile A: market timestamps
// ---------------------------------------------------------------------------

/// `YYYY-MM-DDTHH:MM:SS` with a mandatory `Z` or `±HH:MM` offset.
///
/// Values are normalized to UTC and rendered with a `Z` suffix, second
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketTimestamp {}

impl TemporalProfile for MarketTimestamp {
    type Value = DateTime<Utc>;

    const NAME: &'static str = "esmp-datetime";
    const TYPE_NAME: &'static str = "EsmpDateTime";
    const FORMAT_HINT: &'static str = "YYYY-MM-DDTHH:MM:SS with Z or ±HH:MM (e.g. 2024-01-01T10:00:00Z)";
    const BASE: BaseKind = BaseKind::PointInTime;

    fn parse(raw: &str) -> Result<DateTime<Utc>, TemporalError> {
        let parts = split_datetime::<Self>(raw)?;
        let offset = parts.offset.ok_or_else(|| missing::<Self>(raw, "timezone offset"))?;
        let second = parts.second.ok_or_else(|| missing::<Self>(raw, "seconds"))?;
        if parts.fraction.is_some() {
            return Err(forbidden::<Self>(raw, "fractional seconds"));
        }
        assemble::<Self>(raw, &parts, second, offset)
    }

    fn check(value: &DateTime<Utc>) -> Result<(), TemporalError> {
        if value.nanosecond() != 0 {
            return Err(forbidden::<Self>(&value.to_rfc3339(), "fractional seconds"));
        }
        Ok(())
    }

    fn render(value: &DateTime<Utc>) -> String {
        value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    fn json_schema() -> Value {
        json!({
            "type": "string",
            "format": "date-time",
            "pattern": r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:Z|[+-]\d{2}:\d{2})$",
            "description": "A second-precision timestamp with an explicit timezone (e.g. '2024-01-01T10:00:00Z')."
        })
    }
}

// ---------------------------------------------------------------------------
// Profile B: minute timestamps
// ---------------------------------------------------------------------------

/// `YYYY-MM-DDTHH:MM` with no seconds; an optional `Z` or `±HH:MM` offset,
/// UTC when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinuteTimestamp {}

impl TemporalProfile for MinuteTimestamp {
    type Value = DateTime<Utc>;

    const NAME: &'static str = "ymdhm-datetime";
    const TYPE_NAME: &'static str = "YmdhmDateTime";
    const FORMAT_HINT: &'static str = "YYYY-MM-DDTHH:MM with optional Z or ±HH:MM (e.g. 2024-01-01T10:00Z)";
    const BASE: BaseKind = BaseKind::PointInTime;

    fn parse(raw: &str) -> Result<DateTime<Utc>, TemporalError> {
        let parts = split_datetime::<Self>(raw)?;
        if parts.second.is_some() {
            return Err(forbidden::<Self>(raw, "seconds"));
        }
        if parts.fraction.is_some() {
            return Err(forbidden::<Self>(raw, "fractional seconds"));
        }
        let offset = parts.offset.unwrap_or_else(utc_offset);
        assemble::<Self>(raw, &parts, 0, offset)
    }

    fn check(value: &DateTime<Utc>) -> Result<(), TemporalError> {
        if value.second() != 0 {
            return Err(forbidden::<Self>(&value.to_rfc3339(), "seconds"));
        }
        if value.nanosecond() != 0 {
            return Err(forbidden::<Self>(&value.to_rfc3339(), "fractional seconds"));
        }
        Ok(())
    }

    fn render(value: &DateTime<Utc>) -> String {
        value.format("%Y-%m-%dT%H:%MZ").to_string()
    }

    fn json_schema() -> Value {
        json!({
            "type": "string",
            "format": "date-time",
            "pattern": r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(?:Z|[+-]\d{2}:\d{2})?$",
            "description": "A minute-precision timestamp without seconds (e.g. '2024-01-01T10:00Z')."
        })
    }
}

// ---------------------------------------------------------------------------
// Shared date-time scanning
// ---------------------------------------------------------------------------

/// Lexical pieces of `YYYY-MM-DDTHH:MM[:SS[.fff]][Z|±HH:MM]`.
#[derive(Debug)]
struct DateTimeParts {
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: Option<u32>,
    fraction: Option<u32>,
    offset: Option<FixedOffset>,
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn split_datetime<P: TemporalProfile>(raw: &str) -> Result<DateTimeParts, TemporalError> {
    let (date_text, rest) = raw
        .split_once('T')
        .ok_or_else(|| missing::<P>(raw, "time of day"))?;

    if !is_ymd_shape(date_text) {
        return Err(malformed::<P>(raw, "date must be YYYY-MM-DD"));
    }
    let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
        .map_err(|_| malformed::<P>(raw, "date must be YYYY-MM-DD"))?;

    let (clock, offset) = split_offset::<P>(raw, rest)?;

    let mut fields = clock.split(':');
    let hour = two_digits::<P>(raw, fields.next(), "hour")?;
    let minute = match fields.next() {
        Some(m) => two_digits::<P>(raw, Some(m), "minute")?,
        None => return Err(missing::<P>(raw, "minute")),
    };
    let (second, fraction) = match fields.next() {
        None => (None, None),
        Some(sec) => {
            let (whole, frac) = match sec.split_once('.') {
                Some((w, f)) => (w, Some(f)),
                None => (sec, None),
            };
            let second = two_digits::<P>(raw, Some(whole), "second")?;
            let fraction = match frac {
                None => None,
                Some(f) if !f.is_empty() && f.len() <= 9 && f.bytes().all(|b| b.is_ascii_digit()) => {
                    let padded = format!("{f:0<9}");
                    Some(padded.parse().map_err(|_| malformed::<P>(raw, "invalid fractional seconds"))?)
                }
                Some(_) => return Err(malformed::<P>(raw, "invalid fractional seconds")),
            };
            (Some(second), fraction)
        }
    };
    if fields.next().is_some() {
        return Err(malformed::<P>(raw, "too many time fields"));
    }

    Ok(DateTimeParts {
        date,
        hour,
        minute,
        second,
        fraction,
        offset,
    })
}

/// Exactly `dddd-dd-dd` in ASCII digits. chrono's `%Y` alone also takes a
/// sign or padding.
fn is_ymd_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Split a trailing `Z` or `±HH:MM` off the time-of-day text.
fn split_offset<'a, P: TemporalProfile>(
    raw: &str,
    rest: &'a str,
) -> Result<(&'a str, Option<FixedOffset>), TemporalError> {
    if let Some(clock) = rest.strip_suffix('Z') {
        return Ok((clock, Some(utc_offset())));
    }
    let Some(idx) = rest.rfind(['+', '-']) else {
        return Ok((rest, None));
    };
    let (clock, tz) = rest.split_at(idx);
    let sign = if tz.starts_with('-') { -1 } else { 1 };
    let (h, m) = tz[1..]
        .split_once(':')
        .ok_or_else(|| malformed::<P>(raw, "offset must be ±HH:MM"))?;
    let hours = two_digits::<P>(raw, Some(h), "offset hour")?;
    let minutes = two_digits::<P>(raw, Some(m), "offset minute")?;
    if hours > 14 || minutes > 59 {
        return Err(TemporalError::OutOfRange {
            profile: P::NAME,
            input: raw.to_string(),
        });
    }
    let seconds = sign * i32::try_from(hours * 3600 + minutes * 60).unwrap_or(0);
    let offset = FixedOffset::east_opt(seconds).ok_or_else(|| TemporalError::OutOfRange {
        profile: P::NAME,
        input: raw.to_string(),
    })?;
    Ok((clock, Some(offset)))
}

fn two_digits<P: TemporalProfile>(
    raw: &str,
    field: Option<&str>,
    what: &'static str,
) -> Result<u32, TemporalError> {
    match field {
        Some(f) if f.len() == 2 && f.bytes().all(|b| b.is_ascii_digit()) => f
            .parse()
            .map_err(|_| malformed::<P>(raw, &format!("invalid {what}"))),
        Some(_) => Err(malformed::<P>(raw, &format!("{what} must be two digits"))),
        None => Err(malformed::<P>(raw, &format!("missing {what}"))),
    }
}

fn assemble<P: TemporalProfile>(
    raw: &str,
    parts: &DateTimeParts,
    second: u32,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, TemporalError> {
    let time = NaiveTime::from_hms_opt(parts.hour, parts.minute, second).ok_or_else(|| {
        TemporalError::OutOfRange {
            profile: P::NAME,
            input: raw.to_string(),
        }
    })?;
    NaiveDateTime::new(parts.date, time)
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TemporalError::OutOfRange {
            profile: P::NAME,
            input: raw.to_string(),
        })
}

fn malformed<P: TemporalProfile>(raw: &str, reason: &str) -> TemporalError {
    TemporalError::Malformed {
        profile: P::NAME,
        input: raw.to_string(),
        reason: reason.to_string(),
        expected: P::FORMAT_HINT,
    }
}

fn missing<P: TemporalProfile>(raw: &str, component: &'static str) -> TemporalError {
    TemporalError::MissingComponent {
        profile: P::NAME,
        input: raw.to_string(),
        component,
        expected: P::FORMAT_HINT,
    }
}

fn forbidden<P: TemporalProfile>(raw: &str, component: &'static str) -> TemporalError {
    TemporalError::ForbiddenComponent {
        profile: P::NAME,
        input: raw.to_string(),
        component,
        expected: P::FORMAT_HINT,
    }
}

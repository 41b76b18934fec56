//! # XML Schema Durations
//!
//! `XmlDuration` is the base representation behind the restricted duration
//! profile. It parses and renders the lexical form shared by `xs:duration`
//! and ISO 8601: `[-]PnYnMnWnDTnHnMnS`, where only the seconds component may
//! carry a decimal fraction.
//!
//! Components keep the shape they were written in: `PT90M` stays `PT90M`
//! rather than being normalized to `PT1H30M`. Two durations compare equal
//! only when they were written with the same components.
//!
//! Conversion to `chrono::TimeDelta` is approximate for calendar components
//! (one year counts as 365 days, one month as 30 days).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TemporalError;

const PROFILE: &str = "xml-duration";
const EXPECTED: &str = "[-]PnYnMnWnDTnHnMnS (e.g. PT15M or P1Y2M10DT2H30M)";

/// Maximum number of fractional second digits (nanosecond precision).
const MAX_FRACTION_DIGITS: usize = 9;

/// Decimal seconds stored as whole seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecimalSeconds {
    /// Whole seconds.
    pub whole: u64,
    /// Fractional part, in nanoseconds.
    pub nanos: u32,
}

impl fmt::Display for DecimalSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return write!(f, "{}", self.whole);
        }
        let fraction = format!("{:09}", self.nanos);
        write!(f, "{}.{}", self.whole, fraction.trim_end_matches('0'))
    }
}

/// A parsed `xs:duration` / ISO 8601 duration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlDuration {
    negative: bool,
    years: Option<u64>,
    months: Option<u64>,
    weeks: Option<u64>,
    days: Option<u64>,
    hours: Option<u64>,
    minutes: Option<u64>,
    seconds: Option<DecimalSeconds>,
}

impl XmlDuration {
    /// Parse the lexical form of a duration.
    pub fn parse(raw: &str) -> Result<Self, TemporalError> {
        Self::parse_for(raw, PROFILE, EXPECTED)
    }

    /// Parse, attributing any error to the given profile.
    pub(crate) fn parse_for(
        raw: &str,
        profile: &'static str,
        expected: &'static str,
    ) -> Result<Self, TemporalError> {
        let malformed = |reason: &str| TemporalError::Malformed {
            profile,
            input: raw.to_string(),
            reason: reason.to_string(),
            expected,
        };

        let mut rest = raw;
        let negative = match rest.strip_prefix('-') {
            Some(r) => {
                rest = r;
                true
            }
            None => false,
        };
        rest = rest
            .strip_prefix('P')
            .ok_or_else(|| malformed("duration must start with 'P'"))?;

        let (date_part, time_part) = match rest.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (rest, None),
        };

        let mut out = XmlDuration::empty(negative);

        let date_slots: [(char, &mut Option<u64>); 4] = [
            ('Y', &mut out.years),
            ('M', &mut out.months),
            ('W', &mut out.weeks),
            ('D', &mut out.days),
        ];
        let date_components = scan_components(date_part, date_slots, raw, profile, expected)?;

        let mut time_components = 0;
        if let Some(time) = time_part {
            if time.is_empty() {
                return Err(malformed("'T' must be followed by at least one time component"));
            }
            let (integral, seconds) = match time.strip_suffix('S') {
                Some(head) => {
                    let split = head
                        .char_indices()
                        .rev()
                        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
                        .map(|(i, c)| i + c.len_utf8())
                        .unwrap_or(0);
                    let secs = parse_seconds(&head[split..], raw, profile, expected)?;
                    (&head[..split], Some(secs))
                }
                None => (time, None),
            };
            let time_slots: [(char, &mut Option<u64>); 2] =
                [('H', &mut out.hours), ('M', &mut out.minutes)];
            time_components = scan_components(integral, time_slots, raw, profile, expected)?;
            if let Some(secs) = seconds {
                out.seconds = Some(secs);
                time_components += 1;
            }
        }

        if date_components == 0 && time_components == 0 {
            return Err(malformed("duration has no components"));
        }

        Ok(out)
    }

    fn empty(negative: bool) -> Self {
        Self {
            negative,
            years: None,
            months: None,
            weeks: None,
            days: None,
            hours: None,
            minutes: None,
            seconds: None,
        }
    }

    /// Build a time-only duration (`PTnHnMnS`) from a non-negative or
    /// negative `TimeDelta`. Zero renders as `PT0S`.
    pub fn from_time_delta(delta: TimeDelta) -> Self {
        let negative = delta < TimeDelta::zero();
        let abs = delta.abs();
        let total = abs.num_seconds().unsigned_abs();
        let nanos = abs.subsec_nanos().unsigned_abs();

        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let whole = total % 60;

        let mut out = XmlDuration::empty(negative);
        if hours > 0 {
            out.hours = Some(hours);
        }
        if minutes > 0 {
            out.minutes = Some(minutes);
        }
        if whole > 0 || nanos > 0 || (hours == 0 && minutes == 0) {
            out.seconds = Some(DecimalSeconds { whole, nanos });
        }
        out
    }

    /// Whether the duration is negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Years component, if written.
    pub fn years(&self) -> Option<u64> {
        self.years
    }

    /// Months component, if written.
    pub fn months(&self) -> Option<u64> {
        self.months
    }

    /// Weeks component, if written.
    pub fn weeks(&self) -> Option<u64> {
        self.weeks
    }

    /// Days component, if written.
    pub fn days(&self) -> Option<u64> {
        self.days
    }

    /// Hours component, if written.
    pub fn hours(&self) -> Option<u64> {
        self.hours
    }

    /// Minutes component, if written.
    pub fn minutes(&self) -> Option<u64> {
        self.minutes
    }

    /// Seconds component, if written.
    pub fn seconds(&self) -> Option<DecimalSeconds> {
        self.seconds
    }

    /// True when any of the year, month, week or day designators is present.
    pub fn has_date_components(&self) -> bool {
        self.years.is_some() || self.months.is_some() || self.weeks.is_some() || self.days.is_some()
    }

    /// Names of the date designators present, in lexical order.
    pub fn date_designators(&self) -> Vec<&'static str> {
        [
            (self.years.is_some(), "years"),
            (self.months.is_some(), "months"),
            (self.weeks.is_some(), "weeks"),
            (self.days.is_some(), "days"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
    }

    /// Approximate this duration as a `TimeDelta`.
    ///
    /// Years count as 365 days and months as 30 days. Returns `None` on
    /// overflow.
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        let days = self
            .years
            .unwrap_or(0)
            .checked_mul(365)?
            .checked_add(self.months.unwrap_or(0).checked_mul(30)?)?
            .checked_add(self.weeks.unwrap_or(0).checked_mul(7)?)?
            .checked_add(self.days.unwrap_or(0))?;
        let secs = self
            .hours
            .unwrap_or(0)
            .checked_mul(3600)?
            .checked_add(self.minutes.unwrap_or(0).checked_mul(60)?)?
            .checked_add(self.seconds.map(|s| s.whole).unwrap_or(0))?;
        let nanos = self.seconds.map(|s| s.nanos).unwrap_or(0);

        let delta = TimeDelta::try_days(i64::try_from(days).ok()?)?
            .checked_add(&TimeDelta::try_seconds(i64::try_from(secs).ok()?)?)?
            .checked_add(&TimeDelta::nanoseconds(i64::from(nanos)))?;

        Some(if self.negative { -delta } else { delta })
    }
}

/// Scan `<digits><designator>` pairs in the fixed designator order, filling
/// the matching slots. Returns how many components were found.
fn scan_components<const N: usize>(
    mut text: &str,
    mut slots: [(char, &mut Option<u64>); N],
    raw: &str,
    profile: &'static str,
    expected: &'static str,
) -> Result<usize, TemporalError> {
    let malformed = |reason: String| TemporalError::Malformed {
        profile,
        input: raw.to_string(),
        reason,
        expected,
    };

    let mut next_slot = 0;
    let mut found = 0;
    while !text.is_empty() {
        let digits_end = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| malformed(format!("number {text:?} has no designator")))?;
        if digits_end == 0 {
            return Err(malformed(format!("expected a number before {text:?}")));
        }
        let (digits, tail) = text.split_at(digits_end);
        let mut chars = tail.chars();
        let designator = chars.next().unwrap_or_default();

        let position = slots[next_slot..]
            .iter()
            .position(|(d, _)| *d == designator)
            .ok_or_else(|| {
                malformed(format!("unexpected or out-of-order designator {designator:?}"))
            })?;
        let index = next_slot + position;

        let value: u64 = digits.parse().map_err(|_| TemporalError::OutOfRange {
            profile,
            input: raw.to_string(),
        })?;
        *slots[index].1 = Some(value);

        next_slot = index + 1;
        found += 1;
        text = chars.as_str();
    }
    Ok(found)
}

fn parse_seconds(
    text: &str,
    raw: &str,
    profile: &'static str,
    expected: &'static str,
) -> Result<DecimalSeconds, TemporalError> {
    let malformed = |reason: &str| TemporalError::Malformed {
        profile,
        input: raw.to_string(),
        reason: reason.to_string(),
        expected,
    };

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("seconds must start with a digit"));
    }
    let whole: u64 = whole.parse().map_err(|_| TemporalError::OutOfRange {
        profile,
        input: raw.to_string(),
    })?;

    let nanos = match fraction {
        None => 0,
        Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(malformed("fractional seconds need digits after '.'"));
        }
        Some(f) if f.len() > MAX_FRACTION_DIGITS => {
            return Err(malformed("fractional seconds exceed nanosecond precision"));
        }
        Some(f) => {
            let padded = format!("{f:0<9}");
            padded.parse::<u32>().map_err(|_| malformed("invalid fractional seconds"))?
        }
    };

    Ok(DecimalSeconds { whole, nanos })
}

impl fmt::Display for XmlDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if let Some(v) = value {
                write!(f, "{v}{designator}")?;
            }
        }

        let has_time = self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some();
        if has_time {
            f.write_str("T")?;
            if let Some(h) = self.hours {
                write!(f, "{h}H")?;
            }
            if let Some(m) = self.minutes {
                write!(f, "{m}M")?;
            }
            if let Some(s) = self.seconds {
                write!(f, "{s}S")?;
            }
        } else if !self.has_date_components() {
            f.write_str("T0S")?;
        }
        Ok(())
    }
}

/// Durations order by their approximate length, then by lexical form.
impl PartialOrd for XmlDuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XmlDuration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_time_delta()
            .cmp(&other.to_time_delta())
            .then_with(|| self.to_string().cmp(&other.to_string()))
    }
}

impl FromStr for XmlDuration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for XmlDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for XmlDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_only() {
        let d = XmlDuration::parse("PT1H30M").unwrap();
        assert_eq!(d.hours(), Some(1));
        assert_eq!(d.minutes(), Some(30));
        assert_eq!(d.seconds(), None);
        assert!(!d.has_date_components());
        assert_eq!(d.to_string(), "PT1H30M");
    }

    #[test]
    fn parses_full_form() {
        let d = XmlDuration::parse("P1Y2M10DT2H30M").unwrap();
        assert_eq!(d.years(), Some(1));
        assert_eq!(d.months(), Some(2));
        assert_eq!(d.days(), Some(10));
        assert!(d.has_date_components());
        assert_eq!(d.date_designators(), vec!["years", "months", "days"]);
        assert_eq!(d.to_string(), "P1Y2M10DT2H30M");
    }

    #[test]
    fn month_and_minute_designators_are_disambiguated_by_t() {
        let d = XmlDuration::parse("P1MT1M").unwrap();
        assert_eq!(d.months(), Some(1));
        assert_eq!(d.minutes(), Some(1));
    }

    #[test]
    fn fractional_seconds() {
        let d = XmlDuration::parse("PT0.250S").unwrap();
        assert_eq!(d.seconds(), Some(DecimalSeconds { whole: 0, nanos: 250_000_000 }));
        assert_eq!(d.to_string(), "PT0.25S");
    }

    #[test]
    fn negative_duration() {
        let d = XmlDuration::parse("-PT15M").unwrap();
        assert!(d.is_negative());
        assert_eq!(d.to_time_delta(), Some(-TimeDelta::minutes(15)));
        assert_eq!(d.to_string(), "-PT15M");
    }

    #[test]
    fn rejects_malformed() {
        for raw in ["", "P", "PT", "1H", "PT1H30", "PTH", "PT1M1H", "P1D1Y", "P1.5D", "PT1.S", "PT.5S", "PT1H-2M"] {
            assert!(XmlDuration::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn rejects_multibyte_text_before_seconds() {
        for raw in ["PTé5S", "PT1Hé5S", "PT€0.5S", "Pé1D"] {
            assert!(
                matches!(XmlDuration::parse(raw), Err(TemporalError::Malformed { .. })),
                "{raw:?} should be rejected as malformed"
            );
        }
        let err = serde_json::from_str::<XmlDuration>("\"PTé5S\"").unwrap_err();
        assert!(err.to_string().contains("PTé5S"));
    }

    #[test]
    fn rejects_overflow() {
        let err = XmlDuration::parse("PT99999999999999999999H").unwrap_err();
        assert!(matches!(err, TemporalError::OutOfRange { .. }));
    }

    #[test]
    fn time_delta_approximates_calendar_units() {
        let d = XmlDuration::parse("P1Y1M1DT1H").unwrap();
        let expected = TimeDelta::days(365 + 30 + 1) + TimeDelta::hours(1);
        assert_eq!(d.to_time_delta(), Some(expected));
    }

    #[test]
    fn from_time_delta_is_time_only() {
        let d = XmlDuration::from_time_delta(TimeDelta::minutes(90) + TimeDelta::milliseconds(500));
        assert_eq!(d.to_string(), "PT1H30M0.5S");
        assert!(!d.has_date_components());

        assert_eq!(XmlDuration::from_time_delta(TimeDelta::zero()).to_string(), "PT0S");
        assert_eq!(XmlDuration::from_time_delta(TimeDelta::hours(-2)).to_string(), "-PT2H");
    }

    #[test]
    fn serde_uses_lexical_form() {
        let d = XmlDuration::parse("PT15M").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"PT15M\"");
        let back: XmlDuration = serde_json::from_str("\"PT15M\"").unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<XmlDuration>("\"15 minutes\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rendering a parsed duration and parsing it again is stable.
        #[test]
        fn render_is_reparseable(
            h in proptest::option::of(0u64..10_000),
            m in proptest::option::of(0u64..10_000),
            s in proptest::option::of(0u64..10_000),
            d in proptest::option::of(0u64..400),
        ) {
            prop_assume!(h.is_some() || m.is_some() || s.is_some() || d.is_some());
            let mut raw = String::from("P");
            if let Some(d) = d { raw.push_str(&format!("{d}D")); }
            if h.is_some() || m.is_some() || s.is_some() {
                raw.push('T');
                if let Some(h) = h { raw.push_str(&format!("{h}H")); }
                if let Some(m) = m { raw.push_str(&format!("{m}M")); }
                if let Some(s) = s { raw.push_str(&format!("{s}S")); }
            }
            let parsed = XmlDuration::parse(&raw).unwrap();
            prop_assert_eq!(parsed.to_string(), raw.clone());
            prop_assert_eq!(XmlDuration::parse(&parsed.to_string()).unwrap(), parsed);
        }

        /// Parsing arbitrary text never panics.
        #[test]
        fn parse_never_panics(raw in "\\PC{0,24}") {
            let _ = XmlDuration::parse(&raw);
        }
    }
}

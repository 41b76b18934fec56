//! # Check Subcommand
//!
//! Validates literal values against one temporal profile and prints each
//! value's canonical form, the same text a generated model would serialize.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use xsmodel_codegen::TemporalKind;

/// Arguments for the `xsmodel check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Profile: duration, esmp or ymdhm (full profile names also accepted).
    #[arg(long, short)]
    pub profile: TemporalKind,

    /// Values to check.
    #[arg(value_name = "VALUE", required = true)]
    pub values: Vec<String>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every value passes, 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let mut stdout = std::io::stdout().lock();
    check_values(args, &mut stdout)
}

/// Check every value, writing one line per value to `out`.
pub fn check_values(args: &CheckArgs, out: &mut impl Write) -> Result<u8> {
    let mut failed = 0usize;
    for value in &args.values {
        match args.profile.canonicalize(value) {
            Ok(canonical) => writeln!(out, "OK    {value} -> {canonical}")?,
            Err(e) => {
                failed += 1;
                tracing::debug!(profile = %args.profile, input = %value, error = %e, "value rejected");
                writeln!(out, "FAIL  {value}: {e}")?;
            }
        }
    }

    if failed > 0 {
        writeln!(
            out,
            "\n{failed} of {} value(s) failed; expected a {} as {}",
            args.values.len(),
            args.profile.base(),
            args.profile.format_hint()
        )?;
        return Ok(1);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(profile: TemporalKind, values: &[&str]) -> (u8, String) {
        let args = CheckArgs {
            profile,
            values: values.iter().map(|v| v.to_string()).collect(),
        };
        let mut buf = Vec::new();
        let code = check_values(&args, &mut buf).unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn passing_values_print_canonical_form() {
        let (code, out) = check(TemporalKind::EsmpDatetime, &["2024-01-01T10:00:00+01:00"]);
        assert_eq!(code, 0);
        assert_eq!(out, "OK    2024-01-01T10:00:00+01:00 -> 2024-01-01T09:00:00Z\n");
    }

    #[test]
    fn failures_set_exit_code() {
        let (code, out) = check(TemporalKind::RestrictedDuration, &["PT1H30M", "P1DT1H"]);
        assert_eq!(code, 1);
        assert!(out.contains("OK    PT1H30M -> PT1H30M"));
        assert!(out.contains("FAIL  P1DT1H:"));
        assert!(out.contains("1 of 2 value(s) failed; expected a duration as [-]PTnHnMnS"));
    }

    #[test]
    fn minute_profile() {
        let (code, _) = check(TemporalKind::YmdhmDatetime, &["2024-01-01T10:00"]);
        assert_eq!(code, 0);
        let (code, out) = check(TemporalKind::YmdhmDatetime, &["2024-01-01T10:00:30"]);
        assert_eq!(code, 1);
        assert!(out.starts_with("FAIL  2024-01-01T10:00:30:"));
    }
}

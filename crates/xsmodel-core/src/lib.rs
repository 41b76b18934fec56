//! # xsmodel-core - Runtime Types for Generated Models
//!
//! Models generated with the `validated` output format import their
//! temporal field types from this crate. Everything here is plain data plus
//! validation; there is no global state beyond the zero-sized profile types.
//!
//! ## Key Design Principles
//!
//! 1. **One wrapper, many profiles.** [`Temporal<P>`] pairs a base value with
//!    a [`TemporalProfile`]: the profile owns the parse rule, the native
//!    check, and the canonical rendering. New profiles are new marker types,
//!    not new wrappers.
//!
//! 2. **Validation at construction.** A wrapped value has always passed its
//!    profile. Serde deserialization goes through the same parse path, so a
//!    bad wire value fails as a field-level error.
//!
//! 3. **Canonical rendering.** Serialization always emits the profile's
//!    canonical form, so a serialize/deserialize round trip reproduces the
//!    same value.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `xsmodel-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod duration;
pub mod error;
pub mod temporal;

pub use duration::{DecimalSeconds, XmlDuration};
pub use error::TemporalError;
pub use temporal::{
    BaseKind, EsmpDateTime, MarketTimestamp, MinuteTimestamp, RestrictedDuration, Temporal,
    TemporalProfile, ValidatedXmlDuration, YmdhmDateTime,
};

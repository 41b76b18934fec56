//! Generated by xsmodel (validated format). Do not edit by hand.
//!
//! Module `publication_market_document`.
//!
//! Publication market document (IEC 62325-451-3).

use serde::{Deserialize, Serialize};
use xsmodel_core::{EsmpDateTime, ValidatedXmlDuration, YmdhmDateTime};

/// Electronic document publishing market results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationMarketDocument {
    #[serde(rename(serialize = "mRID", deserialize = "mRID"), alias = "m_rid")]
    pub m_rid: String,
    #[serde(rename(serialize = "revisionNumber", deserialize = "revisionNumber"), alias = "revision_number")]
    pub revision_number: String,
    #[serde(rename(serialize = "type", deserialize = "type"), alias = "type_value")]
    pub type_value: MessageKindTypeList,
    #[serde(rename(serialize = "createdDateTime", deserialize = "createdDateTime"), alias = "created_date_time")]
    pub created_date_time: EsmpDateTime,
    #[serde(rename(serialize = "period.timeInterval", deserialize = "period.timeInterval"), alias = "period_time_interval")]
    pub period_time_interval: EsmpDateTimeInterval,
    #[serde(rename(serialize = "TimeSeries", deserialize = "TimeSeries"), alias = "time_series", default, skip_serializing_if = "Vec::is_empty")]
    pub time_series: Vec<TimeSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsmpDateTimeInterval {
    pub start: YmdhmDateTime,
    pub end: YmdhmDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    #[serde(rename(serialize = "mRID", deserialize = "mRID"), alias = "m_rid")]
    pub m_rid: String,
    #[serde(rename(serialize = "curveType", deserialize = "curveType"), alias = "curve_type", default = "default_time_series_curve_type")]
    pub curve_type: String,
    #[serde(rename(serialize = "Period", deserialize = "Period"), alias = "period", default, skip_serializing_if = "Vec::is_empty")]
    pub period: Vec<SeriesPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPeriod {
    #[serde(rename(serialize = "timeInterval", deserialize = "timeInterval"), alias = "time_interval")]
    pub time_interval: EsmpDateTimeInterval,
    pub resolution: ValidatedXmlDuration,
    #[serde(rename(serialize = "Point", deserialize = "Point"), alias = "point", default, skip_serializing_if = "Vec::is_empty")]
    pub point: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: u32,
    #[serde(rename(serialize = "price.amount", deserialize = "price.amount"), alias = "price_amount", default, skip_serializing_if = "Option::is_none")]
    pub price_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// Message kind codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKindTypeList {
    /// Price document.
    A44,
    /// Allocation result document.
    A25,
}

fn default_time_series_curve_type() -> String {
    "A01".to_string()
}

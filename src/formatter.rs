//! # Presentation Formatter
//! Turns decoded reports into display strings. Prices are fixed point numbers scaled by 1e18.

use chrono::{DateTime, SecondsFormat, Utc};
use ethers::types::U256;
use lazy_static::lazy_static;
use serde::Serialize;

use crate::decoder::{DecodedReport, FieldValue};
use crate::feed_id::FeedId;
use crate::normalizer::pick_price;
use crate::report::Report;

pub const PRICE_DECIMALS: usize = 18;
pub const DISPLAY_DECIMALS: usize = 2;
pub const NOT_AVAILABLE: &str = "n/a";

lazy_static! {
    // One cent expressed in the 1e18 fixed point scale.
    static ref CENT: U256 = U256::exp10(PRICE_DECIMALS - DISPLAY_DECIMALS);
    static ref HALF_CENT: U256 = *CENT / 2;
}

/// Unix seconds as an ISO-8601 UTC string with millisecond precision.
pub fn format_timestamp(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
        .map(|date_time| date_time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Renders a 1e18 scaled value as dollars rounded to cents, half away from zero.
/// Non numeric values are passed through as is.
pub fn format_price(value: Option<&FieldValue>) -> String {
    let value = match value {
        Some(value) => value,
        None => return NOT_AVAILABLE.to_string(),
    };
    let scaled = match value.as_i256() {
        Some(scaled) => scaled,
        None => return value.to_string(),
    };

    let cents = (scaled.unsigned_abs() + *HALF_CENT) / *CENT;
    let sign = if scaled.is_negative() && !cents.is_zero() {
        "-"
    } else {
        ""
    };
    let hundred = U256::from(100);
    format!("${}{}.{:02}", sign, cents / hundred, (cents % hundred).as_u64())
}

pub fn feed_label(feed_name: Option<&str>, feed_id: &FeedId) -> String {
    match feed_name {
        Some(name) => format!("{} ({})", name, feed_id),
        None => feed_id.to_string(),
    }
}

/// Everything shown for a single report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub feed: String,
    pub blob_length: usize,
    pub decoded: DecodedReport,
    pub observations_timestamp: String,
    pub valid_from_timestamp: String,
    pub market_status: String,
    pub price: String,
}

impl ReportSummary {
    pub fn build(label: &str, report: &Report, decoded: DecodedReport) -> ReportSummary {
        let market_status = decoded
            .get("marketStatus")
            .map(|status| status.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let price = format_price(pick_price(&decoded));

        ReportSummary {
            feed: label.to_string(),
            blob_length: report.blob_len(),
            observations_timestamp: format_timestamp(report.observations_timestamp),
            valid_from_timestamp: format_timestamp(report.valid_from_timestamp),
            market_status,
            price,
            decoded,
        }
    }
}

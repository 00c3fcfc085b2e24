//! Wall-clock helpers shared by models and services.
//!
//! # Invariants
//! - Timestamps are UTC; their text form keeps all nine fractional digits so
//!   it round-trips through storage unchanged and sorts in time order.
//! - "Today" is the local calendar date, not the UTC date.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};

/// Text layout used for calendar dates at every boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a timestamp as fixed-width `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ`.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

//! Timestamps are stored in UTC as fixed-width text so lexical order equals chronological order.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::StorageError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Formats a UTC timestamp as `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses text written by [`encode_timestamp`].
pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| StorageError::CorruptRow(format!("bad timestamp {:?}: {}", raw, e)))
}

//! Entry timestamps.

use chrono::{DateTime, Local, NaiveDateTime};

/// Local time in ISO-8601 with microseconds, no offset (`2024-05-01T12:30:00.123456`).
pub fn now_iso8601() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Human form `YYYY-MM-DD HH:MM:SS`; falls back to splitting on `T`, then to the raw text.
pub fn format_created(timestamp: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Some((date, rest)) = timestamp.split_once('T') {
        let time = rest.split('.').next().unwrap_or(rest);
        return format!("{date} {time}");
    }
    timestamp.to_string()
}

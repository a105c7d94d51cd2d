// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short relative-time formatting ("5s", "3m", "2h", "4d").

use chrono::{DateTime, SecondsFormat, Utc};

/// (suffix, threshold in seconds at which the unit kicks in, unit length)
const UNITS: [(&str, u64, u64); 6] = [
    ("y", 320 * 24 * 3600, 365 * 24 * 3600),
    ("mo", 26 * 24 * 3600, 30 * 24 * 3600),
    ("d", 22 * 3600, 24 * 3600),
    ("h", 45 * 60, 3600),
    ("m", 45, 60),
    ("s", 0, 1),
];

/// Format an elapsed duration, rounding to the nearest unit.
pub fn format_elapsed(secs: u64) -> String {
    for (suffix, threshold, unit) in UNITS {
        if secs >= threshold {
            let n = (secs + unit / 2) / unit;
            return format!("{n}{suffix}");
        }
    }
    "0s".to_string()
}

/// Time elapsed since an RFC 3339 timestamp, or `None` when it does not parse.
pub fn format_since(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let then = DateTime::parse_from_rfc3339(timestamp).ok()?;
    let secs = now.signed_duration_since(then.with_timezone(&Utc)).num_seconds().max(0);
    Some(format_elapsed(secs as u64))
}

/// Canonical timestamp form stored in records: UTC with milliseconds.
pub fn to_iso8601(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;

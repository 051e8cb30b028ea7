//! Unit conversion and display formatting.
//!
//! All seconds/milliseconds conversion goes through this module so the draft
//! read path and the save path cannot diverge in rounding. Monitors store
//! durations in milliseconds; timeouts are edited in seconds.

use std::time::{SystemTime, UNIX_EPOCH};

const MS_PER_SECOND: f64 = 1000.0;

/// Convert a user-facing seconds value to milliseconds, rounding to the
/// nearest millisecond. Negative input clamps to 0.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * MS_PER_SECOND).round() as u64
}

/// Convert a stored milliseconds value to user-facing seconds.
pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / MS_PER_SECOND
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Round a percentage to two decimal places (66.666… → 66.67).
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a millisecond duration for display ("450ms", "12.50s", "3.2m", "1.5h").
pub fn format_ms(ms: i64) -> String {
    if ms < 0 {
        return format!("-{}", format_ms(-ms));
    }
    if ms < 1_000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1_000.0)
    } else if ms < 3_600_000 {
        format!("{:.1}m", ms as f64 / 60_000.0)
    } else {
        format!("{:.1}h", ms as f64 / 3_600_000.0)
    }
}

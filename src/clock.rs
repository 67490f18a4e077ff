//! Wall-clock source for reconcile-trigger timestamps.
//!
//! Triggers are RFC3339 UTC timestamps with a fixed nine-digit fraction, so
//! lexical order equals chronological order.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Supplies the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Format a trigger timestamp.
pub fn format_trigger(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a trigger previously written by any writer that used RFC3339.
pub fn parse_trigger(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Next trigger value given the one the resource currently carries.
///
/// The result is strictly newer than `previous` whenever `previous` is a
/// parseable timestamp, even if the local clock reads earlier (skew) or
/// identically (resolution).
pub fn next_trigger(previous: Option<&str>, now: DateTime<Utc>) -> String {
    let stamp = match previous.and_then(parse_trigger) {
        Some(prev) if prev >= now => prev + Duration::nanoseconds(1),
        _ => now,
    };
    format_trigger(stamp)
}

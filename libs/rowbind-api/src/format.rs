//! Value-to-text rules shared by the JSON and CSV encoders.

use std::fmt::Write as _;

use base64::Engine;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// How timestamps are rendered as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampLayout {
    /// `YYYY-MM-DD HH:MM:SS.fff`: milliseconds truncated, trailing zeros
    /// of the fraction trimmed, fraction omitted when zero.
    #[default]
    DateTime,
    /// `YYYY-MM-DD`.
    DateOnly,
}

/// Append `ts` to `out` using `layout`.
pub fn write_timestamp(out: &mut String, ts: &NaiveDateTime, layout: TimestampLayout) {
    let _ = write!(out, "{:04}-{:02}-{:02}", ts.year(), ts.month(), ts.day());
    if layout == TimestampLayout::DateOnly {
        return;
    }
    let _ = write!(out, " {:02}:{:02}:{:02}", ts.hour(), ts.minute(), ts.second());

    // Leap seconds carry nanos >= 1e9.
    let millis = (ts.nanosecond() % 1_000_000_000) / 1_000_000;
    if millis > 0 {
        let frac = format!("{millis:03}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
}

pub fn format_timestamp(ts: &NaiveDateTime, layout: TimestampLayout) -> String {
    let mut out = String::with_capacity(23);
    write_timestamp(&mut out, ts, layout);
    out
}

/// Append the standard (padded) base64 encoding of `bytes` to `out`.
pub fn write_base64(out: &mut String, bytes: &[u8]) {
    base64::engine::general_purpose::STANDARD.encode_string(bytes, out);
}

pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

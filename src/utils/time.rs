//! Time utilities: elapsed-seconds arithmetic and HH:MM:SS formatting.
//!
//! Every function here is pure. Negative or non-finite inputs are clamped
//! to zero before formatting so a skewed clock never produces a negative
//! display value.

use crate::errors::{AppError, AppResult};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3600;

/// Render `seconds` as `HH:MM:SS`.
///
/// Hours are zero-padded to two digits but never wrap into days, so a
/// 100 hour total renders as `100:00:00`. Negative input renders as
/// `00:00:00`.
pub fn format_duration(seconds: i64) -> String {
    let s = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        s / SECS_PER_HOUR,
        (s % SECS_PER_HOUR) / SECS_PER_MINUTE,
        s % SECS_PER_MINUTE
    )
}

/// Same as [`format_duration`] for fractional input. NaN and infinities
/// clamp to zero; fractions are truncated.
pub fn format_duration_f64(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_duration(0);
    }
    format_duration(seconds as i64)
}

/// Parse `HH:MM:SS` (or `MM:SS`) back into seconds.
pub fn parse_duration(s: &str) -> Option<i64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let nums: Vec<i64> = parts
        .iter()
        .map(|p| p.parse::<i64>().ok().filter(|n| *n >= 0))
        .collect::<Option<Vec<_>>>()?;

    match nums.as_slice() {
        [h, m, sec] if *m < 60 && *sec < 60 => Some(h * SECS_PER_HOUR + m * SECS_PER_MINUTE + sec),
        [m, sec] if *sec < 60 => Some(m * SECS_PER_MINUTE + sec),
        _ => None,
    }
}

/// Seconds elapsed between `instant` and `now`, never negative.
pub fn elapsed_since(instant: i64, now: i64) -> i64 {
    now.saturating_sub(instant).max(0)
}

/// Combine the hours/minutes fields of the manual correction form into
/// seconds.
///
/// Fails with `Invalid` when either field is not a whole number, when
/// either is negative, or when both are zero.
pub fn combine_hours_minutes(hours: &str, minutes: &str) -> AppResult<i64> {
    let h = parse_non_negative(hours, "hours")?;
    let m = parse_non_negative(minutes, "minutes")?;

    if h == 0 && m == 0 {
        return Err(AppError::Invalid(
            "hours and minutes cannot both be zero".into(),
        ));
    }

    h.checked_mul(SECS_PER_HOUR)
        .and_then(|hs| m.checked_mul(SECS_PER_MINUTE).and_then(|ms| hs.checked_add(ms)))
        .ok_or_else(|| AppError::Invalid(format!("duration {h}h {m}m is out of range")))
}

fn parse_non_negative(raw: &str, field: &str) -> AppResult<i64> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Invalid(format!("{field} must be a whole number, got '{raw}'")))?;

    if value < 0 {
        return Err(AppError::Invalid(format!(
            "{field} cannot be negative, got {value}"
        )));
    }
    Ok(value)
}

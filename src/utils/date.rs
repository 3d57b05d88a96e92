use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Current instant as epoch seconds.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

pub fn to_local(epoch: i64) -> Option<DateTime<Local>> {
    Local.timestamp_opt(epoch, 0).single()
}

/// "Mar 4th" style label for the day a session started.
pub fn day_label(epoch: i64) -> String {
    match to_local(epoch) {
        Some(dt) => format!("{} {}", dt.format("%b"), ordinal(dt.day())),
        None => "--".to_string(),
    }
}

/// Wall-clock time such as "9:05 AM".
pub fn clock_label(epoch: i64) -> String {
    match to_local(epoch) {
        Some(dt) => dt.format("%-I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

use serde::{Deserialize, Serialize};

/// One closed sign-in/sign-out interval.
///
/// `end_timestamp` is the stable identity of a session within its user
/// record: edits may rewrite the duration or flag, never the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub end_timestamp: i64,    // ⇔ sessions[].date (epoch seconds)
    pub duration_seconds: i64, // ⇔ sessions[].time
    pub note: String,          // ⇔ sessions[].did
    pub flagged: bool,         // ⇔ sessions[].flagged
}

impl Session {
    pub fn new(end_timestamp: i64, duration_seconds: i64, note: impl Into<String>) -> Self {
        Self {
            end_timestamp,
            duration_seconds,
            note: note.into(),
            flagged: false,
        }
    }

    /// Derived start instant. Clamped at the epoch.
    pub fn start_timestamp(&self) -> i64 {
        self.end_timestamp
            .saturating_sub(self.duration_seconds)
            .max(0)
    }

    /// Duration that counts toward the user's total.
    pub fn counted_seconds(&self) -> i64 {
        if self.flagged { 0 } else { self.duration_seconds }
    }
}

use super::session::Session;
use crate::utils::time::elapsed_since;
use serde::{Deserialize, Serialize};

/// Sign-in state of a single user as observed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    SignedOut,
    SignedIn,
}

impl Presence {
    pub fn from_flag(signed_in: bool) -> Self {
        if signed_in {
            Presence::SignedIn
        } else {
            Presence::SignedOut
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::SignedOut => "signed out",
            Presence::SignedIn => "signed in",
        }
    }
}

/// One member's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub password: String,
    pub signed_in: bool,
    pub last_transition_time: i64,
    pub total_time_seconds: i64,
    /// Closed sessions, oldest first.
    pub sessions: Vec<Session>,
}

impl User {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            signed_in: false,
            last_transition_time: 0,
            total_time_seconds: 0,
            sessions: Vec::new(),
        }
    }

    pub fn presence(&self) -> Presence {
        Presence::from_flag(self.signed_in)
    }

    /// Elapsed seconds of the open session, if any. The open session is not
    /// part of `sessions` until sign-out closes it.
    pub fn open_session_elapsed(&self, now: i64) -> Option<i64> {
        self.signed_in
            .then(|| elapsed_since(self.last_transition_time, now))
    }

    /// Sum of unflagged session durations. The server keeps
    /// `total_time_seconds` equal to this after every mutation.
    pub fn computed_total(&self) -> i64 {
        self.sessions.iter().map(Session::counted_seconds).sum()
    }

    pub fn find_session(&self, end_timestamp: i64) -> Option<&Session> {
        self.sessions
            .iter()
            .find(|s| s.end_timestamp == end_timestamp)
    }

    /// Sessions newest first, the order they are displayed in.
    pub fn sessions_newest_first(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().rev()
    }
}

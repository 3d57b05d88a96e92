//! In-process record store with the same rules the hosted table applies.
//!
//! Records are keyed by password. Every mutation recomputes
//! `total_time_seconds` from the unflagged sessions, so a fetch after any
//! change always sees a consistent total. The clock is explicit so
//! callers can advance time deterministically.

use super::backend::RecordBackend;
use crate::errors::{AppError, AppResult};
use crate::models::record::NOT_FOUND_MESSAGE;
use crate::models::{Session, User};
use crate::utils::date::now_epoch;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

pub struct MemoryBackend {
    users: Mutex<BTreeMap<String, User>>,
    now: AtomicI64,
    offline: AtomicBool,
    fetch_user_calls: AtomicUsize,
    fetch_roster_calls: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::starting_at(now_epoch())
    }

    pub fn starting_at(now: i64) -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            now: AtomicI64::new(now),
            offline: AtomicBool::new(false),
            fetch_user_calls: AtomicUsize::new(0),
            fetch_roster_calls: AtomicUsize::new(0),
        }
    }

    /// Create a record out-of-band, the way members are provisioned.
    pub fn insert_user(&self, name: &str, password: &str) {
        let mut user = User::new(name, password);
        user.last_transition_time = self.now();
        self.lock().insert(password.to_string(), user);
    }

    /// Replace a whole record, recomputing its total.
    pub fn put_user(&self, mut user: User) {
        user.total_time_seconds = user.computed_total();
        self.lock().insert(user.password.clone(), user);
    }

    pub fn user(&self, password: &str) -> Option<User> {
        self.lock().get(password).cloned()
    }

    pub fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// While offline every request fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fetch_user_calls(&self) -> usize {
        self.fetch_user_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_roster_calls(&self) -> usize {
        self.fetch_roster_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, User>> {
        // a poisoned map is still structurally valid
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn with_user<T>(
        &self,
        password: &str,
        f: impl FnOnce(&mut User) -> AppResult<T>,
    ) -> AppResult<T> {
        self.check_online()?;
        let mut users = self.lock();
        let user = users
            .get_mut(password)
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))?;
        let out = f(user)?;
        user.total_time_seconds = user.computed_total();
        Ok(out)
    }

    fn with_session(
        &self,
        password: &str,
        session_end: i64,
        f: impl FnOnce(&mut Session) -> AppResult<()>,
    ) -> AppResult<()> {
        self.with_user(password, |user| {
            let session = user
                .sessions
                .iter_mut()
                .find(|s| s.end_timestamp == session_end)
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "No session ending at {session_end} for {}",
                        user.name
                    ))
                })?;
            f(session)
        })
    }
}

#[async_trait::async_trait]
impl RecordBackend for MemoryBackend {
    async fn fetch_user(&self, password: &str) -> AppResult<User> {
        self.fetch_user_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.user(password)
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))
    }

    async fn fetch_roster(&self) -> AppResult<Vec<User>> {
        self.fetch_roster_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.lock().values().cloned().collect())
    }

    async fn sign_in(&self, password: &str) -> AppResult<()> {
        let now = self.now();
        self.with_user(password, |user| {
            if user.signed_in {
                return Err(AppError::Conflict(format!(
                    "{} is already signed in",
                    user.name
                )));
            }
            user.signed_in = true;
            user.last_transition_time = now;
            Ok(())
        })
    }

    async fn sign_out(
        &self,
        password: &str,
        note: &str,
        session_time: Option<i64>,
    ) -> AppResult<()> {
        if note.trim().is_empty() {
            return Err(AppError::Invalid("a write-up is required to sign out".into()));
        }
        let now = self.now();
        self.with_user(password, |user| {
            if !user.signed_in {
                return Err(AppError::Conflict(format!("{} is not signed in", user.name)));
            }
            let duration = match session_time {
                Some(secs) if secs <= 0 => {
                    return Err(AppError::Invalid(format!(
                        "session time must be positive, got {secs}"
                    )));
                }
                Some(secs) => secs,
                None => now.saturating_sub(user.last_transition_time).max(0),
            };
            user.sessions.push(Session::new(now, duration.min(now), note));
            user.signed_in = false;
            user.last_transition_time = now;
            Ok(())
        })
    }

    async fn change_password(&self, password: &str, new_password: &str) -> AppResult<()> {
        self.check_online()?;
        let mut users = self.lock();
        if users.contains_key(new_password) {
            return Err(AppError::Conflict("That password is already taken.".into()));
        }
        let mut user = users.remove(password).ok_or_else(|| {
            AppError::Conflict("Unable to find an account with that password.".into())
        })?;
        user.password = new_password.to_string();
        users.insert(new_password.to_string(), user);
        Ok(())
    }

    async fn set_session_flag(
        &self,
        password: &str,
        session_end: i64,
        flagged: bool,
    ) -> AppResult<()> {
        self.with_session(password, session_end, |session| {
            if session.flagged == flagged {
                let state = if flagged { "flagged" } else { "unflagged" };
                return Err(AppError::NotFound(format!(
                    "Session ending at {session_end} is already {state}"
                )));
            }
            session.flagged = flagged;
            Ok(())
        })
    }

    async fn set_session_time(
        &self,
        password: &str,
        session_end: i64,
        session_time: i64,
    ) -> AppResult<()> {
        self.with_session(password, session_end, |session| {
            if session_time < 0 || session_time > session.end_timestamp {
                return Err(AppError::Invalid(format!(
                    "session time {session_time} is out of range"
                )));
            }
            session.duration_seconds = session_time;
            Ok(())
        })
    }
}

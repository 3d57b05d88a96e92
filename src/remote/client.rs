//! Validating wrapper around a [`RecordBackend`].
//!
//! Every mutation is followed by a full re-fetch of the affected record.
//! The returned [`User`] is always the server's view, never a local patch,
//! because `total_time_seconds` is computed remotely.

use super::backend::RecordBackend;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct RemoteClient {
    backend: Arc<dyn RecordBackend>,
}

impl RemoteClient {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self { backend }
    }

    pub async fn fetch_user_record(&self, password: &str) -> AppResult<User> {
        self.backend.fetch_user(password).await
    }

    pub async fn fetch_roster(&self) -> AppResult<Vec<User>> {
        self.backend.fetch_roster().await
    }

    pub async fn sign_in(&self, password: &str) -> AppResult<User> {
        self.backend.sign_in(password).await?;
        debug!("signed in, re-fetching record");
        self.fetch_user_record(password).await
    }

    /// Close the open session. `corrected_seconds` replaces the wall-clock
    /// duration and must be a positive number of seconds.
    pub async fn sign_out(
        &self,
        password: &str,
        note: &str,
        corrected_seconds: Option<i64>,
    ) -> AppResult<User> {
        if note.trim().is_empty() {
            return Err(AppError::Invalid(
                "write about what you did before signing out".into(),
            ));
        }
        if let Some(secs) = corrected_seconds
            && secs <= 0
        {
            return Err(AppError::Invalid(format!(
                "corrected session time must be a positive number of seconds, got {secs}"
            )));
        }

        self.backend
            .sign_out(password, note.trim(), corrected_seconds)
            .await?;
        debug!(corrected = corrected_seconds.is_some(), "signed out, re-fetching record");
        self.fetch_user_record(password).await
    }

    /// On success the record is re-fetched under the new password.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> AppResult<User> {
        if new_password.trim().is_empty() {
            return Err(AppError::Invalid("the new password cannot be empty".into()));
        }
        self.backend
            .change_password(old_password, new_password)
            .await?;
        self.fetch_user_record(new_password).await
    }

    pub async fn set_session_flag(
        &self,
        password: &str,
        session_end: i64,
        flagged: bool,
    ) -> AppResult<User> {
        self.backend
            .set_session_flag(password, session_end, flagged)
            .await?;
        self.fetch_user_record(password).await
    }

    pub async fn set_session_duration(
        &self,
        password: &str,
        session_end: i64,
        duration_seconds: i64,
    ) -> AppResult<User> {
        if duration_seconds < 0 {
            return Err(AppError::Invalid(format!(
                "session time cannot be negative, got {duration_seconds}"
            )));
        }
        self.backend
            .set_session_time(password, session_end, duration_seconds)
            .await?;
        self.fetch_user_record(password).await
    }
}

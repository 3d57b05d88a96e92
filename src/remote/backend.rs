use crate::errors::AppResult;
use crate::models::User;

/// Raw request/response contract of the remote record store.
///
/// Mutations acknowledge only; callers re-fetch the affected record to see
/// the server-computed totals. See [`super::client::RemoteClient`].
#[async_trait::async_trait]
pub trait RecordBackend: Send + Sync {
    async fn fetch_user(&self, password: &str) -> AppResult<User>;
    async fn fetch_roster(&self) -> AppResult<Vec<User>>;
    async fn sign_in(&self, password: &str) -> AppResult<()>;
    async fn sign_out(
        &self,
        password: &str,
        note: &str,
        session_time: Option<i64>,
    ) -> AppResult<()>;
    async fn change_password(&self, password: &str, new_password: &str) -> AppResult<()>;
    async fn set_session_flag(
        &self,
        password: &str,
        session_end: i64,
        flagged: bool,
    ) -> AppResult<()>;
    async fn set_session_time(
        &self,
        password: &str,
        session_end: i64,
        session_time: i64,
    ) -> AppResult<()>;
}

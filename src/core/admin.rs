use crate::errors::AppResult;
use crate::models::User;
use crate::remote::RemoteClient;
use crate::utils::time::combine_hours_minutes;
use std::sync::Arc;
use tracing::info;

/// Roster as seen by an administrator, with session corrections.
///
/// Each confirmed edit swaps in a new roster `Arc` containing the
/// re-fetched record; snapshots handed out earlier are never touched.
pub struct AdminView {
    client: RemoteClient,
    roster: Arc<Vec<User>>,
}

impl AdminView {
    pub async fn load(client: RemoteClient) -> AppResult<Self> {
        let roster = Arc::new(client.fetch_roster().await?);
        Ok(Self { client, roster })
    }

    pub fn roster(&self) -> Arc<Vec<User>> {
        Arc::clone(&self.roster)
    }

    pub async fn reload(&mut self) -> AppResult<Arc<Vec<User>>> {
        self.roster = Arc::new(self.client.fetch_roster().await?);
        Ok(self.roster())
    }

    /// Flag or unflag one session. Flagged sessions stay in the record
    /// with their duration but no longer count toward the total.
    pub async fn set_flag(&mut self, password: &str, session_end: i64, flagged: bool) -> AppResult<User> {
        let user = self
            .client
            .set_session_flag(password, session_end, flagged)
            .await?;
        info!(user = %user.name, session_end, flagged, "session flag updated");
        self.roster = Arc::new(replace_user(&self.roster, user.clone()));
        Ok(user)
    }

    /// Correct a session's duration from the hours/minutes form fields.
    /// The end timestamp is kept, so the derived start moves instead.
    pub async fn correct_duration(
        &mut self,
        password: &str,
        session_end: i64,
        hours: &str,
        minutes: &str,
    ) -> AppResult<User> {
        let seconds = combine_hours_minutes(hours, minutes)?;
        let user = self
            .client
            .set_session_duration(password, session_end, seconds)
            .await?;
        info!(user = %user.name, session_end, seconds, "session duration corrected");
        self.roster = Arc::new(replace_user(&self.roster, user.clone()));
        Ok(user)
    }
}

/// New roster with `updated` in place of the entry sharing its password.
/// Appended when no entry matches.
pub fn replace_user(roster: &[User], updated: User) -> Vec<User> {
    let mut replaced = false;
    let mut out: Vec<User> = roster
        .iter()
        .map(|u| {
            if u.password == updated.password {
                replaced = true;
                updated.clone()
            } else {
                u.clone()
            }
        })
        .collect();
    if !replaced {
        out.push(updated);
    }
    out
}

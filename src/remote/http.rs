//! HTTP implementation of [`RecordBackend`].
//!
//! Every operation is a GET with query parameters. Status codes map onto
//! the error taxonomy:
//!  - 404 on fetch → `NotFound`
//!  - 404 on change-password → `Conflict` (old password invalid)
//!  - 400 on flag/unflag/change-time → `NotFound` (user or session missing)
//!  - anything else non-2xx → `Transport` with the raw body text

use super::backend::RecordBackend;
use crate::config::Endpoints;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::models::record::{NOT_FOUND_MESSAGE, parse_roster_body, parse_user_body};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub struct HttpBackend {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    fn message(&self) -> String {
        let text = self.body.trim();
        if text.is_empty() {
            self.status.to_string()
        } else {
            text.to_string()
        }
    }

    /// Generic mapping for acknowledgement-only endpoints.
    fn into_ack(self) -> AppResult<()> {
        match self.status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(self.message())),
            StatusCode::CONFLICT => Err(AppError::Conflict(self.message())),
            StatusCode::BAD_REQUEST => Err(AppError::Invalid(self.message())),
            _ => Err(self.transport()),
        }
    }

    fn transport(&self) -> AppError {
        AppError::Transport(format!("{}: {}", self.status, self.message()))
    }
}

impl HttpBackend {
    pub fn new(base_url: &str, endpoints: Endpoints, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> AppResult<Reply> {
        let url = self.url(path);
        debug!(%url, params = query.len(), "record store request");

        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        debug!(%url, %status, bytes = body.len(), "record store response");
        Ok(Reply { status, body })
    }
}

#[async_trait::async_trait]
impl RecordBackend for HttpBackend {
    async fn fetch_user(&self, password: &str) -> AppResult<User> {
        let reply = self
            .get(&self.endpoints.user, &[("password", password.to_string())])
            .await?;

        match reply.status {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(NOT_FOUND_MESSAGE.into())),
            s if s.is_success() => parse_user_body(&reply.body),
            _ => Err(reply.transport()),
        }
    }

    async fn fetch_roster(&self) -> AppResult<Vec<User>> {
        let reply = self.get(&self.endpoints.roster, &[]).await?;
        if !reply.status.is_success() {
            return Err(reply.transport());
        }
        parse_roster_body(&reply.body)
    }

    async fn sign_in(&self, password: &str) -> AppResult<()> {
        self.get(&self.endpoints.sign_in, &[("password", password.to_string())])
            .await?
            .into_ack()
    }

    async fn sign_out(
        &self,
        password: &str,
        note: &str,
        session_time: Option<i64>,
    ) -> AppResult<()> {
        let mut query = vec![("password", password.to_string()), ("did", note.to_string())];
        if let Some(secs) = session_time {
            query.push(("sessionTime", secs.to_string()));
        }
        self.get(&self.endpoints.sign_out, &query).await?.into_ack()
    }

    async fn change_password(&self, password: &str, new_password: &str) -> AppResult<()> {
        let reply = self
            .get(
                &self.endpoints.change_password,
                &[
                    ("password", password.to_string()),
                    ("newpassword", new_password.to_string()),
                ],
            )
            .await?;

        if reply.status == StatusCode::NOT_FOUND {
            return Err(AppError::Conflict(reply.message()));
        }
        reply.into_ack()
    }

    async fn set_session_flag(
        &self,
        password: &str,
        session_end: i64,
        flagged: bool,
    ) -> AppResult<()> {
        let path = if flagged {
            &self.endpoints.flag_session
        } else {
            &self.endpoints.unflag_session
        };
        let reply = self
            .get(
                path,
                &[
                    ("password", password.to_string()),
                    ("sessionEnd", session_end.to_string()),
                ],
            )
            .await?;

        if reply.status == StatusCode::BAD_REQUEST {
            return Err(AppError::NotFound(reply.message()));
        }
        reply.into_ack()
    }

    async fn set_session_time(
        &self,
        password: &str,
        session_end: i64,
        session_time: i64,
    ) -> AppResult<()> {
        let reply = self
            .get(
                &self.endpoints.change_session_time,
                &[
                    ("password", password.to_string()),
                    ("sessionEnd", session_end.to_string()),
                    ("sessionTime", session_time.to_string()),
                ],
            )
            .await?;

        if reply.status == StatusCode::BAD_REQUEST {
            return Err(AppError::NotFound(reply.message()));
        }
        reply.into_ack()
    }
}

pub mod account;
pub mod admin;
pub mod config;
pub mod init;
pub mod log;
pub mod presence;
pub mod sessions;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::db::identity::SqliteIdentityStorage;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::remote::{HttpBackend, RemoteClient};
use crate::store::{PollSettings, UserStore};
use crate::ui::messages::warning;
use std::sync::Arc;

pub fn remote_client(cfg: &Config) -> AppResult<RemoteClient> {
    let backend = HttpBackend::new(
        &cfg.server_url,
        cfg.endpoints.clone(),
        cfg.request_timeout(),
    )?;
    Ok(RemoteClient::new(Arc::new(backend)))
}

/// Build the store against the configured server and local state file,
/// and run its bootstrap.
pub async fn open_store(cfg: &Config) -> AppResult<UserStore> {
    let storage = SqliteIdentityStorage::open(&cfg.database)?;
    let store = UserStore::new(
        remote_client(cfg)?,
        Box::new(storage),
        PollSettings {
            active: cfg.poll_active(),
            idle: cfg.poll_idle(),
        },
    );
    store.init().await;
    Ok(store)
}

/// Record a completed operation in the local log (non blocking).
pub fn audit(cfg: &Config, operation: &str, target: &str, message: &str) {
    let result = DbPool::open(&cfg.database)
        .and_then(|pool| ttlog(&pool.conn, operation, target, message));
    if let Err(e) = result {
        warning(format!("Failed to write internal log: {e}"));
    }
}

use crate::errors::{AppError, AppResult};
use crate::utils::path::{expand_tilde, home_or_cwd};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub mod migrate; // use submodule at src/config/migrate.rs

/// Overrides the configuration directory (used by tests and CI).
pub const CONFIG_DIR_ENV: &str = "RHOURTRACKER_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// Roster refresh period while a session is open.
    #[serde(default = "default_poll_active")]
    pub poll_active_secs: u64,
    /// Roster refresh period otherwise.
    #[serde(default = "default_poll_idle")]
    pub poll_idle_secs: u64,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Request paths of the record store, relative to `server_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub user: String,
    pub roster: String,
    pub sign_in: String,
    pub sign_out: String,
    pub change_password: String,
    pub flag_session: String,
    pub unflag_session: String,
    pub change_session_time: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            user: "/api/src/endpoints/getuserdata.php".into(),
            roster: "/api/src/endpoints/getdata.php".into(),
            sign_in: "/api/src/endpoints/signin.php".into(),
            sign_out: "/api/src/endpoints/signout.php".into(),
            change_password: "/api/src/endpoints/changepassword.php".into(),
            flag_session: "/api/flagSession".into(),
            unflag_session: "/api/unflagSession".into(),
            change_session_time: "/api/changeSessionTime".into(),
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_poll_active() -> u64 {
    1
}
fn default_poll_idle() -> u64 {
    5
}
fn default_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            database: default_database(),
            poll_active_secs: default_poll_active(),
            poll_idle_secs: default_poll_idle(),
            request_timeout_secs: default_timeout(),
            log_level: default_log_level(),
            log_json: false,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        match env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => expand_tilde(&dir),
            _ => home_or_cwd().join(".rhourtracker"),
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rhourtracker.conf")
    }

    /// Return the full path of the local SQLite state file
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rhourtracker.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Write this configuration to the config file, creating the directory.
    pub fn save(&self) -> AppResult<PathBuf> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self)?;
        let path = Self::config_file();
        let mut file = fs::File::create(&path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(path)
    }

    pub fn poll_active(&self) -> Duration {
        Duration::from_secs(self.poll_active_secs.max(1))
    }

    pub fn poll_idle(&self) -> Duration {
        Duration::from_secs(self.poll_idle_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

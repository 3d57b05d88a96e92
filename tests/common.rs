#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rhourtracker::models::{Session, User};
use rhourtracker::remote::{MemoryBackend, RemoteClient};
use rhourtracker::errors::AppResult;
use rhourtracker::store::identity::{IdentityStorage, MemoryIdentityStorage};
use rhourtracker::store::{PollSettings, UserStore};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 2025-03-10 18:00:00 UTC
pub const T0: i64 = 1_741_629_600;

pub fn rht() -> Command {
    cargo_bin_cmd!("rhourtracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rhourtracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh, empty config directory inside the system temp dir
pub fn setup_config_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rhourtracker_conf", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create config dir");
    path
}

/// Backend with two provisioned members, Ada and Grace.
pub fn seeded_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::starting_at(T0));
    backend.insert_user("Ada", "ada-pw");
    backend.insert_user("Grace", "grace-pw");
    backend
}

/// Backend where Ada already has two closed sessions.
pub fn backend_with_history() -> Arc<MemoryBackend> {
    let backend = seeded_backend();
    let mut ada = backend.user("ada-pw").expect("ada exists");
    ada.sessions = vec![
        Session::new(T0 - 86_400, 1800, "wired the drivetrain"),
        Session::new(T0 - 3600, 5400, "tuned the PID loop"),
    ];
    backend.put_user(ada);
    backend
}

pub fn client_for(backend: &Arc<MemoryBackend>) -> RemoteClient {
    RemoteClient::new(backend.clone())
}

pub fn store_for(backend: &Arc<MemoryBackend>, storage: MemoryIdentityStorage) -> UserStore {
    UserStore::new(client_for(backend), Box::new(storage), PollSettings::default())
}

/// Storage handle that stays readable after a store took ownership of a
/// clone of it.
#[derive(Clone, Default)]
pub struct SharedStorage(pub Arc<MemoryIdentityStorage>);

impl SharedStorage {
    pub fn holding(key: &str) -> Self {
        Self(Arc::new(MemoryIdentityStorage::with_value(key)))
    }

    pub fn value(&self) -> Option<String> {
        self.0.load().expect("memory storage never fails")
    }
}

impl IdentityStorage for SharedStorage {
    fn load(&self) -> AppResult<Option<String>> {
        self.0.load()
    }

    fn save(&self, key: &str) -> AppResult<()> {
        self.0.save(key)
    }

    fn clear(&self) -> AppResult<()> {
        self.0.clear()
    }
}

pub fn store_sharing(backend: &Arc<MemoryBackend>, storage: &SharedStorage) -> UserStore {
    UserStore::new(client_for(backend), Box::new(storage.clone()), PollSettings::default())
}

pub fn user_named<'a>(roster: &'a [User], name: &str) -> &'a User {
    roster
        .iter()
        .find(|u| u.name == name)
        .expect("user in roster")
}

/// Minimal HTTP server answering each accepted connection with the next
/// canned `(status, body)` pair. Returns the base URL and the request
/// lines it received.
pub async fn canned_server(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_task = seen.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let request = String::from_utf8_lossy(&buf).to_string();
            let first_line = request.lines().next().unwrap_or_default().to_string();
            seen_task.lock().unwrap().push(first_line);

            let reply = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), seen)
}

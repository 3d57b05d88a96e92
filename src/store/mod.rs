//! Client-side state controller.
//!
//! The store owns three pieces of state: the identity key (the password the
//! client acts as), the hydrated record of that user, and the latest
//! roster snapshot. State lives in a `watch` channel: readers either pull
//! a [`StoreSnapshot`] or subscribe to change notifications.
//!
//! While a user record is loaded a background task refreshes the roster
//! on a fixed period. If the roster disagrees with the local sign-in flag
//! (an admin edit, or a sign-in from another client), the record is
//! re-fetched. That is the only reconciliation the client performs: the
//! remote store is last-writer-wins.

pub mod identity;

use crate::errors::{AppError, AppResult, ErrorKind};
use crate::models::User;
use crate::remote::RemoteClient;
use identity::IdentityStorage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Password the client acts as. `None` means signed out of the app,
    /// which is unrelated to the user's own `signed_in` flag.
    pub identity: Option<String>,
    pub current_user: Option<User>,
    /// Replaced wholesale on every refresh, never mutated in place.
    pub roster: Arc<Vec<User>>,
}

impl StoreSnapshot {
    /// Signed-in members other than the current user.
    pub fn other_active_members(&self) -> Vec<&User> {
        let me = self.current_user.as_ref().map(|u| u.name.as_str());
        self.roster
            .iter()
            .filter(|u| u.signed_in && Some(u.name.as_str()) != me)
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Period while the current user has an open session.
    pub active: Duration,
    /// Period otherwise.
    pub idle: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            active: Duration::from_secs(1),
            idle: Duration::from_secs(5),
        }
    }
}

struct Inner {
    client: RemoteClient,
    storage: Box<dyn IdentityStorage>,
    state: watch::Sender<StoreSnapshot>,
    poller: Mutex<Option<JoinHandle<()>>>,
    /// Set once by `dispose`; polling never restarts afterwards.
    disposed: AtomicBool,
    settings: PollSettings,
}

impl Inner {
    fn poll_delay(&self) -> Duration {
        let open = self
            .state
            .borrow()
            .current_user
            .as_ref()
            .is_some_and(|u| u.signed_in);
        if open {
            self.settings.active
        } else {
            self.settings.idle
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = match self.poller.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct UserStore {
    inner: Arc<Inner>,
}

impl UserStore {
    pub fn new(
        client: RemoteClient,
        storage: Box<dyn IdentityStorage>,
        settings: PollSettings,
    ) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                client,
                storage,
                state,
                poller: Mutex::new(None),
                disposed: AtomicBool::new(false),
                settings,
            }),
        }
    }

    /// Resume a remembered identity and take a first roster snapshot.
    ///
    /// Failures here are logged, never returned: a stale remembered
    /// password must not block the caller. An identity the server no
    /// longer knows is forgotten; a transport failure keeps it so the next
    /// command can retry.
    pub async fn init(&self) {
        let remembered = match self.inner.storage.load() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "could not read remembered identity");
                None
            }
        };

        if let Some(key) = remembered {
            self.apply(|s| s.identity = Some(key.clone()));
            match self.inner.client.fetch_user_record(&key).await {
                Ok(user) => {
                    info!(user = %user.name, "resumed remembered identity");
                    self.apply_if_current(&key, |s| s.current_user = Some(user));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(error = %e, "remembered identity no longer exists, forgetting it");
                    self.apply_if_current(&key, |s| {
                        s.identity = None;
                        s.current_user = None;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "bootstrap fetch failed");
                }
            }
        }

        if let Err(e) = self.refresh_roster().await {
            warn!(error = %e, "initial roster fetch failed");
        }
    }

    /// Stop background polling for good. Commands still work and late
    /// responses still update the state, but no poll task is started
    /// again.
    pub fn dispose(&self) {
        let mut slot = self.lock_poller();
        self.inner.disposed.store(true, Ordering::SeqCst);
        if let Some(handle) = slot.take() {
            handle.abort();
            debug!("roster polling stopped");
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn identity(&self) -> Option<String> {
        self.inner.state.borrow().identity.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().current_user.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.lock_poller()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn client(&self) -> &RemoteClient {
        &self.inner.client
    }

    // ------------------------------------------------
    // Commands
    // ------------------------------------------------

    /// Adopt `password` as the identity after confirming it matches a
    /// record. On failure the previous identity is left untouched.
    pub async fn log_in(&self, password: &str) -> AppResult<User> {
        let user = self.inner.client.fetch_user_record(password).await?;

        let key = password.to_string();
        let loaded = user.clone();
        self.apply(move |s| {
            s.identity = Some(key);
            s.current_user = Some(loaded);
        });
        Ok(user)
    }

    pub async fn sign_in(&self) -> AppResult<User> {
        let key = self.require_identity()?;
        let user = self.inner.client.sign_in(&key).await?;
        self.set_user_for(&key, user.clone());
        Ok(user)
    }

    pub async fn sign_out(&self, note: &str, corrected_seconds: Option<i64>) -> AppResult<User> {
        let key = self.require_identity()?;
        let user = self
            .inner
            .client
            .sign_out(&key, note, corrected_seconds)
            .await?;
        self.set_user_for(&key, user.clone());
        Ok(user)
    }

    /// Identity and record switch together, only after the server accepted
    /// the change.
    pub async fn change_password(&self, new_password: &str) -> AppResult<User> {
        let old = self.require_identity()?;
        let user = self
            .inner
            .client
            .change_password(&old, new_password)
            .await?;

        let key = new_password.to_string();
        let loaded = user.clone();
        self.apply_if_current(&old, move |s| {
            s.identity = Some(key);
            s.current_user = Some(loaded);
        });
        Ok(user)
    }

    pub fn forget_identity(&self) {
        self.apply(|s| {
            s.identity = None;
            s.current_user = None;
        });
    }

    /// Re-fetch the current user's record.
    pub async fn refresh_user(&self) -> AppResult<User> {
        let key = self.require_identity()?;
        let user = self.inner.client.fetch_user_record(&key).await?;
        self.set_user_for(&key, user.clone());
        Ok(user)
    }

    /// One polling tick: replace the roster and reconcile the current
    /// record if the roster disagrees with it. Returns whether a
    /// reconciling fetch happened.
    pub async fn refresh_roster(&self) -> AppResult<bool> {
        let roster = self.inner.client.fetch_roster().await?;

        let stale = {
            let snap = self.inner.state.borrow();
            match (&snap.identity, &snap.current_user) {
                (Some(key), Some(me)) => roster
                    .iter()
                    .find(|u| u.name == me.name)
                    .filter(|entry| entry.signed_in != me.signed_in)
                    .map(|_| key.clone()),
                _ => None,
            }
        };

        let roster = Arc::new(roster);
        self.apply(move |s| s.roster = roster);

        let Some(key) = stale else {
            return Ok(false);
        };
        debug!("roster disagrees with local record, reconciling");
        let user = self.inner.client.fetch_user_record(&key).await?;
        self.set_user_for(&key, user);
        Ok(true)
    }

    // ------------------------------------------------
    // State plumbing
    // ------------------------------------------------

    fn require_identity(&self) -> AppResult<String> {
        self.identity().ok_or(AppError::NotSignedIn)
    }

    fn set_user_for(&self, key: &str, user: User) {
        self.apply_if_current(key, |s| s.current_user = Some(user));
    }

    /// Apply `f` only if the identity is still `key`. A response that
    /// arrives after the identity changed is dropped.
    fn apply_if_current(&self, key: &str, f: impl FnOnce(&mut StoreSnapshot)) {
        if self.identity().as_deref() != Some(key) {
            debug!("dropping response for a previous identity");
            return;
        }
        self.apply(f);
    }

    fn apply(&self, f: impl FnOnce(&mut StoreSnapshot)) {
        let mut identity_change: Option<Option<String>> = None;
        self.inner.state.send_if_modified(|snap| {
            let before = snap.clone();
            f(snap);
            if before.identity != snap.identity {
                identity_change = Some(snap.identity.clone());
            }
            before != *snap
        });

        if let Some(identity) = identity_change {
            self.persist_identity(identity.as_deref());
        }
        self.sync_polling();
    }

    fn persist_identity(&self, identity: Option<&str>) {
        let result = match identity {
            Some(key) => self.inner.storage.save(key),
            None => self.inner.storage.clear(),
        };
        if let Err(e) = result {
            warn!(error = %e, "could not persist identity");
        }
    }

    fn lock_poller(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner.poller.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Polling runs exactly while a user record is loaded and the store
    /// has not been disposed.
    fn sync_polling(&self) {
        let has_user = self.inner.state.borrow().current_user.is_some();
        let mut slot = self.lock_poller();

        if !has_user || self.inner.disposed.load(Ordering::SeqCst) {
            if let Some(handle) = slot.take() {
                handle.abort();
                debug!("roster polling stopped");
            }
            return;
        }

        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                *slot = Some(rt.spawn(poll_loop(Arc::downgrade(&self.inner))));
                debug!("roster polling started");
            }
            Err(_) => debug!("no async runtime, roster polling not started"),
        }
    }
}

async fn poll_loop(weak: Weak<Inner>) {
    loop {
        let delay = match weak.upgrade() {
            Some(inner) => inner.poll_delay(),
            None => break,
        };
        tokio::time::sleep(delay).await;

        let Some(inner) = weak.upgrade() else {
            break;
        };
        if inner.disposed.load(Ordering::SeqCst) {
            break;
        }
        let store = UserStore { inner };
        if store.current_user().is_none() {
            break;
        }
        if let Err(e) = store.refresh_roster().await {
            warn!(error = %e, "roster refresh failed");
        }
    }
}

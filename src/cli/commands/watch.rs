use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::store::UserStore;
use crate::ui::messages::info;
use crate::ui::render::status_line;
use crate::utils::date::now_epoch;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { updates } = cmd {
        let store = open_store(cfg).await?;
        let result = watch(&store, *updates).await;
        store.dispose();
        result?;
    }
    Ok(())
}

/// Print a status line whenever the store changes. While a session is
/// open a one-second display tick also refreshes the elapsed time.
async fn watch(store: &UserStore, limit: Option<u64>) -> AppResult<()> {
    if store.current_user().is_none() {
        return Err(AppError::NotSignedIn);
    }
    info("Watching for changes, press Ctrl+C to stop.");

    let mut rx = store.subscribe();
    let mut display = tokio::time::interval(Duration::from_secs(1));
    display.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut printed = 0u64;
    let mut last_line = String::new();

    loop {
        let snap = rx.borrow_and_update().clone();
        let Some(user) = &snap.current_user else {
            info("Identity forgotten, stopping.");
            break;
        };

        let line = status_line(user, snap.other_active_members().len(), now_epoch());
        if line != last_line {
            println!("{line}");
            last_line = line;
            printed += 1;
            if limit.is_some_and(|n| printed >= n) {
                break;
            }
        }

        let open = user.signed_in;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = display.tick(), if open => {}
        }
    }
    Ok(())
}

use super::{audit, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::UserStore;
use crate::ui::messages::success;
use crate::utils::time::{combine_hours_minutes, format_duration};

/// `in` and `out`.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg).await?;
    let result = apply(cmd, cfg, &store).await;
    store.dispose();
    result
}

async fn apply(cmd: &Commands, cfg: &Config, store: &UserStore) -> AppResult<()> {
    match cmd {
        Commands::In => {
            let user = store.sign_in().await?;
            success(format!("{} signed in.", user.name));
            audit(cfg, "in", &user.name, "session opened");
        }
        Commands::Out {
            note,
            hours,
            minutes,
        } => {
            //
            // 1. Optional correction for a forgotten sign-out
            //
            let corrected = if hours.is_some() || minutes.is_some() {
                Some(combine_hours_minutes(
                    hours.as_deref().unwrap_or("0"),
                    minutes.as_deref().unwrap_or("0"),
                )?)
            } else {
                None
            };

            //
            // 2. Close the session
            //
            let user = store.sign_out(note, corrected).await?;
            let length = user
                .sessions
                .last()
                .map(|s| format_duration(s.duration_seconds))
                .unwrap_or_else(|| format_duration(0));
            success(format!(
                "{} signed out after {}. Your session has been saved.",
                user.name, length
            ));
            audit(cfg, "out", &user.name, &format!("session closed ({length})"));
        }
        _ => {}
    }
    Ok(())
}

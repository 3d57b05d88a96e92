use super::{audit, remote_client};
use crate::cli::parser::{AdminAction, Commands};
use crate::config::Config;
use crate::core::admin::AdminView;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::ui::render::render_roster;
use crate::utils::time::{combine_hours_minutes, format_duration};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Admin { action } = cmd else {
        return Ok(());
    };

    if let AdminAction::Time { hours, minutes, .. } = action {
        // a malformed form never reaches the network
        combine_hours_minutes(hours, minutes)?;
    }

    let mut view = AdminView::load(remote_client(cfg)?).await?;

    match action {
        AdminAction::List { flagged } => {
            print!("{}", render_roster(&view.roster(), *flagged));
        }
        AdminAction::Flag { user, end } | AdminAction::Unflag { user, end } => {
            let flagged = matches!(action, AdminAction::Flag { .. });
            let updated = view.set_flag(user, *end, flagged).await?;
            let verb = if flagged { "Flagged" } else { "Unflagged" };
            success(format!(
                "{verb} session ending at {end} for {}. Total is now {}.",
                updated.name,
                format_duration(updated.total_time_seconds)
            ));
            audit(
                cfg,
                if flagged { "flag" } else { "unflag" },
                &updated.name,
                &format!("session {end}"),
            );
        }
        AdminAction::Time {
            user,
            end,
            hours,
            minutes,
        } => {
            let updated = view.correct_duration(user, *end, hours, minutes).await?;
            let length = updated
                .find_session(*end)
                .map(|s| format_duration(s.duration_seconds))
                .unwrap_or_default();
            success(format!(
                "Session ending at {end} for {} is now {length}. Total is now {}.",
                updated.name,
                format_duration(updated.total_time_seconds)
            ));
            audit(
                cfg,
                "time",
                &updated.name,
                &format!("session {end} set to {length}"),
            );
        }
    }

    Ok(())
}

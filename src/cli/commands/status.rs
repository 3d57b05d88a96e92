use super::open_store;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::ui::render::render_status;
use crate::utils::date::now_epoch;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg).await?;
    let snap = store.snapshot();
    store.dispose();

    match (&snap.identity, &snap.current_user) {
        (_, Some(user)) => {
            let others = snap.other_active_members();
            print!("{}", render_status(user, &others, now_epoch()));
        }
        (Some(_), None) => {
            warning(format!(
                "Could not load your record from {}. Try again later.",
                cfg.server_url
            ));
        }
        (None, None) => {
            info("Not signed in on this machine. Run `login <password>` first.");
        }
    }
    Ok(())
}

use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::ui::render::render_sessions;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions { full } = cmd {
        let store = open_store(cfg).await?;
        let user = store.refresh_user().await;
        store.dispose();
        let user = user?;

        header(format!("Past sessions of {}", user.name));
        print!("{}", render_sessions(&user, *full));
    }
    Ok(())
}

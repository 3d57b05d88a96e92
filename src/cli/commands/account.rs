use super::{audit, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::UserStore;
use crate::ui::messages::{info, success};
use crate::utils::formatting::mask_identity;

/// `login`, `passwd` and `forget`.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg).await?;
    let result = apply(cmd, cfg, &store).await;
    store.dispose();
    result
}

async fn apply(cmd: &Commands, cfg: &Config, store: &UserStore) -> AppResult<()> {
    match cmd {
        Commands::Login { password } => {
            let user = store.log_in(password).await?;
            if user.signed_in {
                info(format!(
                    "Welcome back, {}. You were already signed in.",
                    user.name
                ));
            } else {
                // a record that cannot be signed in is not worth remembering
                let user = store.sign_in().await.inspect_err(|_| store.forget_identity())?;
                success(format!(
                    "Signed in as {}. Your password has been remembered.",
                    user.name
                ));
            }
            audit(cfg, "login", &user.name, "identity remembered");
        }
        Commands::Passwd { new_password } => {
            let user = store.change_password(new_password).await?;
            success(format!(
                "Password changed for {} (now {}).",
                user.name,
                mask_identity(new_password)
            ));
            audit(cfg, "passwd", &user.name, "password changed");
        }
        Commands::Forget => {
            let name = store.current_user().map(|u| u.name).unwrap_or_default();
            store.forget_identity();
            success("Remembered password removed from this machine.");
            audit(cfg, "forget", &name, "identity forgotten");
        }
        _ => {}
    }
    Ok(())
}

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the local SQLite state file and its migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    println!("⚙️  Initializing rHourTracker…");

    if !cli.test {
        let path = cfg.save()?;
        println!("📄 Config file : {}", path.display());
    }
    println!("🗄️  Database   : {}", &cfg.database);
    println!("🌐 Server     : {}", &cfg.server_url);

    let pool = DbPool::open(&cfg.database)?;
    success(format!("Database initialized at {}", &cfg.database));

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 rHourTracker initialization completed!");
    Ok(())
}

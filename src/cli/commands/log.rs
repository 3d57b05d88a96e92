use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;

/// Colour by operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "login" | "in" => Colour::Green,
        "out" | "forget" => Colour::Red,
        "flag" | "unflag" | "time" => Colour::Yellow,
        "passwd" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Log { print: true }) {
        return Ok(());
    }

    let pool = DbPool::open(&cfg.database)?;
    let entries = load_log(&pool.conn)?;
    if entries.is_empty() {
        info("The internal log is empty.");
        return Ok(());
    }

    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);

    println!("📜 Internal log:\n");
    for e in entries {
        let date = chrono::DateTime::parse_from_rfc3339(&e.date)
            .map(|dt| dt.format("%FT%T%:z").to_string())
            .unwrap_or(e.date);
        let op = if e.target.is_empty() {
            e.operation.clone()
        } else {
            format!("{} ({})", e.operation, e.target)
        };
        println!(
            "{:>id_w$}  {}  {}  {}",
            e.id,
            date,
            color_for_operation(&e.operation).paint(format!("{op:<40}")),
            e.message,
            id_w = id_w
        );
    }
    Ok(())
}

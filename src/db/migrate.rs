use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

/// Ensure that the `log` table exists. Applied migrations are recorded in
/// it, so it must exist before anything else.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

/// Key/value store for client state that survives restarts.
fn create_settings_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
}

fn index_log_operation(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_log_operation ON log(operation);")
}

type Migration = fn(&Connection) -> rusqlite::Result<()>;

const MIGRATIONS: &[(&str, Migration)] = &[
    ("20250301_0001_create_settings", create_settings_table),
    ("20250412_0002_index_log_operation", index_log_operation),
];

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, 'migration_applied', ?2, ?3)",
        params![
            Local::now().to_rfc3339(),
            version,
            format!("Applied migration {version}")
        ],
    )?;
    Ok(())
}

/// Apply every migration not yet recorded in the `log` table.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn).map_err(|e| AppError::Migration(e.to_string()))?;

    for (version, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn).map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
        mark_applied(conn, version)?;
        info!(version, "applied local database migration");
    }
    Ok(())
}

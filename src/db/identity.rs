use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::store::identity::{IDENTITY_KEY, IdentityStorage};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub fn get_setting(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> AppResult<()> {
    conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
    Ok(())
}

/// Identity key kept in the `settings` table of the local state file.
pub struct SqliteIdentityStorage {
    pool: Mutex<DbPool>,
}

impl SqliteIdentityStorage {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Mutex::new(pool),
        }
    }

    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::new(DbPool::open(path)?))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        let pool = self.pool.lock().unwrap_or_else(|e| e.into_inner());
        f(&pool.conn)
    }
}

impl IdentityStorage for SqliteIdentityStorage {
    fn load(&self) -> AppResult<Option<String>> {
        self.with_conn(|conn| get_setting(conn, IDENTITY_KEY))
    }

    fn save(&self, key: &str) -> AppResult<()> {
        self.with_conn(|conn| set_setting(conn, IDENTITY_KEY, key))
    }

    fn clear(&self) -> AppResult<()> {
        self.with_conn(|conn| delete_setting(conn, IDENTITY_KEY))
    }
}

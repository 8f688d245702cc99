//! Opening the tracking store.
//!
//! # Responsibility
//! - Connect to a file or in-memory store through one bootstrap path.
//! - Enable foreign keys, and WAL journaling for files.
//! - Migrate, then confirm every tracking table is present.
//!
//! # Invariants
//! - A store whose `user_version` outruns its tables is rejected, never repaired.

use super::migrations::{apply_migrations, current_user_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Tables a migrated tracking store must contain.
pub const TRACKING_TABLES: [&str; 5] = [
    "orbits",
    "phases",
    "pulses",
    "pulse_phase_links",
    "progress_logs",
];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Target<'p> {
    File(&'p Path),
    Memory,
}

impl Target<'_> {
    fn mode(self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens (creating if needed) the tracking store at `path`.
///
/// Logs `event=db_open` with the schema version and pulse count on success.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(Target::File(path.as_ref()))
}

/// Opens a private in-memory tracking store, used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_target(Target::Memory)
}

fn open_target(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = target
        .connect()
        .map_err(DbError::from)
        .and_then(|mut conn| {
            prepare(&mut conn, target)?;
            Ok(conn)
        });

    match &result {
        Ok(conn) => {
            let pulses: i64 = conn
                .query_row("SELECT COUNT(*) FROM pulses;", [], |row| row.get(0))
                .unwrap_or(-1);
            info!(
                "event=db_open module=db status=ok mode={} schema_version={} pulses={} duration_ms={}",
                target.mode(),
                current_user_version(conn).unwrap_or(0),
                pulses,
                started_at.elapsed().as_millis()
            );
        }
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            target.mode(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn prepare(conn: &mut Connection, target: Target<'_>) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if let Target::File(_) = target {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    }
    apply_migrations(conn)?;
    ensure_tracking_tables(conn)
}

fn ensure_tracking_tables(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
    )?;
    for table in TRACKING_TABLES {
        let exists: bool = stmt.query_row([table], |row| row.get(0))?;
        if !exists {
            return Err(DbError::MissingTable {
                table,
                db_version: current_user_version(conn)?,
            });
        }
    }
    Ok(())
}

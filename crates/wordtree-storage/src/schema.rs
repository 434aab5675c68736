//! Connection setup for the menu database.
//!
//! Every connection, file or in-memory, gets the same pragmas and is brought
//! to the latest version of the `menu_nodes` / `menu_edges` schema before it
//! is handed out. The schema version lives in `user_version`.

use std::time::Duration;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// How long a connection waits for another writer's lock before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The menu schema, one step per file under `migrations/`.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!(
        "migrations/001_initial_schema.sql"
    ))])
}

/// Opens the menu database at `path`, creating the file and tables on first use.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    let mut conn = Connection::open(path)?;
    configure_and_migrate(&mut conn)?;
    tracing::debug!(path, "opened menu database");
    Ok(conn)
}

/// A private menu database that lives as long as the connection.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    configure_and_migrate(&mut conn)?;
    Ok(conn)
}

fn configure_and_migrate(conn: &mut Connection) -> Result<(), StorageError> {
    // Tree reads from one CLI process keep working while another appends.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    // menu_edges.child_id and parent_id must name rows in menu_nodes; a node
    // cannot be dropped while an edge still points at it.
    conn.pragma_update(None, "foreign_keys", "ON")?;
    // Concurrent add_child calls queue on BEGIN IMMEDIATE instead of failing.
    conn.busy_timeout(BUSY_TIMEOUT)?;

    migrations()
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;

    Ok(())
}

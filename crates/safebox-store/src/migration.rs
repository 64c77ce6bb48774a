//! SQLite schema versions.
//!
//! `MIGRATIONS` is ordered by version. Entry `n` takes the schema from
//! version `n - 1` to `n`; applied versions are recorded in
//! `schema_migrations`.

use rusqlite::{params, Connection};

use crate::error::{Result, StoreError};

/// Ordered schema steps, starting at version 1.
const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    r#"
    -- space is the Keyspace tag: 0 documents, 1 grants, 2 groups, 3 meta.
    CREATE TABLE kv (
        space INTEGER NOT NULL,
        key BLOB NOT NULL,
        value BLOB NOT NULL,
        PRIMARY KEY (space, key)
    ) WITHOUT ROWID;
    "#,
)];

/// Newest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Read the version recorded in `schema_migrations`, 0 for a fresh file.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Bring the schema up to [`latest_version`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY)",
    )?;

    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(StoreError::Migration(format!(
            "schema version {found} is newer than this build ({latest})"
        )));
    }

    let pending = MIGRATIONS.iter().filter(|(version, _)| *version > found);
    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            params![version],
        )?;
        tracing::debug!(version, "applied schema migration");
    }
    tx.commit()?;

    Ok(())
}

//! SQLite implementation of the Store trait.
//!
//! This is the durable storage backend. It uses rusqlite with bundled
//! SQLite; every batch is applied inside one SQL transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{BatchOp, Keyspace, Store, WriteBatch};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and missing parent directories) and runs
    /// migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(path)?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(format!("mutex poisoned: {}", e)))
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Vec<u8>, Bytes)> {
    let key: Vec<u8> = row.get(0)?;
    let value: Vec<u8> = row.get(1)?;
    Ok((key, Bytes::from(value)))
}

impl Store for SqliteStore {
    fn get(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>> {
        let conn = self.lock()?;
        let value: Option<Vec<u8>> = conn
            .query_row(
                "SELECT value FROM kv WHERE space = ?1 AND key = ?2",
                params![space.to_u8(), key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.map(Bytes::from))
    }

    fn scan_prefix(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>> {
        let conn = self.lock()?;

        let entries = if prefix.is_empty() {
            let mut stmt = conn.prepare("SELECT key, value FROM kv WHERE space = ?1 ORDER BY key")?;
            let rows = stmt.query_map(params![space.to_u8()], row_to_entry)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = conn.prepare(
                "SELECT key, value FROM kv
                 WHERE space = ?1 AND substr(key, 1, ?2) = ?3
                 ORDER BY key",
            )?;
            let rows = stmt.query_map(
                params![space.to_u8(), prefix.len() as i64, prefix],
                row_to_entry,
            )?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(entries)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for op in batch {
            match op {
                BatchOp::Put { space, key, value } => {
                    tx.execute(
                        "INSERT INTO kv (space, key, value) VALUES (?1, ?2, ?3)
                         ON CONFLICT(space, key) DO UPDATE SET value = excluded.value",
                        params![space.to_u8(), key, &value[..]],
                    )?;
                }
                BatchOp::Delete { space, key } => {
                    tx.execute(
                        "DELETE FROM kv WHERE space = ?1 AND key = ?2",
                        params![space.to_u8(), key],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn count(&self, space: Keyspace) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM kv WHERE space = ?1",
            params![space.to_u8()],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|e| StoreError::InvalidData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;

    fn put(store: &SqliteStore, space: Keyspace, key: &[u8], value: &[u8]) {
        let mut batch = WriteBatch::new();
        batch.put(space, key.to_vec(), value.to_vec());
        store.apply(batch).unwrap();
    }

    #[test]
    fn test_put_get_delete() {
        let store = SqliteStore::open_memory().unwrap();
        put(&store, Keyspace::Documents, b"doc", b"v1");

        assert_eq!(
            &store.get(Keyspace::Documents, b"doc").unwrap().unwrap()[..],
            b"v1"
        );
        assert!(store.get(Keyspace::Grants, b"doc").unwrap().is_none());

        put(&store, Keyspace::Documents, b"doc", b"v2");
        assert_eq!(
            &store.get(Keyspace::Documents, b"doc").unwrap().unwrap()[..],
            b"v2"
        );

        let mut batch = WriteBatch::new();
        batch.delete(Keyspace::Documents, b"doc".to_vec());
        store.apply(batch).unwrap();
        assert!(!store.contains(Keyspace::Documents, b"doc").unwrap());
    }

    #[test]
    fn test_scan_prefix_matches_memory_semantics() {
        let store = SqliteStore::open_memory().unwrap();
        put(&store, Keyspace::Grants, &[1, 2, 9], b"a");
        put(&store, Keyspace::Grants, &[1, 2, 3], b"b");
        put(&store, Keyspace::Grants, &[1, 3, 0], b"c");
        put(&store, Keyspace::Groups, &[1, 2, 5], b"d");

        let keys: Vec<Vec<u8>> = store
            .scan_prefix(Keyspace::Grants, &[1, 2])
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![vec![1, 2, 3], vec![1, 2, 9]]);

        assert_eq!(store.entries(Keyspace::Grants).unwrap().len(), 3);
        assert_eq!(store.count(Keyspace::Groups).unwrap(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            put(&store, Keyspace::Meta, b"height", b"7");
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            &store.get(Keyspace::Meta, b"height").unwrap().unwrap()[..],
            b"7"
        );
    }
}

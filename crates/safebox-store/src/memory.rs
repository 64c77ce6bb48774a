//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::error::{Result, StoreError};
use crate::traits::{BatchOp, Keyspace, Store, WriteBatch};

type Space = BTreeMap<Vec<u8>, Bytes>;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<BTreeMap<Keyspace, Space>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Keyspace, Space>>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<Keyspace, Space>>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>> {
        let inner = self.read()?;
        Ok(inner.get(&space).and_then(|s| s.get(key)).cloned())
    }

    fn scan_prefix(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>> {
        let inner = self.read()?;
        let Some(entries) = inner.get(&space) else {
            return Ok(Vec::new());
        };

        Ok(entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        // Readers never observe a partially applied batch.
        let mut inner = self.write()?;
        for op in batch {
            match op {
                BatchOp::Put { space, key, value } => {
                    inner.entry(space).or_default().insert(key, value);
                }
                BatchOp::Delete { space, key } => {
                    if let Some(entries) = inner.get_mut(&space) {
                        entries.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn count(&self, space: Keyspace) -> Result<usize> {
        let inner = self.read()?;
        Ok(inner.get(&space).map(|s| s.len()).unwrap_or(0))
    }
}

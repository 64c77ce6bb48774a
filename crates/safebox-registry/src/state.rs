//! Views of registry state handed to component operations.
//!
//! Queries read through a [`Snapshot`]. Mutations run inside a
//! [`Transaction`], which layers the command's pending writes over the store:
//! reads see those writes first, and nothing reaches the store until
//! [`Transaction::commit`]. Dropping a transaction discards it, so a command
//! that fails midway writes nothing.

use std::collections::BTreeMap;

use bytes::Bytes;
use safebox_core::{Height, Record};
use safebox_store::{Keyspace, Store, WriteBatch};

use crate::error::Result;

/// Read access to registry state.
pub trait StateRead {
    /// Raw value under a key.
    fn read(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>>;

    /// Raw `(key, value)` pairs under a prefix, ordered by key.
    fn scan(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>>;

    /// Height of the block being applied (or last applied, for snapshots).
    fn height(&self) -> Height;

    /// Decode the record under a key.
    fn load<R: Record>(&self, space: Keyspace, key: &[u8]) -> Result<Option<R>>
    where
        Self: Sized,
    {
        match self.read(space, key)? {
            Some(bytes) => Ok(Some(R::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Check if a key exists.
    fn exists(&self, space: Keyspace, key: &[u8]) -> Result<bool>
    where
        Self: Sized,
    {
        Ok(self.read(space, key)?.is_some())
    }
}

/// Write access to registry state.
pub trait StateWrite: StateRead {
    /// Stage a raw value.
    fn write(&mut self, space: Keyspace, key: Vec<u8>, value: Bytes);

    /// Stage a delete.
    fn remove(&mut self, space: Keyspace, key: Vec<u8>);

    /// Encode and stage a record.
    fn store<R: Record>(&mut self, space: Keyspace, key: Vec<u8>, record: &R) -> Result<()>
    where
        Self: Sized,
    {
        let bytes = record.to_bytes()?;
        self.write(space, key, Bytes::from(bytes));
        Ok(())
    }
}

/// Read-only view directly over the store.
pub struct Snapshot<'a, S: Store + ?Sized> {
    store: &'a S,
    height: Height,
}

impl<'a, S: Store + ?Sized> Snapshot<'a, S> {
    /// View the store as of the given height.
    pub fn new(store: &'a S, height: Height) -> Self {
        Self { store, height }
    }
}

impl<S: Store + ?Sized> StateRead for Snapshot<'_, S> {
    fn read(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>> {
        Ok(self.store.get(space, key)?)
    }

    fn scan(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>> {
        Ok(self.store.scan_prefix(space, prefix)?)
    }

    fn height(&self) -> Height {
        self.height
    }
}

/// Pending writes of one command layered over the store.
pub struct Transaction<'a, S: Store + ?Sized> {
    store: &'a S,
    height: Height,
    /// `None` marks a staged delete.
    pending: BTreeMap<(Keyspace, Vec<u8>), Option<Bytes>>,
}

impl<'a, S: Store + ?Sized> Transaction<'a, S> {
    /// Begin a transaction for a command applied at `height`.
    pub fn begin(store: &'a S, height: Height) -> Self {
        Self {
            store,
            height,
            pending: BTreeMap::new(),
        }
    }

    /// Convert the staged writes into a batch, ordered by key.
    pub fn into_batch(self) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for ((space, key), value) in self.pending {
            match value {
                Some(value) => batch.put(space, key, value),
                None => batch.delete(space, key),
            }
        }
        batch
    }

    /// Apply the staged writes to the store atomically.
    ///
    /// Returns the number of writes committed.
    pub fn commit(self) -> Result<usize> {
        let store = self.store;
        let batch = self.into_batch();
        let count = batch.len();
        store.apply(batch)?;
        Ok(count)
    }
}

impl<S: Store + ?Sized> StateRead for Transaction<'_, S> {
    fn read(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>> {
        if let Some(staged) = self.pending.get(&(space, key.to_vec())) {
            return Ok(staged.clone());
        }
        Ok(self.store.get(space, key)?)
    }

    fn scan(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>> {
        let mut merged: BTreeMap<Vec<u8>, Bytes> =
            self.store.scan_prefix(space, prefix)?.into_iter().collect();

        let staged = self
            .pending
            .range((space, prefix.to_vec())..)
            .take_while(|((s, key), _)| *s == space && key.starts_with(prefix));

        for ((_, key), value) in staged {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    fn height(&self) -> Height {
        self.height
    }
}

impl<S: Store + ?Sized> StateWrite for Transaction<'_, S> {
    fn write(&mut self, space: Keyspace, key: Vec<u8>, value: Bytes) {
        self.pending.insert((space, key), Some(value));
    }

    fn remove(&mut self, space: Keyspace, key: Vec<u8>) {
        self.pending.insert((space, key), None);
    }
}

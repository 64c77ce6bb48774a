//! Store trait: the abstract key-value interface beneath the registry.
//!
//! The registry owns three disjoint key spaces (documents, grants, groups)
//! plus a small metadata space. Implementations include SQLite (durable)
//! and in-memory (for tests).

use bytes::Bytes;

use crate::error::Result;

/// The disjoint key spaces of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyspace {
    /// Document records keyed by document hash.
    Documents,
    /// Grant records keyed by `document_hash || principal`.
    Grants,
    /// Sharing groups keyed by group id.
    Groups,
    /// Ledger metadata (current block height).
    Meta,
}

impl Keyspace {
    /// Every key space, in digest order.
    pub const ALL: [Keyspace; 4] = [
        Keyspace::Documents,
        Keyspace::Grants,
        Keyspace::Groups,
        Keyspace::Meta,
    ];

    /// Convert to the stored discriminant.
    pub fn to_u8(self) -> u8 {
        match self {
            Keyspace::Documents => 0,
            Keyspace::Grants => 1,
            Keyspace::Groups => 2,
            Keyspace::Meta => 3,
        }
    }

    /// Convert from the stored discriminant.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Keyspace::Documents),
            1 => Some(Keyspace::Grants),
            2 => Some(Keyspace::Groups),
            3 => Some(Keyspace::Meta),
            _ => None,
        }
    }
}

/// A single write in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put {
        space: Keyspace,
        key: Vec<u8>,
        value: Bytes,
    },
    Delete {
        space: Keyspace,
        key: Vec<u8>,
    },
}

impl BatchOp {
    /// The key space this op touches.
    pub fn space(&self) -> Keyspace {
        match self {
            BatchOp::Put { space, .. } | BatchOp::Delete { space, .. } => *space,
        }
    }

    /// The key this op touches.
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOp::Put { key, .. } | BatchOp::Delete { key, .. } => key,
        }
    }
}

/// An ordered set of writes applied all-or-nothing.
///
/// Later ops on the same key win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put.
    pub fn put(&mut self, space: Keyspace, key: impl Into<Vec<u8>>, value: impl Into<Bytes>) {
        self.ops.push(BatchOp::Put {
            space,
            key: key.into(),
            value: value.into(),
        });
    }

    /// Queue a delete.
    pub fn delete(&mut self, space: Keyspace, key: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Delete {
            space,
            key: key.into(),
        });
    }

    /// Number of queued ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch has no ops.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate the queued ops in order.
    pub fn iter(&self) -> impl Iterator<Item = &BatchOp> {
        self.ops.iter()
    }

    /// Append every op of another batch.
    pub fn extend(&mut self, other: WriteBatch) {
        self.ops.extend(other.ops);
    }
}

impl IntoIterator for WriteBatch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// The Store trait: durable key-value storage.
///
/// Single-key reads and writes are atomic, and [`Store::apply`] commits a
/// whole batch atomically. There are no other transactions; the command
/// processor builds one batch per command.
pub trait Store: Send + Sync {
    /// Get the value stored under a key.
    fn get(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>>;

    /// All `(key, value)` pairs whose key starts with `prefix`, ordered by key.
    fn scan_prefix(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>>;

    /// Apply a batch of writes atomically.
    fn apply(&self, batch: WriteBatch) -> Result<()>;

    /// Number of keys in a key space.
    fn count(&self, space: Keyspace) -> Result<usize>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>> {
        (**self).get(space, key)
    }

    fn scan_prefix(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>> {
        (**self).scan_prefix(space, prefix)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        (**self).apply(batch)
    }

    fn count(&self, space: Keyspace) -> Result<usize> {
        (**self).count(space)
    }
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn get(&self, space: Keyspace, key: &[u8]) -> Result<Option<Bytes>> {
        (**self).get(space, key)
    }

    fn scan_prefix(&self, space: Keyspace, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Bytes)>> {
        (**self).scan_prefix(space, prefix)
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        (**self).apply(batch)
    }

    fn count(&self, space: Keyspace) -> Result<usize> {
        (**self).count(space)
    }
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Check if a key exists.
    fn contains(&self, space: Keyspace, key: &[u8]) -> Result<bool> {
        Ok(self.get(space, key)?.is_some())
    }

    /// Every entry of a key space, ordered by key.
    fn entries(&self, space: Keyspace) -> Result<Vec<(Vec<u8>, Bytes)>> {
        self.scan_prefix(space, &[])
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyspace_discriminant_roundtrip() {
        for space in Keyspace::ALL {
            assert_eq!(Keyspace::from_u8(space.to_u8()), Some(space));
        }
        assert_eq!(Keyspace::from_u8(9), None);
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        batch.put(Keyspace::Documents, b"a".to_vec(), Bytes::from_static(b"1"));
        batch.delete(Keyspace::Documents, b"a".to_vec());

        let ops: Vec<_> = batch.iter().collect();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], BatchOp::Put { .. }));
        assert!(matches!(ops[1], BatchOp::Delete { .. }));
        assert_eq!(ops[1].key(), b"a");
    }
}

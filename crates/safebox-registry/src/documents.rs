//! Document registration, lookup and versioning.

use safebox_core::{BoundedText, Document, DocumentHash, DocumentView, EncryptionKey, Principal};
use safebox_store::{keys, Keyspace, StoreError};

use crate::error::{RegistryError, Result};
use crate::state::{StateRead, StateWrite};

/// The document half of the registry.
///
/// Each record is written once under its hash and never modified again.
/// Updating a document writes a successor record under a new hash, so the
/// records of one document form a chain linked through `previous`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRegistry;

impl DocumentRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Register a new document owned by `caller` at version 0.
    pub fn register<T: StateWrite>(
        &self,
        tx: &mut T,
        hash: DocumentHash,
        title: BoundedText,
        description: BoundedText,
        encryption_key: Option<EncryptionKey>,
        caller: Principal,
    ) -> Result<()> {
        let key = keys::document_key(&hash);
        if tx.exists(Keyspace::Documents, &key)? {
            return Err(RegistryError::DocumentExists(hash));
        }

        let doc = Document::registered(
            hash,
            title,
            description,
            caller,
            encryption_key,
            tx.height(),
        );
        tx.store(Keyspace::Documents, key, &doc)?;
        tracing::trace!(%hash, owner = %caller, "registered document");
        Ok(())
    }

    /// Load the full record at a hash.
    pub fn load<T: StateRead>(&self, state: &T, hash: &DocumentHash) -> Result<Document> {
        state
            .load(Keyspace::Documents, &keys::document_key(hash))?
            .ok_or(RegistryError::DocumentNotFound(*hash))
    }

    /// Look up the caller-facing view of a document.
    pub fn get<T: StateRead>(&self, state: &T, hash: &DocumentHash) -> Result<DocumentView> {
        Ok(self.load(state, hash)?.view())
    }

    /// Supersede the record at `old_hash` with a new one at `new_hash`.
    ///
    /// Fails with, in order: not found (no record at `old_hash`), not owner
    /// (caller is not the recorded owner), exists (a record is already at
    /// `new_hash`, which includes `old_hash == new_hash`).
    pub fn update<T: StateWrite>(
        &self,
        tx: &mut T,
        old_hash: DocumentHash,
        new_hash: DocumentHash,
        title: BoundedText,
        description: BoundedText,
        caller: Principal,
    ) -> Result<()> {
        let old = self.load(&*tx, &old_hash)?;
        ensure_owner(&old, caller)?;

        let new_key = keys::document_key(&new_hash);
        if tx.exists(Keyspace::Documents, &new_key)? {
            return Err(RegistryError::DocumentExists(new_hash));
        }

        let next = old
            .successor(new_hash, title, description, tx.height())
            .ok_or_else(|| {
                StoreError::InvalidData(format!("version of {old_hash} cannot advance"))
            })?;
        tx.store(Keyspace::Documents, new_key, &next)?;
        tracing::trace!(
            old = %old_hash,
            new = %new_hash,
            version = next.version,
            "updated document"
        );
        Ok(())
    }

    /// Version number of the record at a hash.
    pub fn get_version<T: StateRead>(&self, state: &T, hash: &DocumentHash) -> Result<u64> {
        Ok(self.load(state, hash)?.version)
    }

    /// Hashes along the version chain, newest first, ending at the
    /// registration.
    pub fn history<T: StateRead>(
        &self,
        state: &T,
        hash: &DocumentHash,
    ) -> Result<Vec<DocumentHash>> {
        let mut doc = self.load(state, hash)?;
        let mut chain = vec![doc.hash];

        while let Some(previous) = doc.previous {
            let prior = self.load(state, &previous)?;
            // Versions strictly decrease along a well-formed chain.
            if prior.version >= doc.version {
                return Err(StoreError::InvalidData(format!(
                    "version chain of {} is not decreasing at {}",
                    hash, previous
                ))
                .into());
            }
            chain.push(prior.hash);
            doc = prior;
        }

        Ok(chain)
    }

    /// Owner of the record at a hash, after checking that `caller` is it.
    ///
    /// Grant and revoke rely on this for their authorisation check.
    pub fn owner_of<T: StateRead>(
        &self,
        state: &T,
        hash: &DocumentHash,
        caller: Principal,
    ) -> Result<Principal> {
        let doc = self.load(state, hash)?;
        ensure_owner(&doc, caller)?;
        Ok(doc.owner)
    }

    /// Check if a record exists at a hash.
    pub fn exists<T: StateRead>(&self, state: &T, hash: &DocumentHash) -> Result<bool> {
        state.exists(Keyspace::Documents, &keys::document_key(hash))
    }
}

fn ensure_owner(doc: &Document, caller: Principal) -> Result<()> {
    if doc.is_owned_by(&caller) {
        Ok(())
    } else {
        Err(RegistryError::NotOwner {
            hash: doc.hash,
            caller,
            owner: doc.owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Snapshot, Transaction};
    use safebox_core::Height;
    use safebox_store::{MemoryStore, Store};

    const OWNER: Principal = Principal::from_bytes([0xd0; 32]);
    const OTHER: Principal = Principal::from_bytes([0xe1; 32]);

    fn hash(b: u8) -> DocumentHash {
        DocumentHash::from_bytes([b; 32])
    }

    fn text(s: &str) -> BoundedText {
        BoundedText::new(s).unwrap()
    }

    fn register(store: &MemoryStore, h: DocumentHash, height: u64) {
        let mut tx = Transaction::begin(store, Height(height));
        DocumentRegistry
            .register(&mut tx, h, text("Doc"), text("Desc"), None, OWNER)
            .unwrap();
        tx.commit().unwrap();
    }

    fn update(
        store: &MemoryStore,
        old: DocumentHash,
        new: DocumentHash,
        caller: Principal,
    ) -> Result<()> {
        let mut tx = Transaction::begin(store, Height(9));
        DocumentRegistry.update(&mut tx, old, new, text("Doc2"), text("Desc2"), caller)?;
        tx.commit()?;
        Ok(())
    }

    #[test]
    fn test_register_then_get() {
        let store = MemoryStore::new();
        register(&store, hash(1), 4);

        let view = DocumentRegistry
            .get(&Snapshot::new(&store, Height(4)), &hash(1))
            .unwrap();
        assert_eq!(view.title, "Doc");
        assert_eq!(view.description, "Desc");
        assert_eq!(view.owner, OWNER);
        assert_eq!(view.version, 0);
        assert_eq!(view.created_at, Height(4));
        assert!(!view.has_encryption_key);
        assert_eq!(view.previous, None);
    }

    #[test]
    fn test_register_twice_is_rejected() {
        let store = MemoryStore::new();
        register(&store, hash(1), 1);

        let mut tx = Transaction::begin(&store, Height(2));
        let err = DocumentRegistry
            .register(&mut tx, hash(1), text("Other"), text(""), None, OTHER)
            .unwrap_err();
        assert!(matches!(err, RegistryError::DocumentExists(h) if h == hash(1)));
    }

    #[test]
    fn test_get_missing_document() {
        let store = MemoryStore::new();
        let snapshot = Snapshot::new(&store, Height::GENESIS);
        assert!(matches!(
            DocumentRegistry.get(&snapshot, &hash(7)),
            Err(RegistryError::DocumentNotFound(_))
        ));
        assert!(matches!(
            DocumentRegistry.get_version(&snapshot, &hash(7)),
            Err(RegistryError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_update_creates_successor() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store, Height(1));
        let key = EncryptionKey::from_bytes([0x42; 32]);
        DocumentRegistry
            .register(&mut tx, hash(1), text("Doc"), text("Desc"), Some(key), OWNER)
            .unwrap();
        tx.commit().unwrap();

        update(&store, hash(1), hash(2), OWNER).unwrap();

        let snapshot = Snapshot::new(&store, Height(9));
        let old = DocumentRegistry.load(&snapshot, &hash(1)).unwrap();
        let new = DocumentRegistry.load(&snapshot, &hash(2)).unwrap();
        assert_eq!(old.version, 0);
        assert_eq!(old.title, "Doc");
        assert_eq!(new.version, 1);
        assert_eq!(new.title, "Doc2");
        assert_eq!(new.owner, OWNER);
        assert_eq!(new.encryption_key, Some(key));
        assert_eq!(new.previous, Some(hash(1)));
        assert_eq!(new.created_at, Height(9));
    }

    #[test]
    fn test_update_check_order() {
        let store = MemoryStore::new();
        register(&store, hash(1), 1);
        register(&store, hash(2), 1);

        // Missing old hash wins over everything else.
        assert!(matches!(
            update(&store, hash(9), hash(2), OTHER),
            Err(RegistryError::DocumentNotFound(h)) if h == hash(9)
        ));
        // Ownership is checked before the new hash.
        assert!(matches!(
            update(&store, hash(1), hash(2), OTHER),
            Err(RegistryError::NotOwner { .. })
        ));
        assert!(matches!(
            update(&store, hash(1), hash(2), OWNER),
            Err(RegistryError::DocumentExists(h)) if h == hash(2)
        ));
        assert!(matches!(
            update(&store, hash(1), hash(1), OWNER),
            Err(RegistryError::DocumentExists(_))
        ));
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let store = MemoryStore::new();
        register(&store, hash(1), 1);
        let before = store.count(Keyspace::Documents).unwrap();

        assert!(update(&store, hash(1), hash(2), OTHER).is_err());
        assert_eq!(store.count(Keyspace::Documents).unwrap(), before);
    }

    #[test]
    fn test_update_at_max_version_is_a_fault() {
        let store = MemoryStore::new();
        let worn = Document {
            version: u64::MAX,
            ..Document::registered(hash(1), text("Doc"), text(""), OWNER, None, Height(1))
        };
        let mut tx = Transaction::begin(&store, Height(1));
        tx.store(Keyspace::Documents, keys::document_key(&hash(1)), &worn)
            .unwrap();
        tx.commit().unwrap();

        assert!(matches!(
            update(&store, hash(1), hash(2), OWNER),
            Err(RegistryError::Store(StoreError::InvalidData(_)))
        ));
        assert_eq!(store.count(Keyspace::Documents).unwrap(), 1);
    }

    #[test]
    fn test_history_walks_chain_newest_first() {
        let store = MemoryStore::new();
        register(&store, hash(1), 1);
        update(&store, hash(1), hash(2), OWNER).unwrap();
        update(&store, hash(2), hash(3), OWNER).unwrap();

        let snapshot = Snapshot::new(&store, Height(9));
        assert_eq!(
            DocumentRegistry.history(&snapshot, &hash(3)).unwrap(),
            vec![hash(3), hash(2), hash(1)]
        );
        assert_eq!(DocumentRegistry.history(&snapshot, &hash(1)).unwrap(), vec![hash(1)]);
        assert_eq!(DocumentRegistry.get_version(&snapshot, &hash(3)).unwrap(), 2);
    }

    #[test]
    fn test_old_hash_can_fork() {
        let store = MemoryStore::new();
        register(&store, hash(1), 1);
        update(&store, hash(1), hash(2), OWNER).unwrap();
        update(&store, hash(1), hash(3), OWNER).unwrap();

        let snapshot = Snapshot::new(&store, Height(9));
        assert_eq!(DocumentRegistry.get_version(&snapshot, &hash(2)).unwrap(), 1);
        assert_eq!(DocumentRegistry.get_version(&snapshot, &hash(3)).unwrap(), 1);
    }

    #[test]
    fn test_owner_of() {
        let store = MemoryStore::new();
        register(&store, hash(1), 1);
        let snapshot = Snapshot::new(&store, Height(1));

        assert_eq!(DocumentRegistry.owner_of(&snapshot, &hash(1), OWNER).unwrap(), OWNER);
        assert!(matches!(
            DocumentRegistry.owner_of(&snapshot, &hash(1), OTHER),
            Err(RegistryError::NotOwner { owner, .. }) if owner == OWNER
        ));
    }
}

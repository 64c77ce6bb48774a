//! Per-document access grants.
//!
//! A grant is an active record at `(document, principal)`. Revoking deletes
//! the record, so "no grant" and "revoked" look the same to readers. Only
//! the document owner may grant or revoke, and the owner has no implicit
//! grant of their own.

use safebox_core::{AccessGrant, DocumentHash, EncryptionKey, Principal, Record};
use safebox_store::{keys, Keyspace};

use crate::documents::DocumentRegistry;
use crate::error::{RegistryError, Result};
use crate::state::{StateRead, StateWrite};

/// Grant, revoke and query access to registered documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControl {
    documents: DocumentRegistry,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `principal` access to a document, optionally with a wrapped key.
    ///
    /// Granting again replaces the stored key and grant height.
    pub fn grant<T: StateWrite>(
        &self,
        tx: &mut T,
        hash: DocumentHash,
        principal: Principal,
        encryption_key: Option<EncryptionKey>,
        caller: Principal,
    ) -> Result<()> {
        self.documents.owner_of(&*tx, &hash, caller)?;

        let grant = AccessGrant::active(encryption_key, tx.height());
        tx.store(Keyspace::Grants, keys::grant_key(&hash, &principal), &grant)?;
        tracing::trace!(%hash, %principal, "granted access");
        Ok(())
    }

    /// Remove `principal`'s grant on a document.
    ///
    /// Succeeds whether or not a grant was present.
    pub fn revoke<T: StateWrite>(
        &self,
        tx: &mut T,
        hash: DocumentHash,
        principal: Principal,
        caller: Principal,
    ) -> Result<()> {
        self.documents.owner_of(&*tx, &hash, caller)?;

        tx.remove(Keyspace::Grants, keys::grant_key(&hash, &principal));
        tracing::trace!(%hash, %principal, "revoked access");
        Ok(())
    }

    /// Whether `principal` holds an active grant on a document.
    ///
    /// Unknown documents and absent grants both answer `false`. Only storage
    /// faults are errors.
    pub fn has_access<T: StateRead>(
        &self,
        state: &T,
        hash: &DocumentHash,
        principal: &Principal,
    ) -> Result<bool> {
        Ok(self.active_grant(state, hash, principal)?.is_some())
    }

    /// The wrapped key on `principal`'s active grant, if any.
    pub fn access_key<T: StateRead>(
        &self,
        state: &T,
        hash: &DocumentHash,
        principal: &Principal,
    ) -> Result<Option<EncryptionKey>> {
        self.ensure_registered(state, hash)?;
        Ok(self
            .active_grant(state, hash, principal)?
            .and_then(|grant| grant.encryption_key))
    }

    /// Principals holding an active grant on a document, ordered by key bytes.
    pub fn grantees<T: StateRead>(&self, state: &T, hash: &DocumentHash) -> Result<Vec<Principal>> {
        self.ensure_registered(state, hash)?;

        let mut principals = Vec::new();
        for (key, value) in state.scan(Keyspace::Grants, &keys::grant_prefix(hash))? {
            let grant = AccessGrant::from_bytes(&value)?;
            if grant.is_active() {
                let (_, principal) = keys::split_grant_key(&key)?;
                principals.push(principal);
            }
        }
        Ok(principals)
    }

    fn active_grant<T: StateRead>(
        &self,
        state: &T,
        hash: &DocumentHash,
        principal: &Principal,
    ) -> Result<Option<AccessGrant>> {
        let grant: Option<AccessGrant> =
            state.load(Keyspace::Grants, &keys::grant_key(hash, principal))?;
        Ok(grant.filter(AccessGrant::is_active))
    }

    fn ensure_registered<T: StateRead>(&self, state: &T, hash: &DocumentHash) -> Result<()> {
        if self.documents.exists(state, hash)? {
            Ok(())
        } else {
            Err(RegistryError::DocumentNotFound(*hash))
        }
    }
}

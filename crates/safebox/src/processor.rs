//! The command processor: applies calls to the registry one at a time.
//!
//! Each call runs in its own [`Transaction`]. A call that succeeds commits
//! its writes as one batch; a call that is rejected commits nothing and its
//! rejection is returned in the receipt. Rejections never stop a block.

use safebox_core::{
    Call, Command, CommandResult, DocumentHash, DocumentView, GroupId, GroupView, Height, Output,
    Principal,
};
use safebox_registry::{
    Registry, RegistryConfig, RegistryError, Snapshot, StateWrite, Transaction,
};
use safebox_store::{keys, state_digest, Keyspace, StateDigest, Store, StoreError, WriteBatch};

use crate::error::{LedgerError, Result};
use crate::receipt::{BlockReceipt, CommandReceipt};

/// Applies calls to a store in the order they are given.
///
/// Taking `&mut self` for every mutation means at most one call is in
/// flight at a time.
pub struct CommandProcessor<S: Store> {
    store: S,
    registry: Registry,
    height: Height,
}

impl<S: Store> CommandProcessor<S> {
    /// Open a processor over a store, resuming at its persisted height.
    pub fn open(store: S, config: &RegistryConfig) -> Result<Self> {
        let height = read_height(&store)?;
        tracing::debug!(%height, "opened command processor");
        Ok(Self {
            store,
            registry: Registry::new(config),
            height,
        })
    }

    /// Height of the last applied block.
    pub fn height(&self) -> Height {
        self.height
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the registry components.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Consume the processor and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Applying Calls
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply the calls of the next block in order.
    ///
    /// The height advances by one and is persisted before the first call.
    /// Only storage faults end the block early; calls already applied stay
    /// committed.
    pub fn apply_block(&mut self, calls: &[Call]) -> Result<BlockReceipt> {
        let height = self.height.next();
        let mut batch = WriteBatch::new();
        batch.put(Keyspace::Meta, keys::HEIGHT_KEY, height.get().to_be_bytes().to_vec());
        self.store.apply(batch)?;
        self.height = height;

        let receipts = calls
            .iter()
            .enumerate()
            .map(|(index, call)| self.apply_at(index, call))
            .collect::<Result<Vec<_>>>()?;

        let block = BlockReceipt { height, receipts };
        tracing::info!(
            %height,
            commands = block.receipts.len(),
            accepted = block.accepted(),
            rejected = block.rejected(),
            "applied block"
        );
        Ok(block)
    }

    /// Apply a single call at the current height.
    pub fn apply(&mut self, call: &Call) -> Result<CommandReceipt> {
        self.apply_at(0, call)
    }

    fn apply_at(&mut self, index: usize, call: &Call) -> Result<CommandReceipt> {
        let name = call.command.name();
        let mut tx = Transaction::begin(&self.store, self.height);

        let outcome = match execute(&self.registry, &mut tx, call.caller, &call.command) {
            Ok(output) => {
                if !call.command.is_read_only() {
                    tx.commit()?;
                }
                Ok(output)
            }
            Err(err) => match err.as_command_error() {
                // Dropping the transaction discards its staged writes.
                Some(rejection) => Err(rejection),
                None => {
                    tracing::warn!(
                        height = %self.height,
                        index,
                        command = name,
                        error = %err,
                        "storage fault aborted command"
                    );
                    return Err(err.into());
                }
            },
        };

        tracing::debug!(
            height = %self.height,
            index,
            command = name,
            caller = %call.caller,
            ok = outcome.is_ok(),
            "applied command"
        );

        Ok(CommandReceipt {
            index,
            caller: call.caller,
            command: name.to_string(),
            result: outcome,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a read-only command against the current state without a receipt.
    ///
    /// Mutations are not applied here; they answer `None`.
    pub fn query(&self, caller: Principal, command: &Command) -> Result<Option<CommandResult>> {
        if !command.is_read_only() {
            return Ok(None);
        }
        let mut tx = Transaction::begin(&self.store, self.height);
        match execute(&self.registry, &mut tx, caller, command) {
            Ok(output) => Ok(Some(Ok(output))),
            Err(err) => match err.as_command_error() {
                Some(rejection) => Ok(Some(Err(rejection))),
                None => Err(err.into()),
            },
        }
    }

    /// Look up a document view.
    pub fn document(&self, hash: &DocumentHash) -> Result<Option<DocumentView>> {
        optional(self.registry.documents.get(&self.snapshot(), hash))
    }

    /// Version of the record at a hash.
    pub fn version(&self, hash: &DocumentHash) -> Result<Option<u64>> {
        optional(self.registry.documents.get_version(&self.snapshot(), hash))
    }

    /// Whether `principal` holds an active grant on `hash`.
    pub fn has_access(&self, hash: &DocumentHash, principal: &Principal) -> Result<bool> {
        Ok(self
            .registry
            .access
            .has_access(&self.snapshot(), hash, principal)?)
    }

    /// Look up a sharing group.
    pub fn group(&self, group_id: &GroupId) -> Result<Option<GroupView>> {
        optional(self.registry.groups.get(&self.snapshot(), group_id))
    }

    /// Blake3 digest over the entire state.
    pub fn state_digest(&self) -> Result<StateDigest> {
        Ok(state_digest(&self.store)?)
    }

    fn snapshot(&self) -> Snapshot<'_, S> {
        Snapshot::new(&self.store, self.height)
    }
}

/// Dispatch a command to its registry operation.
fn execute<T: StateWrite>(
    registry: &Registry,
    tx: &mut T,
    caller: Principal,
    command: &Command,
) -> safebox_registry::Result<Output> {
    let output = match command {
        Command::RegisterDocument {
            hash,
            title,
            description,
            encryption_key,
        } => {
            registry.documents.register(
                tx,
                *hash,
                title.clone(),
                description.clone(),
                *encryption_key,
                caller,
            )?;
            Output::Bool(true)
        }
        Command::GetDocument { hash } => Output::Document(registry.documents.get(&*tx, hash)?),
        Command::UpdateDocument {
            old_hash,
            new_hash,
            title,
            description,
        } => {
            registry.documents.update(
                tx,
                *old_hash,
                *new_hash,
                title.clone(),
                description.clone(),
                caller,
            )?;
            Output::Bool(true)
        }
        Command::GetDocumentVersion { hash } => {
            Output::Version(registry.documents.get_version(&*tx, hash)?)
        }
        Command::GetDocumentHistory { hash } => {
            Output::History(registry.documents.history(&*tx, hash)?)
        }
        Command::GrantAccess {
            hash,
            principal,
            encryption_key,
        } => {
            registry
                .access
                .grant(tx, *hash, *principal, *encryption_key, caller)?;
            Output::Bool(true)
        }
        Command::RevokeAccess { hash, principal } => {
            registry.access.revoke(tx, *hash, *principal, caller)?;
            Output::Bool(true)
        }
        Command::HasAccess { hash, principal } => {
            Output::Bool(registry.access.has_access(&*tx, hash, principal)?)
        }
        Command::GetAccessKey { hash, principal } => {
            Output::Key(registry.access.access_key(&*tx, hash, principal)?)
        }
        Command::ListGrantees { hash } => {
            Output::Principals(registry.access.grantees(&*tx, hash)?)
        }
        Command::CreateSharingGroup {
            group_id,
            name,
            members,
        } => {
            registry
                .groups
                .create(tx, *group_id, name.clone(), members.clone(), caller)?;
            Output::Bool(true)
        }
        Command::GetSharingGroup { group_id } => {
            Output::Group(registry.groups.get(&*tx, group_id)?)
        }
    };
    Ok(output)
}

/// Turn "not found" into `None`, keeping every other error.
fn optional<T>(result: safebox_registry::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RegistryError::DocumentNotFound(_) | RegistryError::GroupNotFound(_)) => Ok(None),
        Err(err) => Err(LedgerError::from(err)),
    }
}

fn read_height<S: Store + ?Sized>(store: &S) -> Result<Height> {
    let Some(bytes) = store.get(Keyspace::Meta, keys::HEIGHT_KEY)? else {
        return Ok(Height::GENESIS);
    };
    let raw = <[u8; 8]>::try_from(&bytes[..]).map_err(|_| {
        StoreError::InvalidData(format!("stored height has {} bytes, expected 8", bytes.len()))
    })?;
    Ok(Height(u64::from_be_bytes(raw)))
}

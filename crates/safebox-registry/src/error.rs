//! Error types for the registry.

use safebox_core::{CommandError, CoreError, DocumentHash, GroupId, Principal};
use safebox_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// The first group of variants are rejections: the command was invalid for
/// the current state and is reported back to the caller. `Store` and `Core`
/// are faults in the layer below and abort the command.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No document record at this hash.
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentHash),

    /// A document record already exists at this hash.
    #[error("document already exists: {0}")]
    DocumentExists(DocumentHash),

    /// No sharing group with this id.
    #[error("sharing group not found: {0}")]
    GroupNotFound(GroupId),

    /// A sharing group with this id already exists.
    #[error("sharing group already exists: {0}")]
    GroupExists(GroupId),

    /// Caller tried to mutate a document it does not own.
    #[error("{caller} is not the owner of document {hash} (owner {owner})")]
    NotOwner {
        hash: DocumentHash,
        caller: Principal,
        owner: Principal,
    },

    /// Sharing group member list exceeds the configured bound.
    #[error("sharing group has {count} members, maximum is {max}")]
    TooManyMembers { count: usize, max: usize },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored record could not be encoded or decoded.
    #[error("record error: {0}")]
    Core(#[from] CoreError),
}

impl RegistryError {
    /// The caller-visible rejection, or `None` for infrastructure faults.
    pub fn as_command_error(&self) -> Option<CommandError> {
        match self {
            RegistryError::DocumentNotFound(_) | RegistryError::GroupNotFound(_) => {
                Some(CommandError::NotFound)
            }
            RegistryError::DocumentExists(_) | RegistryError::GroupExists(_) => {
                Some(CommandError::AlreadyExists)
            }
            RegistryError::NotOwner { .. } => Some(CommandError::Unauthorized),
            RegistryError::TooManyMembers { .. } => Some(CommandError::TooManyMembers),
            RegistryError::Store(_) | RegistryError::Core(_) => None,
        }
    }

    /// Whether this error is a rejection rather than a fault.
    pub fn is_rejection(&self) -> bool {
        self.as_command_error().is_some()
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

//! Error types for the ledger.

use safebox_registry::RegistryError;
use safebox_store::StoreError;
use thiserror::Error;

/// Faults that stop the ledger from applying a command.
///
/// A command that is merely invalid (unknown document, wrong owner, ...) is
/// not a fault; it is reported in its receipt. These variants mean the
/// state could not be read or written at all.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The registry hit a storage or record fault while applying a command.
    #[error("registry fault: {0}")]
    Registry(#[from] RegistryError),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The blocking apply task panicked or was cancelled.
    #[error("apply task failed: {0}")]
    Task(String),

    /// The processor lock was poisoned by a panic in an earlier block.
    #[error("processor lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

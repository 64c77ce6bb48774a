//! Error types for the SafeBox core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core errors: invalid inputs and record encoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("text is {len} bytes, maximum is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("text contains non-ASCII characters")]
    NonAscii,

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// The failure taxonomy reported to callers in command receipts.
///
/// These are ordinary results of applying a command, not faults: a rejected
/// command writes nothing and the next command proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum CommandError {
    /// The referenced document or group has no record.
    #[error("not found")]
    NotFound,

    /// A document hash or group id is already in use.
    #[error("already exists")]
    AlreadyExists,

    /// The caller does not own the record it tried to mutate.
    #[error("unauthorized")]
    Unauthorized,

    /// A sharing group was created with more members than allowed.
    #[error("too many members")]
    TooManyMembers,
}

impl CommandError {
    /// Stable numeric code for wire responses.
    pub const fn code(self) -> u32 {
        match self {
            CommandError::NotFound => 404,
            CommandError::AlreadyExists => 409,
            CommandError::Unauthorized => 401,
            CommandError::TooManyMembers => 413,
        }
    }

    /// Look up an error by its numeric code.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            404 => Some(CommandError::NotFound),
            409 => Some(CommandError::AlreadyExists),
            401 => Some(CommandError::Unauthorized),
            413 => Some(CommandError::TooManyMembers),
            _ => None,
        }
    }
}

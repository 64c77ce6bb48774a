//! # SafeBox Core
//!
//! Pure types for the SafeBox document registry: identifiers, bounded text,
//! stored records, commands and their outputs.
//!
//! This crate contains no I/O and no storage. Everything here is plain data
//! plus the CBOR codec used to persist records.
//!
//! ## Key Types
//!
//! - [`DocumentHash`] - Content identifier and primary key of a document
//! - [`Principal`] - Verified caller identity
//! - [`Document`] / [`AccessGrant`] / [`SharingGroup`] - Stored records
//! - [`Command`] / [`Call`] - What callers submit
//! - [`Output`] / [`CommandError`] - What they get back

pub mod codec;
pub mod command;
pub mod error;
pub mod record;
pub mod text;
pub mod types;

pub use codec::Record;
pub use command::{Call, Command, CommandResult, Output};
pub use error::{CommandError, CoreError};
pub use record::{AccessGrant, Document, DocumentView, GroupView, SharingGroup};
pub use text::{BoundedText, MAX_TEXT_LEN};
pub use types::{DocumentHash, EncryptionKey, GroupId, Height, Principal, ID_LEN};

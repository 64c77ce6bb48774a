//! # SafeBox
//!
//! A permissioned document registry: document hashes mapped to metadata,
//! ownership, per-principal access grants and version history, plus named
//! sharing groups.
//!
//! ## Overview
//!
//! State changes arrive as [`Call`]s (a command plus its verified caller)
//! grouped into blocks whose order is fixed upstream. The
//! [`CommandProcessor`] applies each call atomically and reports its
//! outcome in a [`CommandReceipt`]. The [`Ledger`] puts an async front door
//! on a processor for services that receive blocks concurrently.
//!
//! ## Key Concepts
//!
//! - **Document**: Write-once record keyed by its content hash. Updates add
//!   a new record under a new hash with the version advanced by one.
//! - **Grant**: Owner-issued access for one principal on one hash,
//!   optionally carrying a wrapped encryption key.
//! - **Sharing group**: A named, fixed list of principals.
//! - **Rejection**: A command invalid for the current state. It is reported
//!   in the receipt and writes nothing; it is never a Rust error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use safebox::{Ledger, LedgerConfig};
//! use safebox::core::{BoundedText, Command, DocumentHash, Principal};
//!
//! async fn example() {
//!     let ledger = Ledger::open(&LedgerConfig::sqlite("registry.db")).unwrap();
//!     let owner = Principal::from_bytes([1; 32]);
//!
//!     let block = ledger
//!         .submit(vec![Command::RegisterDocument {
//!             hash: DocumentHash::from_bytes([2; 32]),
//!             title: BoundedText::new("Doc").unwrap(),
//!             description: BoundedText::new("Desc").unwrap(),
//!             encryption_key: None,
//!         }
//!         .by(owner)])
//!         .await
//!         .unwrap();
//!
//!     assert!(block.receipts[0].is_ok());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `safebox::core` - Identifiers, records, commands and outputs
//! - `safebox::store` - Storage abstraction, SQLite and in-memory backends
//! - `safebox::registry` - The registry state machine components

pub mod config;
pub mod error;
pub mod ledger;
pub mod processor;
pub mod receipt;

// Re-export component crates
pub use safebox_core as core;
pub use safebox_registry as registry;
pub use safebox_store as store;

pub use config::{LedgerConfig, StoreConfig};
pub use error::{LedgerError, Result};
pub use ledger::{BlockSource, ChannelSource, Ledger};
pub use processor::CommandProcessor;
pub use receipt::{BlockReceipt, CommandReceipt};

// Re-export commonly used core types
pub use safebox_core::{
    Call, Command, CommandError, CommandResult, DocumentHash, DocumentView, EncryptionKey,
    GroupId, GroupView, Height, Output, Principal,
};

//! # SafeBox Store
//!
//! Key-value storage abstraction for the SafeBox registry. Provides a
//! trait-based interface with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The registry keeps its state in disjoint key spaces ([`Keyspace`]) behind
//! the [`Store`] trait, so the state machine is storage-agnostic. The
//! durable implementation is [`SqliteStore`], with [`MemoryStore`] for tests.
//!
//! ## Key Types
//!
//! - [`Store`] - Atomic single-key reads, ordered prefix scans, batch commits
//! - [`WriteBatch`] - The writes of one command, applied all-or-nothing
//! - [`StateDigest`] - Blake3 digest of the full store contents
//!
//! ## Usage
//!
//! ```rust,no_run
//! use safebox_store::{Keyspace, SqliteStore, Store, WriteBatch};
//!
//! let store = SqliteStore::open("registry.db").unwrap();
//!
//! let mut batch = WriteBatch::new();
//! batch.put(Keyspace::Meta, b"height".to_vec(), b"1".to_vec());
//! store.apply(batch).unwrap();
//! ```

pub mod digest;
pub mod error;
pub mod keys;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use digest::{state_digest, StateDigest};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{BatchOp, Keyspace, Store, StoreExt, WriteBatch};

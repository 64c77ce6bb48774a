//! # SafeBox Registry
//!
//! The access-control and versioning state machine of SafeBox.
//!
//! ## Overview
//!
//! Three components share one key-value state:
//!
//! - [`DocumentRegistry`] - Write-once document records and their version chain
//! - [`AccessControl`] - Owner-managed grants per `(document, principal)`
//! - [`SharingGroupRegistry`] - Named, fixed-membership principal lists
//!
//! Mutations take a [`StateWrite`], normally a [`Transaction`] that stages
//! the writes of one command and commits them as a single batch. Queries
//! take any [`StateRead`], including a [`Snapshot`] directly over the store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use safebox_core::{BoundedText, DocumentHash, Height, Principal};
//! use safebox_registry::{Registry, RegistryConfig, Transaction};
//! use safebox_store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let registry = Registry::new(&RegistryConfig::default());
//! let owner = Principal::from_bytes([1; 32]);
//!
//! let mut tx = Transaction::begin(&store, Height(1));
//! registry
//!     .documents
//!     .register(
//!         &mut tx,
//!         DocumentHash::from_bytes([2; 32]),
//!         BoundedText::new("Doc").unwrap(),
//!         BoundedText::new("Desc").unwrap(),
//!         None,
//!         owner,
//!     )
//!     .unwrap();
//! tx.commit().unwrap();
//! ```

pub mod access;
pub mod config;
pub mod documents;
pub mod error;
pub mod groups;
pub mod registry;
pub mod state;

pub use access::AccessControl;
pub use config::RegistryConfig;
pub use documents::DocumentRegistry;
pub use error::{RegistryError, Result};
pub use groups::{SharingGroupRegistry, DEFAULT_MAX_MEMBERS};
pub use registry::Registry;
pub use state::{Snapshot, StateRead, StateWrite, Transaction};

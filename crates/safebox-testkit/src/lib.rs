//! # SafeBox Testkit
//!
//! Testing utilities for the SafeBox registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Deterministic accounts, hash helpers and a ready-made
//!   in-memory registry for scenario tests
//! - **Generators**: Proptest strategies for identifiers, text and whole
//!   command sequences
//!
//! ## Test Fixtures
//!
//! ```rust
//! use safebox_testkit::fixtures::{document_hash, text, Accounts, TestRegistry};
//! use safebox::{Command, Output};
//!
//! let accounts = Accounts::new(2);
//! let mut registry = TestRegistry::new();
//! let result = registry.run(
//!     Command::RegisterDocument {
//!         hash: document_hash(b"report.pdf"),
//!         title: text("Report"),
//!         description: text("Q3"),
//!         encryption_key: None,
//!     }
//!     .by(accounts.deployer().principal()),
//! );
//! assert_eq!(result, Ok(Output::Bool(true)));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use safebox_testkit::generators::blocks;
//!
//! proptest! {
//!     #[test]
//!     fn test_replay_is_deterministic(blocks in blocks(4, 8)) {
//!         // apply `blocks` to two fresh processors and compare digests
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{document_hash, encryption_key, group_id, text, Account, Accounts, TestRegistry};
pub use generators::{block, blocks, call, CallPool};

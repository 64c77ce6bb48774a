//! Deterministic digest over the full contents of a store.
//!
//! Two stores that applied the same ordered command sequence hold identical
//! bytes in every key space, so their digests match. This is how replay
//! determinism is checked.

use std::fmt;

use crate::error::Result;
use crate::traits::{Keyspace, Store, StoreExt};

const DIGEST_DOMAIN: &[u8] = b"safebox-state-v0:";

/// A 32-byte Blake3 digest of store contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateDigest(pub [u8; 32]);

impl StateDigest {
    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the digest of every key space, in key order.
///
/// Keys and values are length-prefixed so distinct layouts cannot collide.
pub fn state_digest<S: Store + ?Sized>(store: &S) -> Result<StateDigest> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DIGEST_DOMAIN);

    for space in Keyspace::ALL {
        let entries = store.entries(space)?;
        hasher.update(&[space.to_u8()]);
        hasher.update(&(entries.len() as u64).to_be_bytes());
        for (key, value) in entries {
            hasher.update(&(key.len() as u64).to_be_bytes());
            hasher.update(&key);
            hasher.update(&(value.len() as u64).to_be_bytes());
            hasher.update(&value);
        }
    }

    Ok(StateDigest(*hasher.finalize().as_bytes()))
}

//! Key layout for each key space.
//!
//! Documents and groups are keyed by their 32-byte id. Grants are keyed by
//! `document_hash || principal`, so every grant of a document shares the
//! document hash as a 32-byte prefix and can be listed with one scan.

use safebox_core::{DocumentHash, GroupId, Principal, ID_LEN};

use crate::error::{Result, StoreError};

/// Key of the current block height in [`crate::Keyspace::Meta`].
pub const HEIGHT_KEY: &[u8] = b"height";

/// Key of a document record.
pub fn document_key(hash: &DocumentHash) -> Vec<u8> {
    hash.as_bytes().to_vec()
}

/// Key of a grant record.
pub fn grant_key(hash: &DocumentHash, principal: &Principal) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 * ID_LEN);
    key.extend_from_slice(hash.as_bytes());
    key.extend_from_slice(principal.as_bytes());
    key
}

/// Prefix shared by every grant on a document.
pub fn grant_prefix(hash: &DocumentHash) -> Vec<u8> {
    hash.as_bytes().to_vec()
}

/// Split a grant key back into its document hash and principal.
pub fn split_grant_key(key: &[u8]) -> Result<(DocumentHash, Principal)> {
    if key.len() != 2 * ID_LEN {
        return Err(StoreError::InvalidData(format!(
            "grant key has {} bytes, expected {}",
            key.len(),
            2 * ID_LEN
        )));
    }
    let (hash, principal) = key.split_at(ID_LEN);
    let hash = DocumentHash::try_from(hash)
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;
    let principal =
        Principal::try_from(principal).map_err(|e| StoreError::InvalidData(e.to_string()))?;
    Ok((hash, principal))
}

/// Key of a sharing group record.
pub fn group_key(group_id: &GroupId) -> Vec<u8> {
    group_id.as_bytes().to_vec()
}

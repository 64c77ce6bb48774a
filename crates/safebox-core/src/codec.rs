//! CBOR encoding of stored records.
//!
//! Records are serialized with ciborium. Struct fields encode in declaration
//! order, so the same record always produces the same bytes and the state
//! digest computed over stored values is reproducible across replays.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;

/// Encode a value to CBOR bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
    Ok(buf)
}

/// Decode a value from CBOR bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))
}

/// A value persisted in one of the registry's key spaces.
pub trait Record: Serialize + DeserializeOwned {
    /// Serialize to CBOR bytes.
    fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        encode(self)
    }

    /// Deserialize from CBOR bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        decode(bytes)
    }
}

//! Strong type definitions for the SafeBox registry.
//!
//! All identifiers are 32-byte newtypes to prevent misuse at compile time:
//! a `GroupId` can never be passed where a `DocumentHash` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length in bytes of every fixed-size identifier.
pub const ID_LEN: usize = 32;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $debug:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub [u8; ID_LEN]);

        impl $name {
            /// Create from raw bytes.
            pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }

            /// Get the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
                &self.0
            }

            /// Convert to hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from hex string, with or without a `0x` prefix.
            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(s)?;
                if bytes.len() != ID_LEN {
                    return Err(hex::FromHexError::InvalidStringLength);
                }
                let mut arr = [0u8; ID_LEN];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $debug, &self.to_hex()[..16])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", &self.to_hex()[..16])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; ID_LEN]> for $name {
            fn from(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = std::array::TryFromSliceError;

            fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
                let arr: [u8; ID_LEN] = slice.try_into()?;
                Ok(Self(arr))
            }
        }
    };
}

fixed_bytes!(
    /// Content identifier of a document; the primary key of its record.
    ///
    /// An update never rewrites the record at a hash. It writes a new
    /// record under the new hash and links back to the old one.
    DocumentHash,
    "DocumentHash"
);

fixed_bytes!(
    /// Identifier of a sharing group.
    GroupId,
    "GroupId"
);

fixed_bytes!(
    /// A verified caller identity.
    ///
    /// The authentication layer attaches one to every command. In practice it
    /// is an Ed25519 public key, but the registry treats it as opaque bytes.
    Principal,
    "Principal"
);

fixed_bytes!(
    /// An opaque wrapped encryption key. The registry stores and returns it
    /// and never interprets it.
    EncryptionKey,
    "EncryptionKey"
);

/// Height of the block a command was applied in.
///
/// This is the logical sequence position recorded on every record for audit
/// and ordering. Heights start at 1 for the first applied block.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Height(pub u64);

impl Height {
    /// The height before any block has been applied.
    pub const GENESIS: Self = Self(0);

    /// The next block height.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Commands: the closed set of state-transition and query requests.
//!
//! A [`Call`] pairs a command with the principal that submitted it. The
//! caller is always explicit so every ownership check is a pure function of
//! (state, caller, arguments).

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::record::{DocumentView, GroupView};
use crate::text::BoundedText;
use crate::types::{DocumentHash, EncryptionKey, GroupId, Principal};

/// A command together with its verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub caller: Principal,
    pub command: Command,
}

impl Call {
    /// Attach a caller to a command.
    pub fn new(caller: Principal, command: Command) -> Self {
        Self { caller, command }
    }
}

/// Every command the registry accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    RegisterDocument {
        hash: DocumentHash,
        title: BoundedText,
        description: BoundedText,
        encryption_key: Option<EncryptionKey>,
    },
    GetDocument {
        hash: DocumentHash,
    },
    UpdateDocument {
        old_hash: DocumentHash,
        new_hash: DocumentHash,
        title: BoundedText,
        description: BoundedText,
    },
    GetDocumentVersion {
        hash: DocumentHash,
    },
    /// Walk the version chain from `hash` back to the registration.
    GetDocumentHistory {
        hash: DocumentHash,
    },
    GrantAccess {
        hash: DocumentHash,
        principal: Principal,
        encryption_key: Option<EncryptionKey>,
    },
    RevokeAccess {
        hash: DocumentHash,
        principal: Principal,
    },
    HasAccess {
        hash: DocumentHash,
        principal: Principal,
    },
    /// Fetch the wrapped key stored on an active grant.
    GetAccessKey {
        hash: DocumentHash,
        principal: Principal,
    },
    /// List principals holding an active grant on a document.
    ListGrantees {
        hash: DocumentHash,
    },
    CreateSharingGroup {
        group_id: GroupId,
        name: BoundedText,
        members: Vec<Principal>,
    },
    GetSharingGroup {
        group_id: GroupId,
    },
}

impl Command {
    /// The wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::RegisterDocument { .. } => "register-document",
            Command::GetDocument { .. } => "get-document",
            Command::UpdateDocument { .. } => "update-document",
            Command::GetDocumentVersion { .. } => "get-document-version",
            Command::GetDocumentHistory { .. } => "get-document-history",
            Command::GrantAccess { .. } => "grant-access",
            Command::RevokeAccess { .. } => "revoke-access",
            Command::HasAccess { .. } => "has-access",
            Command::GetAccessKey { .. } => "get-access-key",
            Command::ListGrantees { .. } => "list-grantees",
            Command::CreateSharingGroup { .. } => "create-sharing-group",
            Command::GetSharingGroup { .. } => "get-sharing-group",
        }
    }

    /// Whether this command only reads state.
    pub fn is_read_only(&self) -> bool {
        !matches!(
            self,
            Command::RegisterDocument { .. }
                | Command::UpdateDocument { .. }
                | Command::GrantAccess { .. }
                | Command::RevokeAccess { .. }
                | Command::CreateSharingGroup { .. }
        )
    }

    /// Bind this command to a caller.
    pub fn by(self, caller: Principal) -> Call {
        Call::new(caller, self)
    }
}

/// The value a successful command produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Output {
    /// Mutations report `true`; `has-access` reports its answer.
    Bool(bool),
    Document(DocumentView),
    Version(u64),
    /// Newest first, starting with the queried hash.
    History(Vec<DocumentHash>),
    Key(Option<EncryptionKey>),
    Principals(Vec<Principal>),
    Group(GroupView),
}

impl Output {
    /// Extract a boolean output.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Output::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract a version output.
    pub fn as_version(&self) -> Option<u64> {
        match self {
            Output::Version(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a document view.
    pub fn as_document(&self) -> Option<&DocumentView> {
        match self {
            Output::Document(view) => Some(view),
            _ => None,
        }
    }

    /// Extract a group view.
    pub fn as_group(&self) -> Option<&GroupView> {
        match self {
            Output::Group(view) => Some(view),
            _ => None,
        }
    }
}

/// The outcome of one command as seen by its caller.
pub type CommandResult = Result<Output, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(b: u8) -> DocumentHash {
        DocumentHash::from_bytes([b; 32])
    }

    #[test]
    fn test_read_only_classification() {
        let query = Command::HasAccess {
            hash: hash(1),
            principal: Principal::from_bytes([2; 32]),
        };
        let mutation = Command::RevokeAccess {
            hash: hash(1),
            principal: Principal::from_bytes([2; 32]),
        };

        assert!(query.is_read_only());
        assert!(!mutation.is_read_only());
        assert_eq!(mutation.name(), "revoke-access");
    }

    #[test]
    fn test_command_json_uses_wire_names() {
        let cmd = Command::GetDocumentVersion { hash: hash(9) };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["command"], "get-document-version");

        let back: Command = serde_json::from_value(json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_output_accessors() {
        assert_eq!(Output::Bool(true).as_bool(), Some(true));
        assert_eq!(Output::Version(3).as_version(), Some(3));
        assert_eq!(Output::Version(3).as_bool(), None);
    }
}

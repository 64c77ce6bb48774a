//! Stored records and the read-only views returned to callers.

use serde::{Deserialize, Serialize};

use crate::codec::Record;
use crate::text::BoundedText;
use crate::types::{DocumentHash, EncryptionKey, GroupId, Height, Principal};

/// A document record, stored under its hash.
///
/// Records are immutable once written. Updating a document writes a new
/// record under the new hash with `version + 1` and `previous` pointing at
/// the hash it supersedes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub hash: DocumentHash,
    pub title: BoundedText,
    pub description: BoundedText,
    /// The registering principal. Copied unchanged into every later version.
    pub owner: Principal,
    /// 0 at registration, +1 per update along the hash chain.
    pub version: u64,
    pub encryption_key: Option<EncryptionKey>,
    pub created_at: Height,
    /// The hash this record superseded, if it came from an update.
    pub previous: Option<DocumentHash>,
}

impl Document {
    /// A freshly registered document at version 0.
    pub fn registered(
        hash: DocumentHash,
        title: BoundedText,
        description: BoundedText,
        owner: Principal,
        encryption_key: Option<EncryptionKey>,
        created_at: Height,
    ) -> Self {
        Self {
            hash,
            title,
            description,
            owner,
            version: 0,
            encryption_key,
            created_at,
            previous: None,
        }
    }

    /// The record that supersedes this one under `new_hash`.
    ///
    /// Ownership and the document key carry forward; the version advances
    /// by exactly one. `None` if the version is already at `u64::MAX`.
    pub fn successor(
        &self,
        new_hash: DocumentHash,
        title: BoundedText,
        description: BoundedText,
        created_at: Height,
    ) -> Option<Self> {
        Some(Self {
            hash: new_hash,
            title,
            description,
            owner: self.owner,
            version: self.version.checked_add(1)?,
            encryption_key: self.encryption_key,
            created_at,
            previous: Some(self.hash),
        })
    }

    /// Check whether a principal owns this document.
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.owner == principal
    }

    /// Project into the caller-facing view.
    pub fn view(&self) -> DocumentView {
        DocumentView {
            hash: self.hash,
            title: self.title.clone(),
            description: self.description.clone(),
            owner: self.owner,
            version: self.version,
            has_encryption_key: self.encryption_key.is_some(),
            created_at: self.created_at,
            previous: self.previous,
        }
    }
}

impl Record for Document {}

/// Immutable view of a document, as returned by `get-document`.
///
/// The document key itself is not exposed, only whether one is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentView {
    pub hash: DocumentHash,
    pub title: BoundedText,
    pub description: BoundedText,
    pub owner: Principal,
    pub version: u64,
    pub has_encryption_key: bool,
    pub created_at: Height,
    pub previous: Option<DocumentHash>,
}

/// An access grant for one (document, principal) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Always `true` for a stored grant; revocation deletes the record.
    pub granted: bool,
    /// Wrapped key for this grantee, independent of the document's own key.
    pub encryption_key: Option<EncryptionKey>,
    pub granted_at: Height,
}

impl AccessGrant {
    /// An active grant.
    pub fn active(encryption_key: Option<EncryptionKey>, granted_at: Height) -> Self {
        Self {
            granted: true,
            encryption_key,
            granted_at,
        }
    }

    /// Check if this grant confers access.
    pub fn is_active(&self) -> bool {
        self.granted
    }
}

impl Record for AccessGrant {}

/// A named, fixed-membership list of principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingGroup {
    pub group_id: GroupId,
    pub name: BoundedText,
    /// Members in the order given at creation. Duplicates are kept.
    pub members: Vec<Principal>,
    pub creator: Principal,
    pub created_at: Height,
}

impl SharingGroup {
    /// Project into the caller-facing view.
    pub fn view(&self) -> GroupView {
        GroupView {
            group_id: self.group_id,
            name: self.name.clone(),
            creator: self.creator,
            members: self.members.clone(),
        }
    }

    /// Check whether a principal appears in the member list.
    pub fn contains(&self, principal: &Principal) -> bool {
        self.members.contains(principal)
    }
}

impl Record for SharingGroup {}

/// Immutable view of a sharing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupView {
    pub group_id: GroupId,
    pub name: BoundedText,
    pub creator: Principal,
    pub members: Vec<Principal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> BoundedText {
        BoundedText::new(s).unwrap()
    }

    fn sample_document() -> Document {
        Document::registered(
            DocumentHash::from_bytes([0x12; 32]),
            text("Doc"),
            text("Desc"),
            Principal::from_bytes([0xd0; 32]),
            Some(EncryptionKey::from_bytes([0x01; 32])),
            Height(3),
        )
    }

    #[test]
    fn test_successor_advances_version_and_links_back() {
        let doc = sample_document();
        let next = doc.successor(
            DocumentHash::from_bytes([0x34; 32]),
            text("Doc2"),
            text("Desc2"),
            Height(4),
        )
        .unwrap();

        assert_eq!(next.version, doc.version + 1);
        assert_eq!(next.owner, doc.owner);
        assert_eq!(next.previous, Some(doc.hash));
        assert_eq!(next.encryption_key, doc.encryption_key);
        assert_eq!(next.created_at, Height(4));
    }

    #[test]
    fn test_successor_refuses_version_overflow() {
        let doc = Document {
            version: u64::MAX,
            ..sample_document()
        };
        let next = doc.successor(
            DocumentHash::from_bytes([0x34; 32]),
            text("Doc2"),
            text("Desc2"),
            Height(4),
        );
        assert!(next.is_none());
    }

    #[test]
    fn test_view_hides_key_material() {
        let view = sample_document().view();
        assert!(view.has_encryption_key);
        assert_eq!(view.title, "Doc");
        assert_eq!(view.version, 0);
    }

    #[test]
    fn test_document_bytes_roundtrip() {
        let doc = sample_document();
        let recovered = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(doc, recovered);
    }

    #[test]
    fn test_group_keeps_member_order() {
        let a = Principal::from_bytes([0xaa; 32]);
        let b = Principal::from_bytes([0xbb; 32]);
        let group = SharingGroup {
            group_id: GroupId::from_bytes([0x11; 32]),
            name: text("Test Group"),
            members: vec![b, a, b],
            creator: a,
            created_at: Height(1),
        };

        let recovered = SharingGroup::from_bytes(&group.to_bytes().unwrap()).unwrap();
        assert_eq!(recovered.view().members, vec![b, a, b]);
        assert!(recovered.contains(&a));
    }
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;
use proptest::strategy::Union;

use safebox_core::{BoundedText, Call, Command, DocumentHash, EncryptionKey, GroupId, Principal};

use crate::fixtures::{self, Accounts};

/// Generate a random DocumentHash.
pub fn document_hash() -> impl Strategy<Value = DocumentHash> {
    any::<[u8; 32]>().prop_map(DocumentHash::from_bytes)
}

/// Generate a random Principal.
pub fn principal() -> impl Strategy<Value = Principal> {
    any::<[u8; 32]>().prop_map(Principal::from_bytes)
}

/// Generate a random GroupId.
pub fn group_id() -> impl Strategy<Value = GroupId> {
    any::<[u8; 32]>().prop_map(GroupId::from_bytes)
}

/// Generate a random EncryptionKey.
pub fn encryption_key() -> impl Strategy<Value = EncryptionKey> {
    any::<[u8; 32]>().prop_map(EncryptionKey::from_bytes)
}

/// Generate printable ASCII text within the length bound.
pub fn bounded_text() -> impl Strategy<Value = BoundedText> {
    "[ -~]{0,64}".prop_filter_map("bounded text", |s| BoundedText::new(s).ok())
}

/// Generate a member list of at most `max` principals.
pub fn members(max: usize) -> impl Strategy<Value = Vec<Principal>> {
    prop::collection::vec(principal(), 0..=max)
}

/// Small sets of identifiers that generated calls draw from.
///
/// Keeping the pools small makes calls collide: the same hash gets
/// registered twice, non-owners try to update, grants get revoked.
#[derive(Debug, Clone)]
pub struct CallPool {
    pub principals: Vec<Principal>,
    pub hashes: Vec<DocumentHash>,
    pub groups: Vec<GroupId>,
}

impl CallPool {
    /// A pool over the given accounts with `hashes` document hashes and
    /// `groups` group ids.
    pub fn new(accounts: &Accounts, hashes: usize, groups: usize) -> Self {
        Self {
            principals: accounts.principals(),
            hashes: (0..hashes)
                .map(|i| fixtures::document_hash(format!("doc-{i}").as_bytes()))
                .collect(),
            groups: (0..groups)
                .map(|i| fixtures::group_id(&format!("group-{i}")))
                .collect(),
        }
    }
}

impl Default for CallPool {
    fn default() -> Self {
        Self::new(&Accounts::new(3), 6, 3)
    }
}

/// Generate a command over the pool's identifiers.
pub fn command(pool: &CallPool) -> BoxedStrategy<Command> {
    let hash = || prop::sample::select(pool.hashes.clone());
    let who = || prop::sample::select(pool.principals.clone());
    let group = || prop::sample::select(pool.groups.clone());
    let key = || proptest::option::of(encryption_key());
    let crowd = prop::collection::vec(who(), 0..=4);

    Union::new(vec![
        (hash(), bounded_text(), bounded_text(), key())
            .prop_map(|(hash, title, description, encryption_key)| {
                Command::RegisterDocument {
                    hash,
                    title,
                    description,
                    encryption_key,
                }
            })
            .boxed(),
        hash().prop_map(|hash| Command::GetDocument { hash }).boxed(),
        (hash(), hash(), bounded_text(), bounded_text())
            .prop_map(|(old_hash, new_hash, title, description)| {
                Command::UpdateDocument {
                    old_hash,
                    new_hash,
                    title,
                    description,
                }
            })
            .boxed(),
        hash()
            .prop_map(|hash| Command::GetDocumentVersion { hash })
            .boxed(),
        hash()
            .prop_map(|hash| Command::GetDocumentHistory { hash })
            .boxed(),
        (hash(), who(), key())
            .prop_map(|(hash, principal, encryption_key)| Command::GrantAccess {
                hash,
                principal,
                encryption_key,
            })
            .boxed(),
        (hash(), who())
            .prop_map(|(hash, principal)| Command::RevokeAccess { hash, principal })
            .boxed(),
        (hash(), who())
            .prop_map(|(hash, principal)| Command::HasAccess { hash, principal })
            .boxed(),
        (hash(), who())
            .prop_map(|(hash, principal)| Command::GetAccessKey { hash, principal })
            .boxed(),
        hash()
            .prop_map(|hash| Command::ListGrantees { hash })
            .boxed(),
        (group(), bounded_text(), crowd)
            .prop_map(|(group_id, name, members)| Command::CreateSharingGroup {
                group_id,
                name,
                members,
            })
            .boxed(),
        group()
            .prop_map(|group_id| Command::GetSharingGroup { group_id })
            .boxed(),
    ])
    .boxed()
}

/// Generate a call: a pooled command with a pooled caller.
pub fn call(pool: &CallPool) -> BoxedStrategy<Call> {
    (prop::sample::select(pool.principals.clone()), command(pool))
        .prop_map(|(caller, command)| Call::new(caller, command))
        .boxed()
}

/// Generate a block of up to `max_calls` calls.
pub fn block(pool: &CallPool, max_calls: usize) -> BoxedStrategy<Vec<Call>> {
    prop::collection::vec(call(pool), 0..=max_calls).boxed()
}

/// Generate up to `max_blocks` blocks over the default pool.
pub fn blocks(max_blocks: usize, max_calls: usize) -> BoxedStrategy<Vec<Vec<Call>>> {
    let pool = CallPool::default();
    prop::collection::vec(block(&pool, max_calls), 1..=max_blocks).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use safebox_core::MAX_TEXT_LEN;

    proptest! {
        #[test]
        fn test_generated_text_is_bounded(text in bounded_text()) {
            prop_assert!(text.len() <= MAX_TEXT_LEN);
            prop_assert!(text.as_str().is_ascii());
        }

        #[test]
        fn test_calls_draw_from_pool(generated in call(&CallPool::default())) {
            let pool = CallPool::default();
            prop_assert!(pool.principals.contains(&generated.caller));
        }

        #[test]
        fn test_member_lists_respect_max(list in members(5)) {
            prop_assert!(list.len() <= 5);
        }
    }
}

//! Named sharing groups.

use safebox_core::{BoundedText, GroupId, GroupView, Principal, SharingGroup};
use safebox_store::{keys, Keyspace};

use crate::error::{RegistryError, Result};
use crate::state::{StateRead, StateWrite};

/// Default bound on the member list of a new group.
pub const DEFAULT_MAX_MEMBERS: usize = 32;

/// Create and look up sharing groups.
///
/// Groups are write-once: membership is fixed at creation.
#[derive(Debug, Clone, Copy)]
pub struct SharingGroupRegistry {
    max_members: usize,
}

impl SharingGroupRegistry {
    /// A registry accepting at most `max_members` members per group.
    pub fn new(max_members: usize) -> Self {
        Self { max_members }
    }

    pub fn max_members(&self) -> usize {
        self.max_members
    }

    /// Create a group with `caller` as creator.
    ///
    /// Members are stored in the given order, duplicates included.
    pub fn create<T: StateWrite>(
        &self,
        tx: &mut T,
        group_id: GroupId,
        name: BoundedText,
        members: Vec<Principal>,
        caller: Principal,
    ) -> Result<()> {
        let key = keys::group_key(&group_id);
        if tx.exists(Keyspace::Groups, &key)? {
            return Err(RegistryError::GroupExists(group_id));
        }
        if members.len() > self.max_members {
            return Err(RegistryError::TooManyMembers {
                count: members.len(),
                max: self.max_members,
            });
        }

        let group = SharingGroup {
            group_id,
            name,
            members,
            creator: caller,
            created_at: tx.height(),
        };
        tx.store(Keyspace::Groups, key, &group)?;
        tracing::trace!(%group_id, members = group.members.len(), "created sharing group");
        Ok(())
    }

    /// Look up a group.
    pub fn get<T: StateRead>(&self, state: &T, group_id: &GroupId) -> Result<GroupView> {
        let group: SharingGroup = state
            .load(Keyspace::Groups, &keys::group_key(group_id))?
            .ok_or(RegistryError::GroupNotFound(*group_id))?;
        Ok(group.view())
    }
}

impl Default for SharingGroupRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MEMBERS)
    }
}

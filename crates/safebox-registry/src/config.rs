//! Registry configuration.

use serde::{Deserialize, Serialize};

use crate::groups::DEFAULT_MAX_MEMBERS;

/// Tunables of the registry state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Largest member list accepted by `create-sharing-group`.
    pub max_group_members: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_group_members: DEFAULT_MAX_MEMBERS,
        }
    }
}

//! The three registry components bundled together.

use crate::access::AccessControl;
use crate::config::RegistryConfig;
use crate::documents::DocumentRegistry;
use crate::groups::SharingGroupRegistry;

/// Documents, access control and sharing groups over one state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registry {
    pub documents: DocumentRegistry,
    pub access: AccessControl,
    pub groups: SharingGroupRegistry,
}

impl Registry {
    /// Build the components from a configuration.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            documents: DocumentRegistry::new(),
            access: AccessControl::new(),
            groups: SharingGroupRegistry::new(config.max_group_members),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::DEFAULT_MAX_MEMBERS;

    #[test]
    fn test_member_bound_comes_from_config() {
        let config = RegistryConfig {
            max_group_members: 4,
        };
        assert_eq!(Registry::new(&config).groups.max_members(), 4);
        assert_eq!(
            Registry::new(&RegistryConfig::default()).groups.max_members(),
            DEFAULT_MAX_MEMBERS
        );
    }
}

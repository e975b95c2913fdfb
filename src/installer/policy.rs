//! Installer flags and the declined set.

use std::collections::BTreeSet;

use crate::config::{keys, ConfigStore, TriState};

/// Whether and how packages may be installed during this process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerPolicy {
    /// `Unset` asks the user on the first missing package.
    pub enable: TriState,
    /// Install into the shared scope instead of the user's.
    pub auto_admin: TriState,
    declined: BTreeSet<String>,
}

impl InstallerPolicy {
    pub fn new(enable: TriState, auto_admin: TriState) -> Self {
        Self {
            enable,
            auto_admin,
            declined: BTreeSet::new(),
        }
    }

    /// Resolve the flags from configuration.
    ///
    /// An explicit `enable_override` wins over `mpm.autoinstall`. Auto-admin
    /// only makes sense when a shared scope exists; otherwise it is turned
    /// off with a warning.
    pub fn from_config(
        config: &impl ConfigStore,
        enable_override: TriState,
        shared_setup: bool,
    ) -> Self {
        let enable =
            enable_override.or_else(config.tri_state(keys::SECTION_MPM, keys::AUTO_INSTALL));
        let mut auto_admin = config.tri_state(keys::SECTION_MPM, keys::AUTO_ADMIN);
        if auto_admin == TriState::True && !shared_setup {
            tracing::warn!("mpm.autoadmin=t doesn't make sense in this setup; turning it off");
            auto_admin = TriState::False;
        }
        Self::new(enable, auto_admin)
    }

    pub fn is_declined(&self, package_id: &str) -> bool {
        self.declined.contains(package_id)
    }

    /// Never ask for or try `package_id` again in this process.
    pub fn decline(&mut self, package_id: &str) {
        self.declined.insert(package_id.to_string());
    }

    pub fn declined(&self) -> impl Iterator<Item = &str> {
        self.declined.iter().map(String::as_str)
    }

    pub fn clear_declined(&mut self) {
        self.declined.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLayer, LayeredConfig};

    fn config(entries: &[(&str, &str)]) -> LayeredConfig {
        let mut layer = ConfigLayer::new("test");
        for (key, value) in entries {
            layer.set(keys::SECTION_MPM, key, *value);
        }
        LayeredConfig::from_layers(vec![layer])
    }

    #[test]
    fn reads_flags_from_config() {
        let policy = InstallerPolicy::from_config(
            &config(&[(keys::AUTO_INSTALL, "t"), (keys::AUTO_ADMIN, "t")]),
            TriState::Unset,
            true,
        );
        assert_eq!(policy.enable, TriState::True);
        assert_eq!(policy.auto_admin, TriState::True);
    }

    #[test]
    fn explicit_override_wins() {
        let policy = InstallerPolicy::from_config(
            &config(&[(keys::AUTO_INSTALL, "t")]),
            TriState::False,
            true,
        );
        assert_eq!(policy.enable, TriState::False);
    }

    #[test]
    fn auto_admin_needs_shared_setup() {
        let config = config(&[(keys::AUTO_ADMIN, "yes")]);
        let policy = InstallerPolicy::from_config(&config, TriState::Unset, false);
        assert_eq!(policy.auto_admin, TriState::False);
    }

    #[test]
    fn declined_set() {
        let mut policy = InstallerPolicy::default();
        assert!(!policy.is_declined("geometry"));
        policy.decline("geometry");
        assert!(policy.is_declined("geometry"));
        assert_eq!(policy.declined().collect::<Vec<_>>(), vec!["geometry"]);
        policy.clear_declined();
        assert!(!policy.is_declined("geometry"));
    }
}

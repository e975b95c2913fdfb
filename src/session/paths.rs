//! Well-known locations inside the installation roots.
//!
//! Each root has the same layout:
//!
//! ```text
//! <root>/bin/                          helpers
//! <root>/config/config.yml             configuration layer
//! <root>/config/issues.json            cached diagnostics
//! <root>/config/language.dat           derived language configuration
//! <root>/config/languages.ini          user-editable language source
//! <root>/data/index.fndb               file-name index
//! <root>/data/maintenance.lock         maintenance lock
//! <root>/data/maintenance-ledger.json  per-step refresh record
//! <root>/install/package-manifests.ini local package catalog manifest
//! <root>/logs/                         log files
//! ```

use std::path::{Path, PathBuf};

use super::Scope;

pub const CONFIG_DIR: &str = "config";
pub const DATA_DIR: &str = "data";
pub const INSTALL_DIR: &str = "install";
pub const LOG_DIR: &str = "logs";
pub const BIN_DIR: &str = "bin";

pub const CONFIG_FILE: &str = "config.yml";
pub const ISSUES_FILE: &str = "issues.json";
pub const LANGUAGE_DAT: &str = "language.dat";
pub const LANGUAGES_INI: &str = "languages.ini";
pub const INDEX_FILE: &str = "index.fndb";
pub const MAINTENANCE_LOCK: &str = "maintenance.lock";
pub const MAINTENANCE_LEDGER: &str = "maintenance-ledger.json";
pub const PACKAGE_MANIFESTS: &str = "package-manifests.ini";

/// Paths resolved for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialPaths {
    scope: Scope,
    user_root: PathBuf,
    common_root: PathBuf,
}

impl SpecialPaths {
    pub fn new(scope: Scope, user_root: &Path, common_root: &Path) -> Self {
        Self {
            scope,
            user_root: user_root.to_path_buf(),
            common_root: common_root.to_path_buf(),
        }
    }

    /// Root of the current scope.
    pub fn scope_root(&self) -> &Path {
        match self.scope {
            Scope::Admin => &self.common_root,
            Scope::User => &self.user_root,
        }
    }

    pub fn user_root(&self) -> &Path {
        &self.user_root
    }

    pub fn common_root(&self) -> &Path {
        &self.common_root
    }

    pub fn config_root(&self) -> PathBuf {
        self.scope_root().join(CONFIG_DIR)
    }

    pub fn user_config_root(&self) -> PathBuf {
        self.user_root.join(CONFIG_DIR)
    }

    pub fn common_config_root(&self) -> PathBuf {
        self.common_root.join(CONFIG_DIR)
    }

    pub fn data_root(&self) -> PathBuf {
        self.scope_root().join(DATA_DIR)
    }

    pub fn install_root(&self) -> PathBuf {
        self.scope_root().join(INSTALL_DIR)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.scope_root().join(LOG_DIR)
    }

    /// Helper search directories: current scope first, then the shared root.
    pub fn bin_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.scope_root().join(BIN_DIR)];
        let common = self.common_root.join(BIN_DIR);
        if !dirs.contains(&common) {
            dirs.push(common);
        }
        dirs
    }

    pub fn user_config_file(&self) -> PathBuf {
        self.user_config_root().join(CONFIG_FILE)
    }

    pub fn common_config_file(&self) -> PathBuf {
        self.common_config_root().join(CONFIG_FILE)
    }

    /// File-name index of the current scope.
    pub fn index_file(&self) -> PathBuf {
        self.data_root().join(INDEX_FILE)
    }

    /// The user's private language configuration.
    pub fn user_language_dat(&self) -> PathBuf {
        self.user_config_root().join(LANGUAGE_DAT)
    }

    /// The user-editable language source.
    pub fn user_languages_ini(&self) -> PathBuf {
        self.user_config_root().join(LANGUAGES_INI)
    }

    /// The user's local package manifest.
    pub fn user_package_manifest(&self) -> PathBuf {
        self.user_root.join(INSTALL_DIR).join(PACKAGE_MANIFESTS)
    }

    pub fn maintenance_lock(&self) -> PathBuf {
        self.data_root().join(MAINTENANCE_LOCK)
    }

    pub fn maintenance_ledger(&self) -> PathBuf {
        self.data_root().join(MAINTENANCE_LEDGER)
    }

    pub fn issues_file(&self) -> PathBuf {
        self.config_root().join(ISSUES_FILE)
    }
}

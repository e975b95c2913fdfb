//! Session roots and flags.

use std::path::PathBuf;

/// Environment variable overriding the per-user root.
pub const USER_ROOT_ENV: &str = "DISTKEEPER_USER_ROOT";
/// Environment variable overriding the shared (admin) root.
pub const COMMON_ROOT_ENV: &str = "DISTKEEPER_COMMON_ROOT";
/// Environment variable marking a portable installation.
pub const PORTABLE_ENV: &str = "DISTKEEPER_PORTABLE";

/// Marker file in the common root that makes an installation portable.
pub const PORTABLE_MARKER: &str = "portable";

/// How to open a [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Root of the per-user installation scope.
    pub user_root: PathBuf,
    /// Root of the shared installation scope.
    pub common_root: PathBuf,
    /// Start in admin scope.
    pub admin_mode: bool,
    /// Portable installations never ask the user to finish setup.
    pub portable: bool,
}

impl SessionOptions {
    /// Options with explicit roots, user scope, not portable.
    pub fn with_roots(user_root: impl Into<PathBuf>, common_root: impl Into<PathBuf>) -> Self {
        Self {
            user_root: user_root.into(),
            common_root: common_root.into(),
            admin_mode: false,
            portable: false,
        }
    }

    /// Discover roots from the environment and platform defaults.
    pub fn discover() -> Self {
        let user_root = std::env::var_os(USER_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_user_root);
        let common_root = std::env::var_os(COMMON_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_common_root);
        let portable = std::env::var_os(PORTABLE_ENV).is_some()
            || common_root.join(PORTABLE_MARKER).exists();

        Self {
            user_root,
            common_root,
            admin_mode: false,
            portable,
        }
    }

    pub fn admin(mut self, admin_mode: bool) -> Self {
        self.admin_mode = admin_mode;
        self
    }

    pub fn portable(mut self, portable: bool) -> Self {
        self.portable = portable;
        self
    }

    /// A shared setup has a distinct admin scope.
    pub fn is_shared_setup(&self) -> bool {
        self.user_root != self.common_root
    }
}

fn default_user_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("distkeeper")
}

fn default_common_root() -> PathBuf {
    if cfg!(windows) {
        std::env::var_os("ProgramData")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
            .join("distkeeper")
    } else {
        PathBuf::from("/var/lib/distkeeper")
    }
}

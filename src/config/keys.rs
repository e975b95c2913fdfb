//! Section and key names read by the coordinator.

pub const SECTION_CORE: &str = "core";
pub const SECTION_MPM: &str = "mpm";

/// Unix time of the last maintenance pass run in admin scope.
pub const LAST_ADMIN_MAINTENANCE: &str = "last_admin_maintenance";
/// Unix time of the last maintenance pass run in user scope.
pub const LAST_USER_MAINTENANCE: &str = "last_user_maintenance";
/// Unix time of the last admin-scope package catalog update.
pub const LAST_ADMIN_UPDATE_DB: &str = "last_admin_update_db";

/// Installer-enable tri-state.
pub const AUTO_INSTALL: &str = "autoinstall";
/// Install-as-admin tri-state.
pub const AUTO_ADMIN: &str = "autoadmin";

/// Name of the maintenance helper executable.
pub const HELPER: &str = "helper";
pub const DEFAULT_HELPER: &str = "dk-util";
/// Name of the font metric generator.
pub const MAKE_TFM_HELPER: &str = "maketfm_helper";
pub const DEFAULT_MAKE_TFM_HELPER: &str = "dk-maketfm";
/// Engine passed to format builds.
pub const ENGINE: &str = "engine";

/// Default package repository (URL or local directory).
pub const REPOSITORY: &str = "repository";

pub const PROXY_USE: &str = "proxy_use";
pub const PROXY_HOST: &str = "proxy_host";
pub const PROXY_PORT: &str = "proxy_port";
pub const PROXY_AUTH_REQUIRED: &str = "proxy_auth_required";
pub const PROXY_USER: &str = "proxy_user";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DISTKEEPER_";

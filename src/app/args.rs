//! Host flags embedded in a program's own command line.

use crate::config::TriState;

pub const ADMIN_FLAG: &str = "--dk-admin";
pub const ENABLE_INSTALLER_FLAG: &str = "--dk-enable-installer";
pub const DISABLE_INSTALLER_FLAG: &str = "--dk-disable-installer";
pub const ENABLE_MAINTENANCE_FLAG: &str = "--dk-enable-maintenance";
pub const DISABLE_MAINTENANCE_FLAG: &str = "--dk-disable-maintenance";
pub const ENABLE_DIAGNOSE_FLAG: &str = "--dk-enable-diagnose";
pub const DISABLE_DIAGNOSE_FLAG: &str = "--dk-disable-diagnose";

/// What the host flags asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOptions {
    pub admin: bool,
    pub enable_installer: TriState,
    pub enable_maintenance: TriState,
    pub enable_diagnose: TriState,
    /// The full original command line, shell-quoted, for the log.
    pub command_line: String,
}

/// Strip host flags from `args`, leaving the program's own arguments.
///
/// The last occurrence of a contradictory pair wins.
pub fn examine_args(args: &mut Vec<String>) -> HostOptions {
    let mut options = HostOptions {
        command_line: shell_words::join(args.iter()),
        ..Default::default()
    };

    args.retain(|arg| {
        match arg.as_str() {
            ADMIN_FLAG => options.admin = true,
            ENABLE_INSTALLER_FLAG => options.enable_installer = TriState::True,
            DISABLE_INSTALLER_FLAG => options.enable_installer = TriState::False,
            ENABLE_MAINTENANCE_FLAG => options.enable_maintenance = TriState::True,
            DISABLE_MAINTENANCE_FLAG => options.enable_maintenance = TriState::False,
            ENABLE_DIAGNOSE_FLAG => options.enable_diagnose = TriState::True,
            DISABLE_DIAGNOSE_FLAG => options.enable_diagnose = TriState::False,
            _ => return true,
        }
        false
    });

    options
}

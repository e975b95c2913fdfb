//! Built-in health checks.

use std::fs;
use std::path::Path;

use super::{DiagnosticsProvider, Issue, Severity};
use crate::config::{keys, ConfigStore};
use crate::session::{Scope, Session};

/// Checks every installation can answer without a package manager.
#[derive(Debug, Clone)]
pub struct BasicDiagnostics {
    /// Whether the process runs with administrator privileges.
    pub elevated: bool,
}

impl DiagnosticsProvider for BasicDiagnostics {
    fn find_issues(&self, session: &Session) -> Vec<Issue> {
        let paths = session.paths();
        let config = session.config();
        let mut issues = Vec::new();

        let helper = session.helper_name();
        if session.find_helper(&helper).is_none() {
            issues.push(
                Issue::new(
                    Severity::Critical,
                    format!("the maintenance helper '{}' could not be found", helper),
                )
                .with_remedy("add the distribution's bin directory to PATH or set core.helper"),
            );
        }

        if !paths.index_file().exists() {
            issues.push(
                Issue::new(Severity::Major, "the file-name index has not been built")
                    .with_remedy("run 'distkeeper maintain'"),
            );
        }

        if self.elevated && session.scope() == Scope::User {
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "running with administrator privileges outside of admin mode",
                )
                .with_remedy("pass --dk-admin or run as a regular user"),
            );
        }

        let never_maintained = config
            .timestamp(keys::SECTION_CORE, keys::LAST_ADMIN_MAINTENANCE)
            .is_none()
            && config
                .timestamp(keys::SECTION_CORE, keys::LAST_USER_MAINTENANCE)
                .is_none();
        if never_maintained && !session.is_portable() {
            issues.push(
                Issue::new(Severity::Warning, "no maintenance run has ever been recorded")
                    .with_remedy("finish the setup of the distribution"),
            );
        }

        if is_read_only(&paths.log_dir()) {
            issues.push(
                Issue::new(
                    Severity::Warning,
                    format!("the log directory {} is not writable", paths.log_dir().display()),
                )
                .with_remedy("fix the directory permissions"),
            );
        }

        issues
    }
}

fn is_read_only(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|m| m.permissions().readonly())
        .unwrap_or(false)
}

//! On-demand package installation.
//!
//! The package manager itself sits behind [`PackageInstaller`]; this module
//! decides *whether* and *how* to call it:
//!
//! - [`InstallerPolicy`] holds the installer and auto-admin flags and the
//!   per-process declined set
//! - [`InstallOrchestrator`] runs the consent, proxy and elevation state
//!   machine for one package
//! - [`HelperInstaller`] is the production collaborator, driving the
//!   maintenance helper's `packages` subcommands

mod helper;
mod orchestrator;
mod policy;
mod prompts;

pub use helper::HelperInstaller;
pub use orchestrator::{InstallOrchestrator, InstallOutcome, InstallRequest, InstallState};
pub use policy::InstallerPolicy;
pub use prompts::{
    prompt_install, prompt_proxy_credentials, InstallConsent, AS_ADMIN_KEY, DONT_ASK_AGAIN_KEY,
    INSTALL_PROMPT_KEY, PROXY_PASSWORD_KEY, PROXY_USER_KEY,
};

use std::fmt;
use std::panic::Location;
use thiserror::Error;

use crate::session::Session;

/// Failure reported by a [`PackageInstaller`].
///
/// Records where it was raised so the fatal log line can point at it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct InstallError {
    pub message: String,
    pub info: Option<String>,
    location: &'static Location<'static>,
}

impl InstallError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            info: None,
            location: Location::caller(),
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Source location that raised the error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Where packages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub kind: RepositoryType,
    pub location: String,
}

impl Repository {
    /// Classify a configured repository location.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let kind = if location.contains("://") && !location.starts_with("file://") {
            RepositoryType::Remote
        } else {
            RepositoryType::Local
        };
        Self {
            kind,
            location: location.to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.kind == RepositoryType::Remote
    }
}

/// Proxy configuration as the installer sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub use_proxy: bool,
    pub host: String,
    pub port: u16,
    pub auth_required: bool,
    pub user: Option<String>,
}

impl ProxySettings {
    /// The user has to be asked for credentials before downloading.
    pub fn needs_credentials(&self) -> bool {
        self.use_proxy && self.auth_required && self.user.is_none()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// The package manager operations the coordinator and orchestrator need.
pub trait PackageInstaller {
    /// Refresh the local package catalog, optionally without network access.
    fn update_catalog(&mut self, session: &Session, from_cache_only: bool)
        -> Result<(), InstallError>;

    /// Install exactly one package into the session's current scope.
    fn install_package(&mut self, session: &Session, package_id: &str) -> Result<(), InstallError>;

    fn default_repository(&self, session: &Session) -> Option<Repository>;

    fn proxy_settings(&self, session: &Session) -> ProxySettings;

    fn set_proxy_credentials(&mut self, credentials: ProxyCredentials);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_error_records_caller() {
        let err = InstallError::new("package not found");
        assert_eq!(err.location().file(), file!());
        assert_eq!(err.to_string(), "package not found");
    }

    #[test]
    fn install_error_info() {
        let err = InstallError::new("download failed").with_info("HTTP 407");
        assert_eq!(err.info.as_deref(), Some("HTTP 407"));
    }

    #[test]
    fn repository_kind_from_location() {
        assert!(Repository::parse("https://mirror.example.org/dist").is_remote());
        assert!(!Repository::parse("/srv/packages").is_remote());
        assert!(!Repository::parse("file:///srv/packages").is_remote());
    }

    #[test]
    fn proxy_needs_credentials_only_without_user() {
        let mut proxy = ProxySettings {
            use_proxy: true,
            auth_required: true,
            ..Default::default()
        };
        assert!(proxy.needs_credentials());
        proxy.user = Some("alice".into());
        assert!(!proxy.needs_credentials());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = ProxyCredentials {
            user: "alice".into(),
            password: "s3cret".into(),
        };
        assert!(!format!("{:?}", creds).contains("s3cret"));
    }
}

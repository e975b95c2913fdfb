//! The install-on-demand state machine.

use std::fmt;
use std::path::PathBuf;

use crate::config::TriState;
use crate::error::Result;
use crate::session::{CancelFlag, Session};
use crate::ui::UserInterface;

use super::{
    prompt_install, prompt_proxy_credentials, InstallError, InstallerPolicy, PackageInstaller,
};

/// Where a request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Idle,
    Checking,
    Declined,
    Prompting,
    Elevating,
    Installing,
    Succeeded,
    Failed,
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Installed into `install_root`.
    Installed { install_root: PathBuf },
    /// Declined now or earlier in this process.
    Declined,
    /// The installer is turned off.
    Disabled,
    /// The user backed out of the proxy credentials dialog.
    Cancelled,
    /// The package manager failed; the installer is now turned off.
    Failed,
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, InstallOutcome::Installed { .. })
    }
}

/// A missing package and what needed it.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    pub package_id: &'a str,
    /// File or feature that triggered the request; may be empty.
    pub trigger: &'a str,
}

impl<'a> InstallRequest<'a> {
    pub fn new(package_id: &'a str, trigger: &'a str) -> Self {
        Self { package_id, trigger }
    }
}

/// Decides whether to install a missing package and carries it out.
#[derive(Debug)]
pub struct InstallOrchestrator {
    policy: InstallerPolicy,
    cancel: CancelFlag,
    transitions: Vec<InstallState>,
}

impl InstallOrchestrator {
    pub fn new(policy: InstallerPolicy, cancel: CancelFlag) -> Self {
        Self {
            policy,
            cancel,
            transitions: Vec::new(),
        }
    }

    pub fn policy(&self) -> &InstallerPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut InstallerPolicy {
        &mut self.policy
    }

    /// States visited by the most recent request, in order.
    pub fn transitions(&self) -> &[InstallState] {
        &self.transitions
    }

    fn enter(&mut self, state: InstallState) {
        tracing::debug!("install state: {}", state);
        self.transitions.push(state);
    }

    /// Install one package, asking first if the policy says so.
    ///
    /// Only cancellation and prompt I/O failures are errors; everything the
    /// package manager reports becomes [`InstallOutcome::Failed`].
    pub fn install_package(
        &mut self,
        session: &mut Session,
        installer: &mut dyn PackageInstaller,
        ui: &mut dyn UserInterface,
        request: InstallRequest<'_>,
    ) -> Result<InstallOutcome> {
        self.transitions.clear();
        self.enter(InstallState::Idle);
        self.cancel.check()?;

        let package_id = request.package_id;
        self.enter(InstallState::Checking);
        if self.policy.is_declined(package_id) {
            tracing::debug!("{} was declined before", package_id);
            self.enter(InstallState::Declined);
            return Ok(InstallOutcome::Declined);
        }

        match self.policy.enable {
            TriState::False => {
                tracing::debug!("installer disabled; not installing {}", package_id);
                self.enter(InstallState::Declined);
                return Ok(InstallOutcome::Disabled);
            }
            TriState::True => {}
            TriState::Unset => {
                self.enter(InstallState::Prompting);
                let consent = prompt_install(ui, session, package_id, request.trigger)?;
                if consent.dont_ask_again {
                    self.policy.enable = consent.consent.into();
                }
                if !consent.consent {
                    self.policy.decline(package_id);
                    self.enter(InstallState::Failed);
                    return Ok(InstallOutcome::Declined);
                }
                self.policy.auto_admin = consent.as_admin.into();
            }
        }

        let remote = installer
            .default_repository(session)
            .is_some_and(|r| r.is_remote());
        if remote && installer.proxy_settings(session).needs_credentials() {
            match prompt_proxy_credentials(ui)? {
                Some(credentials) => installer.set_proxy_credentials(credentials),
                None => {
                    tracing::info!("proxy authentication cancelled; not installing {}", package_id);
                    self.enter(InstallState::Failed);
                    return Ok(InstallOutcome::Cancelled);
                }
            }
        }

        tracing::info!(
            "installing package {} triggered by {}",
            package_id,
            if request.trigger.is_empty() { "-" } else { request.trigger }
        );

        let elevate = self.policy.auto_admin == TriState::True && !session.is_admin_mode();
        let result = if elevate {
            self.enter(InstallState::Elevating);
            let guard = session.elevate_scoped();
            self.enter(InstallState::Installing);
            run_install(&guard, installer, package_id)
        } else {
            self.enter(InstallState::Installing);
            run_install(session, installer, package_id)
        };

        match result {
            Ok(install_root) => {
                self.enter(InstallState::Succeeded);
                tracing::info!("installed {} into {}", package_id, install_root.display());
                Ok(InstallOutcome::Installed { install_root })
            }
            Err(e) => {
                self.policy.enable = TriState::False;
                self.policy.decline(package_id);
                log_install_failure(package_id, &e);
                self.enter(InstallState::Failed);
                Ok(InstallOutcome::Failed)
            }
        }
    }
}

fn run_install(
    session: &Session,
    installer: &mut dyn PackageInstaller,
    package_id: &str,
) -> std::result::Result<PathBuf, InstallError> {
    installer.install_package(session, package_id)?;
    Ok(session.paths().install_root())
}

fn log_install_failure(package_id: &str, err: &InstallError) {
    tracing::error!(severity = "fatal", "installation of {} failed: {}", package_id, err.message);
    if let Some(info) = &err.info {
        tracing::error!(severity = "fatal", "Info: {}", info);
    }
    tracing::error!(severity = "fatal", "Source: {}", err.location().file());
    tracing::error!(severity = "fatal", "Line: {}", err.location().line());
}

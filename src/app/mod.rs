//! The host application: one per process.
//!
//! A host program strips its `--dk-*` flags with [`examine_args`], builds an
//! [`Application`], calls [`Application::init`] once logging is up, does its
//! own work, and ends with [`Application::finalize`].
//!
//! ```no_run
//! use distkeeper::app::{examine_args, Application, Flow};
//! use distkeeper::maintenance::default_context;
//! use distkeeper::session::SessionOptions;
//! use distkeeper::trace::TracingSink;
//! use distkeeper::ui::{create_ui, OutputMode};
//!
//! # fn main() -> distkeeper::Result<()> {
//! let mut args: Vec<String> = std::env::args().collect();
//! let host = examine_args(&mut args);
//! let mut app = Application::new(host, SessionOptions::discover())?;
//! app.logging_ready(Box::new(TracingSink));
//!
//! let mut ui = create_ui(true, OutputMode::Normal);
//! let exit_code = match app.init(ui.as_mut(), &default_context())? {
//!     Flow::Continue => 0,
//!     Flow::Terminate(code) => code,
//! };
//! app.finalize(exit_code, ui.as_mut());
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod create;
pub mod report;

pub use args::{examine_args, HostOptions};
pub use create::{try_create_file, FileKind};
pub use report::{security_risk, sorry, warning, Sorry};

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::{keys, ConfigStore, TriState};
use crate::diagnose::{self, BasicDiagnostics, DiagnosticsProvider, Issue};
use crate::error::Result;
use crate::installer::{
    HelperInstaller, InstallOrchestrator, InstallOutcome, InstallRequest, InstallerPolicy,
    PackageInstaller,
};
use crate::maintenance::{
    HelperContext, MaintenanceCoordinator, MaintenanceOutcome, MaintenancePlan,
};
use crate::session::{install_signal_handlers, CancelFlag, Scope, Session, SessionOptions};
use crate::shell::exe_name;
use crate::trace::{TraceLevel, TraceRouter, TraceSink};
use crate::ui::UserInterface;

/// Whether the host should go on after a lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop now and exit with this code.
    Terminate(i32),
}

/// Process lifecycle around a host program.
pub struct Application {
    host: HostOptions,
    session: Session,
    trace: TraceRouter,
    orchestrator: InstallOrchestrator,
    installer: Box<dyn PackageInstaller>,
    /// `None` runs [`BasicDiagnostics`] with this process's privileges.
    diagnostics: Option<Box<dyn DiagnosticsProvider>>,
    cancel: CancelFlag,
    install_handlers: bool,
    elevated: bool,
    quiet: bool,
    last_maintenance: Option<MaintenanceOutcome>,
}

impl Application {
    /// Open the session. Events are buffered until [`Application::logging_ready`].
    pub fn new(host: HostOptions, options: SessionOptions) -> Result<Self> {
        let mut trace = TraceRouter::new();
        trace.trace(
            "app",
            TraceLevel::Info,
            format!("starting: {}", host.command_line),
        );
        let admin = host.admin || options.admin_mode;
        let session = Session::open(options.admin(admin), &mut trace)?;
        Ok(Self::assemble(host, session, trace))
    }

    /// Wrap an existing session.
    pub fn with_session(host: HostOptions, session: Session) -> Self {
        Self::assemble(host, session, TraceRouter::new())
    }

    fn assemble(host: HostOptions, session: Session, trace: TraceRouter) -> Self {
        let cancel = CancelFlag::process();
        let policy = InstallerPolicy::from_config(
            session.config(),
            host.enable_installer,
            session.is_shared_setup(),
        );
        let elevated = session.running_as_administrator();
        Self {
            orchestrator: InstallOrchestrator::new(policy, cancel.clone()),
            installer: Box::new(HelperInstaller::new()),
            diagnostics: None,
            cancel,
            install_handlers: true,
            elevated,
            quiet: false,
            last_maintenance: None,
            host,
            session,
            trace,
        }
    }

    pub fn with_installer(mut self, installer: Box<dyn PackageInstaller>) -> Self {
        self.installer = installer;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Box<dyn DiagnosticsProvider>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Use `cancel` instead of the signal-driven process flag.
    ///
    /// Signal handlers are then not installed by [`Application::init`].
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        let policy = self.orchestrator.policy().clone();
        self.orchestrator = InstallOrchestrator::new(policy, cancel.clone());
        self.cancel = cancel;
        self.install_handlers = false;
        self
    }

    /// Override the privilege check.
    pub fn with_elevation(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Suppress warnings and diagnose output.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Install the logging sink and flush buffered events into it.
    ///
    /// Only the first call has an effect.
    pub fn logging_ready(&mut self, sink: Box<dyn TraceSink>) -> bool {
        self.trace.flush_on_ready(sink)
    }

    /// Start-of-run work: signals, privilege check, setup check, maintenance.
    pub fn init(&mut self, ui: &mut dyn UserInterface, ctx: &HelperContext<'_>) -> Result<Flow> {
        if self.install_handlers {
            self.cancel = install_signal_handlers()?;
        }
        tracing::info!(
            "{} scope, installer {}, maintenance {}, diagnose {}",
            self.session.scope(),
            self.orchestrator.policy().enable,
            self.host.enable_maintenance,
            self.host.enable_diagnose
        );

        if self.elevated && self.session.scope() == Scope::User {
            report::security_risk(
                ui,
                self.quiet,
                "running with elevated privileges in user mode",
            );
        }

        if !self.host.enable_maintenance.or(true) {
            return Ok(Flow::Continue);
        }

        if self.is_fresh_installation() {
            tracing::error!(severity = "fatal", "this installation has not been set up");
            report::fresh_installation(ui);
            return Ok(Flow::Terminate(1));
        }

        self.run_maintenance(ctx)?;
        Ok(Flow::Continue)
    }

    fn is_fresh_installation(&self) -> bool {
        let config = self.session.config();
        config
            .timestamp(keys::SECTION_CORE, keys::LAST_ADMIN_MAINTENANCE)
            .is_none()
            && config
                .timestamp(keys::SECTION_CORE, keys::LAST_USER_MAINTENANCE)
                .is_none()
            && !self.session.is_portable()
    }

    /// Bring derived artifacts up to date now.
    pub fn run_maintenance(&mut self, ctx: &HelperContext<'_>) -> Result<&MaintenanceOutcome> {
        let enable_installer = self.enable_installer();
        let coordinator = MaintenanceCoordinator::new(&self.session, ctx, &self.cancel);
        let outcome = coordinator.run_if_stale(self.installer.as_mut(), enable_installer)?;
        match &outcome {
            MaintenanceOutcome::Ran { steps } if !outcome.all_succeeded() => {
                let failed = steps.iter().filter(|s| !s.success).count();
                tracing::warn!("{} maintenance step(s) did not succeed", failed);
            }
            MaintenanceOutcome::HelperMissing { name } => {
                tracing::debug!("maintenance skipped: {} is missing", name);
            }
            _ => {}
        }
        Ok(&*self.last_maintenance.insert(outcome))
    }

    /// What maintenance would do now.
    pub fn maintenance_plan(&self, ctx: &HelperContext<'_>) -> MaintenancePlan {
        MaintenanceCoordinator::new(&self.session, ctx, &self.cancel).plan()
    }

    pub fn last_maintenance(&self) -> Option<&MaintenanceOutcome> {
        self.last_maintenance.as_ref()
    }

    /// Install a package that the host found missing.
    pub fn install_package(
        &mut self,
        ui: &mut dyn UserInterface,
        package_id: &str,
        trigger: &str,
    ) -> Result<InstallOutcome> {
        self.orchestrator.install_package(
            &mut self.session,
            self.installer.as_mut(),
            ui,
            InstallRequest::new(package_id, trigger),
        )
    }

    /// Make a missing generated file.
    pub fn try_create_file(
        &self,
        ctx: &HelperContext<'_>,
        file: &Path,
        kind: FileKind,
    ) -> Result<bool> {
        self.cancel.check()?;
        create::try_create_file(&self.session, ctx, self.enable_installer(), file, kind)
    }

    /// End-of-run work: log the exit code, diagnose, forget declined packages.
    pub fn finalize(&mut self, exit_code: i32, ui: &mut dyn UserInterface) -> Vec<Issue> {
        tracing::info!("finishing with exit code {}", exit_code);
        let issues = if self.host.enable_diagnose.or(true) {
            let builtin = self.builtin_diagnostics();
            let provider: &dyn DiagnosticsProvider =
                self.diagnostics.as_deref().unwrap_or(&builtin);
            diagnose::run_if_due(&self.session, provider, ui, self.quiet, Utc::now())
        } else {
            Vec::new()
        };
        self.orchestrator.policy_mut().clear_declined();
        issues
    }

    /// Issues for the current scope, from the cache unless `force`.
    pub fn diagnose(&self, force: bool) -> Vec<Issue> {
        let builtin = self.builtin_diagnostics();
        let provider: &dyn DiagnosticsProvider = self.diagnostics.as_deref().unwrap_or(&builtin);
        diagnose::collect(&self.session, provider, Utc::now(), force)
    }

    fn builtin_diagnostics(&self) -> BasicDiagnostics {
        BasicDiagnostics {
            elevated: self.elevated,
        }
    }

    /// Skip the diagnosis in [`Application::finalize`].
    pub fn disable_diagnose(&mut self) {
        self.host.enable_diagnose = TriState::False;
    }

    /// Per-scope log file.
    pub fn log_file(&self) -> PathBuf {
        log_file_name(&self.session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn host(&self) -> &HostOptions {
        &self.host
    }

    pub fn orchestrator(&self) -> &InstallOrchestrator {
        &self.orchestrator
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// The effective installer flag.
    pub fn enable_installer(&self) -> TriState {
        self.orchestrator.policy().enable
    }
}

/// `<log dir>/<exe>.log`, or `<exe>-admin.log` in admin scope.
pub fn log_file_name(session: &Session) -> PathBuf {
    let name = match session.scope() {
        Scope::Admin => format!("{}-admin.log", exe_name()),
        Scope::User => format!("{}.log", exe_name()),
    };
    session.paths().log_dir().join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLayer, LayeredConfig};
    use crate::diagnose::Severity;
    use crate::installer::{InstallError, ProxyCredentials, ProxySettings, Repository};
    use crate::shell::CommandResult;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct NullInstaller;

    impl PackageInstaller for NullInstaller {
        fn update_catalog(
            &mut self,
            _: &Session,
            _: bool,
        ) -> std::result::Result<(), InstallError> {
            Ok(())
        }
        fn install_package(
            &mut self,
            _: &Session,
            _: &str,
        ) -> std::result::Result<(), InstallError> {
            Ok(())
        }
        fn default_repository(&self, _: &Session) -> Option<Repository> {
            None
        }
        fn proxy_settings(&self, _: &Session) -> ProxySettings {
            ProxySettings::default()
        }
        fn set_proxy_credentials(&mut self, _: ProxyCredentials) {}
    }

    struct OneIssue;

    impl DiagnosticsProvider for OneIssue {
        fn find_issues(&self, _: &Session) -> Vec<Issue> {
            vec![Issue::new(Severity::Major, "the index is missing")]
        }
    }

    fn app(temp: &TempDir, host: HostOptions, maintained: bool) -> Application {
        let mut layer = ConfigLayer::new("test");
        if maintained {
            layer.set(keys::SECTION_CORE, keys::LAST_USER_MAINTENANCE, "1700000000");
        }
        let options = SessionOptions::with_roots(temp.path().join("u"), temp.path().join("c"));
        let session = Session::with_config(options, LayeredConfig::from_layers(vec![layer]));
        Application::with_session(host, session)
            .with_installer(Box::new(NullInstaller))
            .with_diagnostics(Box::new(OneIssue))
            .with_cancel(CancelFlag::new())
            .with_elevation(false)
    }

    fn no_helper() -> HelperContext<'static> {
        HelperContext {
            find_helper: &|_, _| None,
            run_helper: &|_, _| unreachable!(),
            now: &Utc::now,
        }
    }

    #[test]
    fn fresh_installation_terminates() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp, HostOptions::default(), false);
        let mut ui = MockUI::new();
        assert_eq!(app.init(&mut ui, &no_helper()).unwrap(), Flow::Terminate(1));
        assert!(ui.has_error("fresh installation"));
    }

    #[test]
    fn disabled_maintenance_skips_setup_check() {
        let temp = TempDir::new().unwrap();
        let host = HostOptions {
            enable_maintenance: TriState::False,
            ..Default::default()
        };
        let mut app = app(&temp, host, false);
        let mut ui = MockUI::new();
        assert_eq!(app.init(&mut ui, &no_helper()).unwrap(), Flow::Continue);
        assert!(app.last_maintenance().is_none());
    }

    #[test]
    fn init_runs_maintenance() {
        let temp = TempDir::new().unwrap();
        let calls = RefCell::new(Vec::<Vec<String>>::new());
        let run = |_: &Path, args: &[String]| {
            calls.borrow_mut().push(args.to_vec());
            Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
        };
        let ctx = HelperContext {
            find_helper: &|_, name| Some(PathBuf::from(name)),
            run_helper: &run,
            now: &Utc::now,
        };
        let mut app = app(&temp, HostOptions::default(), true);
        let mut ui = MockUI::new();
        assert_eq!(app.init(&mut ui, &ctx).unwrap(), Flow::Continue);
        assert!(matches!(
            app.last_maintenance(),
            Some(MaintenanceOutcome::Ran { .. })
        ));
        assert!(calls
            .borrow()
            .iter()
            .any(|args| args.join(" ").ends_with("fndb refresh")));
    }

    #[test]
    fn elevated_user_scope_is_a_security_risk() {
        let temp = TempDir::new().unwrap();
        let host = HostOptions {
            enable_maintenance: TriState::False,
            ..Default::default()
        };
        let mut app = app(&temp, host, true).with_elevation(true);
        let mut ui = MockUI::new();
        app.init(&mut ui, &no_helper()).unwrap();
        assert!(ui.has_warning("security risk"));
    }

    #[test]
    fn builtin_diagnostics_follow_the_elevation_override() {
        let temp = TempDir::new().unwrap();
        let privileged = |elevated: bool| {
            let options =
                SessionOptions::with_roots(temp.path().join("u"), temp.path().join("c"));
            let session = Session::with_config(options, LayeredConfig::default());
            Application::with_session(HostOptions::default(), session)
                .with_cancel(CancelFlag::new())
                .with_elevation(elevated)
                .diagnose(true)
                .iter()
                .any(|issue| issue.description.contains("administrator privileges"))
        };
        assert!(privileged(true));
        assert!(!privileged(false));
    }

    #[test]
    fn cancelled_init_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut app = app(&temp, HostOptions::default(), true).with_cancel(cancel);
        let mut ui = MockUI::new();
        assert!(app.init(&mut ui, &no_helper()).is_err());
    }

    #[test]
    fn finalize_diagnoses_and_clears_declined() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp, HostOptions::default(), true);
        app.orchestrator.policy_mut().decline("amsmath");
        let mut ui = MockUI::new();
        let issues = app.finalize(0, &mut ui);
        assert_eq!(issues.len(), 1);
        assert!(ui.has_error("the index is missing"));
        assert_eq!(app.orchestrator().policy().declined().count(), 0);
    }

    #[test]
    fn finalize_respects_disabled_diagnose() {
        let temp = TempDir::new().unwrap();
        let host = HostOptions {
            enable_diagnose: TriState::False,
            ..Default::default()
        };
        let mut app = app(&temp, host, true);
        let mut ui = MockUI::new();
        assert!(app.finalize(0, &mut ui).is_empty());
        assert!(ui.errors().is_empty());
    }

    #[test]
    fn explicit_installer_flag_wins() {
        let temp = TempDir::new().unwrap();
        let host = HostOptions {
            enable_installer: TriState::False,
            ..Default::default()
        };
        let mut app = app(&temp, host, true);
        let mut ui = MockUI::new();
        assert_eq!(app.enable_installer(), TriState::False);
        assert_eq!(
            app.install_package(&mut ui, "amsmath", "amsmath.sty").unwrap(),
            InstallOutcome::Disabled
        );
    }

    #[test]
    fn log_file_depends_on_scope() {
        let temp = TempDir::new().unwrap();
        let mut app = app(&temp, HostOptions::default(), true);
        let user_log = app.log_file();
        assert!(user_log.to_string_lossy().ends_with(".log"));
        app.session.set_admin_mode(true);
        assert!(app.log_file().to_string_lossy().ends_with("-admin.log"));
    }
}

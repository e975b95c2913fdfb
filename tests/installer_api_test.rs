//! Integration tests for on-demand installation through the public API.

use distkeeper::app::{Application, HostOptions};
use distkeeper::config::{keys, ConfigLayer, LayeredConfig, TriState};
use distkeeper::installer::{
    InstallError, InstallOutcome, InstallState, PackageInstaller, ProxyCredentials,
    ProxySettings, Repository, AS_ADMIN_KEY, DONT_ASK_AGAIN_KEY, INSTALL_PROMPT_KEY,
    PROXY_PASSWORD_KEY, PROXY_USER_KEY,
};
use distkeeper::session::{CancelFlag, Session, SessionOptions};
use distkeeper::ui::MockUI;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records what the orchestrator asked for; shared so tests can inspect it
/// after handing the installer to the application.
#[derive(Clone, Default)]
struct Recorder {
    installed: Arc<Mutex<Vec<(String, bool)>>>,
    credentials: Arc<Mutex<Option<ProxyCredentials>>>,
}

struct FakeInstaller {
    recorder: Recorder,
    fail: bool,
    proxy: ProxySettings,
    repository: Option<Repository>,
}

impl FakeInstaller {
    fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            fail: false,
            proxy: ProxySettings::default(),
            repository: None,
        }
    }
}

impl PackageInstaller for FakeInstaller {
    fn update_catalog(&mut self, _: &Session, _: bool) -> Result<(), InstallError> {
        Ok(())
    }

    fn install_package(&mut self, session: &Session, package_id: &str) -> Result<(), InstallError> {
        if self.fail {
            return Err(InstallError::new("repository unreachable").with_info("timeout"));
        }
        self.recorder
            .installed
            .lock()
            .unwrap()
            .push((package_id.to_string(), session.is_admin_mode()));
        Ok(())
    }

    fn default_repository(&self, _: &Session) -> Option<Repository> {
        self.repository.clone()
    }

    fn proxy_settings(&self, _: &Session) -> ProxySettings {
        self.proxy.clone()
    }

    fn set_proxy_credentials(&mut self, credentials: ProxyCredentials) {
        *self.recorder.credentials.lock().unwrap() = Some(credentials);
    }
}

fn application(temp: &TempDir, installer: FakeInstaller, autoinstall: Option<&str>) -> Application {
    let mut layer = ConfigLayer::new("test");
    layer.set(keys::SECTION_CORE, keys::LAST_USER_MAINTENANCE, "1700000000");
    if let Some(value) = autoinstall {
        layer.set(keys::SECTION_MPM, keys::AUTO_INSTALL, value);
    }
    let session = Session::with_config(
        SessionOptions::with_roots(temp.path().join("user"), temp.path().join("common")),
        LayeredConfig::from_layers(vec![layer]),
    );
    Application::with_session(HostOptions::default(), session)
        .with_installer(Box::new(installer))
        .with_cancel(CancelFlag::new())
}

#[test]
fn consent_installs_into_user_scope() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut app = application(&temp, FakeInstaller::new(&recorder), None);
    let mut ui = MockUI::new();
    ui.set_prompt_response(INSTALL_PROMPT_KEY, "y");
    ui.set_prompt_response(AS_ADMIN_KEY, "n");

    let outcome = app.install_package(&mut ui, "amsmath", "amsmath.sty").unwrap();
    assert!(outcome.is_installed());
    assert_eq!(
        *recorder.installed.lock().unwrap(),
        vec![("amsmath".to_string(), false)]
    );
    assert!(ui.prompts_shown().contains(&INSTALL_PROMPT_KEY.to_string()));
}

#[test]
fn as_admin_elevates_only_for_the_install() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut app = application(&temp, FakeInstaller::new(&recorder), None);
    let mut ui = MockUI::new();
    ui.set_prompt_response(INSTALL_PROMPT_KEY, "y");
    ui.set_prompt_response(AS_ADMIN_KEY, "y");

    let outcome = app.install_package(&mut ui, "amsmath", "").unwrap();
    assert!(outcome.is_installed());
    assert_eq!(
        *recorder.installed.lock().unwrap(),
        vec![("amsmath".to_string(), true)]
    );
    assert!(!app.session().is_admin_mode());
    assert!(app
        .orchestrator()
        .transitions()
        .contains(&InstallState::Elevating));
}

#[test]
fn declined_package_is_not_asked_again() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut app = application(&temp, FakeInstaller::new(&recorder), None);
    let mut ui = MockUI::new();
    ui.set_prompt_response(INSTALL_PROMPT_KEY, "n");

    assert_eq!(
        app.install_package(&mut ui, "amsmath", "").unwrap(),
        InstallOutcome::Declined
    );
    ui.clear();
    assert_eq!(
        app.install_package(&mut ui, "amsmath", "").unwrap(),
        InstallOutcome::Declined
    );
    assert!(ui.prompts_shown().is_empty());
}

#[test]
fn dont_ask_again_applies_to_later_packages() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut app = application(&temp, FakeInstaller::new(&recorder), None);
    let mut ui = MockUI::new();
    ui.set_prompt_response(INSTALL_PROMPT_KEY, "y");
    ui.set_prompt_response(DONT_ASK_AGAIN_KEY, "y");
    ui.set_prompt_response(AS_ADMIN_KEY, "n");

    app.install_package(&mut ui, "amsmath", "").unwrap();
    assert_eq!(app.enable_installer(), TriState::True);

    ui.clear();
    assert!(app.install_package(&mut ui, "hyperref", "").unwrap().is_installed());
    assert!(ui.prompts_shown().is_empty());
}

#[test]
fn configured_autoinstall_skips_the_prompt() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut app = application(&temp, FakeInstaller::new(&recorder), Some("t"));
    let mut ui = MockUI::new();

    assert!(app.install_package(&mut ui, "amsmath", "").unwrap().is_installed());
    assert!(ui.prompts_shown().is_empty());
}

#[test]
fn failure_turns_the_installer_off() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut installer = FakeInstaller::new(&recorder);
    installer.fail = true;
    let mut app = application(&temp, installer, Some("t"));
    let mut ui = MockUI::new();

    assert_eq!(
        app.install_package(&mut ui, "amsmath", "").unwrap(),
        InstallOutcome::Failed
    );
    assert_eq!(app.enable_installer(), TriState::False);
    assert_eq!(
        app.install_package(&mut ui, "hyperref", "").unwrap(),
        InstallOutcome::Disabled
    );
}

#[test]
fn remote_repository_behind_proxy_asks_for_credentials() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut installer = FakeInstaller::new(&recorder);
    installer.repository = Some(Repository::parse("https://mirror.example.org/dist"));
    installer.proxy = ProxySettings {
        use_proxy: true,
        host: "proxy.example.org".into(),
        port: 8080,
        auth_required: true,
        user: None,
    };
    let mut app = application(&temp, installer, Some("t"));
    let mut ui = MockUI::new();
    ui.set_prompt_response(PROXY_USER_KEY, "alice");
    ui.set_prompt_response(PROXY_PASSWORD_KEY, "secret");

    assert!(app.install_package(&mut ui, "amsmath", "").unwrap().is_installed());
    let credentials = recorder.credentials.lock().unwrap().clone().unwrap();
    assert_eq!(credentials.user, "alice");
    assert_eq!(credentials.password, "secret");
}

#[test]
fn empty_proxy_user_cancels() {
    let temp = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let mut installer = FakeInstaller::new(&recorder);
    installer.repository = Some(Repository::parse("https://mirror.example.org/dist"));
    installer.proxy = ProxySettings {
        use_proxy: true,
        host: "proxy.example.org".into(),
        port: 8080,
        auth_required: true,
        user: None,
    };
    let mut app = application(&temp, installer, Some("t"));
    let mut ui = MockUI::new();

    assert_eq!(
        app.install_package(&mut ui, "amsmath", "").unwrap(),
        InstallOutcome::Cancelled
    );
    assert!(recorder.installed.lock().unwrap().is_empty());
}

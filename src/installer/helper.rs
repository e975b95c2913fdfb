//! Package installation through the maintenance helper.

use crate::config::{keys, ConfigStore};
use crate::session::Session;
use crate::shell::{run_program, truncate_output, CommandOptions};

use super::{InstallError, PackageInstaller, ProxyCredentials, ProxySettings, Repository};

/// Environment variables that carry proxy credentials to the helper.
pub const PROXY_USER_ENV: &str = "DISTKEEPER_PROXY_USER";
pub const PROXY_PASSWORD_ENV: &str = "DISTKEEPER_PROXY_PASSWORD";

/// Output kept in an error's info field.
const ERROR_INFO_LIMIT: usize = 2_000;

/// Runs `<helper> packages ...` for the session's scope.
#[derive(Debug, Default)]
pub struct HelperInstaller {
    credentials: Option<ProxyCredentials>,
    options: CommandOptions,
}

impl HelperInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn run(&self, session: &Session, subcommand: &[&str]) -> Result<(), InstallError> {
        let name = session.helper_name();
        let Some(helper) = session.find_helper(&name) else {
            return Err(InstallError::new(format!(
                "the package manager helper '{}' could not be found",
                name
            )));
        };

        let mut args = Vec::new();
        if session.is_admin_mode() {
            args.push("--admin".to_string());
        }
        args.push("--quiet".to_string());
        args.extend(subcommand.iter().map(|s| s.to_string()));

        let mut options = self.options.clone();
        if let Some(credentials) = &self.credentials {
            options
                .env
                .insert(PROXY_USER_ENV.to_string(), credentials.user.clone());
            options
                .env
                .insert(PROXY_PASSWORD_ENV.to_string(), credentials.password.clone());
        }

        let result = run_program(&helper, &args, &options).map_err(|e| {
            InstallError::new(format!("{} could not be started", name)).with_info(e.to_string())
        })?;
        if result.success {
            return Ok(());
        }
        let output = result.output();
        let mut err = InstallError::new(format!(
            "{} {} failed with exit code {}",
            name,
            subcommand.join(" "),
            result
                .exit_code
                .map_or_else(|| "none".to_string(), |c| c.to_string())
        ));
        if !output.is_empty() {
            err = err.with_info(truncate_output(output.as_bytes(), ERROR_INFO_LIMIT));
        }
        Err(err)
    }
}

impl PackageInstaller for HelperInstaller {
    fn update_catalog(
        &mut self,
        session: &Session,
        from_cache_only: bool,
    ) -> Result<(), InstallError> {
        if from_cache_only {
            self.run(session, &["packages", "update-db", "--from-cache"])
        } else {
            self.run(session, &["packages", "update-db"])
        }
    }

    fn install_package(&mut self, session: &Session, package_id: &str) -> Result<(), InstallError> {
        self.run(session, &["packages", "install", package_id])
    }

    fn default_repository(&self, session: &Session) -> Option<Repository> {
        session
            .config()
            .value(keys::SECTION_MPM, keys::REPOSITORY)
            .filter(|r| !r.trim().is_empty())
            .map(|r| Repository::parse(&r))
    }

    fn proxy_settings(&self, session: &Session) -> ProxySettings {
        let config = session.config();
        let port = config
            .value(keys::SECTION_MPM, keys::PROXY_PORT)
            .and_then(|p| match p.trim().parse() {
                Ok(port) => Some(port),
                Err(e) => {
                    tracing::warn!("ignoring mpm.proxy_port {:?}: {}", p, e);
                    None
                }
            })
            .unwrap_or(8080);
        let user = self.credentials.as_ref().map(|c| c.user.clone()).or_else(|| {
            config
                .value(keys::SECTION_MPM, keys::PROXY_USER)
                .filter(|u| !u.trim().is_empty())
        });
        ProxySettings {
            use_proxy: config.flag(keys::SECTION_MPM, keys::PROXY_USE),
            host: config
                .value(keys::SECTION_MPM, keys::PROXY_HOST)
                .unwrap_or_default(),
            port,
            auth_required: config.flag(keys::SECTION_MPM, keys::PROXY_AUTH_REQUIRED),
            user,
        }
    }

    fn set_proxy_credentials(&mut self, credentials: ProxyCredentials) {
        tracing::debug!("using proxy credentials for {}", credentials.user);
        self.credentials = Some(credentials);
    }
}

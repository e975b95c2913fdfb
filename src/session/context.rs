//! The session object and scoped admin-mode switching.

use serde::Serialize;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use crate::config::{keys, load_layer_file, ConfigLayer, ConfigStore, LayeredConfig};
use crate::error::Result;
use crate::shell;
use crate::trace::{TraceLevel, TraceRouter};

use super::{SessionOptions, SpecialPaths};

/// Installation scope the process operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Shared installation, changes propagate to every user.
    Admin,
    /// Per-user installation.
    User,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Admin => f.write_str("admin"),
            Scope::User => f.write_str("user"),
        }
    }
}

/// Config layers kept so the effective config can be rebuilt on a scope switch.
#[derive(Debug, Clone, Default)]
struct StoredLayers {
    env: Option<ConfigLayer>,
    user: Option<ConfigLayer>,
    common: Option<ConfigLayer>,
}

impl StoredLayers {
    fn assemble(&self, scope: Scope) -> LayeredConfig {
        let mut layers = Vec::new();
        if let Some(env) = &self.env {
            layers.push(env.clone());
        }
        if scope == Scope::User {
            if let Some(user) = &self.user {
                layers.push(user.clone());
            }
        }
        if let Some(common) = &self.common {
            layers.push(common.clone());
        }
        LayeredConfig::from_layers(layers)
    }
}

/// Process-wide context, passed explicitly by reference.
#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    admin_mode: bool,
    layers: StoredLayers,
    config: LayeredConfig,
    mode_switches: usize,
}

impl Session {
    /// Open a session, loading the configuration layers from disk.
    ///
    /// Events are recorded into `trace` because logging is usually not
    /// configured yet at this point.
    pub fn open(options: SessionOptions, trace: &mut TraceRouter) -> Result<Self> {
        let paths = SpecialPaths::new(Scope::User, &options.user_root, &options.common_root);
        trace.trace(
            "session",
            TraceLevel::Info,
            format!(
                "opening session: user root {}, common root {}, admin mode {}",
                options.user_root.display(),
                options.common_root.display(),
                options.admin_mode
            ),
        );

        let env = ConfigLayer::from_env();
        if !env.is_empty() {
            trace.trace("config", TraceLevel::Debug, "environment overrides present");
        }
        let user = if options.is_shared_setup() {
            load_traced(&paths.user_config_file(), trace)?
        } else {
            None
        };
        let common = load_traced(&paths.common_config_file(), trace)?;

        let layers = StoredLayers {
            env: Some(env),
            user,
            common,
        };
        Ok(Self::from_layers(options, layers))
    }

    /// Build a session around an already assembled configuration.
    ///
    /// The configuration applies regardless of scope.
    pub fn with_config(options: SessionOptions, config: LayeredConfig) -> Self {
        let mut session = Self::from_layers(options, StoredLayers::default());
        session.config = config;
        session
    }

    fn from_layers(options: SessionOptions, layers: StoredLayers) -> Self {
        let admin_mode = options.admin_mode;
        let scope = if admin_mode { Scope::Admin } else { Scope::User };
        let config = layers.assemble(scope);
        Self {
            options,
            admin_mode,
            layers,
            config,
            mode_switches: 0,
        }
    }

    pub fn scope(&self) -> Scope {
        if self.admin_mode {
            Scope::Admin
        } else {
            Scope::User
        }
    }

    pub fn is_admin_mode(&self) -> bool {
        self.admin_mode
    }

    /// Switch scope. Not reentrant; prefer [`Session::elevate_scoped`].
    pub fn set_admin_mode(&mut self, admin_mode: bool) {
        if self.admin_mode == admin_mode {
            return;
        }
        tracing::info!("switching to {} mode", if admin_mode { "admin" } else { "user" });
        self.admin_mode = admin_mode;
        self.mode_switches += 1;
        if self.layers.env.is_some() || self.layers.user.is_some() || self.layers.common.is_some()
        {
            self.config = self.layers.assemble(self.scope());
        }
    }

    /// Enter admin scope until the returned guard is dropped.
    ///
    /// Already in admin scope: the guard is inert and nothing is switched.
    pub fn elevate_scoped(&mut self) -> AdminModeGuard<'_> {
        let restore = if self.admin_mode {
            None
        } else {
            self.set_admin_mode(true);
            Some(false)
        };
        AdminModeGuard {
            session: self,
            restore,
        }
    }

    /// Number of scope switches performed so far.
    pub fn mode_switch_count(&self) -> usize {
        self.mode_switches
    }

    pub fn paths(&self) -> SpecialPaths {
        SpecialPaths::new(
            self.scope(),
            &self.options.user_root,
            &self.options.common_root,
        )
    }

    pub fn config(&self) -> &LayeredConfig {
        &self.config
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_shared_setup(&self) -> bool {
        self.options.is_shared_setup()
    }

    pub fn is_portable(&self) -> bool {
        self.options.portable
    }

    /// Whether the process runs with administrator privileges.
    pub fn running_as_administrator(&self) -> bool {
        shell::is_elevated()
    }

    /// Configured name of the maintenance helper.
    pub fn helper_name(&self) -> String {
        self.config
            .value(keys::SECTION_CORE, keys::HELPER)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| keys::DEFAULT_HELPER.to_string())
    }

    /// Locate a helper in the distribution's bin directories or on `PATH`.
    pub fn find_helper(&self, name: &str) -> Option<PathBuf> {
        shell::find_helper(name, &self.paths().bin_dirs())
    }
}

fn load_traced(path: &Path, trace: &mut TraceRouter) -> Result<Option<ConfigLayer>> {
    let layer = load_layer_file(path)?;
    if layer.is_some() {
        trace.trace(
            "config",
            TraceLevel::Debug,
            format!("loaded {}", path.display()),
        );
    }
    Ok(layer)
}

/// Keeps the session in admin scope for its lifetime.
///
/// Dropping the guard restores the previous scope on every exit path,
/// including early returns and unwinding.
pub struct AdminModeGuard<'a> {
    session: &'a mut Session,
    restore: Option<bool>,
}

impl AdminModeGuard<'_> {
    /// Whether creating this guard switched the scope.
    pub fn switched(&self) -> bool {
        self.restore.is_some()
    }
}

impl Deref for AdminModeGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for AdminModeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for AdminModeGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            self.session.set_admin_mode(previous);
        }
    }
}

//! Questions asked before installing a package.

use crate::error::Result;
use crate::session::Session;
use crate::ui::{Prompt, PromptResult, UserInterface};

use super::ProxyCredentials;

pub const INSTALL_PROMPT_KEY: &str = "install_package";
pub const DONT_ASK_AGAIN_KEY: &str = "install_dont_ask_again";
pub const AS_ADMIN_KEY: &str = "install_as_admin";
pub const PROXY_USER_KEY: &str = "proxy_user";
pub const PROXY_PASSWORD_KEY: &str = "proxy_password";

/// The user's answer to "install this package?".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallConsent {
    pub consent: bool,
    /// Apply the answer to every further package in this process.
    pub dont_ask_again: bool,
    /// Install into the shared scope.
    pub as_admin: bool,
}

impl InstallConsent {
    pub fn declined() -> Self {
        Self::default()
    }
}

fn confirmed(result: PromptResult) -> bool {
    result.as_bool().unwrap_or(false)
}

/// Ask whether `package_id`, needed by `trigger`, may be installed.
///
/// Without a terminal the default answer is "no" unless a prompt override
/// says otherwise. Installing as administrator is only offered on a shared
/// setup when the session is not already in admin scope.
pub fn prompt_install(
    ui: &mut dyn UserInterface,
    session: &Session,
    package_id: &str,
    trigger: &str,
) -> Result<InstallConsent> {
    let question = if trigger.is_empty() {
        format!("The required package '{}' is not installed. Install it now?", package_id)
    } else {
        format!(
            "The required package '{}' is not installed (needed for {}). Install it now?",
            package_id, trigger
        )
    };
    let interactive = ui.is_interactive();
    let consent = confirmed(ui.prompt(&Prompt::confirm(
        INSTALL_PROMPT_KEY,
        question,
        interactive,
    ))?);

    let dont_ask_again = confirmed(ui.prompt(&Prompt::confirm(
        DONT_ASK_AGAIN_KEY,
        "Always use this answer for missing packages?",
        false,
    ))?);

    let as_admin = if consent && session.is_shared_setup() && !session.is_admin_mode() {
        confirmed(ui.prompt(&Prompt::confirm(
            AS_ADMIN_KEY,
            "Install for all users (requires administrator privileges)?",
            false,
        ))?)
    } else {
        false
    };

    Ok(InstallConsent {
        consent,
        dont_ask_again,
        as_admin,
    })
}

/// Ask for proxy credentials; an empty user name cancels.
pub fn prompt_proxy_credentials(ui: &mut dyn UserInterface) -> Result<Option<ProxyCredentials>> {
    let user = ui
        .prompt(&Prompt::input(PROXY_USER_KEY, "Proxy user name"))?
        .as_string();
    if user.trim().is_empty() {
        return Ok(None);
    }
    let password = ui
        .prompt(&Prompt::password(PROXY_PASSWORD_KEY, "Proxy password"))?
        .as_string();
    Ok(Some(ProxyCredentials {
        user: user.trim().to_string(),
        password,
    }))
}

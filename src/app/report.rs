//! Messages for the person at the terminal.

use std::fmt;
use std::path::Path;

use crate::shell::exe_name;
use crate::ui::UserInterface;

/// Where to learn how to finish setting up an installation.
pub const SETUP_URL: &str = "https://distkeeper.dev/docs/setup";

/// An apology for an operation that did not succeed.
#[derive(Debug, Clone, Default)]
pub struct Sorry<'a> {
    /// What failed, usually the program name.
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub remedy: Option<&'a str>,
    pub log_file: Option<&'a Path>,
    pub url: Option<&'a str>,
}

impl fmt::Display for Sorry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description.filter(|d| !d.is_empty()) {
            None => write!(f, "Sorry, but \"{}\" did not succeed.", self.name)?,
            Some(description) => {
                write!(
                    f,
                    "Sorry, but \"{}\" did not succeed for the following reason:\n\n  {}",
                    self.name, description
                )?;
                if let Some(remedy) = self.remedy.filter(|r| !r.is_empty()) {
                    write!(f, "\n\nRemedy:\n\n  {}", remedy)?;
                }
            }
        }
        if let Some(log_file) = self.log_file {
            write!(
                f,
                "\n\nThe log file hopefully contains the information to get going again:\n\n  {}",
                log_file.display()
            )?;
        }
        if let Some(url) = self.url.filter(|u| !u.is_empty()) {
            write!(f, "\n\nFor more information, visit: {}", url)?;
        }
        Ok(())
    }
}

/// Report a failure; shown even in quiet mode.
pub fn sorry(ui: &mut dyn UserInterface, report: &Sorry<'_>) {
    ui.error(&report.to_string());
}

/// Log a warning and show it unless `quiet`.
pub fn warning(ui: &mut dyn UserInterface, quiet: bool, message: &str) {
    tracing::warn!("{}", message);
    if !quiet {
        ui.warning(&format!("{}: warning: {}", exe_name(), message));
    }
}

/// Log a security warning and show it unless `quiet`.
pub fn security_risk(ui: &mut dyn UserInterface, quiet: bool, message: &str) {
    tracing::warn!("security risk: {}", message);
    if !quiet {
        ui.warning(&format!("{}: security risk: {}", exe_name(), message));
    }
}

/// Guidance shown when the installation was never set up.
pub fn fresh_installation(ui: &mut dyn UserInterface) {
    ui.error(&format!(
        "It seems that this is a fresh installation.\n\
         Please finish the setup before proceeding.\n\
         For more information, visit:\n{}",
        SETUP_URL
    ));
}

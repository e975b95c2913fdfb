//! The `distkeeper install` command.

use crate::app::{sorry, Application, Sorry};
use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::installer::InstallOutcome;
use crate::maintenance::HelperContext;
use crate::shell::exe_name;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Install one package through the orchestrator.
pub struct InstallCommand {
    args: InstallArgs,
}

impl InstallCommand {
    pub fn new(args: InstallArgs) -> Self {
        Self { args }
    }
}

impl Command for InstallCommand {
    fn execute(
        &self,
        app: &mut Application,
        _ctx: &HelperContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let package = self.args.package.as_str();
        let trigger = self.args.trigger.as_deref().unwrap_or(package);

        match app.install_package(ui, package, trigger)? {
            InstallOutcome::Installed { install_root } => {
                ui.success(&format!(
                    "Installed {} into {}",
                    package,
                    install_root.display()
                ));
                Ok(CommandResult::success())
            }
            InstallOutcome::Declined => {
                ui.warning(&format!("{} was not installed.", package));
                Ok(CommandResult::failure(1))
            }
            InstallOutcome::Disabled => {
                ui.warning(&format!(
                    "The package installer is disabled; {} was not installed.",
                    package
                ));
                Ok(CommandResult::failure(1))
            }
            InstallOutcome::Cancelled => {
                ui.warning("Installation cancelled.");
                Ok(CommandResult::failure(1))
            }
            InstallOutcome::Failed => {
                let description = format!("the package {} could not be installed", package);
                let log_file = app.log_file();
                sorry(
                    ui,
                    &Sorry {
                        name: &exe_name(),
                        description: Some(&description),
                        remedy: Some("Check the log file, then try again later."),
                        log_file: Some(&log_file),
                        url: None,
                    },
                );
                Ok(CommandResult::failure(1))
            }
        }
    }
}

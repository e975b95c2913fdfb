//! The `distkeeper diagnose` command.

use crate::app::Application;
use crate::cli::args::DiagnoseArgs;
use crate::diagnose::Severity;
use crate::error::{DistError, Result};
use crate::maintenance::HelperContext;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Show every issue, not just the serious ones.
pub struct DiagnoseCommand {
    args: DiagnoseArgs,
}

impl DiagnoseCommand {
    pub fn new(args: DiagnoseArgs) -> Self {
        Self { args }
    }
}

impl Command for DiagnoseCommand {
    fn execute(
        &self,
        app: &mut Application,
        _ctx: &HelperContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let issues = app.diagnose(self.args.force);
        // Already shown in full; don't echo again on the way out.
        app.disable_diagnose();

        if self.args.json {
            let json = serde_json::to_string_pretty(&issues)
                .map_err(|e| DistError::Other(e.into()))?;
            println!("{}", json);
        } else if issues.is_empty() {
            ui.success("No problems found.");
        } else {
            ui.show_header("Issues");
            for issue in &issues {
                match issue.severity {
                    Severity::Warning => ui.warning(&issue.to_string()),
                    Severity::Major | Severity::Critical => ui.error(&issue.to_string()),
                }
            }
        }

        if issues.iter().any(|i| i.severity.is_serious()) {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}

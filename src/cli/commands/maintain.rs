//! The `distkeeper maintain` command.

use crate::app::Application;
use crate::cli::args::MaintainArgs;
use crate::error::Result;
use crate::maintenance::HelperContext;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Refresh whatever is stale.
pub struct MaintainCommand {
    args: MaintainArgs,
}

impl MaintainCommand {
    pub fn new(args: MaintainArgs) -> Self {
        Self { args }
    }
}

impl Command for MaintainCommand {
    fn execute(
        &self,
        app: &mut Application,
        ctx: &HelperContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        if self.args.dry_run {
            let plan = app.maintenance_plan(ctx);
            if plan.is_empty() {
                ui.success("Everything is up to date.");
            } else {
                ui.message(&format!("Would run in {} scope:", plan.scope));
                for step in &plan.steps {
                    let retry = if plan.retries.contains(step) {
                        " (retry)"
                    } else {
                        ""
                    };
                    ui.message(&format!("  {}{}", step, retry));
                }
            }
            return Ok(CommandResult::success());
        }

        // init already ran maintenance unless it was disabled by a host flag
        let outcome = match app.last_maintenance() {
            Some(outcome) => outcome.clone(),
            None => app.run_maintenance(ctx)?.clone(),
        };
        display::show_outcome(ui, &outcome);

        if outcome.all_succeeded() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

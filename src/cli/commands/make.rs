//! The `distkeeper make` command.

use crate::app::{sorry, Application, Sorry};
use crate::cli::args::MakeArgs;
use crate::error::Result;
use crate::maintenance::HelperContext;
use crate::shell::exe_name;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Make a generated file on demand.
pub struct MakeCommand {
    args: MakeArgs,
}

impl MakeCommand {
    pub fn new(args: MakeArgs) -> Self {
        Self { args }
    }
}

impl Command for MakeCommand {
    fn execute(
        &self,
        app: &mut Application,
        ctx: &HelperContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let file = &self.args.file;
        if app.try_create_file(ctx, file, self.args.kind)? {
            ui.success(&format!("Made {}", file.display()));
            return Ok(CommandResult::success());
        }

        let description = format!("{} could not be made", file.display());
        let log_file = app.log_file();
        sorry(
            ui,
            &Sorry {
                name: &exe_name(),
                description: Some(&description),
                remedy: None,
                log_file: Some(&log_file),
                url: None,
            },
        );
        Ok(CommandResult::failure(1))
    }
}

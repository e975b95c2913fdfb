//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::app::Application;
use crate::cli::args::{Cli, Commands, MaintainArgs};
use crate::error::Result;
use crate::maintenance::HelperContext;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command against an initialized application.
    fn execute(
        &self,
        app: &mut Application,
        ctx: &HelperContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher<'a> {
    ctx: &'a HelperContext<'a>,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(ctx: &'a HelperContext<'a>) -> Self {
        Self { ctx }
    }

    /// Route the CLI subcommand to its implementation and run it.
    pub fn dispatch(
        &self,
        cli: &Cli,
        app: &mut Application,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Maintain(args)) => {
                super::maintain::MaintainCommand::new(args.clone()).execute(app, self.ctx, ui)
            }
            Some(Commands::Install(args)) => {
                super::install::InstallCommand::new(args.clone()).execute(app, self.ctx, ui)
            }
            Some(Commands::Diagnose(args)) => {
                super::diagnose::DiagnoseCommand::new(args.clone()).execute(app, self.ctx, ui)
            }
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(args.clone()).execute(app, self.ctx, ui)
            }
            Some(Commands::Make(args)) => {
                super::make::MakeCommand::new(args.clone()).execute(app, self.ctx, ui)
            }
            None => super::maintain::MaintainCommand::new(MaintainArgs::default())
                .execute(app, self.ctx, ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }
}

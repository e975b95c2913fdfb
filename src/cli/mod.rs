//! Command-line interface for distkeeper.
//!
//! - [`args`] - Argument definitions using clap's derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, DiagnoseArgs, InstallArgs, MaintainArgs, MakeArgs, StatusArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};

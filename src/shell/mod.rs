//! Helper process execution and platform probes.

pub mod command;
pub mod platform;

pub use command::{
    run_program, truncate_output, CommandOptions, CommandResult, DEFAULT_MAX_OUTPUT,
};
pub use platform::{exe_name, find_helper, is_elevated};

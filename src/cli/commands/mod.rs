//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`] after the host
//! application has been initialized, so every command sees the same
//! session and installer policy.

pub mod diagnose;
pub mod dispatcher;
pub mod display;
pub mod install;
pub mod maintain;
pub mod make;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

//! distkeeper - runtime coordinator for a shared, multi-user distribution.
//!
//! A program linked against distkeeper keeps the distribution's derived
//! caches (file index, font maps, language configuration, package catalog)
//! consistent with the shared installation, and installs packages on demand
//! when a file turns out to be missing.
//!
//! # Modules
//!
//! - [`app`] - Host application lifecycle: flags, init, finalize, reports
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered configuration and tri-state flags
//! - [`diagnose`] - Periodic health checks
//! - [`error`] - Error types and result aliases
//! - [`installer`] - On-demand package installation
//! - [`maintenance`] - Staleness detection and cache refresh
//! - [`session`] - Process context: scope, paths, cancellation
//! - [`shell`] - Helper lookup and execution
//! - [`trace`] - Buffering of events recorded before logging is ready
//! - [`ui`] - Prompts and terminal output
//!
//! # Example
//!
//! ```
//! use distkeeper::config::TriState;
//! use distkeeper::maintenance::{evaluate, StalenessInputs};
//! use distkeeper::session::Scope;
//!
//! // A user scope with no private artifacts: only the index needs building.
//! let staleness = evaluate(&StalenessInputs::default(), Scope::User);
//! assert!(staleness.file_index);
//! assert!(!staleness.font_language);
//! assert_eq!("t".parse::<TriState>().unwrap(), TriState::True);
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod diagnose;
pub mod error;
pub mod installer;
pub mod maintenance;
pub mod session;
pub mod shell;
pub mod trace;
pub mod ui;

pub use error::{DistError, Result};

//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct. Host flags (`--dk-*`) are
//! stripped before clap sees the command line.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::app::FileKind;

/// distkeeper - keeps a shared distribution's caches fresh and installs
/// missing packages on demand.
#[derive(Debug, Parser)]
#[command(name = "distkeeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; answers come from DISTKEEPER_PROMPT_* or defaults
    #[arg(long, global = true, env = "DISTKEEPER_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Refresh stale caches (default if no command specified)
    Maintain(MaintainArgs),

    /// Install a missing package
    Install(InstallArgs),

    /// Check the installation for problems
    Diagnose(DiagnoseArgs),

    /// Show what maintenance would do
    Status(StatusArgs),

    /// Make a generated file (format, base or font metric)
    Make(MakeArgs),
}

/// Arguments for the `maintain` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MaintainArgs {
    /// Only show the plan
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Package to install
    pub package: String,

    /// File whose absence triggered the installation
    #[arg(long)]
    pub trigger: Option<String>,
}

/// Arguments for the `diagnose` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DiagnoseArgs {
    /// Ignore cached results
    #[arg(short, long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `make` command.
#[derive(Debug, Clone, clap::Args)]
pub struct MakeArgs {
    /// File to make
    pub file: PathBuf,

    /// What kind of file: fmt, base, tfm
    #[arg(long, default_value = "fmt")]
    pub kind: FileKind,
}

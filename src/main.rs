//! distkeeper CLI entry point.

use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use distkeeper::app::{examine_args, sorry, Application, Flow, Sorry};
use distkeeper::cli::{Cli, CommandDispatcher};
use distkeeper::maintenance::{default_context, HelperContext};
use distkeeper::session::SessionOptions;
use distkeeper::shell::exe_name;
use distkeeper::trace::TracingSink;
use distkeeper::ui::{create_ui, OutputMode, UserInterface};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Everything goes to the per-scope log file; stderr only gets log lines
/// with `--verbose` or `--debug`.
fn init_tracing(debug: bool, verbose: bool, log_file: &Path) -> Option<WorkerGuard> {
    let filter = if debug {
        EnvFilter::new("distkeeper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("distkeeper=info"))
    };

    let stderr_level = if debug || verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::OFF
    };
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_level);

    let (file_layer, guard) = match (log_file.parent(), log_file.file_name()) {
        (Some(dir), Some(name)) if fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    guard
}

fn run(
    cli: &Cli,
    app: &mut Application,
    ctx: &HelperContext<'_>,
    ui: &mut dyn UserInterface,
) -> distkeeper::Result<i32> {
    if let Flow::Terminate(code) = app.init(ui, ctx)? {
        return Ok(code);
    }
    let result = CommandDispatcher::new(ctx).dispatch(cli, app, ui)?;
    Ok(result.exit_code)
}

fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().collect();
    let host = examine_args(&mut args);
    let cli = Cli::parse_from(&args);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let is_interactive = !cli.non_interactive && std::io::stdin().is_terminal();
    let mut ui = create_ui(is_interactive, output_mode);

    let mut app = match Application::new(host, SessionOptions::discover()) {
        Ok(app) => app.quiet(cli.quiet),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let _guard = init_tracing(cli.debug, cli.verbose, &app.log_file());
    app.logging_ready(Box::new(TracingSink));
    tracing::debug!("distkeeper starting with args: {:?}", cli);

    let ctx = default_context();
    let exit_code = match run(&cli, &mut app, &ctx, ui.as_mut()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(severity = "fatal", "{}", e);
            let description = e.to_string();
            let log_file = app.log_file();
            sorry(
                ui.as_mut(),
                &Sorry {
                    name: &exe_name(),
                    description: Some(&description),
                    remedy: None,
                    log_file: Some(&log_file),
                    url: None,
                },
            );
            1
        }
    };

    app.finalize(exit_code, ui.as_mut());
    ExitCode::from(u8::try_from(exit_code).unwrap_or(1))
}

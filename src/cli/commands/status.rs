//! The `distkeeper status` command.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::app::Application;
use crate::cli::args::StatusArgs;
use crate::config::{keys, ConfigStore};
use crate::error::{DistError, Result};
use crate::maintenance::{HelperContext, MaintenancePlan, RefreshLedger, RefreshStep};
use crate::session::Scope;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Snapshot of the installation as `status --json` prints it.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub scope: Scope,
    pub user_root: PathBuf,
    pub common_root: PathBuf,
    pub helper: Option<PathBuf>,
    pub installer: String,
    pub last_admin_maintenance: Option<DateTime<Utc>>,
    pub last_user_maintenance: Option<DateTime<Utc>>,
    pub plan: MaintenancePlan,
}

/// Show what maintenance would do, without doing it.
pub struct StatusCommand {
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(args: StatusArgs) -> Self {
        Self { args }
    }

    fn report(app: &Application, ctx: &HelperContext<'_>) -> StatusReport {
        let session = app.session();
        let config = session.config();
        let paths = session.paths();
        StatusReport {
            scope: session.scope(),
            user_root: paths.user_root().to_path_buf(),
            common_root: paths.common_root().to_path_buf(),
            helper: (ctx.find_helper)(session, &session.helper_name()),
            installer: app.enable_installer().to_string(),
            last_admin_maintenance: config
                .timestamp(keys::SECTION_CORE, keys::LAST_ADMIN_MAINTENANCE),
            last_user_maintenance: config
                .timestamp(keys::SECTION_CORE, keys::LAST_USER_MAINTENANCE),
            plan: app.maintenance_plan(ctx),
        }
    }
}

impl Command for StatusCommand {
    fn execute(
        &self,
        app: &mut Application,
        ctx: &HelperContext<'_>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let report = Self::report(app, ctx);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| DistError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!("distkeeper - {} scope", report.scope));
        ui.message(&format!("User root:   {}", report.user_root.display()));
        ui.message(&format!("Common root: {}", report.common_root.display()));
        match &report.helper {
            Some(helper) => ui.message(&format!("Helper:      {}", helper.display())),
            None => ui.warning(&format!(
                "Helper:      {} not found",
                app.session().helper_name()
            )),
        }
        ui.message(&format!("Installer:   {}", report.installer));

        let ledger = RefreshLedger::load(&app.session().paths().maintenance_ledger());
        ui.message("");
        ui.message("Steps:");
        for step in RefreshStep::ORDER {
            ui.message(&display::format_record(step, ledger.get(step)));
        }

        ui.message("");
        if report.plan.is_empty() {
            ui.success("Everything is up to date.");
        } else {
            let steps: Vec<String> = report.plan.steps.iter().map(ToString::to_string).collect();
            ui.message(&format!("Next maintenance run: {}", steps.join(", ")));
        }
        Ok(CommandResult::success())
    }
}

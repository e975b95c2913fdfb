//! Runs the refresh steps the oracle and the ledger ask for.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::TriState;
use crate::error::Result;
use crate::installer::PackageInstaller;
use crate::session::{CancelFlag, Scope, Session};
use crate::shell::{run_program, CommandOptions, CommandResult};

use super::{evaluate, MaintenanceLock, RefreshLedger, RefreshStep, Staleness, StalenessInputs};

/// How helpers are found and run, replaceable in tests.
pub struct HelperContext<'a> {
    /// Locate the helper by name.
    pub find_helper: &'a dyn Fn(&Session, &str) -> Option<PathBuf>,
    /// Run the helper with the given arguments.
    pub run_helper: &'a dyn Fn(&Path, &[String]) -> Result<CommandResult>,
    /// Current time, for the ledger.
    pub now: &'a dyn Fn() -> DateTime<Utc>,
}

/// Context that finds and runs real helpers.
pub fn default_context() -> HelperContext<'static> {
    HelperContext {
        find_helper: &|session, name| session.find_helper(name),
        run_helper: &|program, args| run_program(program, args, &CommandOptions::default()),
        now: &Utc::now,
    }
}

/// What a maintenance run would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenancePlan {
    pub scope: Scope,
    pub staleness: Staleness,
    /// Steps to run, in execution order.
    pub steps: Vec<RefreshStep>,
    /// Steps planned only because they failed last time.
    pub retries: Vec<RefreshStep>,
}

impl MaintenancePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: RefreshStep,
    pub success: bool,
    /// `None` for launch failures and in-process steps that failed.
    pub exit_code: Option<i32>,
}

/// How a maintenance run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MaintenanceOutcome {
    /// Nothing was stale.
    UpToDate,
    /// Work was needed but the helper is not installed.
    HelperMissing { name: String },
    /// Another process holds the maintenance lock.
    Busy,
    /// The planned steps ran, each with its own outcome.
    Ran { steps: Vec<StepOutcome> },
}

impl MaintenanceOutcome {
    /// Every executed step succeeded (trivially true when none ran).
    pub fn all_succeeded(&self) -> bool {
        match self {
            MaintenanceOutcome::Ran { steps } => steps.iter().all(|s| s.success),
            MaintenanceOutcome::UpToDate
            | MaintenanceOutcome::HelperMissing { .. }
            | MaintenanceOutcome::Busy => true,
        }
    }
}

/// Plan the steps for the session's scope.
///
/// Font maps depend on both the index and the language configuration, so
/// they are planned when either is stale.
pub fn plan(inputs: &StalenessInputs, scope: Scope, ledger: &RefreshLedger) -> MaintenancePlan {
    let staleness = evaluate(inputs, scope);
    let mut steps = Vec::new();
    let mut retries = Vec::new();

    for step in RefreshStep::ORDER {
        let stale = match step {
            RefreshStep::UpdateCatalog => staleness.catalog,
            RefreshStep::RefreshIndex => staleness.file_index,
            RefreshStep::ConfigureFontMaps => staleness.file_index || staleness.font_language,
            RefreshStep::ConfigureLanguages => staleness.font_language,
        };
        let applies = match step {
            RefreshStep::UpdateCatalog | RefreshStep::ConfigureLanguages => scope == Scope::User,
            RefreshStep::RefreshIndex | RefreshStep::ConfigureFontMaps => true,
        };
        if !applies {
            continue;
        }
        if stale {
            steps.push(step);
        } else if ledger.is_pending(step) {
            steps.push(step);
            retries.push(step);
        }
    }

    MaintenancePlan {
        scope,
        staleness,
        steps,
        retries,
    }
}

/// Brings derived artifacts up to date, at most one process at a time.
pub struct MaintenanceCoordinator<'a> {
    session: &'a Session,
    ctx: &'a HelperContext<'a>,
    cancel: &'a CancelFlag,
}

impl<'a> MaintenanceCoordinator<'a> {
    pub fn new(session: &'a Session, ctx: &'a HelperContext<'a>, cancel: &'a CancelFlag) -> Self {
        Self {
            session,
            ctx,
            cancel,
        }
    }

    /// Compute the plan without running anything.
    pub fn plan(&self) -> MaintenancePlan {
        let ledger = RefreshLedger::load(&self.session.paths().maintenance_ledger());
        plan(&StalenessInputs::collect(self.session), self.session.scope(), &ledger)
    }

    /// Run whatever is stale.
    ///
    /// Never waits for the lock: a concurrent run makes this return
    /// [`MaintenanceOutcome::Busy`]. Step failures are logged and recorded
    /// in the ledger; they do not stop later steps and are not errors.
    pub fn run_if_stale(
        &self,
        installer: &mut dyn PackageInstaller,
        enable_installer: TriState,
    ) -> Result<MaintenanceOutcome> {
        self.cancel.check()?;

        let paths = self.session.paths();
        let ledger_path = paths.maintenance_ledger();
        let mut ledger = RefreshLedger::load(&ledger_path);
        let plan = plan(&StalenessInputs::collect(self.session), self.session.scope(), &ledger);
        if plan.is_empty() {
            tracing::debug!("{} scope is up to date", plan.scope);
            return Ok(MaintenanceOutcome::UpToDate);
        }
        tracing::debug!(
            "{} scope needs {}",
            plan.scope,
            plan.steps
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let name = self.session.helper_name();
        let Some(helper) = (self.ctx.find_helper)(self.session, &name) else {
            tracing::debug!("{} is not installed; skipping maintenance", name);
            return Ok(MaintenanceOutcome::HelperMissing { name });
        };

        let Some(_lock) = MaintenanceLock::try_acquire(&paths.maintenance_lock())? else {
            tracing::debug!("maintenance is already running in another process");
            return Ok(MaintenanceOutcome::Busy);
        };

        let common = helper_args(enable_installer, self.session.is_admin_mode());
        let mut outcomes = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            self.cancel.check()?;
            let outcome = match step.helper_subcommand() {
                None => self.update_catalog(installer),
                Some(subcommand) => {
                    let mut args = common.clone();
                    args.extend(subcommand.iter().map(|s| s.to_string()));
                    self.run_step(*step, &helper, &args)
                }
            };

            let at = (self.ctx.now)();
            if outcome.success {
                ledger.record_success(*step, at);
            } else {
                ledger.record_failure(*step, at, outcome.exit_code);
            }
            if let Err(e) = ledger.save(&ledger_path) {
                tracing::warn!("could not save {}: {}", ledger_path.display(), e);
            }
            outcomes.push(outcome);
        }

        Ok(MaintenanceOutcome::Ran { steps: outcomes })
    }

    fn update_catalog(&self, installer: &mut dyn PackageInstaller) -> StepOutcome {
        let step = RefreshStep::UpdateCatalog;
        tracing::info!("updating the package catalog from the local cache");
        match installer.update_catalog(self.session, true) {
            Ok(()) => StepOutcome {
                step,
                success: true,
                exit_code: Some(0),
            },
            Err(e) => {
                tracing::error!("{} failed: {}", step, e);
                if let Some(info) = &e.info {
                    tracing::error!("{}", info);
                }
                StepOutcome {
                    step,
                    success: false,
                    exit_code: None,
                }
            }
        }
    }

    fn run_step(&self, step: RefreshStep, helper: &Path, args: &[String]) -> StepOutcome {
        tracing::info!("running {} {}", helper.display(), args.join(" "));
        match (self.ctx.run_helper)(helper, args) {
            Ok(result) if result.success => StepOutcome {
                step,
                success: true,
                exit_code: result.exit_code,
            },
            Ok(result) => {
                tracing::error!(
                    "{} failed: {} exited with code {:?}",
                    step,
                    helper.display(),
                    result.exit_code
                );
                let output = result.output();
                if !output.is_empty() {
                    tracing::error!("{}", output);
                }
                StepOutcome {
                    step,
                    success: false,
                    exit_code: result.exit_code,
                }
            }
            Err(e) => {
                tracing::error!("{} failed: {}", step, e);
                StepOutcome {
                    step,
                    success: false,
                    exit_code: None,
                }
            }
        }
    }
}

/// Arguments passed ahead of every helper subcommand.
pub fn helper_args(enable_installer: TriState, admin_mode: bool) -> Vec<String> {
    let mut args = Vec::new();
    match enable_installer {
        TriState::True => args.push("--enable-installer".to_string()),
        TriState::False => args.push("--disable-installer".to_string()),
        TriState::Unset => {}
    }
    if admin_mode {
        args.push("--admin".to_string());
    }
    args.push("--quiet".to_string());
    args
}

//! Shared display helpers for maintenance results.
//!
//! Used by `maintain` and `status` to render steps the same way.

use crate::maintenance::{MaintenanceOutcome, RefreshStep, StepOutcome, StepRecord};
use crate::ui::UserInterface;

/// Bracketed symbol for a step outcome.
pub fn outcome_symbol(outcome: &StepOutcome) -> &'static str {
    if outcome.success {
        "[ok]"
    } else {
        "[FAIL]"
    }
}

/// Print one executed step, styled by result.
pub fn show_step_outcome(ui: &mut dyn UserInterface, outcome: &StepOutcome) {
    let mut line = format!("  {} {}", outcome_symbol(outcome), outcome.step);
    if !outcome.success {
        match outcome.exit_code {
            Some(code) => line.push_str(&format!(" (exit code {})", code)),
            None => line.push_str(" (did not run to completion)"),
        }
    }
    if outcome.success {
        ui.success(&line);
    } else {
        ui.error(&line);
    }
}

/// Print a whole maintenance run.
pub fn show_outcome(ui: &mut dyn UserInterface, outcome: &MaintenanceOutcome) {
    match outcome {
        MaintenanceOutcome::UpToDate => ui.success("Everything is up to date."),
        MaintenanceOutcome::HelperMissing { name } => {
            ui.warning(&format!("Maintenance skipped: {} is not installed.", name))
        }
        MaintenanceOutcome::Busy => {
            ui.message("Maintenance is already running in another process.")
        }
        MaintenanceOutcome::Ran { steps } => {
            for step in steps {
                show_step_outcome(ui, step);
            }
        }
    }
}

/// One ledger line: `refresh-index  last ok 2026-01-01 10:00`.
pub fn format_record(step: RefreshStep, record: Option<&StepRecord>) -> String {
    let Some(record) = record else {
        return format!("  {:<20} never run", step.to_string());
    };
    let mut line = format!("  {:<20}", step.to_string());
    if let Some(at) = record.last_success {
        line.push_str(&format!(" last ok {}", at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(at) = record.last_failure {
        line.push_str(&format!(" last failed {}", at.format("%Y-%m-%d %H:%M")));
    }
    if record.is_pending() {
        line.push_str(" (retry pending)");
    }
    line
}

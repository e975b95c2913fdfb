//! Per-step record of refresh outcomes.
//!
//! The ledger remembers, for each refresh step, when it last succeeded and
//! when it last failed. A step that failed more recently than it succeeded
//! is pending and gets retried on the next run.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// One unit of maintenance work, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStep {
    /// Refresh the local package catalog from the cache.
    UpdateCatalog,
    /// Rebuild the file-name index.
    RefreshIndex,
    /// Regenerate font map files.
    ConfigureFontMaps,
    /// Regenerate language configuration.
    ConfigureLanguages,
}

impl RefreshStep {
    /// All steps in the order they run.
    pub const ORDER: [RefreshStep; 4] = [
        RefreshStep::UpdateCatalog,
        RefreshStep::RefreshIndex,
        RefreshStep::ConfigureFontMaps,
        RefreshStep::ConfigureLanguages,
    ];

    /// Helper subcommand for this step; the catalog runs in-process.
    pub fn helper_subcommand(self) -> Option<&'static [&'static str]> {
        match self {
            RefreshStep::UpdateCatalog => None,
            RefreshStep::RefreshIndex => Some(&["fndb", "refresh"]),
            RefreshStep::ConfigureFontMaps => Some(&["fontmaps", "configure"]),
            RefreshStep::ConfigureLanguages => Some(&["languages", "configure"]),
        }
    }
}

impl fmt::Display for RefreshStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefreshStep::UpdateCatalog => "update-catalog",
            RefreshStep::RefreshIndex => "refresh-index",
            RefreshStep::ConfigureFontMaps => "configure-font-maps",
            RefreshStep::ConfigureLanguages => "configure-languages",
        };
        f.write_str(name)
    }
}

/// Outcome history of one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exit_code: Option<i32>,
}

impl StepRecord {
    /// Failed more recently than it succeeded.
    pub fn is_pending(&self) -> bool {
        match (self.last_success, self.last_failure) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(success), Some(failure)) => failure > success,
        }
    }
}

/// Refresh history for one scope, stored as JSON in the data root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshLedger {
    #[serde(default)]
    steps: BTreeMap<RefreshStep, StepRecord>,
}

impl RefreshLedger {
    /// Load the ledger; a missing or unreadable file starts a fresh one.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(ledger)) => ledger,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("starting a new maintenance ledger: {:#}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ledger {}", path.display()))?;
        let ledger = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ledger {}", path.display()))?;
        Ok(Some(ledger))
    }

    /// Save with write-to-temp-then-rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize ledger")?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, step: RefreshStep) -> Option<&StepRecord> {
        self.steps.get(&step)
    }

    pub fn record_success(&mut self, step: RefreshStep, at: DateTime<Utc>) {
        let record = self.steps.entry(step).or_default();
        record.last_success = Some(at);
        record.last_exit_code = Some(0);
    }

    pub fn record_failure(&mut self, step: RefreshStep, at: DateTime<Utc>, exit_code: Option<i32>) {
        let record = self.steps.entry(step).or_default();
        record.last_failure = Some(at);
        record.last_exit_code = exit_code;
    }

    pub fn is_pending(&self, step: RefreshStep) -> bool {
        self.get(step).is_some_and(StepRecord::is_pending)
    }

    /// Steps awaiting a retry, in execution order.
    pub fn pending(&self) -> Vec<RefreshStep> {
        RefreshStep::ORDER
            .into_iter()
            .filter(|s| self.is_pending(*s))
            .collect()
    }
}

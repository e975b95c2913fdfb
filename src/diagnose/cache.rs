//! The on-disk issue cache.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::Issue;
use crate::maintenance::staleness::modified;

/// Cached issues are reused for this long.
pub const CACHE_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    issues: Vec<Issue>,
}

/// `issues.json` in the scope's config root.
#[derive(Debug, Clone)]
pub struct IssueCache {
    path: PathBuf,
}

impl IssueCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cache exists and was written less than a week before `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match modified(&self.path) {
            Some(written) => now <= written + Duration::days(CACHE_LIFETIME_DAYS),
            None => false,
        }
    }

    pub fn load(&self) -> anyhow::Result<Vec<Issue>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let file: CacheFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(file.issues)
    }

    pub fn save(&self, issues: &[Issue]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&CacheFile {
            issues: issues.to_vec(),
        })?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

//! Installation health checks.
//!
//! A [`DiagnosticsProvider`] finds [`Issue`]s; the [`reporter`] caches them
//! for a week in `issues.json` and surfaces them through logging and the UI.

pub mod cache;
pub mod checks;
pub mod reporter;

pub use cache::{IssueCache, CACHE_LIFETIME_DAYS};
pub use checks::BasicDiagnostics;
pub use reporter::{collect, report, run_if_due};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::Session;

/// How bad an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Major,
    Critical,
}

impl Severity {
    /// Major and critical issues are shown to the user, not just logged.
    pub fn is_serious(self) -> bool {
        matches!(self, Severity::Major | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Major => f.write_str("major"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// A problem with the installation and how to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remedy: Option<String>,
}

impl Issue {
    pub fn new(severity: Severity, description: impl Into<String>) -> Self {
        Self {
            severity,
            description: description.into(),
            remedy: None,
        }
    }

    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remedy = Some(remedy.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.description)?;
        if let Some(remedy) = &self.remedy {
            write!(f, " (remedy: {})", remedy)?;
        }
        Ok(())
    }
}

/// Source of issues.
pub trait DiagnosticsProvider {
    fn find_issues(&self, session: &Session) -> Vec<Issue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_remedy() {
        let issue = Issue::new(Severity::Major, "index missing").with_remedy("run maintain");
        assert_eq!(issue.to_string(), "major: index missing (remedy: run maintain)");
    }

    #[test]
    fn severity_order() {
        assert!(Severity::Critical > Severity::Major);
        assert!(Severity::Major.is_serious());
        assert!(!Severity::Warning.is_serious());
    }

    #[test]
    fn serializes_lowercase_severity() {
        let json = serde_json::to_string(&Issue::new(Severity::Critical, "x")).unwrap();
        assert_eq!(json, r#"{"severity":"critical","description":"x"}"#);
    }
}

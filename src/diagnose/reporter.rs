//! Periodic diagnosis and reporting.

use chrono::{DateTime, Utc};

use super::{DiagnosticsProvider, Issue, IssueCache, Severity};
use crate::session::Session;
use crate::shell::exe_name;
use crate::ui::UserInterface;

/// Issues for the session's scope: cached when younger than a week,
/// recomputed (and re-cached) otherwise or when `force` is set.
pub fn collect(
    session: &Session,
    provider: &dyn DiagnosticsProvider,
    now: DateTime<Utc>,
    force: bool,
) -> Vec<Issue> {
    let cache = IssueCache::new(session.paths().issues_file());
    if !force && cache.is_fresh(now) {
        match cache.load() {
            Ok(issues) => return issues,
            Err(e) => tracing::warn!("recomputing issues: {:#}", e),
        }
    }

    tracing::debug!("searching for issues");
    let issues = provider.find_issues(session);
    if let Err(e) = cache.save(&issues) {
        tracing::warn!("could not cache issues: {:#}", e);
    }
    issues
}

/// Log every issue and echo the serious ones unless `quiet`.
pub fn report(issues: &[Issue], ui: &mut dyn UserInterface, quiet: bool) {
    let exe = exe_name();
    for issue in issues {
        match issue.severity {
            Severity::Critical => tracing::error!(severity = "fatal", "{}", issue),
            Severity::Major => tracing::error!("{}", issue),
            Severity::Warning => tracing::warn!("{}", issue),
        }
        if issue.severity.is_serious() && !quiet {
            ui.error(&format!("{}: {}", exe, issue));
        }
    }
}

/// The end-of-run diagnosis.
pub fn run_if_due(
    session: &Session,
    provider: &dyn DiagnosticsProvider,
    ui: &mut dyn UserInterface,
    quiet: bool,
    now: DateTime<Utc>,
) -> Vec<Issue> {
    let issues = collect(session, provider, now, false);
    report(&issues, ui, quiet);
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayeredConfig;
    use crate::session::SessionOptions;
    use crate::ui::MockUI;
    use chrono::Duration;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct Counting {
        calls: Cell<usize>,
        issues: Vec<Issue>,
    }

    impl DiagnosticsProvider for Counting {
        fn find_issues(&self, _: &Session) -> Vec<Issue> {
            self.calls.set(self.calls.get() + 1);
            self.issues.clone()
        }
    }

    fn provider() -> Counting {
        Counting {
            calls: Cell::new(0),
            issues: vec![
                Issue::new(Severity::Critical, "helper missing"),
                Issue::new(Severity::Major, "index missing"),
                Issue::new(Severity::Warning, "never maintained"),
            ],
        }
    }

    fn session(temp: &TempDir) -> Session {
        Session::with_config(
            SessionOptions::with_roots(temp.path().join("u"), temp.path().join("c")),
            LayeredConfig::default(),
        )
    }

    #[test]
    fn recomputes_without_cache_then_reuses_it() {
        let temp = TempDir::new().unwrap();
        let s = session(&temp);
        let p = provider();
        let mut ui = MockUI::new();

        let first = run_if_due(&s, &p, &mut ui, false, Utc::now());
        let second = run_if_due(&s, &p, &mut ui, false, Utc::now());
        assert_eq!(p.calls.get(), 1);
        assert_eq!(first, second);
        assert!(s.paths().issues_file().exists());
    }

    #[test]
    fn week_old_cache_is_recomputed() {
        let temp = TempDir::new().unwrap();
        let s = session(&temp);
        let p = provider();
        let mut ui = MockUI::new();

        run_if_due(&s, &p, &mut ui, true, Utc::now());
        run_if_due(&s, &p, &mut ui, true, Utc::now() + Duration::days(8));
        assert_eq!(p.calls.get(), 2);
    }

    #[test]
    fn serious_issues_reach_the_ui() {
        let temp = TempDir::new().unwrap();
        let s = session(&temp);
        let mut ui = MockUI::new();
        run_if_due(&s, &provider(), &mut ui, false, Utc::now());
        assert_eq!(ui.errors().len(), 2);
        assert!(ui.has_error("helper missing"));
        assert!(!ui.has_error("never maintained"));
    }

    #[test]
    fn quiet_suppresses_ui() {
        let temp = TempDir::new().unwrap();
        let s = session(&temp);
        let mut ui = MockUI::new();
        run_if_due(&s, &provider(), &mut ui, true, Utc::now());
        assert!(ui.errors().is_empty());
    }

    #[test]
    fn force_skips_cache() {
        let temp = TempDir::new().unwrap();
        let s = session(&temp);
        let p = provider();
        collect(&s, &p, Utc::now(), false);
        collect(&s, &p, Utc::now(), true);
        assert_eq!(p.calls.get(), 2);
    }
}

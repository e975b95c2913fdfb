//! On-demand creation of generated files.

use std::path::Path;

use crate::config::{keys, ConfigStore, TriState};
use crate::error::{DistError, Result};
use crate::maintenance::HelperContext;
use crate::session::Session;
use crate::shell::truncate_output;

/// Output kept in the log when a make helper fails.
const MAX_LOGGED_OUTPUT: usize = 50_000;

/// What kind of file to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A memory dump for an engine, built with `--engine`.
    Format,
    /// An engine-independent base file.
    Base,
    /// A font metric file.
    FontMetric,
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fmt" | "format" => Ok(FileKind::Format),
            "base" => Ok(FileKind::Base),
            "tfm" => Ok(FileKind::FontMetric),
            other => Err(format!("unknown file kind: {}", other)),
        }
    }
}

/// Helper program and arguments for making `file` of `kind`.
///
/// Fails if the helper is not installed.
pub fn make_command(
    session: &Session,
    ctx: &HelperContext<'_>,
    enable_installer: TriState,
    file: &Path,
    kind: FileKind,
) -> Result<(std::path::PathBuf, Vec<String>)> {
    let mut args = Vec::new();
    match enable_installer {
        TriState::False => args.push("--disable-installer".to_string()),
        TriState::True => args.push("--enable-installer".to_string()),
        TriState::Unset => {}
    }
    if session.is_admin_mode() {
        args.push("--admin".to_string());
    }

    let base_name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let helper_name = match kind {
        FileKind::Format | FileKind::Base => session.helper_name(),
        FileKind::FontMetric => session
            .config()
            .value(keys::SECTION_CORE, keys::MAKE_TFM_HELPER)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| keys::DEFAULT_MAKE_TFM_HELPER.to_string()),
    };
    let helper = (ctx.find_helper)(session, &helper_name).ok_or_else(|| {
        DistError::HelperNotFound {
            name: helper_name.clone(),
        }
    })?;

    match kind {
        FileKind::Format | FileKind::Base => {
            args.extend(["formats".to_string(), "build".to_string(), base_name]);
            if kind == FileKind::Format {
                if let Some(engine) = session
                    .config()
                    .value(keys::SECTION_CORE, keys::ENGINE)
                    .filter(|e| !e.trim().is_empty())
                {
                    args.extend(["--engine".to_string(), engine]);
                }
            }
        }
        FileKind::FontMetric => args.push(base_name),
    }

    Ok((helper, args))
}

/// Try to make `file`; `Ok(false)` when the helper ran but did not succeed.
pub fn try_create_file(
    session: &Session,
    ctx: &HelperContext<'_>,
    enable_installer: TriState,
    file: &Path,
    kind: FileKind,
) -> Result<bool> {
    let (helper, args) = make_command(session, ctx, enable_installer, file, kind)?;
    tracing::info!("going to create file: {}", file.display());

    let result = match (ctx.run_helper)(&helper, &args) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("{} could not be started: {}", helper.display(), e);
            return Ok(false);
        }
    };
    if !result.success {
        tracing::error!(
            "{} did not succeed; exit code: {:?}",
            helper.display(),
            result.exit_code
        );
        tracing::error!("output:");
        tracing::error!("{}", truncate_output(result.stdout.as_bytes(), MAX_LOGGED_OUTPUT));
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLayer, LayeredConfig};
    use crate::session::SessionOptions;
    use crate::shell::CommandResult;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::time::Duration;

    fn session(engine: Option<&str>) -> Session {
        let mut layer = ConfigLayer::new("test");
        if let Some(engine) = engine {
            layer.set(keys::SECTION_CORE, keys::ENGINE, engine);
        }
        Session::with_config(
            SessionOptions::with_roots("/u", "/c"),
            LayeredConfig::from_layers(vec![layer]),
        )
    }

    #[test]
    fn format_build_arguments() {
        let ctx = HelperContext {
            find_helper: &|_, name| Some(PathBuf::from(format!("/bin/{}", name))),
            run_helper: &|_, _| unreachable!(),
            now: &Utc::now,
        };
        let (helper, args) = make_command(
            &session(Some("pdftex")),
            &ctx,
            TriState::False,
            Path::new("/tmp/latex.fmt"),
            FileKind::Format,
        )
        .unwrap();
        assert_eq!(helper, PathBuf::from("/bin/dk-util"));
        assert_eq!(
            args,
            vec!["--disable-installer", "formats", "build", "latex", "--engine", "pdftex"]
        );
    }

    #[test]
    fn font_metric_uses_its_own_helper() {
        let ctx = HelperContext {
            find_helper: &|_, name| Some(PathBuf::from(format!("/bin/{}", name))),
            run_helper: &|_, _| unreachable!(),
            now: &Utc::now,
        };
        let (helper, args) = make_command(
            &session(None),
            &ctx,
            TriState::Unset,
            Path::new("cmr10.tfm"),
            FileKind::FontMetric,
        )
        .unwrap();
        assert_eq!(helper, PathBuf::from("/bin/dk-maketfm"));
        assert_eq!(args, vec!["cmr10"]);
    }

    #[test]
    fn missing_helper_is_an_error() {
        let ctx = HelperContext {
            find_helper: &|_, _| None,
            run_helper: &|_, _| unreachable!(),
            now: &Utc::now,
        };
        let err = try_create_file(
            &session(None),
            &ctx,
            TriState::Unset,
            Path::new("plain.base"),
            FileKind::Base,
        )
        .unwrap_err();
        assert!(matches!(err, DistError::HelperNotFound { .. }));
    }

    #[test]
    fn helper_exit_code_decides() {
        let calls = RefCell::new(Vec::new());
        let exit = RefCell::new(0);
        let run = |program: &Path, args: &[String]| {
            calls
                .borrow_mut()
                .push((program.to_path_buf(), args.to_vec()));
            let code = *exit.borrow();
            Ok(if code == 0 {
                CommandResult::success(String::new(), String::new(), Duration::ZERO)
            } else {
                CommandResult::failure(Some(code), "boom".into(), String::new(), Duration::ZERO)
            })
        };
        let ctx = HelperContext {
            find_helper: &|_, name| Some(PathBuf::from(name)),
            run_helper: &run,
            now: &Utc::now,
        };
        let s = session(None);
        let base = Path::new("x.base");
        assert!(try_create_file(&s, &ctx, TriState::Unset, base, FileKind::Base).unwrap());
        *exit.borrow_mut() = 1;
        assert!(!try_create_file(&s, &ctx, TriState::Unset, base, FileKind::Base).unwrap());
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("fmt".parse::<FileKind>().unwrap(), FileKind::Format);
        assert_eq!("tfm".parse::<FileKind>().unwrap(), FileKind::FontMetric);
        assert!("png".parse::<FileKind>().is_err());
    }
}

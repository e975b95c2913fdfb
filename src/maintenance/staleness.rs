//! Decides which derived artifacts are out of date.
//!
//! [`StalenessInputs::collect`] does all the I/O; [`evaluate`] is a pure
//! function of the collected timestamps and the scope.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::{keys, ConfigStore};
use crate::session::{Scope, Session};

/// Point in time used for staleness comparisons.
pub type Timestamp = DateTime<Utc>;

/// True iff `derived` is missing or strictly older than `source`.
///
/// Equal timestamps are fresh. A missing source never makes a present
/// artifact stale.
pub fn needs_refresh(source: Option<Timestamp>, derived: Option<Timestamp>) -> bool {
    match (source, derived) {
        (_, None) => true,
        (Some(source), Some(derived)) => source > derived,
        (None, Some(_)) => false,
    }
}

/// Modification time of `path`, or `None` if it does not exist.
pub fn modified(path: &Path) -> Option<Timestamp> {
    let meta = fs::metadata(path).ok()?;
    match meta.modified() {
        Ok(time) => Some(DateTime::<Utc>::from(time)),
        Err(e) => {
            tracing::debug!("no modification time for {}: {}", path.display(), e);
            None
        }
    }
}

/// Everything the oracle looks at.
///
/// `None` for an artifact means it does not exist; `None` for a
/// configuration timestamp means "never".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StalenessInputs {
    pub last_admin_maintenance: Option<Timestamp>,
    pub last_admin_catalog_update: Option<Timestamp>,
    pub index_modified: Option<Timestamp>,
    pub user_language_dat_modified: Option<Timestamp>,
    pub user_languages_ini_modified: Option<Timestamp>,
    pub user_manifest_modified: Option<Timestamp>,
}

impl StalenessInputs {
    /// Read timestamps from the session's configuration and file system.
    pub fn collect(session: &Session) -> Self {
        let config = session.config();
        let paths = session.paths();
        Self {
            last_admin_maintenance: config
                .timestamp(keys::SECTION_CORE, keys::LAST_ADMIN_MAINTENANCE),
            last_admin_catalog_update: config
                .timestamp(keys::SECTION_MPM, keys::LAST_ADMIN_UPDATE_DB),
            index_modified: modified(&paths.index_file()),
            user_language_dat_modified: modified(&paths.user_language_dat()),
            user_languages_ini_modified: modified(&paths.user_languages_ini()),
            user_manifest_modified: modified(&paths.user_package_manifest()),
        }
    }
}

/// One flag per class of derived artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Staleness {
    pub file_index: bool,
    pub font_language: bool,
    pub catalog: bool,
}

impl Staleness {
    pub fn any(&self) -> bool {
        self.file_index || self.font_language || self.catalog
    }
}

/// Decide which classes need a refresh.
///
/// In admin scope only a missing index counts. In user scope the shared
/// installation's maintenance time is compared against the user's own
/// artifacts; a class whose artifact the user has no private copy of is
/// never stale, since the shared copy is used instead.
pub fn evaluate(inputs: &StalenessInputs, scope: Scope) -> Staleness {
    match scope {
        Scope::Admin => Staleness {
            file_index: inputs.index_modified.is_none(),
            font_language: false,
            catalog: false,
        },
        Scope::User => {
            let font_language = inputs.user_language_dat_modified.is_some()
                && (needs_refresh(
                    inputs.last_admin_maintenance,
                    inputs.user_language_dat_modified,
                ) || needs_refresh(
                    inputs.user_languages_ini_modified,
                    inputs.user_language_dat_modified,
                ));
            let catalog = inputs.user_manifest_modified.is_some()
                && needs_refresh(
                    inputs.last_admin_catalog_update,
                    inputs.user_manifest_modified,
                );
            Staleness {
                file_index: needs_refresh(inputs.last_admin_maintenance, inputs.index_modified),
                font_language,
                catalog,
            }
        }
    }
}

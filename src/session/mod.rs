//! The explicit process context.
//!
//! A [`Session`] is created once per process and passed by reference to
//! every component that needs the installation scope, the special paths or
//! the configuration. There is no global lookup.
//!
//! # Example
//!
//! ```
//! use distkeeper::config::LayeredConfig;
//! use distkeeper::session::{Scope, Session, SessionOptions};
//!
//! let options = SessionOptions::with_roots("/tmp/dk-user", "/tmp/dk-common");
//! let mut session = Session::with_config(options, LayeredConfig::default());
//! assert_eq!(session.scope(), Scope::User);
//!
//! {
//!     let guard = session.elevate_scoped();
//!     assert!(guard.is_admin_mode());
//! }
//! assert!(!session.is_admin_mode());
//! ```

mod cancel;
mod context;
mod options;
mod paths;

pub use cancel::{install_signal_handlers, CancelFlag};
pub use context::{AdminModeGuard, Scope, Session};
pub use options::SessionOptions;
pub use paths::SpecialPaths;

//! Keeping derived artifacts in sync with the installation.
//!
//! - [`staleness`] decides which artifact classes are out of date
//! - [`MaintenanceLock`] keeps concurrent processes from refreshing at once
//! - [`RefreshLedger`] remembers per-step failures so they are retried
//! - [`MaintenanceCoordinator`] plans and runs the refresh steps
//!
//! # Example
//!
//! ```
//! use distkeeper::maintenance::{plan, RefreshLedger, RefreshStep, StalenessInputs};
//! use distkeeper::session::Scope;
//!
//! // No index at all: rebuild it, then the font maps.
//! let p = plan(&StalenessInputs::default(), Scope::Admin, &RefreshLedger::default());
//! assert_eq!(p.steps, vec![RefreshStep::RefreshIndex, RefreshStep::ConfigureFontMaps]);
//! ```

pub mod coordinator;
pub mod ledger;
pub mod lock;
pub mod staleness;

pub use coordinator::{
    default_context, helper_args, plan, HelperContext, MaintenanceCoordinator,
    MaintenanceOutcome, MaintenancePlan, StepOutcome,
};
pub use ledger::{RefreshLedger, RefreshStep, StepRecord};
pub use lock::MaintenanceLock;
pub use staleness::{evaluate, needs_refresh, Staleness, StalenessInputs, Timestamp};

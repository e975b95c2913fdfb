//! Configuration values consumed by the runtime coordinator.
//!
//! This module handles:
//! - The [`TriState`] policy flag in [`tristate`]
//! - Well-known section/key names in [`keys`]
//! - Layered lookup (environment, user, common) in [`layers`]
//!
//! # Example
//!
//! ```
//! use distkeeper::config::{keys, ConfigLayer, ConfigStore, LayeredConfig, TriState};
//!
//! let mut common = ConfigLayer::new("common");
//! common.set(keys::SECTION_MPM, keys::AUTO_INSTALL, "t");
//!
//! let config = LayeredConfig::from_layers(vec![common]);
//! assert_eq!(config.tri_state(keys::SECTION_MPM, keys::AUTO_INSTALL), TriState::True);
//! assert_eq!(config.tri_state(keys::SECTION_MPM, keys::AUTO_ADMIN), TriState::Unset);
//! ```
//!
//! # Configuration File Locations
//!
//! Layers are consulted highest priority first:
//! 1. Environment overrides (`DISTKEEPER_<SECTION>_<KEY>`)
//! 2. User config (`<user root>/config/config.yml`, user scope only)
//! 3. Common config (`<common root>/config/config.yml`)

pub mod keys;
pub mod layers;
pub mod tristate;

pub use layers::{load_layer_file, parse_layer, ConfigLayer, ConfigStore, LayeredConfig};
pub use tristate::TriState;

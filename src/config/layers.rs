//! Layered configuration lookup.
//!
//! A [`ConfigLayer`] is one source of `section.key = value` pairs (a YAML
//! file or the environment). [`LayeredConfig`] consults its layers in
//! priority order and returns the first hit.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::keys::ENV_PREFIX;
use crate::config::TriState;
use crate::error::{DistError, Result};

/// Read access to configuration values.
///
/// Only `value` is required; the typed accessors are derived from it.
pub trait ConfigStore {
    /// Raw string value for `section.key`, if any layer defines it.
    fn value(&self, section: &str, key: &str) -> Option<String>;

    /// Tri-state value; missing or unparsable values are `Unset`.
    fn tri_state(&self, section: &str, key: &str) -> TriState {
        match self.value(section, key) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("ignoring {}.{}: {}", section, key, e);
                TriState::Unset
            }),
            None => TriState::Unset,
        }
    }

    /// Timestamp value, as unix seconds or RFC 3339.
    ///
    /// `0`, an empty value, or a missing key all mean "never".
    fn timestamp(&self, section: &str, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.value(section, key)?;
        parse_timestamp(&raw)
    }

    /// Boolean value; anything but an explicit true is false.
    fn flag(&self, section: &str, key: &str) -> bool {
        self.tri_state(section, key).or(false)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(secs) = raw.parse::<i64>() {
        if secs <= 0 {
            return None;
        }
        return Utc.timestamp_opt(secs, 0).single();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("ignoring malformed timestamp {:?}: {}", raw, e);
            None
        }
    }
}

/// One source of configuration values.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    /// Values by section, then key.
    pub values: BTreeMap<String, BTreeMap<String, String>>,
    /// Source of this layer (for debugging).
    pub source: String,
}

impl ConfigLayer {
    /// Create an empty layer with the given source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            values: BTreeMap::new(),
            source: source.into(),
        }
    }

    /// Set a value in this layer.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.values
            .entry(section.to_lowercase())
            .or_default()
            .insert(key.to_lowercase(), value.into());
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.values
            .get(&section.to_lowercase())
            .and_then(|s| s.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeMap::is_empty)
    }

    /// Build a layer from `DISTKEEPER_<SECTION>_<KEY>` variables.
    ///
    /// The section is the first underscore-separated word after the prefix.
    pub fn from_env_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::new("environment");
        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if let Some((section, key)) = rest.split_once('_') {
                if !section.is_empty() && !key.is_empty() {
                    layer.set(section, key, value);
                }
            }
        }
        layer
    }

    /// Build a layer from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_vars(std::env::vars())
    }
}

/// Parse YAML content into a layer.
///
/// The document is a map of sections, each a map of scalar values:
///
/// ```yaml
/// core:
///   last_admin_maintenance: 1700000000
/// mpm:
///   autoinstall: t
/// ```
pub fn parse_layer(content: &str, source_path: &Path) -> Result<ConfigLayer> {
    let parse_err = |message: String| DistError::ConfigParseError {
        path: source_path.to_path_buf(),
        message,
    };

    let mut layer = ConfigLayer::new(source_path.display().to_string());
    if content.trim().is_empty() {
        return Ok(layer);
    }

    let doc: BTreeMap<String, BTreeMap<String, serde_yaml::Value>> =
        serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;

    for (section, entries) in doc {
        for (key, value) in entries {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Null => String::new(),
                other => {
                    return Err(parse_err(format!(
                        "{}.{} must be a scalar, found {:?}",
                        section, key, other
                    )))
                }
            };
            layer.set(&section, &key, text);
        }
    }

    Ok(layer)
}

/// Load a YAML layer from disk; a missing file yields `None`.
pub fn load_layer_file(path: &Path) -> Result<Option<ConfigLayer>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DistError::Io(e)),
    };
    parse_layer(&content, path).map(Some)
}

/// Configuration assembled from layers, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<ConfigLayer>,
}

impl LayeredConfig {
    pub fn from_layers(layers: Vec<ConfigLayer>) -> Self {
        Self { layers }
    }

    /// Load the standard layers: environment, then each existing file.
    ///
    /// `files` must be ordered highest priority first.
    pub fn load(env: ConfigLayer, files: &[&Path]) -> Result<Self> {
        let mut layers = vec![env];
        for path in files {
            if let Some(layer) = load_layer_file(path)? {
                tracing::debug!("loaded config layer {}", path.display());
                layers.push(layer);
            }
        }
        Ok(Self { layers })
    }

    /// Sources of all layers, in lookup order.
    pub fn sources(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.source.as_str()).collect()
    }

    /// Name of the layer that answers `section.key`.
    pub fn source_of(&self, section: &str, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|l| l.get(section, key).is_some())
            .map(|l| l.source.as_str())
    }
}

impl ConfigStore for LayeredConfig {
    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|l| l.get(section, key))
            .map(str::to_string)
    }
}

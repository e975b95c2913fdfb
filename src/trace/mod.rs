//! Diagnostic trace events and the pre-init buffer.
//!
//! Components emit [`TraceEntry`] values through a [`TraceRouter`]. Until
//! the logging sink is configured the router keeps them in a bounded
//! [`TraceBuffer`]; once [`TraceRouter::flush_on_ready`] installs a sink,
//! the buffer is drained once and bypassed from then on.

pub mod buffer;
pub mod router;

pub use buffer::{TraceBuffer, MAX_PENDING};
pub use router::{TraceRouter, TraceSink, TracingSink};

use chrono::{DateTime, Utc};
use std::fmt;

/// Severity of a trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    Fatal,
    Error,
    Warning,
    Info,
    Trace,
    Debug,
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TraceLevel::Fatal => "FATAL",
            TraceLevel::Error => "ERROR",
            TraceLevel::Warning => "WARN",
            TraceLevel::Info => "INFO",
            TraceLevel::Trace => "TRACE",
            TraceLevel::Debug => "DEBUG",
        };
        f.write_str(s)
    }
}

/// A diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Component that produced the event (`session`, `config`, ...).
    pub facility: String,
    pub level: TraceLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TraceEntry {
    /// Create an entry stamped with the current time.
    pub fn new(facility: impl Into<String>, level: TraceLevel, message: impl Into<String>) -> Self {
        Self {
            facility: facility.into(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.facility,
            self.message
        )
    }
}

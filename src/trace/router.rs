//! Two-phase trace routing: buffer first, then a configured sink.

use std::cell::OnceCell;

use super::{TraceBuffer, TraceEntry, TraceLevel};

const TARGET: &str = "distkeeper::trace";

/// Destination for trace entries once logging is configured.
pub trait TraceSink {
    fn write(&mut self, entry: &TraceEntry);
}

/// Sink that forwards entries to `tracing`.
///
/// `tracing` has no fatal level; fatal entries are emitted at error level
/// with `severity = "fatal"`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn write(&mut self, entry: &TraceEntry) {
        let facility = entry.facility.as_str();
        let message = entry.message.as_str();
        match entry.level {
            TraceLevel::Fatal => {
                tracing::error!(target: TARGET, facility, severity = "fatal", "{}", message)
            }
            TraceLevel::Error => tracing::error!(target: TARGET, facility, "{}", message),
            TraceLevel::Warning => tracing::warn!(target: TARGET, facility, "{}", message),
            TraceLevel::Info => tracing::info!(target: TARGET, facility, "{}", message),
            TraceLevel::Trace => tracing::trace!(target: TARGET, facility, "{}", message),
            TraceLevel::Debug => tracing::debug!(target: TARGET, facility, "{}", message),
        }
    }
}

/// Routes trace entries to a pending buffer until a sink is installed.
///
/// The sink lives in a `OnceCell`: installing it is a single assignment
/// that can happen at most once, after which the buffer is never used again.
#[derive(Default)]
pub struct TraceRouter {
    pending: TraceBuffer,
    sink: OnceCell<Box<dyn TraceSink>>,
}

impl TraceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, buffering it if no sink is installed yet.
    pub fn record(&mut self, entry: TraceEntry) {
        match self.sink.get_mut() {
            Some(sink) => sink.write(&entry),
            None => self.pending.record(entry),
        }
    }

    /// Shorthand for recording a freshly stamped entry.
    pub fn trace(&mut self, facility: &str, level: TraceLevel, message: impl Into<String>) {
        self.record(TraceEntry::new(facility, level, message));
    }

    /// Install `sink` and drain pending entries into it in arrival order.
    ///
    /// Returns `false` (and drops `sink`) if a sink was already installed.
    pub fn flush_on_ready(&mut self, sink: Box<dyn TraceSink>) -> bool {
        if self.sink.set(sink).is_err() {
            return false;
        }
        let pending = self.pending.drain();
        if self.pending.discarded() > 0 {
            tracing::debug!(
                "{} pre-init trace entries were dropped on overflow",
                self.pending.discarded()
            );
        }
        if let Some(sink) = self.sink.get_mut() {
            for entry in &pending {
                sink.write(entry);
            }
        }
        true
    }

    pub fn is_ready(&self) -> bool {
        self.sink.get().is_some()
    }

    /// Number of entries waiting for a sink.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for TraceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceRouter")
            .field("pending", &self.pending.len())
            .field("ready", &self.is_ready())
            .finish()
    }
}

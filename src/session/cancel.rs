//! Cooperative cancellation.
//!
//! SIGINT and SIGTERM only set an atomic flag; long operations poll it at
//! their start via [`CancelFlag::check`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::{DistError, Result};

/// Flag the signal handler writes to. Bound once per process.
static SIGNAL_TARGET: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    inner: Arc<AtomicBool>,
}

impl CancelFlag {
    /// A fresh flag not connected to any signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// The flag that [`install_signal_handlers`] writes to.
    pub fn process() -> Self {
        Self {
            inner: Arc::clone(SIGNAL_TARGET.get_or_init(|| Arc::new(AtomicBool::new(false)))),
        }
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// Checkpoint: fail with [`DistError::Cancelled`] once cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(DistError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(unix)]
extern "C" fn on_signal(_signal: libc::c_int) {
    // Only async-signal-safe work here: no I/O, no allocation.
    // SAFETY: signal() is async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_IGN);
    }
    if let Some(flag) = SIGNAL_TARGET.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

/// Route SIGINT and SIGTERM to [`CancelFlag::process`].
///
/// A handler that someone else installed before us is left in place.
/// Failure to install is an environment error the caller should treat as fatal.
#[cfg(unix)]
pub fn install_signal_handlers() -> Result<CancelFlag> {
    let flag = CancelFlag::process();
    for signal in [libc::SIGINT, libc::SIGTERM] {
        install_one(signal)?;
    }
    Ok(flag)
}

#[cfg(unix)]
fn install_one(signal: libc::c_int) -> Result<()> {
    let handler = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    // SAFETY: on_signal only performs async-signal-safe operations.
    let previous = unsafe { libc::signal(signal, handler) };
    if previous == libc::SIG_ERR {
        return Err(DistError::SignalHandler {
            signal,
            message: std::io::Error::last_os_error().to_string(),
        });
    }
    if previous != libc::SIG_DFL {
        // SAFETY: restoring the handler that was just returned to us.
        if unsafe { libc::signal(signal, previous) } == libc::SIG_ERR {
            return Err(DistError::SignalHandler {
                signal,
                message: std::io::Error::last_os_error().to_string(),
            });
        }
        tracing::debug!("keeping existing handler for signal {}", signal);
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install_signal_handlers() -> Result<CancelFlag> {
    Ok(CancelFlag::process())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_flag_passes_checkpoint() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        assert!(flag.check().is_ok());
    }

    #[test]
    fn cancelled_flag_fails_checkpoint() {
        let flag = CancelFlag::new();
        flag.cancel();
        assert!(matches!(flag.check(), Err(DistError::Cancelled)));
    }

    #[test]
    fn clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        other.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn process_flag_is_shared() {
        let a = CancelFlag::process();
        let b = CancelFlag::process();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert!(!Arc::ptr_eq(&a.inner, &CancelFlag::new().inner));
    }

    #[test]
    fn installing_handlers_succeeds() {
        let flag = install_signal_handlers().unwrap();
        assert!(Arc::ptr_eq(&flag.inner, &CancelFlag::process().inner));
    }
}

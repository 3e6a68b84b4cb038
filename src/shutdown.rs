//! Process-wide shutdown coordination.
//! Provides a flag set by the ctrlc handler so the executor can stop before the next group,
//! and a marker telling the handler that the process is blocked on a confirmation prompt.
//!
//! Notes:
//! - Relaxed atomics are sufficient for one-way flags.
//! - `request()` is safe to call from signal handlers.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static PROMPTING: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

/// Check whether a shutdown has been requested.
#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// True while a confirmation prompt is waiting on the terminal.
#[inline]
pub fn is_prompting() -> bool {
    PROMPTING.load(Ordering::Relaxed)
}

/// Marks the prompt as active until the guard is dropped.
pub struct PromptGuard(());

impl PromptGuard {
    pub fn enter() -> Self {
        PROMPTING.store(true, Ordering::Relaxed);
        PromptGuard(())
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        PROMPTING.store(false, Ordering::Relaxed);
    }
}

/// Test-only: clear both flags.
#[cfg(test)]
#[inline]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
    PROMPTING.store(false, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn prompt_guard_clears_on_drop() {
        reset();
        {
            let _g = PromptGuard::enter();
            assert!(is_prompting());
        }
        assert!(!is_prompting());
    }
}

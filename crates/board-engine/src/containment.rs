//! Panic containment for host callbacks
//!
//! Event sinks and render hooks are host code running on the editor's
//! thread. A bug there must not take down a mutation that has already
//! committed, so the editor runs every callback through [`contained`]:
//! a panicking callback is reported and skipped, and the editor keeps
//! functioning. Hosts that surface a retry affordance can use
//! [`contained_with_retry`] at their own boundary.

use std::panic::{self, AssertUnwindSafe};

/// Run a host callback, catching any panic
///
/// Returns `None` when the callback panicked; the panic payload is
/// logged under the given label.
pub fn contained<T>(label: &str, callback: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(value) => Some(value),
        Err(payload) => {
            log::error!("Contained panic in {}: {}", label, panic_message(&payload));
            None
        }
    }
}

/// Run a host callback, retrying after contained panics
///
/// Makes up to `attempts` calls and returns the first non-panicking
/// result, or `None` when every attempt panicked.
pub fn contained_with_retry<T>(
    label: &str,
    attempts: usize,
    mut callback: impl FnMut() -> T,
) -> Option<T> {
    for attempt in 1..=attempts.max(1) {
        match panic::catch_unwind(AssertUnwindSafe(&mut callback)) {
            Ok(value) => return Some(value),
            Err(payload) => {
                log::warn!(
                    "Contained panic in {} (attempt {}/{}): {}",
                    label,
                    attempt,
                    attempts.max(1),
                    panic_message(&payload)
                );
            }
        }
    }
    None
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

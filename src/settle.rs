//! One-shot callback cells shared between engagement paths.
//!
//! Several combinators hand the same terminal callback to more than one code
//! path (a failure forwarder and a success continuation, or N sibling
//! failure callbacks). Exactly one path is allowed to fire it. `OnceCallback`
//! is that guard: the first `invoke` consumes the callback, every later
//! `invoke` is dropped.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::tracing_compat::trace;

/// A shareable, single-fire wrapper around a boxed `FnOnce` callback.
///
/// Clones share the same slot. The callback runs at most once across all
/// clones; duplicate invocations are silently dropped (and traced when the
/// `tracing-integration` feature is enabled).
pub(crate) struct OnceCallback<T> {
    slot: Arc<Mutex<Option<Box<dyn FnOnce(T) + Send>>>>,
}

impl<T> Clone for OnceCallback<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> OnceCallback<T> {
    pub(crate) fn new(callback: Box<dyn FnOnce(T) + Send>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(callback))),
        }
    }

    /// Fires the callback if no clone has fired it yet.
    ///
    /// The slot lock is released before the callback runs, so a callback may
    /// re-enter other settle cells without deadlocking.
    pub(crate) fn invoke(&self, value: T) {
        let callback = self.slot.lock().take();
        match callback {
            Some(callback) => callback(value),
            None => trace!("duplicate settle dropped by once-guard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fires_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let cell = OnceCallback::new(Box::new(move |v: u32| {
            assert_eq!(v, 7);
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let clone = cell.clone();
        cell.invoke(7);
        clone.invoke(99);
        cell.invoke(99);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clones_share_one_slot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let cell = OnceCallback::new(Box::new(move |_: &str| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let clones: Vec<_> = (0..4).map(|_| cell.clone()).collect();
        for clone in &clones {
            clone.invoke("x");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

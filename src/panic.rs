//! Panic payload capture.
//!
//! Panics in user-supplied actions unwind through [`Future::engage`] by
//! default: the crate installs no hidden `catch_unwind`. The one place a
//! panic crosses into the failure channel is the explicit
//! [`Future::catch_panics`] boundary, which captures the unwind payload as a
//! [`PanicPayload`] and delivers it through the engaged failure callback.
//!
//! [`Future::engage`]: crate::Future::engage
//! [`Future::catch_panics`]: crate::Future::catch_panics

use std::any::Any;

use thiserror::Error;

/// Payload from a caught panic.
///
/// This wraps the panic value for safe transport across the failure channel.
/// Only the message survives: unwind payloads are `Box<dyn Any>` and cannot
/// be cloned, so anything that is not a `String` or `&str` is reduced to a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("panic: {message}")]
pub struct PanicPayload {
    message: String,
}

impl PanicPayload {
    /// Creates a new panic payload with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts a payload from the boxed value produced by
    /// `std::panic::catch_unwind`.
    #[must_use]
    pub fn from_unwind(payload: Box<dyn Any + Send>) -> Self {
        if let Some(message) = payload.downcast_ref::<&str>() {
            return Self::new(*message);
        }
        match payload.downcast::<String>() {
            Ok(message) => Self::new(*message),
            Err(_) => Self::new("opaque panic payload"),
        }
    }

    /// Returns the panic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

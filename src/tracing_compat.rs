//! Tracing compatibility layer for engagement diagnostics.
//!
//! This module provides a unified interface for tracing that works whether or
//! not the `tracing-integration` feature is enabled:
//!
//! - **With feature enabled**: re-exports from the `tracing` crate.
//! - **Without feature**: no-op macros that compile to nothing.
//!
//! The crate emits only low-frequency diagnostic events (dropped duplicate
//! settles, engagement fan-out counts), so the disabled form is the default.
//!
//! # Usage
//!
//! ```rust,ignore
//! use futura::tracing_compat::{debug, trace};
//!
//! // These compile to no-ops when tracing-integration is disabled
//! debug!(operands = 2, "engaging gather pair");
//! trace!("duplicate settle dropped");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, trace};

// When tracing is disabled, provide no-op macros.
#[cfg(not(feature = "tracing-integration"))]
mod noop {
    //! No-op implementations when tracing is disabled.
    //!
    //! These macros expand to nothing, ensuring zero compile-time and runtime
    //! cost.

    /// No-op trace-level logging macro.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {
            ()
        };
    }

    /// No-op debug-level logging macro.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {
            ()
        };
    }

    // Re-export the macros at module level.
    pub use crate::{debug, trace};
}

#[cfg(not(feature = "tracing-integration"))]
pub use noop::*;

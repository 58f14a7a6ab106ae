//! Futura: lazy, composable two-channel futures with deterministic engagement.
//!
//! # Overview
//!
//! Futura is built around a single abstraction: [`Future<L, R>`], a deferred
//! computation that either fails with an `L` or succeeds with an `R`.
//! Construction never runs anything. Work begins only when a future is
//! explicitly *engaged* with a failure callback and a success callback, which
//! makes the moment of execution a visible, deterministic act rather than a
//! side effect of creation.
//!
//! # Core Guarantees
//!
//! - **Laziness**: building a future, or deriving one through a combinator,
//!   performs no work; only [`Future::engage`] (or the `.await` bridge) does
//! - **Re-engageability**: a future is immutable and stateless between
//!   engagements; engaging it twice yields two independent executions
//! - **Deterministic initiation order**: parallel combinators engage their
//!   operands synchronously in program order, left to right
//! - **First-failure-wins**: among concurrently engaged operands, only the
//!   first failure is reported; late sibling callbacks are dropped by a
//!   one-shot settle guard
//! - **No hidden cancellation**: a failing operand never aborts its siblings;
//!   they run to completion and their outcomes are discarded
//!
//! # Module Structure
//!
//! - [`future`]: the `Future` type, its constructors, and sequential
//!   combinators (`map`, `flat_map`, `handle_with`, `error_map`)
//! - [`combinator`]: parallel composition (`gather2`..`gather4`, `all`,
//!   `all_keyed`)
//! - [`panic`](mod@panic): panic payload capture for the opt-in
//!   [`Future::catch_panics`] boundary
//! - [`tracing_compat`]: optional tracing integration (requires the
//!   `tracing-integration` feature)
//!
//! # Quick Example
//!
//! ```
//! use futura::Future;
//!
//! let chain = Future::<String, i32>::of(3)
//!     .map(|x| x + 1)
//!     .flat_map(|x| Future::of(x * 2));
//!
//! // Nothing has run yet. Engage to execute.
//! assert_eq!(chain.wait(), Ok(8));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]

pub mod combinator;
pub mod future;
pub mod panic;
pub mod tracing_compat;

mod settle;

pub use combinator::{all, all_keyed, gather2, gather3, gather4};
pub use future::{Engaged, Future, OnDone, OnFail};
pub use panic::PanicPayload;

//! Parallel composition of lazy futures.
//!
//! This module provides the parallel combinators:
//!
//! - [`gather2`]: engage two futures concurrently, combine into a pair
//! - [`gather3`] / [`gather4`]: nested pairwise compositions of `gather2`
//! - [`all`]: engage an ordered list, collect results by input index
//! - [`all_keyed`]: engage a keyed map, collect results under their keys
//!
//! "Parallel" means *concurrently initiated*: every operand's action is
//! invoked, synchronously and in program order, before the combinator waits
//! on any completion. Real overlap comes from actions that settle from
//! timers, threads, or other drivers of their own. None of the combinators
//! cancel anything: after a failure wins, siblings keep running and their
//! late callbacks are dropped by the one-shot settle guard.

mod all;
mod gather;

pub use all::{all, all_keyed};
pub use gather::{gather2, gather3, gather4};

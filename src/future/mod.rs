//! The lazy two-channel future type.
//!
//! A [`Future<L, R>`] is a description of work that, once engaged, delivers
//! exactly one of two outcomes to caller-supplied callbacks: a failure `L` or
//! a success `R`. The action never runs at construction time, and a future
//! carries no state between engagements, so the same value can be engaged any
//! number of times, each run independent of the others.
//!
//! # The two-callback contract
//!
//! An action receives a `fail` and a `succeed` callback and must call exactly
//! one of them exactly once. The crate does not police violations: where a
//! combinator owns a settle guard (parallel composition, the shared failure
//! forwarder in [`Future::flat_map`]) duplicate calls are dropped, but an
//! action that calls both callbacks, or neither, is a caller bug and
//! downstream behavior is unspecified.
//!
//! # Failure signalling
//!
//! Fallible user code signals failure by returning `Err` (`try_fn`,
//! `encase`, `try_map`, `from_async`) or by calling `fail` directly inside an
//! action. Panics unwind through every engagement layer; the single place a
//! panic is converted into the failure channel is the explicit
//! [`Future::catch_panics`] boundary.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::panic::PanicPayload;
use crate::settle::OnceCallback;

mod bridge;

pub use bridge::Engaged;

/// Boxed failure callback handed to an action on engagement.
pub type OnFail<L> = Box<dyn FnOnce(L) + Send>;

/// Boxed success callback handed to an action on engagement.
pub type OnDone<R> = Box<dyn FnOnce(R) + Send>;

/// A lazy computation that fails with `L` or succeeds with `R`.
///
/// The future's identity is fully determined by its action; no other state
/// exists. Cloning is cheap (the action is reference-counted) and clones are
/// indistinguishable from the original.
#[must_use = "futures do nothing unless engaged"]
pub struct Future<L, R> {
    action: Arc<dyn Fn(OnFail<L>, OnDone<R>) + Send + Sync>,
}

impl<L, R> Clone for Future<L, R> {
    fn clone(&self) -> Self {
        Self {
            action: Arc::clone(&self.action),
        }
    }
}

impl<L, R> std::fmt::Debug for Future<L, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Future").finish_non_exhaustive()
    }
}

impl<L, R> Future<L, R>
where
    L: Send + 'static,
    R: Send + 'static,
{
    /// Creates a future from a raw action.
    ///
    /// The action is stored, never invoked. It must call exactly one of the
    /// two callbacks exactly once per engagement, possibly from another
    /// thread and possibly after `new` and `engage` have long returned.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(OnFail<L>, OnDone<R>) + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
        }
    }

    /// Starts one execution of this future.
    ///
    /// Each call is an independent engagement: the action runs again from
    /// scratch with the freshly supplied callbacks.
    pub fn engage<F, S>(&self, fail: F, succeed: S)
    where
        F: FnOnce(L) + Send + 'static,
        S: FnOnce(R) + Send + 'static,
    {
        (self.action)(Box::new(fail), Box::new(succeed));
    }

    /// An always-succeeding future.
    ///
    /// `Clone` is required because every engagement delivers its own copy of
    /// the value.
    pub fn of(value: R) -> Self
    where
        R: Clone + Sync,
    {
        Self::new(move |_fail, succeed| succeed(value.clone()))
    }

    /// An always-failing future.
    pub fn reject(error: L) -> Self
    where
        L: Clone + Sync,
    {
        Self::new(move |fail, _succeed| fail(error.clone()))
    }

    /// Wraps a synchronous fallible call.
    ///
    /// Engagement calls `f` and routes `Ok` to the success callback and
    /// `Err` to the failure callback.
    pub fn try_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<R, L> + Send + Sync + 'static,
    {
        Self::new(move |fail, succeed| match f() {
            Ok(value) => succeed(value),
            Err(error) => fail(error),
        })
    }

    /// Wraps a synchronous fallible call applied to a captured argument.
    ///
    /// `encase(f, arg)` is equivalent to `try_fn(move || f(arg.clone()))`.
    pub fn encase<A, F>(f: F, arg: A) -> Self
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A) -> Result<R, L> + Send + Sync + 'static,
    {
        Self::try_fn(move || f(arg.clone()))
    }

    /// Wraps a producer of a standard library future.
    ///
    /// Engagement calls `make` and drives the produced future to completion
    /// on the engaging thread, then dispatches its `Result` to the
    /// callbacks. Overlap between siblings engaged by a parallel combinator
    /// therefore comes from the actions themselves, not from this adapter.
    pub fn from_async<F, Fut>(make: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<R, L>>,
    {
        Self::new(move |fail, succeed| match futures_lite::future::block_on(make()) {
            Ok(value) => succeed(value),
            Err(error) => fail(error),
        })
    }

    /// Transforms the success value; failures pass through untouched.
    ///
    /// The mapper runs on the success channel of the same engagement, so a
    /// panic inside it unwinds exactly like a panic in the action itself.
    pub fn map<R2, F>(self, mapper: F) -> Future<L, R2>
    where
        R2: Send + 'static,
        F: Fn(R) -> R2 + Send + Sync + 'static,
    {
        let mapper = Arc::new(mapper);
        Future::new(move |fail, succeed| {
            let mapper = Arc::clone(&mapper);
            self.engage(fail, move |value| succeed(mapper(value)));
        })
    }

    /// Transforms the success value through a fallible mapper.
    ///
    /// `Err` from the mapper is delivered on the failure channel, exactly as
    /// if the original action had failed there.
    pub fn try_map<R2, F>(self, mapper: F) -> Future<L, R2>
    where
        R2: Send + 'static,
        F: Fn(R) -> Result<R2, L> + Send + Sync + 'static,
    {
        let mapper = Arc::new(mapper);
        Future::new(move |fail, succeed| {
            let mapper = Arc::clone(&mapper);
            let fail = OnceCallback::new(fail);
            let forward = fail.clone();
            self.engage(
                move |error| fail.invoke(error),
                move |value| match mapper(value) {
                    Ok(mapped) => succeed(mapped),
                    Err(error) => forward.invoke(error),
                },
            );
        })
    }

    /// Sequential composition: on success, engages the future produced by
    /// `next`; on failure, forwards the failure and never calls `next`.
    pub fn flat_map<R2, F>(self, next: F) -> Future<L, R2>
    where
        R2: Send + 'static,
        F: Fn(R) -> Future<L, R2> + Send + Sync + 'static,
    {
        let next = Arc::new(next);
        Future::new(move |fail, succeed| {
            let next = Arc::clone(&next);
            let fail = OnceCallback::new(fail);
            let forward = fail.clone();
            self.engage(
                move |error| fail.invoke(error),
                move |value| {
                    next(value).engage(move |error| forward.invoke(error), succeed);
                },
            );
        })
    }

    /// Recovers from a failure of the chain built so far.
    ///
    /// On success the handler is never invoked and the value passes through
    /// untouched. On failure the handler's future is engaged and its outcome,
    /// success or failure, replaces the receiver's outcome entirely. Each
    /// `handle_with` only catches failures from the steps composed above it;
    /// failures raised later in the chain, or by its own repair future, flow
    /// past it.
    pub fn handle_with<F>(self, handler: F) -> Self
    where
        F: Fn(L) -> Self + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        Future::new(move |fail, succeed| {
            let handler = Arc::clone(&handler);
            let succeed = OnceCallback::new(succeed);
            let pass = succeed.clone();
            self.engage(
                move |error| handler(error).engage(fail, move |value| succeed.invoke(value)),
                move |value| pass.invoke(value),
            );
        })
    }

    /// Transforms the failure value; success passes through untouched.
    pub fn error_map<L2, F>(self, mapper: F) -> Future<L2, R>
    where
        L2: Send + 'static,
        F: Fn(L) -> L2 + Send + Sync + 'static,
    {
        let mapper = Arc::new(mapper);
        Future::new(move |fail, succeed| {
            let mapper = Arc::clone(&mapper);
            self.engage(move |error| fail(mapper(error)), succeed);
        })
    }

    /// Installs a panic-capture boundary around this future's engagement.
    ///
    /// A panic raised while the engagement runs synchronously (in the action
    /// or in any synchronous continuation it calls) is caught and delivered
    /// on the failure channel as a [`PanicPayload`]. Panics on other threads
    /// are out of reach and abort those threads as usual.
    pub fn catch_panics(self) -> Self
    where
        L: From<PanicPayload>,
    {
        Future::new(move |fail, succeed| {
            let fail = OnceCallback::new(fail);
            let on_panic = fail.clone();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                self.engage(move |error| fail.invoke(error), succeed);
            }));
            if let Err(payload) = outcome {
                on_panic.invoke(PanicPayload::from_unwind(payload).into());
            }
        })
    }
}

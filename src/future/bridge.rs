//! Bridge between lazy futures and `std::future`.
//!
//! A [`Future`](crate::Future) presents itself to the host async machinery
//! through [`IntoFuture`](std::future::IntoFuture): `.await`ing one yields
//! `Result<R, L>`. The adapter
//! returned by `into_future` is the only thing that triggers execution;
//! building or passing a lazy future around never does. Engagement happens on
//! the adapter's first poll, which is the moment Rust's own (poll-lazy) eager
//! primitive starts work.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::tracing_compat::trace;

use super::Future;

/// Shared outcome slot between the adapter and the engagement callbacks.
struct Slot<L, R> {
    outcome: Option<Result<R, L>>,
    waker: Option<Waker>,
}

/// A started (or about to start) execution of a lazy future.
///
/// Created by `.await`/[`into_future`](std::future::IntoFuture::into_future).
/// The source future is
/// engaged on first poll; the callbacks store the outcome in a shared slot
/// and wake the task, so actions may settle from any thread.
#[must_use = "futures do nothing unless polled"]
pub struct Engaged<L, R> {
    source: Option<Future<L, R>>,
    slot: Arc<Mutex<Slot<L, R>>>,
}

impl<L, R> std::fmt::Debug for Engaged<L, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engaged")
            .field("engaged", &self.source.is_none())
            .finish_non_exhaustive()
    }
}

fn deliver<L, R>(slot: &Mutex<Slot<L, R>>, outcome: Result<R, L>) {
    let waker = {
        let mut slot = slot.lock();
        if slot.outcome.is_some() {
            trace!("duplicate settle dropped by bridge slot");
            return;
        }
        slot.outcome = Some(outcome);
        slot.waker.take()
    };
    if let Some(waker) = waker {
        waker.wake();
    }
}

impl<L, R> std::future::Future for Engaged<L, R>
where
    L: Send + 'static,
    R: Send + 'static,
{
    type Output = Result<R, L>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(source) = this.source.take() {
            let on_fail = Arc::clone(&this.slot);
            let on_done = Arc::clone(&this.slot);
            source.engage(
                move |error| deliver(&on_fail, Err(error)),
                move |value| deliver(&on_done, Ok(value)),
            );
        }
        let mut slot = this.slot.lock();
        match slot.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<L, R> std::future::IntoFuture for Future<L, R>
where
    L: Send + 'static,
    R: Send + 'static,
{
    type Output = Result<R, L>;
    type IntoFuture = Engaged<L, R>;

    fn into_future(self) -> Engaged<L, R> {
        Engaged {
            source: Some(self),
            slot: Arc::new(Mutex::new(Slot {
                outcome: None,
                waker: None,
            })),
        }
    }
}

impl<L, R> Future<L, R>
where
    L: Send + 'static,
    R: Send + 'static,
{
    /// Engages this future and blocks the calling thread until it settles.
    ///
    /// Equivalent to driving the `.await` bridge with a local block-on
    /// driver. Hangs forever if the action violates its contract and never
    /// settles.
    pub fn wait(self) -> Result<R, L> {
        futures_lite::future::block_on(std::future::IntoFuture::into_future(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn await_round_trip_success() {
        let outcome = block_on(async { Future::<&str, i32>::of(1).await });
        assert_eq!(outcome, Ok(1));
    }

    #[test]
    fn await_round_trip_failure() {
        let outcome = block_on(async { Future::<String, i32>::reject("m".to_string()).await });
        assert_eq!(outcome, Err("m".to_string()));
    }

    #[test]
    fn wait_drives_a_whole_chain() {
        let chain = Future::<&str, i32>::of(3)
            .map(|x| x + 1)
            .flat_map(|x| Future::of(x * 2));
        assert_eq!(chain.wait(), Ok(8));
    }

    #[test]
    fn settles_from_another_thread() {
        let future = Future::<&str, i32>::new(|_fail, succeed| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                succeed(21);
            });
        });
        assert_eq!(future.wait(), Ok(21));
    }

    #[test]
    fn conversion_alone_does_not_engage() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let future = Future::<&str, i32>::new(move |_fail, succeed| {
            seen.fetch_add(1, Ordering::SeqCst);
            succeed(1);
        });

        let engaged = std::future::IntoFuture::into_future(future);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(block_on(engaged), Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

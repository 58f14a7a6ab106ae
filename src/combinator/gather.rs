//! Fixed-arity parallel composition.
//!
//! [`gather2`] is the leaf primitive: it engages both operands immediately,
//! in program order, and combines their successes into a tuple behind a
//! one-shot settle guard. [`gather3`] and [`gather4`] are nested pairwise
//! compositions of `gather2` with a flattening map, not bespoke N-ary
//! implementations, and they inherit its semantics level by level:
//!
//! - result slots are filled by fixed position, never by completion order
//! - the first failure *at each nesting level* wins; with `gather4`, the
//!   reported failure is whichever inner pair fails first, which is not
//!   necessarily the chronologically first failure among all four operands
//! - a failing operand never cancels its siblings; their late callbacks are
//!   dropped by the guard

use std::sync::Arc;

use parking_lot::Mutex;

use crate::future::{Future, OnDone, OnFail};
use crate::tracing_compat::trace;

/// Accumulator for one engagement of a [`gather2`].
///
/// Owned exclusively by that engagement's closures; nothing outside can
/// observe or mutate it.
struct PairState<L, A, B> {
    left: Option<A>,
    right: Option<B>,
    fail: Option<OnFail<L>>,
    succeed: Option<OnDone<(A, B)>>,
}

fn pair_fail<L, A, B>(state: &Mutex<PairState<L, A, B>>, error: L) {
    let callback = {
        let mut state = state.lock();
        // Disarm success so a buggy late slot-fill cannot fire it.
        state.succeed = None;
        state.fail.take()
    };
    match callback {
        Some(callback) => callback(error),
        None => trace!("sibling failure dropped by first-failure guard"),
    }
}

fn pair_complete<L, A, B>(state: &Mutex<PairState<L, A, B>>) {
    let fire = {
        let mut state = state.lock();
        if state.left.is_some() && state.right.is_some() && state.succeed.is_some() {
            let callback = state.succeed.take().expect("success callback armed");
            state.fail = None;
            let left = state.left.take().expect("left slot filled");
            let right = state.right.take().expect("right slot filled");
            Some((callback, (left, right)))
        } else {
            None
        }
    };
    if let Some((callback, pair)) = fire {
        callback(pair);
    }
}

/// Engages two futures concurrently and combines their successes.
///
/// Both operands are engaged synchronously in program order, `left` first,
/// before any callback-driven continuation runs; completion may happen in
/// any order. Success requires both; the tuple slots are positional. The
/// first failure wins, which for two synchronously failing operands means
/// the left one (it reaches the guard first).
pub fn gather2<L, A, B>(left: Future<L, A>, right: Future<L, B>) -> Future<L, (A, B)>
where
    L: Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
{
    Future::new(move |fail, succeed| {
        let state = Arc::new(Mutex::new(PairState {
            left: None,
            right: None,
            fail: Some(fail),
            succeed: Some(succeed),
        }));

        let fail_state = Arc::clone(&state);
        let done_state = Arc::clone(&state);
        left.engage(
            move |error| pair_fail(&fail_state, error),
            move |value| {
                done_state.lock().left = Some(value);
                pair_complete(&done_state);
            },
        );

        let fail_state = Arc::clone(&state);
        let done_state = Arc::clone(&state);
        right.engage(
            move |error| pair_fail(&fail_state, error),
            move |value| {
                done_state.lock().right = Some(value);
                pair_complete(&done_state);
            },
        );
    })
}

/// Engages three futures concurrently; tuple slots are positional.
///
/// Built as `gather2(gather2(f1, f2), f3)` with a flattening map, so the
/// `f1`/`f2` pair is raced first at its own nesting level.
pub fn gather3<L, A, B, C>(
    f1: Future<L, A>,
    f2: Future<L, B>,
    f3: Future<L, C>,
) -> Future<L, (A, B, C)>
where
    L: Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
{
    gather2(gather2(f1, f2), f3).map(|((a, b), c)| (a, b, c))
}

/// Engages four futures concurrently; tuple slots are positional.
///
/// Built as `gather2(gather2(f1, f2), gather2(f3, f4))` with a flattening
/// map. The two inner pairs are raced independently: the reported failure is
/// whichever pair fails first, not necessarily the chronologically first
/// failure among all four operands.
pub fn gather4<L, A, B, C, D>(
    f1: Future<L, A>,
    f2: Future<L, B>,
    f3: Future<L, C>,
    f4: Future<L, D>,
) -> Future<L, (A, B, C, D)>
where
    L: Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
    D: Send + 'static,
{
    gather2(gather2(f1, f2), gather2(f3, f4)).map(|((a, b), (c, d))| (a, b, c, d))
}

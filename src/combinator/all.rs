//! Variable-arity parallel composition.
//!
//! [`all`] is the ordered leaf: every element is engaged immediately, in
//! caller order, with no concurrency limit; results are accumulated by
//! original index; the first failure *by completion order* wins. [`all_keyed`]
//! is built on top of it: a keyed collection is snapshotted into an ordered
//! list, delegated to `all`, and the positional results are zipped back onto
//! the keys.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::future::{Future, OnDone, OnFail};
use crate::tracing_compat::{debug, trace};

/// Accumulator for one engagement of an [`all`].
struct AllState<L, R> {
    slots: Vec<Option<R>>,
    remaining: usize,
    fail: Option<OnFail<L>>,
    succeed: Option<OnDone<Vec<R>>>,
}

fn all_fail<L, R>(state: &Mutex<AllState<L, R>>, error: L) {
    let callback = {
        let mut state = state.lock();
        state.succeed = None;
        state.fail.take()
    };
    match callback {
        Some(callback) => callback(error),
        None => trace!("sibling failure dropped by first-failure guard"),
    }
}

fn all_fill<L, R>(state: &Mutex<AllState<L, R>>, index: usize, value: R) {
    let fire = {
        let mut state = state.lock();
        if state.slots[index].is_some() {
            trace!(index, "duplicate slot fill dropped");
            return;
        }
        state.slots[index] = Some(value);
        state.remaining -= 1;
        if state.remaining == 0 && state.succeed.is_some() {
            let callback = state.succeed.take().expect("success callback armed");
            state.fail = None;
            let values = state
                .slots
                .iter_mut()
                .map(|slot| slot.take().expect("slot filled"))
                .collect::<Vec<_>>();
            Some((callback, values))
        } else {
            None
        }
    };
    if let Some((callback, values)) = fire {
        callback(values);
    }
}

/// Engages every future in the list concurrently and collects the results
/// in input order.
///
/// Elements are engaged synchronously in the exact order given, one after
/// another, before any callback-driven continuation runs; completion order
/// is unconstrained and does not affect result positions. The first failure
/// by completion order wins and fires once; siblings keep running and their
/// outcomes are discarded. An empty list resolves immediately with an empty
/// vector, engaging nothing.
pub fn all<L, R>(futures: Vec<Future<L, R>>) -> Future<L, Vec<R>>
where
    L: Send + 'static,
    R: Send + 'static,
{
    Future::new(move |fail, succeed| {
        if futures.is_empty() {
            succeed(Vec::new());
            return;
        }
        debug!(elements = futures.len(), "engaging ordered gather");

        let mut slots = Vec::new();
        slots.resize_with(futures.len(), || None);
        let state = Arc::new(Mutex::new(AllState {
            slots,
            remaining: futures.len(),
            fail: Some(fail),
            succeed: Some(succeed),
        }));

        for (index, future) in futures.iter().enumerate() {
            let fail_state = Arc::clone(&state);
            let done_state = Arc::clone(&state);
            future.engage(
                move |error| all_fail(&fail_state, error),
                move |value| all_fill(&done_state, index, value),
            );
        }
    })
}

/// Engages every future in the map concurrently and collects the results
/// under their keys.
///
/// The map is snapshotted into an ordered list (stable key order), delegated
/// to [`all`], and the positional results are zipped back onto the keys. An
/// empty map resolves immediately with an empty map, engaging nothing.
pub fn all_keyed<L, K, R>(futures: BTreeMap<K, Future<L, R>>) -> Future<L, BTreeMap<K, R>>
where
    L: Send + 'static,
    K: Ord + Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    let (keys, list): (Vec<K>, Vec<Future<L, R>>) = futures.into_iter().unzip();
    all(list).map(move |values| keys.iter().cloned().zip(values).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    fn engage_now<L, R>(future: &Future<L, R>) -> Result<R, L>
    where
        L: Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let tx_ok = tx.clone();
        future.engage(
            move |error| {
                let _ = tx.send(Err(error));
            },
            move |value| {
                let _ = tx_ok.send(Ok(value));
            },
        );
        rx.try_recv().expect("future settled synchronously")
    }

    #[test]
    fn empty_list_resolves_immediately() {
        let combined = all(Vec::<Future<&str, i32>>::new());
        assert_eq!(engage_now(&combined), Ok(Vec::new()));
    }

    #[test]
    fn empty_map_resolves_immediately() {
        let combined = all_keyed(BTreeMap::<&str, Future<&str, i32>>::new());
        assert_eq!(engage_now(&combined), Ok(BTreeMap::new()));
    }

    #[test]
    fn collects_in_input_order() {
        let combined = all(vec![
            Future::<&str, &str>::of("x"),
            Future::<&str, &str>::of("y"),
            Future::<&str, &str>::of("z"),
        ]);
        assert_eq!(engage_now(&combined), Ok(vec!["x", "y", "z"]));
    }

    #[test]
    fn index_fidelity_under_reversed_completion() {
        let parked: Arc<Mutex<Vec<OnDone<&str>>>> = Arc::new(Mutex::new(Vec::new()));
        let futures = (0..3)
            .map(|_| {
                let parked = Arc::clone(&parked);
                Future::<&str, &str>::new(move |_fail, succeed| parked.lock().push(succeed))
            })
            .collect::<Vec<_>>();

        let (tx, rx) = mpsc::channel();
        all(futures).engage(
            move |_err| {},
            move |values| {
                let _ = tx.send(values);
            },
        );

        let callbacks = {
            let mut parked = parked.lock();
            assert_eq!(parked.len(), 3, "all elements engaged before waiting");
            parked.drain(..).collect::<Vec<_>>()
        };
        // Settle in reverse input order.
        for (callback, value) in callbacks.into_iter().zip(["x", "y", "z"]).rev() {
            callback(value);
        }

        assert_eq!(rx.try_recv().expect("settled"), vec!["x", "y", "z"]);
    }

    #[test]
    fn first_failure_by_completion_order_wins() {
        let parked_fails: Arc<Mutex<Vec<OnFail<&str>>>> = Arc::new(Mutex::new(Vec::new()));
        let futures = (0..2)
            .map(|_| {
                let parked = Arc::clone(&parked_fails);
                Future::<&str, i32>::new(move |fail, _succeed| parked.lock().push(fail))
            })
            .collect::<Vec<_>>();

        let (tx, rx) = mpsc::channel();
        all(futures).engage(
            move |error| {
                let _ = tx.send(error);
            },
            move |_values| {},
        );

        let mut callbacks = parked_fails.lock().drain(..).collect::<Vec<_>>();
        let second = callbacks.pop().expect("second fail parked");
        let first = callbacks.pop().expect("first fail parked");
        // The later input element completes (fails) first.
        second("second input");
        first("first input");

        assert_eq!(rx.try_recv().expect("settled"), "second input");
        assert!(rx.try_recv().is_err(), "guard dropped the second failure");
    }

    #[test]
    fn failure_does_not_skip_sibling_engagement() {
        let engaged = Arc::new(AtomicUsize::new(0));
        let futures = (0..3)
            .map(|i| {
                let seen = Arc::clone(&engaged);
                Future::<String, i32>::new(move |fail, succeed| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    if i == 0 {
                        fail(format!("element {i} failed"));
                    } else {
                        succeed(i);
                    }
                })
            })
            .collect::<Vec<_>>();

        let outcome = engage_now(&all(futures));
        assert_eq!(outcome, Err("element 0 failed".to_string()));
        assert_eq!(engaged.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn keyed_results_land_under_their_keys() {
        let mut input = BTreeMap::new();
        input.insert("a", Future::<&str, i32>::of(1));
        input.insert("b", Future::<&str, i32>::of(2));

        let outcome = engage_now(&all_keyed(input)).expect("settled");
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome["a"], 1);
        assert_eq!(outcome["b"], 2);
    }

    #[test]
    fn keyed_failure_propagates() {
        let mut input = BTreeMap::new();
        input.insert("ok", Future::<&str, i32>::of(1));
        input.insert("sad", Future::<&str, i32>::reject("no"));

        assert_eq!(engage_now(&all_keyed(input)), Err("no"));
    }
}

#![forbid(unsafe_code)]

//! Typed event fan-out with RAII unsubscription.
//!
//! [`ObserverList<E>`] is the seam between the stateful pieces of the
//! library: registries and controllers emit typed events, interested
//! parties subscribe. Cloning an `ObserverList` clones a handle to the
//! same subscriber set.
//!
//! # Invariants
//!
//! 1. Observers are notified in registration order.
//! 2. Emission happens strictly after the emitter's own mutation is
//!    visible; callbacks are collected before any of them runs, so an
//!    observer never executes under the list's interior borrow.
//! 3. Dead observers (dropped [`Subscription`] guards) are pruned lazily
//!    on the next emit.
//!
//! # Failure Modes
//!
//! - Re-entrancy is safe: both emitting and subscribing from within a
//!   callback are allowed. A subscriber added mid-emit does not receive
//!   the in-flight event, only later ones.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

/// A shared list of event observers.
pub struct ObserverList<E> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<E>>>>,
}

impl<E: 'static> Default for ObserverList<E> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Clone: shares the same subscriber set.
impl<E> Clone for ObserverList<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E> std::fmt::Debug for ObserverList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("observer_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<E: 'static> ObserverList<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register an observer. Dropping the returned [`Subscription`]
    /// unsubscribes it.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.subscribers.borrow_mut().push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Deliver an event to every live observer, in registration order.
    pub fn emit(&self, event: &E) {
        // Collect live callbacks first so observers run outside the borrow.
        let callbacks: Vec<CallbackRc<E>> = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.iter().filter_map(|w| w.upgrade()).collect()
        };
        for cb in &callbacks {
            cb(event);
        }
    }

    /// Number of registered observers, including dead ones not yet pruned.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// RAII guard for an observer callback. Dropping it makes the callback
/// unreachable; the observer list prunes the slot on the next emit.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_reaches_observer() {
        let list: ObserverList<u32> = ObserverList::new();
        let seen = Rc::new(Cell::new(0u32));
        let seen_clone = Rc::clone(&seen);
        let _sub = list.subscribe(move |v| seen_clone.set(*v));

        list.emit(&7);
        assert_eq!(seen.get(), 7);
        list.emit(&9);
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn drop_unsubscribes() {
        let list: ObserverList<()> = ObserverList::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let sub = list.subscribe(move |()| hits_clone.set(hits_clone.get() + 1));

        list.emit(&());
        assert_eq!(hits.get(), 1);
        drop(sub);
        list.emit(&());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn registration_order_preserved() {
        let list: ObserverList<()> = ObserverList::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _s1 = list.subscribe(move |()| l1.borrow_mut().push('A'));
        let l2 = Rc::clone(&log);
        let _s2 = list.subscribe(move |()| l2.borrow_mut().push('B'));
        let l3 = Rc::clone(&log);
        let _s3 = list.subscribe(move |()| l3.borrow_mut().push('C'));

        list.emit(&());
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn dead_observers_pruned_on_emit() {
        let list: ObserverList<()> = ObserverList::new();
        let _s1 = list.subscribe(|()| {});
        let s2 = list.subscribe(|()| {});
        drop(s2);
        assert_eq!(list.observer_count(), 2);
        list.emit(&());
        assert_eq!(list.observer_count(), 1);
    }

    #[test]
    fn clone_shares_subscribers() {
        let a: ObserverList<u32> = ObserverList::new();
        let b = a.clone();
        let seen = Rc::new(Cell::new(0u32));
        let seen_clone = Rc::clone(&seen);
        let _sub = a.subscribe(move |v| seen_clone.set(*v));

        b.emit(&42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn reentrant_emit_allowed() {
        let list: ObserverList<u32> = ObserverList::new();
        let inner = list.clone();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        let _sub = list.subscribe(move |v| {
            log_clone.borrow_mut().push(*v);
            if *v == 1 {
                inner.emit(&2);
            }
        });

        list.emit(&1);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn reentrant_subscribe_misses_in_flight_event() {
        let list: ObserverList<u32> = ObserverList::new();
        let inner = list.clone();
        let log = Rc::new(RefCell::new(Vec::new()));
        let late_sub = Rc::new(RefCell::new(None));

        let log_outer = Rc::clone(&log);
        let late = Rc::clone(&late_sub);
        let _sub = list.subscribe(move |v| {
            log_outer.borrow_mut().push(('A', *v));
            if late.borrow().is_none() {
                let log_inner = Rc::clone(&log_outer);
                let sub = inner.subscribe(move |v| log_inner.borrow_mut().push(('B', *v)));
                *late.borrow_mut() = Some(sub);
            }
        });

        // The subscriber added during this emit does not see event 1.
        list.emit(&1);
        assert_eq!(*log.borrow(), vec![('A', 1)]);

        list.emit(&2);
        assert_eq!(*log.borrow(), vec![('A', 1), ('A', 2), ('B', 2)]);
    }
}

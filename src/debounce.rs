use crate::schedule::{Scheduler, TimerHandle};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct Inner<A> {
    scheduler: Rc<dyn Scheduler>,
    wait_ms: u32,
    callback: Box<dyn Fn(A)>,
    pending: RefCell<Option<TimerHandle>>,
    latest: RefCell<Option<A>>,
}

/// Collapses a burst of calls into one trailing call.
///
/// Each [`Debouncer::call`] restarts the quiet window; when it elapses the
/// callback runs once with the arguments of the most recent call. Clones share
/// the same window.
pub struct Debouncer<A> {
    inner: Rc<Inner<A>>,
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> Debouncer<A> {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait_ms: u32, callback: impl Fn(A) + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                wait_ms,
                callback: Box::new(callback),
                pending: RefCell::new(None),
                latest: RefCell::new(None),
            }),
        }
    }

    pub fn call(&self, args: A) {
        if let Some(previous) = self.inner.pending.borrow_mut().take() {
            previous.cancel();
        }
        *self.inner.latest.borrow_mut() = Some(args);

        let weak: Weak<Inner<A>> = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.after(
            self.inner.wait_ms,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                inner.pending.borrow_mut().take();
                let args = inner.latest.borrow_mut().take();
                if let Some(args) = args {
                    (inner.callback)(args);
                }
            }),
        );
        *self.inner.pending.borrow_mut() = Some(handle);
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.inner.pending.borrow_mut().take() {
            handle.cancel();
        }
        self.inner.latest.borrow_mut().take();
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    pub fn wait_ms(&self) -> u32 {
        self.inner.wait_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualClock;
    use std::cell::Cell;

    fn setup(wait_ms: u32) -> (ManualClock, Debouncer<u32>, Rc<RefCell<Vec<u32>>>) {
        let clock = ManualClock::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let debouncer = Debouncer::new(Rc::new(clock.clone()), wait_ms, move |v| {
            sink.borrow_mut().push(v)
        });
        (clock, debouncer, calls)
    }

    #[test]
    fn test_burst_collapses_to_last_call() {
        let (clock, debouncer, calls) = setup(10);
        for v in 1..=5 {
            debouncer.call(v);
            clock.advance(3);
        }
        assert!(calls.borrow().is_empty(), "window restarted on every call");
        clock.advance(10);
        assert_eq!(*calls.borrow(), vec![5]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_separate_windows_each_fire() {
        let (clock, debouncer, calls) = setup(10);
        debouncer.call(1);
        clock.advance(10);
        debouncer.call(2);
        clock.advance(10);
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_zero_wait_runs_on_next_tick() {
        let (clock, debouncer, calls) = setup(0);
        debouncer.call(7);
        assert!(calls.borrow().is_empty());
        clock.advance(0);
        assert_eq!(*calls.borrow(), vec![7]);
    }

    #[test]
    fn test_cancel_drops_pending_call() {
        let (clock, debouncer, calls) = setup(10);
        debouncer.call(1);
        debouncer.cancel();
        clock.advance(50);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_callback_may_call_again() {
        let clock = ManualClock::new();
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Debouncer<u32>>>> = Rc::new(RefCell::new(None));
        let h = Rc::clone(&hits);
        let s = Rc::clone(&slot);
        let debouncer = Debouncer::new(Rc::new(clock.clone()), 5, move |v: u32| {
            h.set(h.get() + 1);
            if v > 0 {
                if let Some(d) = s.borrow().as_ref() {
                    d.call(v - 1);
                }
            }
        });
        *slot.borrow_mut() = Some(debouncer.clone());
        debouncer.call(2);
        clock.advance(100);
        assert_eq!(hits.get(), 3);
        slot.borrow_mut().take();
    }
}

//! Timer scheduling.
//!
//! Everything that waits (debounce windows, staggered reveals, counter frames,
//! notification auto-dismiss) goes through [`Scheduler::after`]. The browser
//! adapter backs it with `setTimeout`; tests drive a [`ManualClock`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A deferred action.
pub type Action = Box<dyn FnOnce()>;

/// Schedules one-shot actions on the host event loop.
pub trait Scheduler {
    /// Run `action` after `delay_ms` milliseconds. A delay of zero runs it on
    /// the next tick, never synchronously.
    fn after(&self, delay_ms: u32, action: Action) -> TimerHandle;
}

/// Cancellation handle for a scheduled action.
///
/// Dropping the handle does not cancel the action.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Shared liveness flag for a group of timers.
///
/// Controllers hand a clone to every action they schedule and check it before
/// doing any work, so one [`Lifetime::end`] call cancels chains that keep
/// rescheduling themselves (counter frames, typing).
#[derive(Debug, Clone)]
pub struct Lifetime {
    alive: Rc<Cell<bool>>,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub fn end(&self) {
        self.alive.set(false);
    }
}

/// Schedule `action` to run only while `lifetime` is alive.
pub fn after_while(
    scheduler: &dyn Scheduler,
    lifetime: &Lifetime,
    delay_ms: u32,
    action: impl FnOnce() + 'static,
) -> TimerHandle {
    let lifetime = lifetime.clone();
    scheduler.after(
        delay_ms,
        Box::new(move || {
            if lifetime.is_alive() {
                action();
            }
        }),
    )
}

struct Pending {
    due_ms: u64,
    seq: u64,
    handle: TimerHandle,
    action: Action,
}

#[derive(Default)]
struct ClockState {
    now_ms: u64,
    next_seq: u64,
    queue: Vec<Pending>,
}

/// Deterministic clock for tests and headless use.
///
/// Actions run only when [`ManualClock::advance`] moves time past their due
/// point, in due order, ties broken by scheduling order.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Number of scheduled actions that have neither run nor been cancelled.
    pub fn pending(&self) -> usize {
        self.state
            .borrow()
            .queue
            .iter()
            .filter(|p| !p.handle.is_cancelled())
            .count()
    }

    /// Move time forward by `ms`, running every action that becomes due,
    /// including actions scheduled by other actions within the window.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now_ms + ms;
        while let Some(pending) = self.pop_due(target) {
            self.state.borrow_mut().now_ms = pending.due_ms;
            if !pending.handle.is_cancelled() {
                (pending.action)();
            }
        }
        self.state.borrow_mut().now_ms = target;
    }

    /// Run everything until the queue drains, bounded by `limit_ms` of
    /// simulated time.
    pub fn run_until_idle(&self, limit_ms: u64) {
        let deadline = self.now_ms() + limit_ms;
        loop {
            let next_due = {
                let state = self.state.borrow();
                state
                    .queue
                    .iter()
                    .filter(|p| !p.handle.is_cancelled())
                    .map(|p| p.due_ms)
                    .min()
            };
            match next_due {
                Some(due) if due <= deadline => {
                    let now = self.now_ms();
                    self.advance(due.saturating_sub(now));
                }
                _ => break,
            }
        }
    }

    fn pop_due(&self, target: u64) -> Option<Pending> {
        let mut state = self.state.borrow_mut();
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= target)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(i, _)| i)?;
        Some(state.queue.swap_remove(index))
    }
}

impl Scheduler for ManualClock {
    fn after(&self, delay_ms: u32, action: Action) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut state = self.state.borrow_mut();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due_ms = state.now_ms + u64::from(delay_ms);
        state.queue.push(Pending {
            due_ms,
            seq,
            handle: handle.clone(),
            action,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Action) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |name: &'static str| -> Action {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_actions_run_in_due_order() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        clock.after(30, make("c"));
        clock.after(10, make("a"));
        clock.after(20, make("b"));
        clock.advance(25);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        clock.advance(5);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zero_delay_is_not_synchronous() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        clock.after(0, make("tick"));
        assert!(log.borrow().is_empty(), "zero delay must wait for the next tick");
        clock.advance(0);
        assert_eq!(*log.borrow(), vec!["tick"]);
    }

    #[test]
    fn test_cancelled_action_never_runs() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        let handle = clock.after(10, make("x"));
        handle.cancel();
        assert_eq!(clock.pending(), 0);
        clock.advance(100);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_nested_scheduling_within_window() {
        let clock = ManualClock::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner_clock = clock.clone();
        let sink = Rc::clone(&log);
        clock.after(
            10,
            Box::new(move || {
                sink.borrow_mut().push(inner_clock.now_ms());
                let sink = Rc::clone(&sink);
                let c = inner_clock.clone();
                inner_clock.after(5, Box::new(move || sink.borrow_mut().push(c.now_ms())));
            }),
        );
        clock.advance(20);
        assert_eq!(*log.borrow(), vec![10, 15]);
        assert_eq!(clock.now_ms(), 20);
    }

    #[test]
    fn test_lifetime_end_suppresses_actions() {
        let clock = ManualClock::new();
        let lifetime = Lifetime::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        after_while(&clock, &lifetime, 10, move || h.set(h.get() + 1));
        lifetime.end();
        clock.advance(10);
        assert_eq!(hits.get(), 0);
    }
}

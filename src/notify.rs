//! Single-slot toast notifications.
//!
//! Showing a notification replaces whatever is on screen. Each toast slides
//! in shortly after it is created, auto-dismisses after a while, and is
//! removed once its exit transition has played.

use crate::config::NotificationConfig;
use crate::schedule::Scheduler;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✕",
            NotificationKind::Info => "ℹ",
        }
    }

    /// CSS modifier, as in `notification-success`.
    pub fn class_name(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification-success",
            NotificationKind::Error => "notification-error",
            NotificationKind::Info => "notification-info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Mounted off-screen, about to slide in
    Entering,
    Shown,
    /// Sliding out, removed when the exit transition ends
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: ToastPhase,
}

type Listener = Rc<dyn Fn(Option<Toast>)>;

struct Inner {
    config: NotificationConfig,
    scheduler: Rc<dyn Scheduler>,
    current: RefCell<Option<Toast>>,
    next_id: Cell<u64>,
    listener: RefCell<Option<Listener>>,
}

/// Cheap-to-clone handle; clones share one slot.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Rc<Inner>,
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                scheduler,
                current: RefCell::new(None),
                next_id: Cell::new(1),
                listener: RefCell::new(None),
            }),
        }
    }

    /// Register the view callback, called with the toast after every change
    /// (`None` once it is removed).
    pub fn subscribe(&self, listener: impl Fn(Option<Toast>) + 'static) {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn current(&self) -> Option<Toast> {
        self.inner.current.borrow().clone()
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(NotificationKind::Info, message)
    }

    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        *self.inner.current.borrow_mut() = Some(Toast {
            id,
            kind,
            message: message.into(),
            phase: ToastPhase::Entering,
        });
        self.emit();

        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.after(
            self.inner.config.enter_delay_ms,
            Box::new(move || {
                if let Some(center) = Self::upgrade(&weak) {
                    center.transition(id, ToastPhase::Entering, ToastPhase::Shown);
                }
            }),
        );
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.after(
            self.inner.config.auto_dismiss_ms,
            Box::new(move || {
                if let Some(center) = Self::upgrade(&weak) {
                    center.dismiss(id);
                }
            }),
        );
        id
    }

    /// Start the exit transition for `id`. Ignored if that toast is already
    /// gone or leaving.
    pub fn dismiss(&self, id: u64) {
        let leaving = {
            let mut current = self.inner.current.borrow_mut();
            match current.as_mut() {
                Some(toast) if toast.id == id && toast.phase != ToastPhase::Leaving => {
                    toast.phase = ToastPhase::Leaving;
                    true
                }
                _ => false,
            }
        };
        if !leaving {
            return;
        }
        self.emit();

        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.after(
            self.inner.config.exit_ms,
            Box::new(move || {
                if let Some(center) = Self::upgrade(&weak) {
                    center.remove(id);
                }
            }),
        );
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn transition(&self, id: u64, from: ToastPhase, to: ToastPhase) {
        let changed = {
            let mut current = self.inner.current.borrow_mut();
            match current.as_mut() {
                Some(toast) if toast.id == id && toast.phase == from => {
                    toast.phase = to;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.emit();
        }
    }

    fn remove(&self, id: u64) {
        let removed = {
            let mut current = self.inner.current.borrow_mut();
            if current.as_ref().is_some_and(|t| t.id == id) {
                current.take();
                true
            } else {
                false
            }
        };
        if removed {
            self.emit();
        }
    }

    fn emit(&self) {
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(self.current());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualClock;

    fn center() -> (ManualClock, NotificationCenter) {
        let clock = ManualClock::new();
        let center = NotificationCenter::new(NotificationConfig::default(), Rc::new(clock.clone()));
        (clock, center)
    }

    fn phase(center: &NotificationCenter) -> Option<ToastPhase> {
        center.current().map(|t| t.phase)
    }

    #[test]
    fn test_lifecycle_enter_show_auto_dismiss() {
        let (clock, center) = center();
        center.success("Message sent");
        assert_eq!(phase(&center), Some(ToastPhase::Entering));
        clock.advance(100);
        assert_eq!(phase(&center), Some(ToastPhase::Shown));
        clock.advance(4900);
        assert_eq!(phase(&center), Some(ToastPhase::Leaving));
        clock.advance(300);
        assert_eq!(center.current(), None);
    }

    #[test]
    fn test_new_toast_replaces_old_one() {
        let (clock, center) = center();
        let first = center.info("first");
        clock.advance(1000);
        let second = center.error("second");
        assert_ne!(first, second);
        let toast = center.current().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.kind.icon(), "✕");

        // The first toast's auto-dismiss must not touch the second one
        clock.advance(4000);
        assert_eq!(center.current().unwrap().id, second);
        assert_eq!(phase(&center), Some(ToastPhase::Shown));
    }

    #[test]
    fn test_manual_dismiss_then_remove() {
        let (clock, center) = center();
        let id = center.info("hello");
        clock.advance(100);
        center.dismiss(id);
        assert_eq!(phase(&center), Some(ToastPhase::Leaving));
        center.dismiss(id);
        clock.advance(300);
        assert_eq!(center.current(), None);
        // Auto-dismiss later finds nothing to do
        clock.advance(10_000);
        assert_eq!(center.current(), None);
    }

    #[test]
    fn test_listener_sees_every_change() {
        let (clock, center) = center();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        center.subscribe(move |toast| sink.borrow_mut().push(toast.map(|t| t.phase)));
        center.info("x");
        clock.run_until_idle(10_000);
        assert_eq!(
            *seen.borrow(),
            vec![
                Some(ToastPhase::Entering),
                Some(ToastPhase::Shown),
                Some(ToastPhase::Leaving),
                None
            ]
        );
    }
}

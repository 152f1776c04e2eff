//! `setTimeout`-backed [`Scheduler`].

use crate::schedule::{Action, Scheduler, TimerHandle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Schedules actions on the window's timer queue. Cancelled handles are
/// checked when the timeout fires, so a cancelled action is simply dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn after(&self, delay_ms: u32, action: Action) -> TimerHandle {
        let handle = TimerHandle::new();
        let Some(window) = web_sys::window() else {
            log::warn!("No window; dropping timer of {}ms", delay_ms);
            handle.cancel();
            return handle;
        };

        let guard = handle.clone();
        let closure = Closure::once(Box::new(move || {
            if !guard.is_cancelled() {
                action();
            }
        }) as Box<dyn FnOnce()>);

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            log::warn!("setTimeout failed: {:?}", e);
            handle.cancel();
        }
        closure.forget();
        handle
    }
}

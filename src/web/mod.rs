//! Browser bindings. Everything in here is a thin layer over `web-sys`; the
//! state it drives lives in the platform-independent modules.

pub mod console;
pub mod observer;
pub mod page;
pub mod scheduler;
pub mod storage;
pub mod surface;
pub mod widgets;

/// Log a warning message to the browser console, bypassing the logger.
///
/// Used before the logger is installed and for failures of the logger
/// itself.
pub(crate) fn log_warning(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

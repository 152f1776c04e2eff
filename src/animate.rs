//! Frame sequences for numeric animations, and a driver that plays any frame
//! iterator on a [`Scheduler`].

use crate::schedule::{Lifetime, Scheduler};
use std::iter::Peekable;
use std::rc::Rc;

/// Display values for a counter counting up from 0 to `target`.
///
/// Each frame adds `target / (duration / interval)`, shows the running value
/// rounded up, and never shows more than `target`. The last frame is exactly
/// `target` followed by the suffix.
#[derive(Debug, Clone)]
pub struct CounterFrames {
    target: i64,
    increment: f64,
    current: f64,
    suffix: String,
    done: bool,
}

impl CounterFrames {
    pub fn new(target: i64, duration_ms: u32, interval_ms: u32, suffix: impl Into<String>) -> Self {
        let frames = f64::from(duration_ms) / f64::from(interval_ms);
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            suffix: suffix.into(),
            done: false,
        }
    }

    fn format(&self, value: i64) -> String {
        format!("{}{}", value, self.suffix)
    }
}

impl Iterator for CounterFrames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        if self.target <= 0 || !self.increment.is_finite() || self.increment <= 0.0 {
            self.done = true;
            return Some(self.format(self.target));
        }
        self.current += self.increment;
        let shown = (self.current.ceil() as i64).min(self.target);
        if shown >= self.target {
            self.done = true;
        }
        Some(self.format(shown))
    }
}

/// Linear width tween from 0 to `target` percent; the last frame is exactly
/// `target`.
#[derive(Debug, Clone)]
pub struct WidthFrames {
    target: f64,
    steps: u32,
    step: u32,
}

impl WidthFrames {
    pub fn new(target: f64, duration_ms: u32, interval_ms: u32) -> Self {
        let steps = if interval_ms == 0 {
            1
        } else {
            duration_ms.div_ceil(interval_ms).max(1)
        };
        Self {
            target,
            steps,
            step: 0,
        }
    }
}

impl Iterator for WidthFrames {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.step >= self.steps {
            return None;
        }
        self.step += 1;
        if self.step == self.steps {
            return Some(self.target);
        }
        Some(self.target * f64::from(self.step) / f64::from(self.steps))
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits up to the
/// first non-digit. `"42+"` gives 42, `"+"` gives `None`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Percentage from an attribute such as `"85%"` or `"62.5"`, clamped to
/// 0..=100.
pub fn parse_percent(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let value: f64 = numeric.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(0.0, 100.0))
}

/// Play `frames` on `scheduler`: the first frame is applied immediately, each
/// following frame `interval_ms` later. Stops early once `lifetime` ends.
pub fn drive_frames<I>(
    scheduler: Rc<dyn Scheduler>,
    lifetime: Lifetime,
    interval_ms: u32,
    frames: I,
    apply: impl Fn(I::Item) + 'static,
) where
    I: Iterator + 'static,
    I::Item: 'static,
{
    step(scheduler, lifetime, interval_ms, frames.peekable(), Rc::new(apply));
}

fn step<I>(
    scheduler: Rc<dyn Scheduler>,
    lifetime: Lifetime,
    interval_ms: u32,
    mut frames: Peekable<I>,
    apply: Rc<dyn Fn(I::Item)>,
) where
    I: Iterator + 'static,
    I::Item: 'static,
{
    if !lifetime.is_alive() {
        return;
    }
    let Some(frame) = frames.next() else {
        return;
    };
    apply(frame);
    if frames.peek().is_none() {
        return;
    }
    let next = Rc::clone(&scheduler);
    scheduler.after(
        interval_ms,
        Box::new(move || step(next, lifetime, interval_ms, frames, apply)),
    );
}

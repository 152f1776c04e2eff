//! Decorative geometry: click ripples and drifting background shapes.

/// How long a ripple stays in the DOM.
pub const RIPPLE_LIFETIME_MS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Ripple circle, positioned relative to the clicked element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// A circle as large as the element's longer side, centred on the click.
pub fn ripple_at(client_x: f64, client_y: f64, bounds: Rect) -> Ripple {
    let size = bounds.width.max(bounds.height);
    Ripple {
        x: client_x - bounds.left - size / 2.0,
        y: client_y - bounds.top - size / 2.0,
        size,
    }
}

/// Per-index delay of the hero's CSS entrance animation.
pub const HERO_ANIMATION_STEP_MS: u32 = 300;
/// Per-index delay of the slide-up entrance transition.
pub const ENTRANCE_STEP_MS: u32 = 200;
/// How far below its resting place an entrance element starts.
pub const ENTRANCE_OFFSET_PX: u32 = 50;

/// CSS time for the `index`-th element of a stagger, e.g. `"400ms"`.
/// Saturates instead of overflowing.
pub fn stagger_css(index: usize, step_ms: u32) -> String {
    let ms = u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(step_ms);
    format!("{}ms", ms)
}

/// Offset `(x, y)` in pixels for the `index`-th floating element at time
/// `time_s`. Vertical drift is ±20px, horizontal ±10px at half the rate.
pub fn float_offset(time_s: f64, speed: f64, index: usize) -> (f64, f64) {
    let phase = index as f64;
    let y = (time_s * speed + phase).sin() * 20.0;
    let x = (time_s * speed * 0.5 + phase).cos() * 10.0;
    (x, y)
}

//! One-shot entrance effects driven by visibility crossings.

use crate::animate::{drive_frames, parse_leading_int, parse_percent, CounterFrames, WidthFrames};
use crate::config::RevealConfig;
use crate::error::ViewportError;
use crate::schedule::{after_while, Lifetime, Scheduler};
use crate::visibility::{VisibilityWatcher, WatchMode, WatchOptions};
use std::fmt;
use std::rc::Rc;

/// Attribute holding a progress bar's target width.
pub const WIDTH_ATTRIBUTE: &str = "data-width";
/// Attribute holding a lazy image's real source.
pub const LAZY_SRC_ATTRIBUTE: &str = "data-src";
/// Class of the percentage label a progress bar counts up in.
pub const PERCENTAGE_LABEL_CLASS: &str = "skill-percentage";

/// Initial text for a progress bar's percentage label, taken from its
/// `data-width`. `None` when the width is not a percentage.
pub fn percentage_label(width: &str) -> Option<&str> {
    let width = width.trim();
    parse_percent(width)?;
    parse_leading_int(width)?;
    Some(width)
}

/// Delay of the `index`th staggered step, clamped at `u32::MAX`.
fn stagger_delay(index: usize, step_ms: u32) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(step_ms)
}

/// Handle for an element known to an [`EffectSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Fade/slide in, then stagger the element's children.
    Reveal,
    /// Count up to the integer in the element's text.
    Counter,
    /// A group of progress bars filled one after another.
    ProgressBar,
    /// Swap in the real image source.
    LazyImage,
}

impl EffectKind {
    /// How the page watches this kind. Progress-bar groups stay observed so
    /// later crossings can settle their widths; everything else is released
    /// after it fires.
    pub fn watch_mode(self) -> WatchMode {
        match self {
            EffectKind::ProgressBar => WatchMode::Persistent,
            EffectKind::Reveal | EffectKind::Counter | EffectKind::LazyImage => WatchMode::OneShot,
        }
    }
}

/// Which children an effect wants from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    Staggered,
    ProgressBar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedElement {
    pub element: ElementId,
    pub kind: EffectKind,
    pub mode: WatchMode,
    pub has_fired: bool,
}

/// Reads and writes the elements effects run on. The browser adapter
/// implements this over the DOM; tests use an in-memory fake.
pub trait EffectSurface {
    fn exists(&self, element: ElementId) -> bool;
    fn children(&self, element: ElementId, role: ChildRole) -> Vec<ElementId>;
    /// Percentage label that belongs to a progress bar, if any.
    fn label_for(&self, bar: ElementId) -> Option<ElementId>;
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn text(&self, element: ElementId) -> Option<String>;

    /// Full opacity, neutral transform.
    fn show(&self, element: ElementId);
    fn set_width(&self, element: ElementId, percent: f64);
    fn set_text(&self, element: ElementId, text: &str);
    fn load_image(&self, element: ElementId, src: &str);
}

struct Record {
    info: TrackedElement,
    counter_target: Option<i64>,
}

/// Runs each tracked element's effect on its first visibility crossing.
///
/// Effects never run twice for the same element. A persistent progress-bar
/// group re-applies its final widths on later crossings, without animating
/// or re-running its counters.
pub struct RevealController {
    config: RevealConfig,
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn EffectSurface>,
    watcher: VisibilityWatcher<ElementId>,
    records: Vec<Record>,
    lifetime: Lifetime,
}

impl RevealController {
    pub fn new(
        config: RevealConfig,
        scheduler: Rc<dyn Scheduler>,
        surface: Rc<dyn EffectSurface>,
    ) -> Self {
        Self {
            config,
            scheduler,
            surface,
            watcher: VisibilityWatcher::new(),
            records: Vec::new(),
            lifetime: Lifetime::new(),
        }
    }

    /// Observer options for an effect kind.
    pub fn options_for(&self, kind: EffectKind, mode: WatchMode) -> WatchOptions {
        let options = match kind {
            EffectKind::Reveal => WatchOptions::one_shot(self.config.threshold)
                .with_root_margin(self.config.root_margin.clone()),
            EffectKind::Counter => {
                WatchOptions::one_shot(self.config.counter_threshold).with_root_margin("0px")
            }
            EffectKind::ProgressBar => {
                WatchOptions::one_shot(self.config.bar_threshold).with_root_margin("0px")
            }
            EffectKind::LazyImage => WatchOptions::one_shot(0.0).with_root_margin("0px"),
        };
        WatchOptions { mode, ..options }
    }

    /// Start tracking an element. Returns the options the host observer
    /// should use for it.
    pub fn track(
        &mut self,
        element: ElementId,
        kind: EffectKind,
        mode: WatchMode,
    ) -> Result<WatchOptions, ViewportError> {
        if self.records.iter().any(|r| r.info.element == element) {
            return Err(ViewportError::DuplicateElement(element.to_string()));
        }
        if !self.surface.exists(element) {
            return Err(ViewportError::MissingElement(element.to_string()));
        }
        let counter_target = match kind {
            EffectKind::Counter => Some(
                self.surface
                    .text(element)
                    .as_deref()
                    .and_then(parse_leading_int)
                    .ok_or_else(|| ViewportError::InvalidAttribute {
                        element: element.to_string(),
                        attribute: "text".to_string(),
                    })?,
            ),
            _ => None,
        };

        let options = self.options_for(kind, mode);
        self.watcher.watch(element, options.clone());
        self.records.push(Record {
            info: TrackedElement {
                element,
                kind,
                mode,
                has_fired: false,
            },
            counter_target,
        });
        Ok(options)
    }

    pub fn tracked(&self, element: ElementId) -> Option<&TrackedElement> {
        self.records
            .iter()
            .find(|r| r.info.element == element)
            .map(|r| &r.info)
    }

    pub fn is_watching(&self, element: ElementId) -> bool {
        self.watcher.is_watching(&element)
    }

    /// Feed one visibility sample. Returns `true` if an effect was triggered.
    pub fn on_visibility(&mut self, element: ElementId, ratio: f64) -> bool {
        if !self.watcher.observe(&element, ratio) {
            return false;
        }
        self.fire(element)
    }

    /// Feed a batch of samples. Returns the elements whose subscriptions
    /// ended, so the host can stop observing them.
    pub fn on_batch(&mut self, samples: &[(ElementId, f64)]) -> Vec<ElementId> {
        let mut released = Vec::new();
        for &(element, ratio) in samples {
            if self.watcher.observe(&element, ratio) {
                self.fire(element);
                if !self.watcher.is_watching(&element) {
                    released.push(element);
                }
            }
        }
        released
    }

    /// Cancel every pending stagger and frame timer and stop watching.
    pub fn teardown(&mut self) {
        self.lifetime.end();
        self.watcher = VisibilityWatcher::new();
    }

    fn fire(&mut self, element: ElementId) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.info.element == element) else {
            return false;
        };
        let first = !record.info.has_fired;
        record.info.has_fired = true;
        let kind = record.info.kind;
        let counter_target = record.counter_target;

        if !first {
            if kind == EffectKind::ProgressBar {
                self.settle_bars(element);
                return true;
            }
            return false;
        }

        log::debug!("{:?} effect on {}", kind, element);
        match kind {
            EffectKind::Reveal => self.reveal(element),
            EffectKind::ProgressBar => self.fill_bars(element),
            EffectKind::Counter => {
                if let Some(target) = counter_target {
                    self.count(element, target);
                }
            }
            EffectKind::LazyImage => self.load_image(element),
        }
        true
    }

    fn reveal(&self, element: ElementId) {
        self.surface.show(element);
        let stagger = self.config.child_stagger_ms;
        let children = self.surface.children(element, ChildRole::Staggered);
        for (index, child) in children.into_iter().enumerate() {
            let surface = Rc::clone(&self.surface);
            let delay = stagger_delay(index, stagger);
            after_while(&*self.scheduler, &self.lifetime, delay, move || surface.show(child));
        }
    }

    fn bar_targets(&self, group: ElementId) -> Vec<(ElementId, f64)> {
        let bars = self.surface.children(group, ChildRole::ProgressBar);
        if bars.is_empty() {
            log::warn!("No progress bars inside {}", group);
        }
        bars.into_iter()
            .filter_map(|bar| {
                let target = self
                    .surface
                    .attribute(bar, WIDTH_ATTRIBUTE)
                    .as_deref()
                    .and_then(parse_percent);
                if target.is_none() {
                    log::warn!("Progress bar {} has no usable {}", bar, WIDTH_ATTRIBUTE);
                }
                target.map(|t| (bar, t))
            })
            .collect()
    }

    fn fill_bars(&self, group: ElementId) {
        let stagger = self.config.bar_stagger_ms;
        for (index, (bar, target)) in self.bar_targets(group).into_iter().enumerate() {
            let surface = Rc::clone(&self.surface);
            let scheduler = Rc::clone(&self.scheduler);
            let lifetime = self.lifetime.clone();
            let config = self.config.clone();
            let label = self.surface.label_for(bar);
            let label_target = self
                .surface
                .attribute(bar, WIDTH_ATTRIBUTE)
                .as_deref()
                .and_then(parse_leading_int);

            let delay = stagger_delay(index, stagger);
            after_while(&*self.scheduler, &self.lifetime, delay, move || {
                let width_surface = Rc::clone(&surface);
                drive_frames(
                    Rc::clone(&scheduler),
                    lifetime.clone(),
                    config.frame_interval_ms,
                    WidthFrames::new(target, config.bar_duration_ms, config.frame_interval_ms),
                    move |width| width_surface.set_width(bar, width),
                );
                if let (Some(label), Some(label_target)) = (label, label_target) {
                    drive_frames(
                        scheduler,
                        lifetime,
                        config.frame_interval_ms,
                        CounterFrames::new(
                            label_target,
                            config.counter_duration_ms,
                            config.frame_interval_ms,
                            config.counter_suffix.clone(),
                        ),
                        move |text: String| surface.set_text(label, &text),
                    );
                }
            });
        }
    }

    fn settle_bars(&self, group: ElementId) {
        for (bar, target) in self.bar_targets(group) {
            self.surface.set_width(bar, target);
        }
    }

    fn count(&self, element: ElementId, target: i64) {
        let surface = Rc::clone(&self.surface);
        drive_frames(
            Rc::clone(&self.scheduler),
            self.lifetime.clone(),
            self.config.frame_interval_ms,
            CounterFrames::new(
                target,
                self.config.counter_duration_ms,
                self.config.frame_interval_ms,
                self.config.counter_suffix.clone(),
            ),
            move |text: String| surface.set_text(element, &text),
        );
    }

    fn load_image(&self, element: ElementId) {
        match self.surface.attribute(element, LAZY_SRC_ATTRIBUTE) {
            Some(src) if !src.is_empty() => self.surface.load_image(element, &src),
            _ => log::warn!("Lazy image {} has no {}", element, LAZY_SRC_ATTRIBUTE),
        }
    }
}

//! Visibility subscriptions on top of viewport-intersection samples.
//!
//! The host (an `IntersectionObserver` in the browser) reports the visible
//! fraction of each observed element; the watcher turns those samples into
//! not-visible → visible crossings and applies the subscription mode.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// Fire on the first crossing, then stop tracking.
    OneShot,
    /// Fire on every crossing.
    Persistent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    /// Visible fraction of the element's area, 0..=1
    pub threshold: f64,
    /// CSS-style margin applied to the viewport by the host observer
    pub root_margin: String,
    pub mode: WatchMode,
}

/// Shrinks the viewport's bottom edge so elements reveal slightly late.
pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px -50px 0px";

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            mode: WatchMode::OneShot,
        }
    }
}

impl WatchOptions {
    pub fn one_shot(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn persistent(threshold: f64) -> Self {
        Self {
            threshold,
            mode: WatchMode::Persistent,
            ..Self::default()
        }
    }

    pub fn with_root_margin(mut self, margin: impl Into<String>) -> Self {
        self.root_margin = margin.into();
        self
    }

    /// A sample counts as visible when something is on screen and the
    /// threshold is met.
    pub fn is_visible(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

#[derive(Debug, Clone)]
struct Watched<K> {
    key: K,
    options: WatchOptions,
    visible: bool,
}

/// Tracks registered keys and reports visibility crossings.
#[derive(Debug, Clone)]
pub struct VisibilityWatcher<K> {
    watched: Vec<Watched<K>>,
}

impl<K> Default for VisibilityWatcher<K> {
    fn default() -> Self {
        Self { watched: Vec::new() }
    }
}

impl<K: PartialEq + Clone> VisibilityWatcher<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`. Re-registering replaces the old options and
    /// resets the crossing state.
    pub fn watch(&mut self, key: K, options: WatchOptions) {
        self.unwatch(&key);
        self.watched.push(Watched {
            key,
            options,
            visible: false,
        });
    }

    pub fn unwatch(&mut self, key: &K) -> bool {
        let before = self.watched.len();
        self.watched.retain(|w| &w.key != key);
        self.watched.len() != before
    }

    pub fn is_watching(&self, key: &K) -> bool {
        self.watched.iter().any(|w| &w.key == key)
    }

    pub fn options(&self, key: &K) -> Option<&WatchOptions> {
        self.watched.iter().find(|w| &w.key == key).map(|w| &w.options)
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Apply one sample. Returns `true` if it is a not-visible → visible
    /// crossing; a one-shot key is unregistered as it fires. Samples for
    /// unknown keys are ignored.
    pub fn observe(&mut self, key: &K, ratio: f64) -> bool {
        let Some(index) = self.watched.iter().position(|w| &w.key == key) else {
            return false;
        };
        let entry = &mut self.watched[index];
        let now_visible = entry.options.is_visible(ratio);
        let crossed = now_visible && !entry.visible;
        entry.visible = now_visible;
        if crossed && entry.options.mode == WatchMode::OneShot {
            self.watched.remove(index);
        }
        crossed
    }

    /// Apply a batch of samples in order, invoking `on_fire` for every
    /// crossing.
    pub fn notify<'a, I>(&mut self, samples: I, mut on_fire: impl FnMut(&K))
    where
        I: IntoIterator<Item = (&'a K, f64)>,
        K: 'a,
    {
        for (key, ratio) in samples {
            if self.observe(key, ratio) {
                on_fire(key);
            }
        }
    }
}

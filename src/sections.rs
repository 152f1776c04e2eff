use crate::error::ViewportError;

/// A page section measured from live layout, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open containment: the top edge belongs to this section, the
    /// bottom edge to whatever starts there.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Measures a registered section on demand.
///
/// Geometry is never cached across calls so resizes are picked up on the
/// next tick.
pub trait SectionLayout {
    /// Returns `(top, height)` for the section, or `None` if it is no longer
    /// on the page.
    fn measure(&self, id: &str) -> Option<(f64, f64)>;
}

/// Emitted when the active section changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSectionChanged {
    pub previous: Option<String>,
    pub current: String,
}

/// Tracks which registered section is active for the current scroll offset.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    bias: f64,
    ids: Vec<String>,
    active: Option<String>,
}

impl SectionTracker {
    pub fn new(bias: f64) -> Self {
        Self {
            bias,
            ids: Vec::new(),
            active: None,
        }
    }

    /// Register a section. Registration order breaks ties between
    /// overlapping sections.
    pub fn register(&mut self, id: impl Into<String>) -> Result<(), ViewportError> {
        let id = id.into();
        if self.ids.contains(&id) {
            return Err(ViewportError::DuplicateSection(id));
        }
        self.ids.push(id);
        Ok(())
    }

    pub fn registered(&self) -> &[String] {
        &self.ids
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Measure every registered section, skipping (with a warning) any the
    /// layout no longer knows about.
    pub fn measure_all(&self, layout: &dyn SectionLayout) -> Vec<Section> {
        self.ids
            .iter()
            .filter_map(|id| match layout.measure(id) {
                Some((top, height)) => Some(Section::new(id.clone(), top, height)),
                None => {
                    log::warn!("Section not found: #{}", id);
                    None
                }
            })
            .collect()
    }

    /// First section in `sections` whose range contains `probe`.
    pub fn locate(sections: &[Section], probe: f64) -> Option<&Section> {
        sections.iter().find(|s| s.contains(probe))
    }

    /// Recompute against freshly measured sections. Returns an event only if
    /// the active section changed; when nothing matches the previous active
    /// section is kept.
    pub fn update(&mut self, offset: f64, sections: &[Section]) -> Option<ActiveSectionChanged> {
        let found = Self::locate(sections, offset + self.bias)?;
        if self.active.as_deref() == Some(found.id.as_str()) {
            return None;
        }
        let previous = self.active.replace(found.id.clone());
        Some(ActiveSectionChanged {
            previous,
            current: found.id.clone(),
        })
    }

    /// Measure through `layout`, then [`SectionTracker::update`].
    pub fn on_scroll(
        &mut self,
        offset: f64,
        layout: &dyn SectionLayout,
    ) -> Option<ActiveSectionChanged> {
        let sections = self.measure_all(layout);
        self.update(offset, &sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedLayout(HashMap<&'static str, (f64, f64)>);

    impl SectionLayout for FixedLayout {
        fn measure(&self, id: &str) -> Option<(f64, f64)> {
            self.0.get(id).copied()
        }
    }

    fn page() -> Vec<Section> {
        vec![
            Section::new("home", 0.0, 600.0),
            Section::new("about", 600.0, 400.0),
            Section::new("skills", 1000.0, 500.0),
        ]
    }

    fn tracker() -> SectionTracker {
        let mut tracker = SectionTracker::new(150.0);
        for id in ["home", "about", "skills"] {
            tracker.register(id).unwrap();
        }
        tracker
    }

    #[test]
    fn test_bias_is_applied() {
        let mut t = tracker();
        // 460 + 150 = 610 lands in "about"
        let change = t.update(460.0, &page()).unwrap();
        assert_eq!(change.current, "about");
        assert_eq!(change.previous, None);
    }

    #[test]
    fn test_boundary_belongs_to_next_section() {
        let mut t = tracker();
        t.update(0.0, &page());
        assert_eq!(t.active(), Some("home"));
        // 450 + 150 = 600, exactly the top of "about"
        t.update(450.0, &page());
        assert_eq!(t.active(), Some("about"));
        t.update(449.0, &page());
        assert_eq!(t.active(), Some("home"));
    }

    #[test]
    fn test_unchanged_section_emits_nothing() {
        let mut t = tracker();
        assert!(t.update(10.0, &page()).is_some());
        assert!(t.update(20.0, &page()).is_none());
        assert!(t.update(300.0, &page()).is_none());
    }

    #[test]
    fn test_gap_keeps_previous_active() {
        let sections = vec![Section::new("a", 0.0, 100.0), Section::new("b", 500.0, 100.0)];
        let mut t = SectionTracker::new(0.0);
        t.update(50.0, &sections);
        assert!(t.update(300.0, &sections).is_none());
        assert_eq!(t.active(), Some("a"));
    }

    #[test]
    fn test_nothing_matched_before_first_section() {
        let sections = vec![Section::new("a", 1000.0, 100.0)];
        let mut t = SectionTracker::new(150.0);
        assert!(t.update(0.0, &sections).is_none());
        assert_eq!(t.active(), None);
    }

    #[test]
    fn test_overlap_resolved_by_registration_order() {
        let sections = vec![
            Section::new("first", 0.0, 500.0),
            Section::new("second", 100.0, 500.0),
        ];
        let mut t = SectionTracker::new(0.0);
        t.update(200.0, &sections);
        assert_eq!(t.active(), Some("first"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut t = tracker();
        assert_eq!(
            t.register("about"),
            Err(ViewportError::DuplicateSection("about".to_string()))
        );
        assert_eq!(t.registered().len(), 3);
    }

    #[test]
    fn test_missing_section_skipped_during_measure() {
        let t = tracker();
        let layout = FixedLayout(HashMap::from([
            ("home", (0.0, 600.0)),
            ("skills", (600.0, 500.0)),
        ]));
        let sections = t.measure_all(&layout);
        let ids: Vec<_> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "skills"]);
    }

    #[test]
    fn test_on_scroll_reads_live_layout() {
        let mut t = tracker();
        let before = FixedLayout(HashMap::from([
            ("home", (0.0, 600.0)),
            ("about", (600.0, 400.0)),
            ("skills", (1000.0, 500.0)),
        ]));
        assert_eq!(t.on_scroll(500.0, &before).map(|c| c.current), Some("about".to_string()));

        // Layout grew after a resize: "home" now covers the probe point
        let after = FixedLayout(HashMap::from([
            ("home", (0.0, 900.0)),
            ("about", (900.0, 400.0)),
            ("skills", (1300.0, 500.0)),
        ]));
        let change = t.on_scroll(500.0, &after).unwrap();
        assert_eq!(change.previous.as_deref(), Some("about"));
        assert_eq!(change.current, "home");
    }
}

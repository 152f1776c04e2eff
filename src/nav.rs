//! Navbar state driven by the scroll offset.
//!
//! Two independent rules: the bar is *elevated* purely by absolute offset,
//! while *hidden* also depends on scroll direction, so any upward movement
//! brings the bar back regardless of how far down the page is. The two are
//! intentionally not unified.

use crate::config::ScrollConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub offset: f64,
    pub last_offset: f64,
    pub direction: Direction,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            last_offset: 0.0,
            direction: Direction::Up,
        }
    }
}

impl ScrollState {
    /// Next state for a new offset. Equal offsets count as `Up`.
    pub fn advance(&self, offset: f64) -> ScrollState {
        let direction = if offset > self.offset {
            Direction::Down
        } else {
            Direction::Up
        };
        ScrollState {
            offset,
            last_offset: self.offset,
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    Flat,
    Elevated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarVisibility {
    Shown,
    Hidden,
}

pub fn elevation_for(offset: f64, elevate_after: f64) -> Elevation {
    if offset > elevate_after {
        Elevation::Elevated
    } else {
        Elevation::Flat
    }
}

pub fn visibility_for(scroll: &ScrollState, hide_after: f64) -> BarVisibility {
    if scroll.direction == Direction::Down && scroll.offset > hide_after {
        BarVisibility::Hidden
    } else {
        BarVisibility::Shown
    }
}

/// Everything the view needs to style the navbar and the scroll-to-top button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSnapshot {
    pub elevation: Elevation,
    pub visibility: BarVisibility,
    pub scroll_top_visible: bool,
}

#[derive(Debug, Clone)]
pub struct NavState {
    elevate_after: f64,
    hide_after: f64,
    scroll_top_after: f64,
    scroll: ScrollState,
    applied: Option<NavSnapshot>,
}

impl NavState {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            elevate_after: config.elevate_after_px,
            hide_after: config.hide_after_px,
            scroll_top_after: config.scroll_top_after_px,
            scroll: ScrollState::default(),
            applied: None,
        }
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn snapshot(&self) -> Option<NavSnapshot> {
        self.applied
    }

    /// Pure computation of the snapshot for a scroll state.
    pub fn compute(&self, scroll: &ScrollState) -> NavSnapshot {
        NavSnapshot {
            elevation: elevation_for(scroll.offset, self.elevate_after),
            visibility: visibility_for(scroll, self.hide_after),
            scroll_top_visible: scroll.offset > self.scroll_top_after,
        }
    }

    /// Feed a scroll tick. Returns the new snapshot only when it differs from
    /// the last one returned.
    pub fn on_scroll(&mut self, offset: f64) -> Option<NavSnapshot> {
        self.scroll = self.scroll.advance(offset);
        let next = self.compute(&self.scroll);
        if self.applied == Some(next) {
            return None;
        }
        self.applied = Some(next);
        Some(next)
    }
}

/// Navigation link highlight. Keeps at most one link active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub section_id: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NavLinks {
    links: Vec<NavLink>,
}

impl NavLinks {
    pub fn new<I, S>(section_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            links: section_ids
                .into_iter()
                .map(|id| NavLink {
                    section_id: id.into(),
                    is_active: false,
                })
                .collect(),
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.is_active)
            .map(|l| l.section_id.as_str())
    }

    /// Make the link for `section_id` the only active one. Returns `false`
    /// and leaves the current highlight alone if no link targets it.
    pub fn activate(&mut self, section_id: &str) -> bool {
        if !self.links.iter().any(|l| l.section_id == section_id) {
            return false;
        }
        for link in &mut self.links {
            link.is_active = link.section_id == section_id;
        }
        true
    }
}

/// Mobile hamburger menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Following a nav link always closes the menu.
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Scroll position for an in-page anchor, leaving room for the fixed navbar.
pub fn anchor_scroll_target(section_top: f64, navbar_offset: f64) -> f64 {
    section_top - navbar_offset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> NavState {
        NavState::new(&ScrollConfig::default())
    }

    #[test]
    fn test_elevation_has_no_hysteresis() {
        let mut n = nav();
        let up = n.on_scroll(101.0).unwrap();
        assert_eq!(up.elevation, Elevation::Elevated);
        let down = n.on_scroll(99.0).unwrap();
        assert_eq!(down.elevation, Elevation::Flat);
        assert_eq!(elevation_for(100.0, 100.0), Elevation::Flat);
    }

    #[test]
    fn test_hide_sequence() {
        let mut n = nav();
        let mut states = Vec::new();
        let mut directions = Vec::new();
        for offset in [50.0, 250.0, 240.0] {
            n.on_scroll(offset);
            directions.push(n.scroll().direction);
            states.push(n.snapshot().unwrap().visibility);
        }
        assert_eq!(&directions[1..], &[Direction::Down, Direction::Up]);
        assert_eq!(
            states,
            vec![BarVisibility::Shown, BarVisibility::Hidden, BarVisibility::Shown]
        );
    }

    #[test]
    fn test_upward_scroll_shows_bar_deep_in_page() {
        let mut n = nav();
        n.on_scroll(5000.0);
        assert_eq!(n.snapshot().unwrap().visibility, BarVisibility::Hidden);
        n.on_scroll(4999.0);
        let snap = n.snapshot().unwrap();
        assert_eq!(snap.visibility, BarVisibility::Shown);
        assert_eq!(snap.elevation, Elevation::Elevated);
    }

    #[test]
    fn test_same_offset_counts_as_up() {
        let s = ScrollState::default().advance(300.0).advance(300.0);
        assert_eq!(s.direction, Direction::Up);
        assert_eq!(visibility_for(&s, 200.0), BarVisibility::Shown);
    }

    #[test]
    fn test_repeated_state_is_not_reported() {
        let mut n = nav();
        assert!(n.on_scroll(10.0).is_some());
        assert!(n.on_scroll(20.0).is_none(), "flat+shown again should be a no-op");
        assert!(n.on_scroll(150.0).is_some());
    }

    #[test]
    fn test_scroll_top_button_threshold() {
        let mut n = nav();
        n.on_scroll(500.0);
        assert!(!n.snapshot().unwrap().scroll_top_visible);
        n.on_scroll(501.0);
        assert!(n.snapshot().unwrap().scroll_top_visible);
    }

    #[test]
    fn test_nav_links_single_active() {
        let mut links = NavLinks::new(["home", "about", "contact"]);
        assert_eq!(links.active(), None);
        links.activate("about");
        links.activate("contact");
        let active: Vec<_> = links.links().iter().filter(|l| l.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(links.active(), Some("contact"));
    }

    #[test]
    fn test_activate_unlinked_section_keeps_highlight() {
        let mut links = NavLinks::new(["home", "about"]);
        assert!(links.activate("home"));
        assert!(!links.activate("footer"));
        assert_eq!(links.active(), Some("home"));
    }

    #[test]
    fn test_menu_toggle_and_close() {
        let mut menu = MenuState::default();
        assert!(menu.toggle());
        assert!(menu.is_open());
        menu.close();
        assert!(!menu.is_open());
        assert!(menu.toggle());
        assert!(!menu.toggle());
    }

    #[test]
    fn test_anchor_target_leaves_room_for_navbar() {
        assert_eq!(anchor_scroll_target(1200.0, 80.0), 1120.0);
    }
}

//! The debounced scroll pipeline: scroll offset → active section → nav link
//! highlight and navbar state.

use crate::config::ScrollConfig;
use crate::debounce::Debouncer;
use crate::nav::{NavLinks, NavSnapshot, NavState};
use crate::schedule::Scheduler;
use crate::sections::{SectionLayout, SectionTracker};
use std::cell::RefCell;
use std::rc::Rc;

/// Applies nav changes to the page. Only called when something changed.
pub trait NavView {
    fn apply_nav(&self, snapshot: NavSnapshot);
    fn set_active_link(&self, section_id: &str);
}

struct PipelineState {
    tracker: SectionTracker,
    nav: NavState,
    links: NavLinks,
    layout: Rc<dyn SectionLayout>,
    view: Rc<dyn NavView>,
}

impl PipelineState {
    fn tick(&mut self, offset: f64) {
        let PipelineState {
            tracker,
            nav,
            links,
            layout,
            view,
        } = self;

        if let Some(change) = tracker.on_scroll(offset, &**layout) {
            log::debug!("Active section {:?} -> {}", change.previous, change.current);
            if links.activate(&change.current) {
                view.set_active_link(&change.current);
            }
        }
        if let Some(snapshot) = nav.on_scroll(offset) {
            view.apply_nav(snapshot);
        }
    }
}

/// Owns the section tracker and nav state behind a debouncer so a burst of
/// raw scroll events costs one layout pass.
#[derive(Clone)]
pub struct ScrollPipeline {
    state: Rc<RefCell<PipelineState>>,
    debouncer: Debouncer<f64>,
}

impl ScrollPipeline {
    pub fn new(
        config: &ScrollConfig,
        scheduler: Rc<dyn Scheduler>,
        tracker: SectionTracker,
        links: NavLinks,
        layout: Rc<dyn SectionLayout>,
        view: Rc<dyn NavView>,
    ) -> Self {
        let state = Rc::new(RefCell::new(PipelineState {
            tracker,
            nav: NavState::new(config),
            links,
            layout,
            view,
        }));
        let tick_state = Rc::clone(&state);
        let debouncer = Debouncer::new(scheduler, config.debounce_ms, move |offset: f64| {
            tick_state.borrow_mut().tick(offset)
        });
        Self { state, debouncer }
    }

    /// Raw scroll or resize event.
    pub fn on_scroll(&self, offset: f64) {
        self.debouncer.call(offset);
    }

    /// Recompute immediately, e.g. once the first layout is ready.
    pub fn sync_now(&self, offset: f64) {
        self.debouncer.cancel();
        self.state.borrow_mut().tick(offset);
    }

    pub fn active_section(&self) -> Option<String> {
        self.state.borrow().tracker.active().map(str::to_string)
    }

    pub fn active_link(&self) -> Option<String> {
        self.state.borrow().links.active().map(str::to_string)
    }

    pub fn nav_snapshot(&self) -> Option<NavSnapshot> {
        self.state.borrow().nav.snapshot()
    }
}

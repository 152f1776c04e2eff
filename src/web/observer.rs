//! `IntersectionObserver` glue for the reveal controller.

use super::surface::DomRegistry;
use crate::error::ViewportError;
use crate::reveal::{EffectKind, ElementId, RevealController};
use crate::visibility::{WatchMode, WatchOptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type EntriesCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct HostObserver {
    threshold: f64,
    root_margin: String,
    observer: IntersectionObserver,
    _callback: EntriesCallback,
}

/// Feeds intersection entries into a [`RevealController`].
///
/// One host observer is created per distinct threshold/margin pair. Elements
/// the controller releases are unobserved straight away.
#[derive(Clone)]
pub struct RevealObserver {
    controller: Rc<RefCell<RevealController>>,
    registry: Rc<DomRegistry>,
    hosts: Rc<RefCell<Vec<HostObserver>>>,
}

impl RevealObserver {
    pub fn new(controller: RevealController, registry: Rc<DomRegistry>) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            registry,
            hosts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Track `element` and start observing it.
    pub fn observe(
        &self,
        element: &Element,
        kind: EffectKind,
        mode: WatchMode,
    ) -> Result<ElementId, ViewportError> {
        let id = self.registry.register(element);
        let options = self.controller.borrow_mut().track(id, kind, mode)?;
        let Some(observer) = self.host_for(&options) else {
            return Ok(id);
        };
        observer.observe(element);
        Ok(id)
    }

    /// Stop every observer and cancel pending effects.
    pub fn teardown(&self) {
        for host in self.hosts.borrow_mut().drain(..) {
            host.observer.disconnect();
        }
        self.controller.borrow_mut().teardown();
    }

    fn host_for(&self, options: &WatchOptions) -> Option<IntersectionObserver> {
        if let Some(host) = self
            .hosts
            .borrow()
            .iter()
            .find(|h| h.threshold == options.threshold && h.root_margin == options.root_margin)
        {
            return Some(host.observer.clone());
        }

        let this = self.clone();
        let callback: EntriesCallback =
            Closure::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
                this.on_entries(entries, &observer)
            });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&wasm_bindgen::JsValue::from(options.threshold));
        init.set_root_margin(&options.root_margin);
        let created =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init);
        let observer = match created {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("IntersectionObserver unavailable: {:?}", e);
                return None;
            }
        };

        self.hosts.borrow_mut().push(HostObserver {
            threshold: options.threshold,
            root_margin: options.root_margin.clone(),
            observer: observer.clone(),
            _callback: callback,
        });
        Some(observer)
    }

    fn on_entries(&self, entries: js_sys::Array, observer: &IntersectionObserver) {
        let mut targets = Vec::new();
        let samples: Vec<(ElementId, f64)> = entries
            .iter()
            .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
            .filter_map(|entry| {
                let target = entry.target();
                let id = self.registry.lookup(&target)?;
                // An edge-touching entry can report zero while intersecting.
                let ratio = if entry.is_intersecting() {
                    entry.intersection_ratio().max(f64::MIN_POSITIVE)
                } else {
                    0.0
                };
                targets.push((id, target));
                Some((id, ratio))
            })
            .collect();

        let released = self.controller.borrow_mut().on_batch(&samples);
        for id in released {
            if let Some((_, target)) = targets.iter().find(|(t, _)| *t == id) {
                observer.unobserve(target);
            }
        }
    }
}

//! DOM implementations of the effect surface, section layout and nav view.

use crate::nav::{BarVisibility, Elevation, NavSnapshot};
use crate::pipeline::NavView;
use crate::reveal::{ChildRole, EffectSurface, ElementId, PERCENTAGE_LABEL_CLASS};
use crate::sections::SectionLayout;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlImageElement};

/// Attribute linking a DOM element back to its [`ElementId`].
pub const KEY_ATTRIBUTE: &str = "data-viewport-key";

pub(crate) fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        log::warn!("Invalid selector '{}'", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn document_query_all(selector: &str) -> Vec<Element> {
    match document().and_then(|doc| doc.document_element()) {
        Some(root) => query_all(&root, selector),
        None => Vec::new(),
    }
}

pub(crate) fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

/// Hands out stable ids for elements. Ids index into the registry, and the
/// element carries its id in [`KEY_ATTRIBUTE`] so observer entries map back.
#[derive(Default)]
pub struct DomRegistry {
    elements: RefCell<Vec<Element>>,
}

impl DomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, element: &Element) -> ElementId {
        if let Some(id) = self.lookup(element) {
            return id;
        }
        let mut elements = self.elements.borrow_mut();
        let id = ElementId(elements.len() as u32);
        let _ = element.set_attribute(KEY_ATTRIBUTE, &id.0.to_string());
        elements.push(element.clone());
        id
    }

    pub fn lookup(&self, element: &Element) -> Option<ElementId> {
        let key = element.get_attribute(KEY_ATTRIBUTE)?;
        let id = ElementId(key.parse().ok()?);
        let known = self.elements.borrow().get(id.0 as usize)? == element;
        known.then_some(id)
    }

    pub fn get(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.0 as usize).cloned()
    }
}

/// [`EffectSurface`] over real elements.
///
/// Staggered children are `.fade-in-child` descendants, bars are
/// `.skill-progress` descendants, and a bar's label is the `.skill-percentage`
/// inside the bar's grandparent.
pub struct DomSurface {
    registry: Rc<DomRegistry>,
}

impl DomSurface {
    pub fn new(registry: Rc<DomRegistry>) -> Self {
        Self { registry }
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        let element = self.registry.get(id);
        if element.is_none() {
            log::warn!("{} is not registered", id);
        }
        element
    }
}

impl EffectSurface for DomSurface {
    fn exists(&self, element: ElementId) -> bool {
        self.registry
            .get(element)
            .map(|e| e.is_connected())
            .unwrap_or(false)
    }

    fn children(&self, element: ElementId, role: ChildRole) -> Vec<ElementId> {
        let Some(root) = self.element(element) else {
            return Vec::new();
        };
        let selector = match role {
            ChildRole::Staggered => ".fade-in-child",
            ChildRole::ProgressBar => ".skill-progress",
        };
        query_all(&root, selector)
            .iter()
            .map(|child| self.registry.register(child))
            .collect()
    }

    fn label_for(&self, bar: ElementId) -> Option<ElementId> {
        let item = self.element(bar)?.parent_element()?.parent_element()?;
        let label = item
            .query_selector(&format!(".{}", PERCENTAGE_LABEL_CLASS))
            .ok()??;
        Some(self.registry.register(&label))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn text(&self, element: ElementId) -> Option<String> {
        self.element(element)?.text_content()
    }

    fn show(&self, element: ElementId) {
        if let Some(el) = self.element(element) {
            let _ = el.class_list().add_1("visible");
            set_style(&el, "opacity", "1");
            set_style(&el, "transform", "translateY(0)");
        }
    }

    fn set_width(&self, element: ElementId, percent: f64) {
        if let Some(el) = self.element(element) {
            set_style(&el, "width", &format!("{}%", percent));
        }
    }

    fn set_text(&self, element: ElementId, text: &str) {
        if let Some(el) = self.element(element) {
            el.set_text_content(Some(text));
        }
    }

    fn load_image(&self, element: ElementId, src: &str) {
        let Some(el) = self.element(element) else {
            return;
        };
        match el.dyn_ref::<HtmlImageElement>() {
            Some(img) => {
                img.set_src(src);
                let _ = img.class_list().remove_1("lazy");
                let _ = img.class_list().add_1("loaded");
            }
            None => log::warn!("{} is not an image", element),
        }
    }
}

/// Measures sections by id from `offsetTop`/`offsetHeight`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomLayout;

impl SectionLayout for DomLayout {
    fn measure(&self, id: &str) -> Option<(f64, f64)> {
        let element = document()?.get_element_by_id(id)?;
        let html = element.dyn_into::<HtmlElement>().ok()?;
        Some((f64::from(html.offset_top()), f64::from(html.offset_height())))
    }
}

/// Navbar and nav link writes.
pub struct DomNavView {
    navbar: Element,
    links: Vec<(String, Element)>,
    scroll_top: Option<Box<dyn Fn(bool)>>,
}

impl DomNavView {
    /// Links are the `.nav-link` anchors whose `href` is `#<section id>`.
    pub fn new(navbar: Element) -> Self {
        let links = document_query_all(".nav-link")
            .into_iter()
            .filter_map(|link| {
                let href = link.get_attribute("href")?;
                let id = href.strip_prefix('#')?.to_string();
                Some((id, link))
            })
            .collect();
        Self {
            navbar,
            links,
            scroll_top: None,
        }
    }

    /// Forward scroll-to-top visibility, e.g. into a widget's signal.
    pub fn with_scroll_top(mut self, on_change: impl Fn(bool) + 'static) -> Self {
        self.scroll_top = Some(Box::new(on_change));
        self
    }

    pub fn section_ids(&self) -> Vec<String> {
        self.links.iter().map(|(id, _)| id.clone()).collect()
    }
}

impl NavView for DomNavView {
    fn apply_nav(&self, snapshot: NavSnapshot) {
        let classes = self.navbar.class_list();
        let _ = match snapshot.elevation {
            Elevation::Elevated => classes.add_1("scrolled"),
            Elevation::Flat => classes.remove_1("scrolled"),
        };
        let transform = match snapshot.visibility {
            BarVisibility::Shown => "translateY(0)",
            BarVisibility::Hidden => "translateY(-100%)",
        };
        set_style(&self.navbar, "transform", transform);
        if let Some(on_change) = &self.scroll_top {
            on_change(snapshot.scroll_top_visible);
        }
    }

    fn set_active_link(&self, section_id: &str) {
        for (id, link) in &self.links {
            let _ = link.class_list().toggle_with_force("active", id == section_id);
        }
    }
}

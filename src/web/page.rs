//! Page wiring: finds the markup hooks, builds the controllers and binds
//! browser events to them.

use super::observer::RevealObserver;
use super::scheduler::BrowserScheduler;
use super::surface::{
    document, document_query_all, query_all, set_style, DomLayout, DomNavView, DomRegistry,
    DomSurface,
};
use super::widgets::{smooth_scroll_to, NotificationToast, ScrollToTop, ThemeToggle};
use crate::certs::{CertFilter, CertificateVerifier, VerifyButton, VerifyState};
use crate::config::ViewportConfig;
use crate::contact::{ContactForm, ContactMessage, FormEvent};
use crate::effects::{
    float_offset, stagger_css, ENTRANCE_OFFSET_PX, ENTRANCE_STEP_MS, HERO_ANIMATION_STEP_MS,
};
use crate::error::ViewportError;
use crate::nav::{anchor_scroll_target, MenuState, NavLinks};
use crate::notify::{NotificationCenter, Toast};
use crate::pipeline::ScrollPipeline;
use crate::reveal::{
    percentage_label, EffectKind, RevealController, PERCENTAGE_LABEL_CLASS, WIDTH_ATTRIBUTE,
};
use crate::schedule::{Lifetime, Scheduler};
use crate::sections::SectionTracker;
use crate::submit::{RandomSource, SimulatedSubmitter};
use crate::typing::{typewrite, TypeStep};
use leptos::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlButtonElement, HtmlElement, HtmlFormElement};

/// Id of the optional JSON config block.
pub const CONFIG_SCRIPT_ID: &str = "viewport-config";

const REVEAL_SELECTORS: &str = ".skill-category, .project-card, .timeline-item, .stat-item, \
     .contact-card, .about-card, .tech-item, .certification-card, .hero-text, .hero-image";
/// Elements that start lowered and slide up in document order.
const ENTRANCE_SELECTORS: &str = ".about-card, .hero-text, .hero-image";
const HERO_SELECTORS: &str = ".hero-text, .hero-image";
const ENTRANCE_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";
const LOADER_HOLD_MS: u32 = 1000;
const LOADER_FADE_MS: u32 = 500;
const FILTER_FADE_MS: u32 = 100;

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("Could not listen for '{}'", event);
    }
    closure.forget(); // Keep the closure alive
}

fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

/// Run `f` once the page has loaded, or right away if it already has.
fn on_load(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let loaded = window
        .document()
        .map(|doc| doc.ready_state() == "complete")
        .unwrap_or(false);
    if loaded {
        f();
        return;
    }
    let mut f = Some(f);
    listen(&window, "load", move |_| {
        if let Some(f) = f.take() {
            f();
        }
    });
}

/// Config from the page's JSON block. Missing block → defaults; invalid block
/// → warning and defaults.
fn load_config() -> ViewportConfig {
    let Some(script) = document().and_then(|doc| doc.get_element_by_id(CONFIG_SCRIPT_ID)) else {
        return ViewportConfig::default();
    };
    let json = script.text_content().unwrap_or_default();
    ViewportConfig::from_json(&json).unwrap_or_else(|e| {
        log::warn!("Ignoring page config (using defaults): {}", e);
        ViewportConfig::default()
    })
}

/// Build everything and bind it to the current document.
pub fn start() {
    let config = load_config();
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
    let notifications =
        NotificationCenter::new(config.notifications.clone(), Rc::clone(&scheduler));

    let (scroll_top_visible, set_scroll_top_visible) = create_signal(false);
    let (toast, set_toast) = create_signal(None::<Toast>);
    notifications.subscribe(move |t| set_toast.set(t));
    let toast_center = notifications.clone();
    mount_to_body(move || {
        view! {
            <ThemeToggle/>
            <ScrollToTop visible=scroll_top_visible/>
            <NotificationToast toast=toast center=toast_center/>
        }
    });

    show_loader(&scheduler);
    setup_menu();
    setup_anchor_links(config.scroll.anchor_offset_px);
    setup_scroll_pipeline(&config, &scheduler, move |visible| set_scroll_top_visible.set(visible));
    setup_reveal(&config, &scheduler);
    setup_contact_form(&config, &scheduler, &notifications);
    setup_certificates(&config, &scheduler, &notifications);
    setup_floating_elements();

    let typing = config.typing.clone();
    on_load(move || start_typing(&typing));
}

fn setup_scroll_pipeline(
    config: &ViewportConfig,
    scheduler: &Rc<dyn Scheduler>,
    on_scroll_top: impl Fn(bool) + 'static,
) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(navbar) = document().and_then(|doc| doc.get_element_by_id("navbar")) else {
        log::warn!("No #navbar; scroll tracking disabled");
        return;
    };
    let view = DomNavView::new(navbar).with_scroll_top(on_scroll_top);

    // Only sections with a nav link take part, so a highlight always exists.
    let mut tracker = SectionTracker::new(config.scroll.section_bias_px);
    let ids = view.section_ids();
    for id in &ids {
        if let Err(e) = tracker.register(id.as_str()) {
            log::warn!("Skipping nav link: {}", e);
        }
    }
    let links = NavLinks::new(tracker.registered().to_vec());

    let pipeline = ScrollPipeline::new(
        &config.scroll,
        Rc::clone(scheduler),
        tracker,
        links,
        Rc::new(DomLayout),
        Rc::new(view),
    );

    for event in ["scroll", "resize"] {
        let pipeline = pipeline.clone();
        listen(&window, event, move |_| pipeline.on_scroll(scroll_y()));
    }
    on_load(move || pipeline.sync_now(scroll_y()));
}

fn setup_menu() {
    let Some(doc) = document() else {
        return;
    };
    let hamburger = doc.get_element_by_id("hamburger");
    let menu = doc.get_element_by_id("nav-menu");
    let (Some(hamburger), Some(menu)) = (hamburger, menu) else {
        log::debug!("No hamburger menu on this page");
        return;
    };
    let state = Rc::new(Cell::new(MenuState::default()));

    let render = {
        let hamburger = hamburger.clone();
        let menu = menu.clone();
        move |open: bool| {
            let _ = hamburger.class_list().toggle_with_force("active", open);
            let _ = menu.class_list().toggle_with_force("active", open);
            if let Some(body) = document().and_then(|d| d.body()) {
                let _ = body.class_list().toggle_with_force("menu-open", open);
            }
        }
    };
    let render = Rc::new(render);

    {
        let state = Rc::clone(&state);
        let render = Rc::clone(&render);
        listen(&hamburger, "click", move |_| {
            let mut menu = state.get();
            let open = menu.toggle();
            state.set(menu);
            render(open);
        });
    }
    for link in document_query_all(".nav-link") {
        let state = Rc::clone(&state);
        let render = Rc::clone(&render);
        listen(&link, "click", move |_| {
            let mut menu = state.get();
            menu.close();
            state.set(menu);
            render(false);
        });
    }
}

fn setup_anchor_links(navbar_offset: f64) {
    for link in document_query_all(".nav-link[href^='#']") {
        let Some(target_id) = link
            .get_attribute("href")
            .and_then(|href| href.strip_prefix('#').map(str::to_string))
        else {
            continue;
        };
        listen(&link, "click", move |e| {
            e.prevent_default();
            let section = document()
                .and_then(|doc| doc.get_element_by_id(&target_id))
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            match section {
                Some(section) => smooth_scroll_to(anchor_scroll_target(
                    f64::from(section.offset_top()),
                    navbar_offset,
                )),
                None => log::warn!("Anchor target #{} not found", target_id),
            }
        });
    }
}

fn setup_reveal(config: &ViewportConfig, scheduler: &Rc<dyn Scheduler>) {
    let registry = Rc::new(DomRegistry::new());
    let surface = Rc::new(DomSurface::new(Rc::clone(&registry)));
    let controller = RevealController::new(config.reveal.clone(), Rc::clone(scheduler), surface);
    let observer = RevealObserver::new(controller, registry);

    let track = |element: &Element, kind: EffectKind| {
        match observer.observe(element, kind, kind.watch_mode()) {
            Ok(_) => {}
            Err(ViewportError::DuplicateElement(_)) => {}
            Err(e) => log::warn!("Not animating element: {}", e),
        }
    };

    prepare_entrances();
    for element in document_query_all(REVEAL_SELECTORS) {
        let _ = element.class_list().add_1("fade-in");
        track(&element, EffectKind::Reveal);
    }
    for element in document_query_all(".stat-number") {
        track(&element, EffectKind::Counter);
    }
    inject_skill_percentages();
    for element in document_query_all(".skills") {
        track(&element, EffectKind::ProgressBar);
    }
    for element in document_query_all("img[data-src]") {
        let _ = element.class_list().add_1("lazy");
        track(&element, EffectKind::LazyImage);
    }
}

/// Hero and about cards start lowered and slide up one after another.
fn prepare_entrances() {
    for (index, element) in document_query_all(HERO_SELECTORS).into_iter().enumerate() {
        set_style(&element, "animation-delay", &stagger_css(index, HERO_ANIMATION_STEP_MS));
    }
    let lowered = format!("translateY({}px)", ENTRANCE_OFFSET_PX);
    for (index, element) in document_query_all(ENTRANCE_SELECTORS).into_iter().enumerate() {
        set_style(&element, "opacity", "0");
        set_style(&element, "transform", &lowered);
        set_style(&element, "transition", ENTRANCE_TRANSITION);
        set_style(&element, "transition-delay", &stagger_css(index, ENTRANCE_STEP_MS));
    }
}

/// Give every skill a percentage label, seeded from its bar's width, for the
/// bar's counter to run in.
fn inject_skill_percentages() {
    let Some(doc) = document() else {
        return;
    };
    let existing = format!(".{}", PERCENTAGE_LABEL_CLASS);
    for item in document_query_all(".skill-item") {
        if matches!(item.query_selector(&existing), Ok(Some(_))) {
            continue;
        }
        let name = item.query_selector(".skill-name").ok().flatten();
        let progress = item.query_selector(".skill-progress").ok().flatten();
        let (Some(name), Some(progress)) = (name, progress) else {
            continue;
        };
        let width = progress.get_attribute(WIDTH_ATTRIBUTE).unwrap_or_default();
        let Some(text) = percentage_label(&width) else {
            log::warn!("Skill bar width '{}' is not a percentage; no label", width);
            continue;
        };
        let Ok(label) = doc.create_element("span") else {
            continue;
        };
        label.set_class_name(PERCENTAGE_LABEL_CLASS);
        label.set_text_content(Some(text));
        if name.append_child(&label).is_err() {
            log::warn!("Could not add a percentage label");
        }
    }
}

fn show_loader(scheduler: &Rc<dyn Scheduler>) {
    let Some(doc) = document() else {
        return;
    };
    let Some(body) = doc.body() else {
        return;
    };
    let Ok(loader) = doc.create_element("div") else {
        return;
    };
    loader.set_class_name("loader");
    loader.set_inner_html(
        "<div class=\"loader-content\"><div class=\"loader-spinner\"></div>\
         <p class=\"loader-text\">Loading Portfolio...</p></div>",
    );
    if body.append_child(&loader).is_err() {
        return;
    }

    let scheduler = Rc::clone(scheduler);
    on_load(move || {
        let fade_scheduler = Rc::clone(&scheduler);
        scheduler.after(
            LOADER_HOLD_MS,
            Box::new(move || {
                set_style(&loader, "opacity", "0");
                fade_scheduler.after(LOADER_FADE_MS, Box::new(move || loader.remove()));
            }),
        );
    });
}

fn start_typing(config: &crate::config::TypingConfig) {
    let Some(name) = document().and_then(|doc| doc.query_selector(".name").ok().flatten()) else {
        return;
    };
    let text = name.text_content().unwrap_or_default();
    typewrite(&BrowserScheduler, &Lifetime::new(), config, &text, move |step| match step {
        TypeStep::Begin => {
            name.set_text_content(Some(""));
            set_style(&name, "border-right", "2px solid var(--primary-600)");
        }
        TypeStep::Text(typed) => name.set_text_content(Some(&typed)),
        TypeStep::CursorOff => set_style(&name, "border-right", "none"),
    });
}

fn form_field(data: &web_sys::FormData, name: &str) -> String {
    data.get(name).as_string().unwrap_or_default()
}

fn setup_contact_form(
    config: &ViewportConfig,
    scheduler: &Rc<dyn Scheduler>,
    notifications: &NotificationCenter,
) {
    let Some(form) = document()
        .and_then(|doc| doc.get_element_by_id("contact-form"))
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };
    let submitter = Rc::new(SimulatedSubmitter::reliable(
        Rc::clone(scheduler),
        config.contact.submit_delay_ms,
    ));
    let contact = ContactForm::new(config.contact.clone(), submitter, notifications.clone());

    let target = form.clone();
    listen(&target, "submit", move |e| {
        e.prevent_default();
        let Ok(data) = web_sys::FormData::new_with_form(&form) else {
            log::warn!("Could not read the contact form");
            return;
        };
        let message = ContactMessage {
            name: form_field(&data, "name"),
            email: form_field(&data, "email"),
            subject: form_field(&data, "subject"),
            message: form_field(&data, "message"),
        };

        let button = form
            .query_selector("button[type='submit']")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        let original = button.as_ref().and_then(|b| b.text_content()).unwrap_or_default();
        let form = form.clone();
        let result = contact.submit(message, move |event| {
            let Some(button) = &button else {
                return;
            };
            match event {
                FormEvent::Sending => {
                    button.set_text_content(Some("Sending..."));
                    button.set_disabled(true);
                }
                FormEvent::Sent | FormEvent::Failed => {
                    if event == FormEvent::Sent {
                        form.reset();
                    }
                    button.set_text_content(Some(&original));
                    button.set_disabled(false);
                }
            }
        });
        if let Err(e) = result {
            log::debug!("Contact form rejected: {}", e);
        }
    });
}

fn render_verify_state(button: &Element, original: &str, state: VerifyState) {
    let (icon, background) = match state {
        VerifyState::Idle => {
            button.set_inner_html(original);
            set_style(button, "background", "");
            set_style(button, "border-color", "");
            let _ = button.class_list().remove_1("verifying");
            return;
        }
        VerifyState::Verifying => ("fas fa-spinner fa-spin", None),
        VerifyState::Verified => ("fas fa-check", Some("var(--success-500)")),
        VerifyState::Failed => ("fas fa-exclamation-triangle", Some("var(--error-500)")),
    };
    let _ = button.class_list().add_1("verifying");
    let label = state.label().unwrap_or_default();
    button.set_inner_html(&format!("<i class=\"{}\"></i> {}", icon, label));
    if let Some(color) = background {
        set_style(button, "background", color);
        set_style(button, "border-color", color);
    }
}

fn setup_certificates(
    config: &ViewportConfig,
    scheduler: &Rc<dyn Scheduler>,
    notifications: &NotificationCenter,
) {
    let random: RandomSource = Rc::new(js_sys::Math::random);
    let submitter = Rc::new(SimulatedSubmitter::new(
        Rc::clone(scheduler),
        config.certificates.verify_delay_ms,
        config.certificates.failure_rate,
        random,
    ));
    let verifier = Rc::new(CertificateVerifier::new(
        config.certificates.clone(),
        Rc::clone(scheduler),
        submitter,
        notifications.clone(),
    ));

    for (index, element) in document_query_all(".cert-verify").into_iter().enumerate() {
        let button = VerifyButton::new(format!("cert-{}", index));
        let original = Rc::new(element.inner_html());
        let verifier = Rc::clone(&verifier);
        let target = element.clone();
        listen(&target, "click", move |e| {
            e.prevent_default();
            let element = element.clone();
            let original = Rc::clone(&original);
            verifier.click(&button, move |state| render_verify_state(&element, &original, state));
        });
    }

    setup_cert_filters(scheduler, notifications);
}

fn setup_cert_filters(scheduler: &Rc<dyn Scheduler>, notifications: &NotificationCenter) {
    let buttons = Rc::new(document_query_all(".filter-btn"));
    for button in buttons.iter() {
        let filter = CertFilter::parse(&button.get_attribute("data-filter").unwrap_or_default());
        let this = button.clone();
        let buttons = Rc::clone(&buttons);
        let scheduler = Rc::clone(scheduler);
        let notifications = notifications.clone();
        listen(button, "click", move |_| {
            for other in buttons.iter() {
                let _ = other.class_list().toggle_with_force("active", other == &this);
            }
            for card in document_query_all(".certification-card") {
                let category = card.get_attribute("data-category");
                if !filter.matches(category.as_deref()) {
                    let _ = card.class_list().add_1("hidden");
                    continue;
                }
                let _ = card.class_list().remove_1("hidden");
                set_style(&card, "opacity", "0");
                set_style(&card, "transform", "translateY(20px)");
                scheduler.after(
                    FILTER_FADE_MS,
                    Box::new(move || {
                        set_style(&card, "opacity", "1");
                        set_style(&card, "transform", "translateY(0)");
                    }),
                );
            }
            notifications.info(format!("Showing {}", filter.label()));
        });
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &FrameCallback) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(closure) = callback.borrow().as_ref() {
        if window.request_animation_frame(closure.as_ref().unchecked_ref()).is_err() {
            log::warn!("requestAnimationFrame failed; floating elements stopped");
        }
    }
}

fn setup_floating_elements() {
    let Some(root) = document().and_then(|doc| doc.document_element()) else {
        return;
    };
    let elements: Vec<(Element, f64)> = query_all(&root, ".floating-element")
        .into_iter()
        .map(|el| {
            let speed = el
                .get_attribute("data-speed")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0);
            (el, speed)
        })
        .collect();
    if elements.is_empty() {
        return;
    }

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    *callback.borrow_mut() = Some(Closure::new(move |timestamp_ms: f64| {
        let time_s = timestamp_ms * 0.001;
        for (index, (element, speed)) in elements.iter().enumerate() {
            let (x, y) = float_offset(time_s, *speed, index);
            set_style(element, "transform", &format!("translate({}px, {}px)", x, y));
        }
        request_frame(&next);
    }));
    request_frame(&callback);
}

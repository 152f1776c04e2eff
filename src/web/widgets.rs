//! Widgets the page injects at startup: theme toggle, scroll-to-top button
//! and the notification toast.

use super::scheduler::BrowserScheduler;
use super::storage::LocalStorage;
use super::surface::document;
use crate::effects::{ripple_at, Rect, Ripple, RIPPLE_LIFETIME_MS};
use crate::notify::{NotificationCenter, Toast, ToastPhase};
use crate::preference::{PreferenceStore, ThemePreference};
use crate::schedule::Scheduler;
use leptos::*;

/// Body class that switches the stylesheet to the dark palette.
pub const DARK_THEME_CLASS: &str = "dark-theme";

/// Toggle the dark palette on `<body>`.
pub fn apply_theme(theme: ThemePreference) {
    let Some(body) = document().and_then(|doc| doc.body()) else {
        log::warn!("No <body>; cannot apply {} theme", theme);
        return;
    };
    let _ = body
        .class_list()
        .toggle_with_force(DARK_THEME_CLASS, theme.is_dark());
}

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let store = PreferenceStore::new(LocalStorage);
    let (theme, set_theme) = create_signal(store.get());
    let (ripples, set_ripples) = create_signal(Vec::<(u64, Ripple)>::new());
    let (hovered, set_hovered) = create_signal(false);
    let next_ripple = store_value(0_u64);
    let button = create_node_ref::<html::Button>();

    apply_theme(theme.get_untracked());

    let on_click = move |ev: ev::MouseEvent| {
        let next = store.toggle();
        apply_theme(next);
        set_theme.set(next);

        let Some(button) = button.get() else {
            return;
        };
        let bounds = button.get_bounding_client_rect();
        let ripple = ripple_at(
            f64::from(ev.client_x()),
            f64::from(ev.client_y()),
            Rect {
                left: bounds.left(),
                top: bounds.top(),
                width: bounds.width(),
                height: bounds.height(),
            },
        );
        let id = next_ripple.get_value();
        next_ripple.set_value(id + 1);
        set_ripples.update(|r| r.push((id, ripple)));
        BrowserScheduler.after(
            RIPPLE_LIFETIME_MS,
            Box::new(move || set_ripples.update(|r| r.retain(|(rid, _)| *rid != id))),
        );
    };

    view! {
        <button
            class="theme-toggle"
            aria-label="Toggle dark mode"
            node_ref=button
            style:transform=move || if hovered.get() { "scale(1.1)" } else { "scale(1)" }
            on:mouseenter=move |_| set_hovered.set(true)
            on:mouseleave=move |_| set_hovered.set(false)
            on:click=on_click
        >
            <i class=move || if theme.get().is_dark() { "fas fa-sun" } else { "fas fa-moon" }></i>
            <For
                each=move || ripples.get()
                key=|(id, _)| *id
                children=|(_, ripple)| view! {
                    <span
                        class="ripple"
                        style:left=format!("{}px", ripple.x)
                        style:top=format!("{}px", ripple.y)
                        style:width=format!("{}px", ripple.size)
                        style:height=format!("{}px", ripple.size)
                    ></span>
                }
            />
        </button>
    }
}

/// Smooth-scroll the window to `top`.
pub fn smooth_scroll_to(top: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let options = web_sys::ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

#[component]
pub fn ScrollToTop(visible: ReadSignal<bool>) -> impl IntoView {
    view! {
        <button
            class="scroll-to-top"
            class:visible=move || visible.get()
            aria-label="Scroll to top"
            on:click=move |_| smooth_scroll_to(0.0)
        >
            <i class="fas fa-arrow-up"></i>
        </button>
    }
}

#[component]
pub fn NotificationToast(
    toast: ReadSignal<Option<Toast>>,
    center: NotificationCenter,
) -> impl IntoView {
    move || {
        toast.get().map(|t| {
            let id = t.id;
            let center = center.clone();
            view! {
                <div
                    class=format!("notification {}", t.kind.class_name())
                    class:show=t.phase == ToastPhase::Shown
                    role="status"
                >
                    <div class="notification-content">
                        <span class="notification-icon">{t.kind.icon()}</span>
                        <span class="notification-message">{t.message.clone()}</span>
                        <button
                            class="notification-close"
                            aria-label="Close notification"
                            on:click=move |_| center.dismiss(id)
                        >
                            "×"
                        </button>
                    </div>
                </div>
            }
        })
    }
}

//! Panel chrome: title, pin button, resize grip, and the live stats rows.

use dioxus::prelude::*;
use serde_json::Value;

use crate::bridge;
use crate::PanelState;

/// Narrowest width the resize grip will request.
const MIN_PANEL_WIDTH: f64 = 200.0;

/// Pin button plus a grip on the left edge that drags the panel wider or
/// narrower.
#[component]
pub fn PanelHeader() -> Element {
    let state = use_context::<PanelState>();
    // (screen x at press, panel width at press)
    let mut drag: Signal<Option<(f64, f64)>> = use_signal(|| None);
    let pin_label = if (state.pinned)() { "Unpin" } else { "Pin" };

    rsx! {
        div {
            class: "panel-header",
            onmousemove: move |evt: Event<MouseData>| {
                if let Some((start_x, start_width)) = drag() {
                    let dx = start_x - evt.screen_coordinates().x;
                    let width = (start_width + dx).max(MIN_PANEL_WIDTH);
                    bridge::send_resize_panel(width as u32);
                }
            },
            onmouseup: move |_| drag.set(None),
            onmouseleave: move |_| drag.set(None),
            div {
                class: "resize-grip",
                onmousedown: move |evt: Event<MouseData>| {
                    let width = web_sys::window()
                        .and_then(|w| w.inner_width().ok())
                        .and_then(|w| w.as_f64())
                        .unwrap_or(MIN_PANEL_WIDTH);
                    drag.set(Some((evt.screen_coordinates().x, width)));
                },
            }
            span { class: "panel-title", "Cameras" }
            button {
                class: "pin-button",
                onclick: move |_| bridge::send_toggle_panel(),
                "{pin_label}"
            }
        }
    }
}

/// FPS and the camera the gizmo is attached to. Only this component
/// re-renders on the ~4 Hz stats push.
#[component]
pub fn StatsRows() -> Element {
    let state = use_context::<PanelState>();
    let stats = state.stats.read();
    let field = |key: &str| stats.as_ref().and_then(|s| s.get(key));

    let fps_text = field("fps")
        .and_then(Value::as_f64)
        .map_or_else(|| "--".to_owned(), |f| format!("{f:.0}"));
    let (target_text, target_class) = match field("target").and_then(Value::as_str) {
        Some("Green") => ("Green", "target-green"),
        Some("Red") => ("Red", "target-red"),
        _ => ("none", "target-none"),
    };

    rsx! {
        div { class: "field-row",
            label { class: "field-label", "FPS" }
            span { class: "fps-value", "{fps_text}" }
        }
        div { class: "field-row",
            label { class: "field-label", "Gizmo" }
            span { class: "target {target_class}", "{target_text}" }
        }
    }
}

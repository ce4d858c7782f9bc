//! IPC bridge between the wry webview (native) and the Dioxus WASM app.
//!
//! **Inbound** (native → WASM): the native side calls
//! `window.__triview_push_schema(json)`, `__triview_push_options`,
//! `__triview_push_stats`, and `__triview_push_panel_pinned`, which
//! dispatch `CustomEvent`s that we listen to here.
//!
//! **Outbound** (WASM → native): we call `window.ipc.postMessage(json)` to
//! send actions back to the viewer.

use dioxus::signals::{Signal, Writable};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::PanelState;

// ── Inbound listeners ────────────────────────────────────────────────────

/// Listen for `event` on the global window. Missing window or a failed
/// registration leaves the panel waiting, which is all it can do anyway.
fn listen(event: &str, handler: impl FnMut(web_sys::CustomEvent) + 'static) {
    let closure = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(handler);
    let Some(window) = web_sys::window() else {
        return;
    };
    if window
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok()
    {
        closure.forget();
    }
}

/// Listen for a JSON payload pushed as a string event detail.
fn listen_json(event: &str, mut sig: Signal<Option<Value>>) {
    listen(event, move |evt| {
        if let Some(json_str) = evt.detail().as_string() {
            if let Ok(val) = serde_json::from_str::<Value>(&json_str) {
                sig.set(Some(val));
            }
        }
    });
}

/// Route every viewer push into the matching [`PanelState`] signal. Call
/// once at app startup.
pub fn register_listeners(state: PanelState) {
    listen_json("triview-schema", state.schema);
    listen_json("triview-options", state.options);
    listen_json("triview-stats", state.stats);

    let mut pinned = state.pinned;
    listen("triview-panel-pinned", move |evt| {
        if let Some(val_str) = evt.detail().as_string() {
            pinned.set(val_str == "true");
        }
    });
}

// ── Outbound actions ─────────────────────────────────────────────────────

/// Send a `toggle_panel` action to the native viewer.
pub fn send_toggle_panel() {
    let msg = serde_json::json!({ "action": "toggle_panel" });
    post_message(&msg.to_string());
}

/// Send a `resize_panel` action to the native viewer.
pub fn send_resize_panel(width: u32) {
    let msg = serde_json::json!({ "action": "resize_panel", "width": width });
    post_message(&msg.to_string());
}

/// Send a `set_option` action addressing one leaf by its object path
/// (`["red_camera", "position", "x"]`).
pub fn send_set_option(path: &[String], value: &Value) {
    let msg = serde_json::json!({
        "action": "set_option",
        "path": path,
        "value": value,
    });
    post_message(&msg.to_string());
}

/// Call `window.ipc.postMessage(json)` to send a message to the native
/// wry IPC handler.
fn post_message(json: &str) {
    let js = format!(
        "window.ipc.postMessage('{}')",
        json.replace('\\', "\\\\").replace('\'', "\\'")
    );
    let _ = js_sys::eval(&js);
}

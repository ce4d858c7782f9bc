//! Wry webview child of the winit window.
//!
//! Creates a [`wry::WebView`] positioned at the right edge of the window,
//! loads the triview-ui WASM bundle via a custom `triview://` protocol,
//! and bridges IPC between the Dioxus web app and the native engine.

use std::borrow::Cow;
use std::sync::mpsc;

use rust_embed::RustEmbed;
use wry::http::{header::CONTENT_TYPE, Response};
use wry::{dpi, Rect, WebView, WebViewBuilder};

use crate::options::Options;

/// Embedded triview-ui dist output (built by `trunk build`).
#[derive(RustEmbed)]
#[folder = "crates/triview-ui/dist/"]
struct UiAssets;

/// Default width of the options panel in physical pixels.
pub const PANEL_WIDTH: u32 = 300;

/// Actions sent from the webview WASM app to the native engine.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Set one option leaf: `options[path[0]][path[1]]... = value`.
    SetOption {
        /// Object keys from the options root to the leaf
        /// (e.g. `["red_camera", "position", "x"]`).
        path: Vec<String>,
        /// New JSON value.
        value: serde_json::Value,
    },
    /// Pin or unpin the panel.
    TogglePanel,
    /// The user dragged the panel edge.
    ResizePanel {
        /// Requested width in physical pixels.
        width: u32,
    },
}

/// Create the wry webview as a child of the given window.
///
/// Returns `(webview, action_rx)`. The receiver yields [`UiAction`]s
/// from the WASM app.
///
/// # Errors
///
/// Returns [`wry::Error`] if the platform webview cannot be created.
pub fn create_webview<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Result<(WebView, mpsc::Receiver<UiAction>), wry::Error> {
    let (tx, rx) = mpsc::channel();

    let bounds = panel_bounds(window_width, window_height, panel_width);

    let webview = WebViewBuilder::new()
        .with_bounds(bounds)
        .with_custom_protocol("triview".into(), |_id, request| {
            let path = request.uri().path();
            // Default to index.html for the root path.
            let path = if path == "/" { "index.html" } else { &path[1..] };

            match UiAssets::get(path) {
                Some(asset) => {
                    let mime = mime_guess::from_path(path)
                        .first_or_octet_stream()
                        .to_string();
                    Response::builder()
                        .header(CONTENT_TYPE, mime)
                        .body(Cow::from(asset.data.to_vec()))
                        .unwrap_or_else(|_| {
                            Response::new(Cow::from(Vec::new()))
                        })
                }
                None => {
                    log::warn!("ui asset not found: {path}");
                    Response::builder()
                        .status(404)
                        .body(Cow::from(Vec::new()))
                        .unwrap_or_else(|_| {
                            Response::new(Cow::from(Vec::new()))
                        })
                }
            }
        })
        .with_url("triview://localhost/")
        .with_initialization_script(BRIDGE_JS)
        .with_ipc_handler(move |req| {
            match serde_json::from_str::<serde_json::Value>(req.body()) {
                Ok(msg) => match parse_action(&msg) {
                    Some(action) => {
                        let _ = tx.send(action);
                    }
                    None => log::debug!("ignored ipc message: {msg}"),
                },
                Err(e) => log::warn!("malformed ipc message: {e}"),
            }
        })
        .build_as_child(window)?;

    Ok((webview, rx))
}

/// [`Rect`] for a pinned panel of `panel_width` at the right edge.
#[must_use]
pub fn panel_bounds(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Rect {
    let width = panel_width.min(window_width);
    rect(window_width - width, 0, width, window_height)
}

/// [`Rect`] for a floating panel inset by `margin` on every side.
#[must_use]
pub fn panel_bounds_floating(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
    margin: u32,
) -> Rect {
    let width = panel_width.min(window_width.saturating_sub(2 * margin));
    rect(
        window_width.saturating_sub(width + margin),
        margin,
        width,
        window_height.saturating_sub(2 * margin),
    )
}

/// [`Rect`] parking the panel just past the right edge.
#[must_use]
pub fn panel_bounds_hidden(
    window_width: u32,
    window_height: u32,
    panel_width: u32,
) -> Rect {
    rect(window_width, 0, panel_width, window_height)
}

fn rect(x: u32, y: u32, width: u32, height: u32) -> Rect {
    Rect {
        position: dpi::Position::Physical(dpi::PhysicalPosition::new(
            x as i32, y as i32,
        )),
        size: dpi::Size::Physical(dpi::PhysicalSize::new(width, height)),
    }
}

/// Push the options JSON schema to the webview (call once after creation),
/// followed by the current values.
pub fn push_schema(webview: &WebView, options: &Options) {
    match serde_json::to_string(&Options::json_schema()) {
        Ok(json) => eval_push(webview, "__triview_push_schema", &json),
        Err(e) => log::error!("failed to serialize options schema: {e}"),
    }
    push_options(webview, options);
}

/// Push the current options values to the webview.
pub fn push_options(webview: &WebView, options: &Options) {
    match serde_json::to_string(options) {
        Ok(json) => eval_push(webview, "__triview_push_options", &json),
        Err(e) => log::error!("failed to serialize options: {e}"),
    }
}

/// Push frame statistics (`{"fps": .., "target": ..}`).
pub fn push_stats(webview: &WebView, fps: f32, target: Option<&str>) {
    let json = serde_json::json!({ "fps": fps, "target": target });
    eval_push(webview, "__triview_push_stats", &json.to_string());
}

/// Tell the panel whether it is pinned.
pub fn push_panel_pinned(webview: &WebView, pinned: bool) {
    eval_push(webview, "__triview_push_panel_pinned", &pinned.to_string());
}

fn eval_push(webview: &WebView, function: &str, payload: &str) {
    let script = format!("window.{function}('{}')", escape_js(payload));
    if let Err(e) = webview.evaluate_script(&script) {
        log::warn!("{function} failed: {e}");
    }
}

/// Escape a string for a single-quoted JS literal.
fn escape_js(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

// ── Internals ────────────────────────────────────────────────────────────

/// JavaScript injected before page load. Defines the bridge functions that
/// the native side calls, and dispatches `CustomEvent`s.
///
/// Calls that arrive before the WASM app has registered listeners are
/// buffered. When a listener attaches it replays any pending data.
const BRIDGE_JS: &str = r#"
(function() {
    var pending = {};

    function dispatch(name, json) {
        window.dispatchEvent(new CustomEvent(name, { detail: json }));
    }

    function bridge(fn, name) {
        window[fn] = function(json) {
            pending[name] = json;
            dispatch(name, json);
        };
    }

    bridge('__triview_push_schema', 'triview-schema');
    bridge('__triview_push_options', 'triview-options');
    bridge('__triview_push_stats', 'triview-stats');
    bridge('__triview_push_panel_pinned', 'triview-panel-pinned');

    // When the WASM app adds a listener, replay buffered data.
    var origAdd = EventTarget.prototype.addEventListener;
    EventTarget.prototype.addEventListener = function(type, fn, opts) {
        origAdd.call(this, type, fn, opts);
        if (this === window && pending[type] !== undefined) {
            dispatch(type, pending[type]);
        }
    };
})();
"#;

/// Parse an IPC message from the WASM side into a [`UiAction`].
fn parse_action(msg: &serde_json::Value) -> Option<UiAction> {
    let action = msg.get("action")?.as_str()?;
    match action {
        "set_option" => {
            let path = msg
                .get("path")?
                .as_array()?
                .iter()
                .map(|key| key.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()?;
            if path.is_empty() {
                return None;
            }
            let value = msg.get("value")?.clone();
            Some(UiAction::SetOption { path, value })
        }
        "toggle_panel" => Some(UiAction::TogglePanel),
        "resize_panel" => {
            let width = msg.get("width")?.as_u64()?;
            Some(UiAction::ResizePanel {
                width: u32::try_from(width).ok()?,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_set_option_paths() {
        let msg = json!({
            "action": "set_option",
            "path": ["green_camera", "position", "z"],
            "value": 2.5,
        });
        assert_eq!(
            parse_action(&msg),
            Some(UiAction::SetOption {
                path: vec![
                    "green_camera".to_owned(),
                    "position".to_owned(),
                    "z".to_owned()
                ],
                value: json!(2.5),
            })
        );
    }

    #[test]
    fn rejects_malformed_set_option() {
        let no_path = json!({ "action": "set_option", "value": 1 });
        assert_eq!(parse_action(&no_path), None);
        let empty = json!({ "action": "set_option", "path": [], "value": 1 });
        assert_eq!(parse_action(&empty), None);
        let numeric = json!({ "action": "set_option", "path": [1], "value": 1 });
        assert_eq!(parse_action(&numeric), None);
    }

    #[test]
    fn parses_panel_actions() {
        assert_eq!(
            parse_action(&json!({ "action": "toggle_panel" })),
            Some(UiAction::TogglePanel)
        );
        assert_eq!(
            parse_action(&json!({ "action": "resize_panel", "width": 420 })),
            Some(UiAction::ResizePanel { width: 420 })
        );
        assert_eq!(parse_action(&json!({ "action": "load_file" })), None);
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_js(r#"{"a":"it's \n"}"#), r#"{"a":"it\'s \\n"}"#);
    }

    #[test]
    fn pinned_bounds_hug_the_right_edge() {
        let r = panel_bounds(1280, 720, 300);
        assert_eq!(
            r.position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(980, 0))
        );
        assert_eq!(
            r.size,
            dpi::Size::Physical(dpi::PhysicalSize::new(300, 720))
        );
        // Narrow windows never get a negative x.
        let r = panel_bounds(200, 720, 300);
        assert_eq!(
            r.position,
            dpi::Position::Physical(dpi::PhysicalPosition::new(0, 0))
        );
    }
}

//! Parameter panel for the triview viewer.
//!
//! Built with `trunk` to WASM and served into a wry webview docked on the
//! viewer's right edge. The viewer pushes the options schema, the current
//! options, and a stats line; the panel answers with path-addressed option
//! edits and pin/resize requests.

mod bridge;
mod header;
mod schema_ui;

use dioxus::prelude::*;
use serde_json::Value;

/// Everything the viewer pushes into the panel, shared through context so
/// each component subscribes only to the signal it reads.
#[derive(Clone, Copy)]
pub struct PanelState {
    /// JSON schema of the panel-exposed options (sent once).
    pub schema: Signal<Option<Value>>,
    /// Current options, refreshed after every gizmo drag.
    pub options: Signal<Option<Value>>,
    /// `{ "fps": f32, "target": "Green" | "Red" | null }`.
    pub stats: Signal<Option<Value>>,
    /// Whether the panel is docked or hidden until hovered.
    pub pinned: Signal<bool>,
}

impl PanelState {
    /// Create the signals, register the bridge listeners once, and provide
    /// the state to the component tree.
    fn install() -> Self {
        let state = use_context_provider(|| Self {
            schema: Signal::new(None),
            options: Signal::new(None),
            stats: Signal::new(None),
            pinned: Signal::new(true),
        });
        use_hook(|| bridge::register_listeners(state));
        state
    }
}

fn main() {
    dioxus::launch(app);
}

fn app() -> Element {
    let state = PanelState::install();
    let schema = state.schema.read();
    let options = state.options.read();

    rsx! {
        div { class: "side-panel",
            header::PanelHeader {}
            header::StatsRows {}
            {match (&*schema, &*options) {
                (Some(s), Some(o)) => rsx! {
                    schema_ui::OptionFolders { schema: s.clone(), options: o.clone() }
                },
                _ => rsx! {
                    div {
                        style: "padding: 16px; color: #585b70;",
                        "Connecting to the viewer..."
                    }
                },
            }}
        }
    }
}

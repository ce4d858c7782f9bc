//! GUI panel controller: owns the wry webview and its state.
//!
//! `ViewerApp` holds a single `PanelController` field instead of a handful
//! of `#[cfg(feature = "gui")]` fields.

use std::sync::mpsc;

use winit::window::Window;

use super::webview::{self, UiAction};
use crate::TriviewEngine;

/// Owns the webview panel and all associated state.
pub(crate) struct PanelController {
    webview: Option<wry::WebView>,
    action_rx: Option<mpsc::Receiver<UiAction>>,
    /// Whether the options panel is pinned open (visible).
    pinned: bool,
    /// Whether the panel is temporarily revealed by a mouse hover.
    peek: bool,
    /// Current panel width in physical pixels.
    width: u32,
}

impl PanelController {
    /// Margin around the panel when floating (not pinned).
    const PANEL_MARGIN: u32 = 10;
    /// Minimum panel width for resize.
    const MIN_PANEL_WIDTH: u32 = 220;
    /// Maximum panel width for resize.
    const MAX_PANEL_WIDTH: u32 = 600;
    /// Distance from the right edge that reveals an unpinned panel.
    const PEEK_ZONE: f32 = 6.0;

    /// Create a new controller with default state (pinned, no webview yet).
    pub(crate) fn new() -> Self {
        Self {
            webview: None,
            action_rx: None,
            pinned: true,
            peek: false,
            width: webview::PANEL_WIDTH,
        }
    }

    /// Create the wry webview and push the initial schema to it.
    pub(crate) fn init_webview(
        &mut self,
        window: &Window,
        engine: &TriviewEngine,
    ) {
        let inner = window.inner_size();
        match webview::create_webview(
            window,
            inner.width,
            inner.height,
            self.width,
        ) {
            Ok((wv, rx)) => {
                webview::push_schema(&wv, engine.options());
                webview::push_panel_pinned(&wv, self.pinned);
                self.webview = Some(wv);
                self.action_rx = Some(rx);
            }
            Err(e) => {
                log::error!("Failed to create webview: {e}");
                // Continue without GUI panel
            }
        }
    }

    /// Toggle pinned state, push it to the webview, and re-layout.
    pub(crate) fn toggle(&mut self, window: &Window) {
        self.pinned = !self.pinned;
        self.peek = false;
        if let Some(ref wv) = self.webview {
            webview::push_panel_pinned(wv, self.pinned);
        }
        self.apply_layout(window);
    }

    /// Position the webview according to the current pinned/peek state.
    pub(crate) fn apply_layout(&self, window: &Window) {
        let Some(ref wv) = self.webview else {
            return;
        };
        let inner = window.inner_size();
        let bounds = if self.pinned {
            webview::panel_bounds(inner.width, inner.height, self.width)
        } else if self.peek {
            webview::panel_bounds_floating(
                inner.width,
                inner.height,
                self.width,
                Self::PANEL_MARGIN,
            )
        } else {
            webview::panel_bounds_hidden(inner.width, inner.height, self.width)
        };
        if let Err(e) = wv.set_bounds(bounds) {
            log::warn!("failed to move panel: {e}");
        }
    }

    /// Reveal an unpinned panel while the cursor is at the right edge.
    pub(crate) fn update_peek(&mut self, mouse_x: f32, window: &Window) {
        if self.pinned {
            return;
        }
        let width = window.inner_size().width as f32;
        let near_edge = mouse_x >= width - Self::PEEK_ZONE;
        let in_panel = mouse_x
            >= width - self.width as f32 - Self::PANEL_MARGIN as f32;
        let should_peek = near_edge || (self.peek && in_panel);

        if should_peek != self.peek {
            self.peek = should_peek;
            self.apply_layout(window);
        }
    }

    /// Drain IPC actions from the webview, apply them to the engine, and
    /// handle panel toggle/resize. Then push fresh values if the engine
    /// changed options on its own (gizmo drag, scroll).
    pub(crate) fn drain_and_apply(
        &mut self,
        engine: &mut TriviewEngine,
        window: &Window,
    ) {
        let mut toggled = false;
        let mut resize_width: Option<u32> = None;

        if let Some(ref rx) = self.action_rx {
            while let Ok(action) = rx.try_recv() {
                match action {
                    UiAction::SetOption { path, value } => {
                        if let Err(e) = engine.set_option(&path, value) {
                            log::warn!("{e}");
                        }
                    }
                    UiAction::TogglePanel => toggled = !toggled,
                    UiAction::ResizePanel { width } => {
                        resize_width = Some(width);
                    }
                }
            }
        }

        if toggled {
            self.toggle(window);
        }
        if let Some(w) = resize_width {
            let clamped = w.clamp(Self::MIN_PANEL_WIDTH, Self::MAX_PANEL_WIDTH);
            if clamped != self.width {
                self.width = clamped;
                self.apply_layout(window);
            }
        }

        if engine.take_options_dirty() {
            if let Some(ref wv) = self.webview {
                webview::push_options(wv, engine.options());
            }
        }
    }

    /// Push FPS and the gizmo target to the webview at ~4 Hz.
    pub(crate) fn push_stats_if_due(&self, engine: &mut TriviewEngine) {
        let Some(ref wv) = self.webview else {
            return;
        };
        if engine.stats_due() {
            let target = engine.gizmo_target().map(|t| format!("{t:?}"));
            webview::push_stats(wv, engine.fps(), target.as_deref());
        }
    }
}

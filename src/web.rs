//! Browser entry point.
//!
//! `start(canvas_id)` creates the engine on an existing `<canvas>`, hooks
//! pointer, wheel, and keyboard listeners, and drives frames with
//! `requestAnimationFrame`. The host page reads and writes options through
//! the returned [`WebHandle`], the same JSON the native panel uses.
//!
//! ```js
//! import init, { start } from "./triview.js";
//! await init();
//! const handle = await start("scene");
//! handle.set_option("red_camera.position.x", "2.5");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, WheelEvent};

use crate::error::TriviewError;
use crate::input::{InputEvent, MouseButton};
use crate::options::Options;
use crate::TriviewEngine;

/// `WheelEvent.deltaMode` for pixel deltas.
const DOM_DELTA_PIXEL: u32 = 0;
/// Pixel-delta wheel events are scaled to roughly one line per 100 px.
const PIXELS_PER_LINE: f32 = 100.0;

type SharedEngine = Rc<RefCell<TriviewEngine>>;

impl From<TriviewError> for JsValue {
    fn from(e: TriviewError) -> Self {
        Self::from_str(&e.to_string())
    }
}

/// Handle returned to the host page.
#[wasm_bindgen]
pub struct WebHandle {
    engine: SharedEngine,
}

#[wasm_bindgen]
impl WebHandle {
    /// Current options as JSON.
    ///
    /// # Errors
    ///
    /// Returns a JS error string if serialization fails.
    pub fn options_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.borrow().options())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// JSON schema describing the panel-exposed options.
    ///
    /// # Errors
    ///
    /// Returns a JS error string if serialization fails.
    pub fn schema_json() -> Result<String, JsValue> {
        serde_json::to_string(&Options::json_schema())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set one option leaf. `path` is dot-separated
    /// (`"green_camera.position.y"`), `value_json` is any JSON value.
    ///
    /// # Errors
    ///
    /// Returns a JS error string if the value is not JSON or does not fit
    /// the addressed field.
    pub fn set_option(&self, path: &str, value_json: &str) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_json::from_str(value_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let path: Vec<String> = path.split('.').map(str::to_owned).collect();
        self.engine.borrow_mut().set_option(&path, value)?;
        Ok(())
    }

    /// Whether the gizmo or wheel changed options since the last call.
    /// Host pages poll this to refresh their own controls.
    pub fn take_options_dirty(&self) -> bool {
        self.engine.borrow_mut().take_options_dirty()
    }

    /// Run the action bound to a `KeyboardEvent.code`.
    pub fn press_key(&self, code: &str) -> bool {
        self.engine.borrow_mut().handle_key_press(code)
    }
}

/// Create the engine on the canvas with id `canvas_id` and start the
/// frame loop.
///
/// # Errors
///
/// Returns a JS error string if the canvas is missing or GPU setup fails.
#[allow(clippy::needless_pass_by_value)]
#[wasm_bindgen]
pub async fn start(canvas_id: String) -> Result<WebHandle, JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already initialised");
    }

    let canvas = find_canvas(&canvas_id)?;
    let size = canvas_pixel_size(&canvas);
    canvas.set_width(size.0);
    canvas.set_height(size.1);

    let engine = TriviewEngine::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        size,
    )
    .await?;
    let engine = Rc::new(RefCell::new(engine));

    attach_listeners(&canvas, &engine)?;
    start_frame_loop(canvas, engine.clone());

    log::info!("triview started on #{canvas_id}");
    Ok(WebHandle { engine })
}

fn find_canvas(id: &str) -> Result<HtmlCanvasElement, TriviewError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| TriviewError::Web(format!("no element #{id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| TriviewError::Web(format!("#{id} is not a canvas")))
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Drawing-buffer size matching the canvas's CSS box at device resolution.
fn canvas_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let dpr = device_pixel_ratio();
    let w = (f64::from(canvas.client_width()) * dpr) as u32;
    let h = (f64::from(canvas.client_height()) * dpr) as u32;
    (w.max(1), h.max(1))
}

/// Pointer position in drawing-buffer pixels.
fn pointer_position(event: &PointerEvent) -> InputEvent {
    let dpr = device_pixel_ratio();
    InputEvent::CursorMoved {
        x: (f64::from(event.offset_x()) * dpr) as f32,
        y: (f64::from(event.offset_y()) * dpr) as f32,
    }
}

/// The browser took the pointer away (touch scroll, lost capture): treat
/// it as a primary-button release so any drag ends.
fn cancel_event() -> InputEvent {
    InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: false,
    }
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), TriviewError> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target
        .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        .map_err(|_| TriviewError::Web(format!("failed to add {name} listener")))?;
    closure.forget();
    Ok(())
}

fn attach_listeners(
    canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
) -> Result<(), TriviewError> {
    let e = engine.clone();
    listen(canvas, "pointermove", move |event: PointerEvent| {
        e.borrow_mut().handle_input(pointer_position(&event));
    })?;

    // Capture on press so the release still reaches the canvas when the
    // button comes up outside it; otherwise a drag would never end.
    let e = engine.clone();
    let target = canvas.clone();
    listen(canvas, "pointerdown", move |event: PointerEvent| {
        if target.set_pointer_capture(event.pointer_id()).is_err() {
            log::debug!("pointer capture refused");
        }
        let mut engine = e.borrow_mut();
        engine.handle_input(pointer_position(&event));
        engine.handle_input(InputEvent::MouseButton {
            button: MouseButton::from_dom(event.button()),
            pressed: true,
        });
    })?;

    let e = engine.clone();
    let target = canvas.clone();
    listen(canvas, "pointerup", move |event: PointerEvent| {
        if target.has_pointer_capture(event.pointer_id()) {
            let _ = target.release_pointer_capture(event.pointer_id());
        }
        e.borrow_mut().handle_input(InputEvent::MouseButton {
            button: MouseButton::from_dom(event.button()),
            pressed: false,
        });
    })?;

    let e = engine.clone();
    listen(canvas, "pointercancel", move |_: PointerEvent| {
        e.borrow_mut().handle_input(cancel_event());
    })?;

    let e = engine.clone();
    listen(canvas, "wheel", move |event: WheelEvent| {
        event.prevent_default();
        let dy = event.delta_y() as f32;
        let lines = if event.delta_mode() == DOM_DELTA_PIXEL {
            dy / PIXELS_PER_LINE
        } else {
            dy
        };
        // DOM deltaY grows when scrolling down (away from the scene).
        e.borrow_mut().handle_input(InputEvent::Scroll { delta: -lines });
    })?;

    let window = web_sys::window()
        .ok_or_else(|| TriviewError::Web("no global window".to_owned()))?;
    let e = engine.clone();
    listen(&window, "keydown", move |event: KeyboardEvent| {
        if !event.repeat() && e.borrow_mut().handle_key_press(&event.code()) {
            event.prevent_default();
        }
    })?;

    Ok(())
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) {
    let requested = web_sys::window().map(|w| {
        w.request_animation_frame(callback.as_ref().unchecked_ref())
    });
    if !matches!(requested, Some(Ok(_))) {
        log::error!("requestAnimationFrame failed; frame loop stopped");
    }
}

/// Render once per animation frame, following canvas size changes.
fn start_frame_loop(canvas: HtmlCanvasElement, engine: SharedEngine) {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
        Rc::new(RefCell::new(None));
    let next = slot.clone();

    *slot.borrow_mut() = Some(Closure::new(move || {
        let (w, h) = canvas_pixel_size(&canvas);
        {
            let mut engine = engine.borrow_mut();
            if (w, h) != (canvas.width(), canvas.height()) {
                canvas.set_width(w);
                canvas.set_height(h);
                engine.resize(w, h);
            }
            match engine.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    engine.resize(w, h);
                }
                Err(e) => log::error!("render error: {e:?}"),
            }
        }
        if let Some(callback) = next.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }));

    if let Some(callback) = slot.borrow().as_ref() {
        request_animation_frame(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::TriviewCommand;
    use crate::input::InputProcessor;

    #[test]
    fn cancel_ends_a_press() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 20.0 });
        let pressed = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::from_dom(0),
            pressed: true,
        });
        assert!(matches!(pressed, Some(TriviewCommand::PointerPressed { .. })));
        assert!(input.mouse_pressed());

        assert_eq!(
            input.handle_event(cancel_event()),
            Some(TriviewCommand::PointerReleased)
        );
        assert!(!input.mouse_pressed());
    }

    #[test]
    fn cancel_without_a_press_is_ignored() {
        let mut input = InputProcessor::new();
        assert_eq!(input.handle_event(cancel_event()), None);
    }
}

//! Engine: owns the GPU context, scene, cameras, and gizmo, and applies commands.

pub mod command;
mod controller;

use std::path::Path;

use web_time::{Duration, Instant};

use self::command::TriviewCommand;
use self::controller::SceneController;
use crate::error::TriviewError;
use crate::gizmo::Axis;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTarget;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::scene::{SceneState, TrackedCamera};
use crate::util::frame_timing::FrameTiming;
use crate::viewport::ViewLayout;

/// How often [`TriviewEngine::stats_due`] fires.
const STATS_INTERVAL: Duration = Duration::from_millis(250);

/// The three-viewport demo engine.
///
/// Owns the GPU context and renderer plus the interactive state: the
/// position records, the cameras and cones derived from them, and the
/// translate gizmo.
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to draw and present. Call
/// [`resize`](Self::resize) when the window size changes. Raw input is
/// forwarded via [`handle_input`](Self::handle_input) and
/// [`handle_key_press`](Self::handle_key_press); anything else is a
/// [`TriviewCommand`] passed to [`execute`](Self::execute).
///
/// # Options
///
/// Panel edits arrive through [`set_option`](Self::set_option). When the
/// gizmo or the scroll wheel changes a record instead,
/// [`take_options_dirty`](Self::take_options_dirty) reports it once so the
/// caller can push fresh values to the panel.
pub struct TriviewEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    renderer: SceneRenderer,
    depth: DepthTarget,
    controller: SceneController,
    input: InputProcessor,
    frame_timing: FrameTiming,
}

impl TriviewEngine {
    /// Engine with default options.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError`] if GPU initialization or shader composition
    /// fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, TriviewError> {
        Self::with_options(window, size, Options::default()).await
    }

    /// Engine starting from the given options.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError`] if GPU initialization or shader composition
    /// fails.
    pub async fn with_options(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, TriviewError> {
        let context = RenderContext::new(window, size).await?;
        let (width, height) = context.size();
        let renderer = SceneRenderer::new(&context, &options.lighting)?;
        let depth = DepthTarget::new(&context.device, width, height);
        let input = InputProcessor::with_key_bindings(options.keybindings.clone());
        log::info!("engine ready at {width}x{height}");
        Ok(Self {
            renderer,
            depth,
            controller: SceneController::new(options, width, height),
            input,
            frame_timing: FrameTiming::new(STATS_INTERVAL),
            context,
        })
    }

    /// Draw all three views and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the next frame cannot be acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let gizmo = self.controller.gizmo_vertices();
        self.renderer.prepare(
            &self.context,
            self.controller.scene(),
            &self.controller.options().lighting,
            &gizmo,
        );

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        self.renderer.encode(
            &mut encoder,
            &view,
            &self.depth.view,
            self.controller.layout(),
        );
        self.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Resize the surface, depth buffer, and view layout. Zero-sized
    /// dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.depth = DepthTarget::new(&self.context.device, width, height);
            self.controller.resize(width, height);
        }
    }

    /// Process a platform-agnostic input event.
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle_event(event) {
            self.execute(command);
        }
    }

    /// Run the action bound to `key` (winit `KeyCode` debug name or DOM
    /// `KeyboardEvent.code`). Returns whether the key was bound.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        match self.input.handle_key_press(key) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Perform a command.
    pub fn execute(&mut self, command: TriviewCommand) {
        log::trace!("execute {command:?}");
        self.controller.execute(command);
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        self.controller.options()
    }

    /// Replace all options.
    pub fn set_options(&mut self, options: Options) {
        self.input.set_key_bindings(options.keybindings.clone());
        self.controller.set_options(options);
    }

    /// Apply one panel edit (`["green_camera", "position", "x"]`).
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::OptionPath`] if the path or value does not
    /// fit the options.
    pub fn set_option(
        &mut self,
        path: &[String],
        value: serde_json::Value,
    ) -> Result<(), TriviewError> {
        self.controller.set_option(path, value)
    }

    /// Whether the gizmo or scroll wheel changed options since the last
    /// call.
    pub fn take_options_dirty(&mut self) -> bool {
        self.controller.take_options_dirty()
    }

    /// Load a named options preset from `presets_dir`.
    /// Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match Options::load(&path) {
            Ok(opts) => {
                log::info!("Loaded options preset '{name}'");
                self.set_options(opts);
                true
            }
            Err(e) => {
                log::error!("Failed to load options preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named preset in `presets_dir`.
    /// Returns true on success.
    pub fn save_preset(&self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match self.options().save(&path) {
            Ok(()) => {
                log::info!("Saved options preset '{name}'");
                true
            }
            Err(e) => {
                log::error!("Failed to save options preset '{name}': {e}");
                false
            }
        }
    }

    /// Cameras and cone poses for the current frame.
    #[must_use]
    pub fn scene(&self) -> &SceneState {
        self.controller.scene()
    }

    /// Current viewport layout.
    #[must_use]
    pub fn layout(&self) -> &ViewLayout {
        self.controller.layout()
    }

    /// The cone the gizmo is attached to.
    #[must_use]
    pub fn gizmo_target(&self) -> Option<TrackedCamera> {
        self.controller.gizmo().target()
    }

    /// The gizmo handle under the pointer or being dragged.
    #[must_use]
    pub fn gizmo_axis(&self) -> Option<Axis> {
        self.controller.gizmo().hovered()
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Returns `true` at most once per stats interval (about 4 Hz).
    pub fn stats_due(&mut self) -> bool {
        self.frame_timing.report_due(Instant::now())
    }
}

//! GPU-free half of the engine: options, derived scene state, view
//! layout, and the translate gizmo.
//!
//! Everything a command can change lives here, so the whole interaction
//! model can be driven and checked without a device.

use glam::{Vec2, Vec3};

use super::command::TriviewCommand;
use crate::error::TriviewError;
use crate::gizmo::{GizmoVertex, Ray, TranslateGizmo};
use crate::options::{OverviewOptions, Options};
use crate::scene::SceneState;
use crate::viewport::{ViewId, ViewLayout};

/// Options, scene, layout, and gizmo for one window.
pub(crate) struct SceneController {
    options: Options,
    /// Set when something other than the panel changed `options`.
    options_dirty: bool,
    scene: SceneState,
    layout: ViewLayout,
    gizmo: TranslateGizmo,
}

impl SceneController {
    pub(crate) fn new(options: Options, width: u32, height: u32) -> Self {
        let layout = ViewLayout::new(width, height);
        let scene = SceneState::new(&options, &layout);
        Self {
            options,
            options_dirty: false,
            scene,
            layout,
            gizmo: TranslateGizmo::new(),
        }
    }

    pub(crate) fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub(crate) fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub(crate) fn gizmo(&self) -> &TranslateGizmo {
        &self.gizmo
    }

    /// Replace every option and re-derive the scene.
    pub(crate) fn set_options(&mut self, options: Options) {
        self.options = options;
        self.refresh();
    }

    /// Apply a panel edit addressed by JSON path.
    pub(crate) fn set_option(
        &mut self,
        path: &[String],
        value: serde_json::Value,
    ) -> Result<(), TriviewError> {
        let updated = self.options.with_value_at(path, value)?;
        self.set_options(updated);
        Ok(())
    }

    /// Whether options changed outside the panel since the last call.
    pub(crate) fn take_options_dirty(&mut self) -> bool {
        std::mem::take(&mut self.options_dirty)
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.layout = ViewLayout::new(width, height);
        self.refresh();
    }

    /// Re-derive cameras and cones from the position records.
    pub(crate) fn refresh(&mut self) {
        self.scene.update(&self.options, &self.layout);
    }

    pub(crate) fn execute(&mut self, command: TriviewCommand) {
        match command {
            TriviewCommand::Select { camera } => self.gizmo.attach(camera),
            TriviewCommand::Deselect => self.gizmo.detach(),
            TriviewCommand::PointerMoved { position } => {
                self.pointer_moved(position);
            }
            TriviewCommand::PointerPressed { position } => {
                self.pointer_pressed(position);
            }
            TriviewCommand::PointerReleased => self.gizmo.end_drag(),
            TriviewCommand::DollyOverview { delta } => self.dolly(delta),
        }
    }

    /// Gizmo line vertices for this frame (empty when detached).
    pub(crate) fn gizmo_vertices(&self) -> Vec<GizmoVertex> {
        match self.gizmo_anchor() {
            Some((origin, eye)) => self.gizmo.line_vertices(origin, eye),
            None => Vec::new(),
        }
    }

    /// Gizmo origin (the target cone's raw position) and the overview eye.
    fn gizmo_anchor(&self) -> Option<(Vec3, Vec3)> {
        let target = self.gizmo.target()?;
        let origin = self.scene.cone(target).position;
        let eye = self.scene.camera(ViewId::Overview).eye;
        Some((origin, eye))
    }

    /// World ray under the cursor, cast through the overview camera with
    /// NDC measured against the overview rectangle.
    fn overview_ray(&self, cursor: Vec2) -> Option<Ray> {
        let rect = self.layout.rect(ViewId::Overview);
        if rect.is_empty() {
            return None;
        }
        let inv_view_proj =
            self.scene.camera(ViewId::Overview).build_matrix().inverse();
        Ray::from_ndc(rect.pointer_ndc(cursor), inv_view_proj)
    }

    fn pointer_moved(&mut self, cursor: Vec2) {
        let Some((origin, eye)) = self.gizmo_anchor() else {
            return;
        };
        let ray = self.overview_ray(cursor);
        if !self.gizmo.is_dragging() {
            self.gizmo.hover(ray.as_ref(), origin, eye);
            return;
        }
        let Some(target) = self.gizmo.target() else {
            return;
        };
        if let Some(position) = ray.and_then(|r| self.gizmo.drag_to(&r)) {
            self.options.tracked_mut(target).position = position.into();
            self.options_dirty = true;
            self.refresh();
        }
    }

    fn pointer_pressed(&mut self, cursor: Vec2) {
        let Some((origin, eye)) = self.gizmo_anchor() else {
            return;
        };
        if let Some(ray) = self.overview_ray(cursor) {
            if self.gizmo.begin_drag(&ray, origin, eye) {
                log::debug!("gizmo drag started on {:?}", self.gizmo.hovered());
            }
        }
    }

    fn dolly(&mut self, delta: f32) {
        let z = (self.options.overview.z + delta)
            .clamp(OverviewOptions::MIN_Z, OverviewOptions::MAX_Z);
        if z != self.options.overview.z {
            self.options.overview.z = z;
            self.options_dirty = true;
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gizmo::Axis;
    use crate::scene::TrackedCamera;

    /// Cursor position (physical pixels) that lands on `world` in the
    /// overview view.
    fn overview_pixel(controller: &SceneController, world: Vec3) -> Vec2 {
        let rect = controller.layout().rect(ViewId::Overview);
        let ndc = controller
            .scene()
            .camera(ViewId::Overview)
            .build_matrix()
            .project_point3(world);
        Vec2::new(
            rect.x as f32 + (ndc.x + 1.0) * 0.5 * rect.width as f32,
            rect.y as f32 + (1.0 - ndc.y) * 0.5 * rect.height as f32,
        )
    }

    fn handle_midpoint(controller: &SceneController, axis: Axis) -> Vec3 {
        let target = controller.gizmo().target().unwrap();
        let origin = controller.scene().cone(target).position;
        let eye = controller.scene().camera(ViewId::Overview).eye;
        origin + axis.direction() * TranslateGizmo::handle_length(origin, eye) * 0.5
    }

    fn controller() -> SceneController {
        SceneController::new(Options::default(), 1280, 720)
    }

    #[test]
    fn select_and_deselect_attach_the_gizmo() {
        let mut c = controller();
        assert!(c.gizmo_vertices().is_empty());
        c.execute(TriviewCommand::Select {
            camera: TrackedCamera::Red,
        });
        assert_eq!(c.gizmo().target(), Some(TrackedCamera::Red));
        let lines = c.gizmo_vertices();
        assert_eq!(lines.len(), 6);
        assert_eq!(Vec3::from(lines[0].position), Vec3::new(-5.0, 5.0, 5.0));
        c.execute(TriviewCommand::Deselect);
        assert_eq!(c.gizmo().target(), None);
        assert!(c.gizmo_vertices().is_empty());
    }

    #[test]
    fn hovering_a_handle_highlights_it() {
        let mut c = controller();
        c.execute(TriviewCommand::Select {
            camera: TrackedCamera::Green,
        });
        let over_y = overview_pixel(&c, handle_midpoint(&c, Axis::Y));
        c.execute(TriviewCommand::PointerMoved { position: over_y });
        assert_eq!(c.gizmo().hovered(), Some(Axis::Y));

        c.execute(TriviewCommand::PointerMoved {
            position: Vec2::new(5.0, 5.0),
        });
        assert_eq!(c.gizmo().hovered(), None);
    }

    #[test]
    fn dragging_moves_the_record_along_one_axis() {
        let mut c = controller();
        c.execute(TriviewCommand::Select {
            camera: TrackedCamera::Green,
        });
        let grab = handle_midpoint(&c, Axis::X);
        c.execute(TriviewCommand::PointerPressed {
            position: overview_pixel(&c, grab),
        });
        assert!(c.gizmo().is_dragging());

        let to = grab + Vec3::new(1.5, 0.0, 0.0);
        c.execute(TriviewCommand::PointerMoved {
            position: overview_pixel(&c, to),
        });
        let moved = Vec3::from(c.options().green_camera.position);
        assert!((moved - Vec3::new(6.5, 5.0, 5.0)).length() < 1e-2, "{moved:?}");
        assert!(c.take_options_dirty());
        assert!(!c.take_options_dirty());

        // Camera and cone follow the record.
        assert!((c.scene().camera(ViewId::Green).eye - moved).length() < 1e-6);
        assert_eq!(c.scene().cone(TrackedCamera::Green).position, moved);
        // The other camera is untouched.
        assert_eq!(c.options().red_camera, Options::default().red_camera);

        c.execute(TriviewCommand::PointerReleased);
        assert!(!c.gizmo().is_dragging());
        c.execute(TriviewCommand::PointerMoved {
            position: overview_pixel(&c, to + Vec3::X),
        });
        assert_eq!(Vec3::from(c.options().green_camera.position), moved);
    }

    #[test]
    fn pressing_off_the_handles_does_not_drag() {
        let mut c = controller();
        c.execute(TriviewCommand::Select {
            camera: TrackedCamera::Green,
        });
        c.execute(TriviewCommand::PointerPressed {
            position: Vec2::new(10.0, 10.0),
        });
        assert!(!c.gizmo().is_dragging());
        assert!(!c.take_options_dirty());
    }

    #[test]
    fn pointer_without_target_is_ignored() {
        let mut c = controller();
        let somewhere = overview_pixel(&c, Vec3::new(5.0, 5.0, 5.0));
        c.execute(TriviewCommand::PointerPressed {
            position: somewhere,
        });
        c.execute(TriviewCommand::PointerMoved {
            position: somewhere + Vec2::X * 40.0,
        });
        assert_eq!(c.options(), &Options::default());
    }

    #[test]
    fn dragged_cone_may_leave_the_clamp_range() {
        let mut c = controller();
        let mut opts = Options::default();
        opts.green_camera.position = Vec3::new(19.0, 0.0, 0.0).into();
        c.set_options(opts);
        c.execute(TriviewCommand::Select {
            camera: TrackedCamera::Green,
        });
        let grab = handle_midpoint(&c, Axis::X);
        c.execute(TriviewCommand::PointerPressed {
            position: overview_pixel(&c, grab),
        });
        c.execute(TriviewCommand::PointerMoved {
            position: overview_pixel(&c, grab + Vec3::X * 3.0),
        });
        let raw = c.scene().cone(TrackedCamera::Green).position;
        assert!(raw.x > 21.0, "{raw:?}");
        assert_eq!(c.scene().camera(ViewId::Green).eye.x, 20.0);
    }

    #[test]
    fn dolly_is_clamped_to_the_panel_range() {
        let mut c = controller();
        c.execute(TriviewCommand::DollyOverview { delta: -3.0 });
        assert_eq!(c.options().overview.z, 37.0);
        assert!(c.take_options_dirty());
        assert_eq!(c.scene().camera(ViewId::Overview).eye.z, 37.0);

        c.execute(TriviewCommand::DollyOverview { delta: 100.0 });
        assert_eq!(c.options().overview.z, OverviewOptions::MAX_Z);
        c.execute(TriviewCommand::DollyOverview { delta: -100.0 });
        assert_eq!(c.options().overview.z, OverviewOptions::MIN_Z);
        let _ = c.take_options_dirty();
        c.execute(TriviewCommand::DollyOverview { delta: -1.0 });
        assert!(!c.take_options_dirty());
    }

    #[test]
    fn panel_edits_update_the_scene_without_marking_dirty() {
        let mut c = controller();
        c.set_option(
            &["red_camera".to_owned(), "position".to_owned(), "x".to_owned()],
            serde_json::json!(-8.0),
        )
        .unwrap();
        assert_eq!(c.scene().camera(ViewId::Red).eye.x, -8.0);
        assert!(!c.take_options_dirty());

        let bad = c.set_option(&["nope".to_owned()], serde_json::json!(1));
        assert!(bad.is_err());
    }

    #[test]
    fn resize_updates_layout_and_aspect() {
        let mut c = controller();
        c.resize(800, 800);
        assert_eq!(c.layout().window_size(), (800, 800));
        assert!((c.scene().camera(ViewId::Overview).aspect - 0.5).abs() < 1e-6);
    }
}

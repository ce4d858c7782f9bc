//! Single-purpose translate gizmo.
//!
//! Three axis handles are anchored on the selected cone. Hovering picks the
//! handle nearest the pointer ray; dragging slides the target along that
//! handle's world axis. Handles scale with distance from the viewing eye so
//! their on-screen size stays fixed.

/// World-space rays and closest-point queries.
pub mod ray;

use glam::Vec3;

pub use self::ray::Ray;
use crate::scene::TrackedCamera;
use crate::util::color::hex_to_linear;

/// Handle length as a fraction of the eye-to-gizmo distance.
const HANDLE_SCALE: f32 = 0.08;
/// Pick radius as a fraction of the handle length.
const PICK_RADIUS: f32 = 0.1;
/// Colour of the hovered or grabbed handle.
const ACTIVE_COLOR: u32 = 0x00ff_ff00;

/// A world axis the gizmo can translate along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// World X.
    X,
    /// World Y.
    Y,
    /// World Z.
    Z,
}

impl Axis {
    /// All three axes.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit direction.
    #[must_use]
    pub fn direction(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Handle colour at rest (sRGB).
    #[must_use]
    pub fn color(self) -> u32 {
        match self {
            Self::X => 0x00ff_0000,
            Self::Y => 0x0000_ff00,
            Self::Z => 0x0000_00ff,
        }
    }
}

/// Line vertex for the gizmo pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GizmoVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGBA colour.
    pub color: [f32; 4],
}

impl GizmoVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    /// Vertex buffer layout matching `gizmo.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// An in-progress drag along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    axis: Axis,
    /// Target position when the drag began.
    start: Vec3,
    /// Axis parameter under the pointer when the drag began.
    grab: f32,
}

/// Translate gizmo state: which cone it is attached to, which handle is
/// hovered, and any drag in progress.
#[derive(Debug, Clone, Default)]
pub struct TranslateGizmo {
    target: Option<TrackedCamera>,
    hovered: Option<Axis>,
    drag: Option<Drag>,
}

impl TranslateGizmo {
    /// Detached gizmo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to a tracked camera's cone, cancelling any drag.
    pub fn attach(&mut self, camera: TrackedCamera) {
        if self.target != Some(camera) {
            log::debug!("gizmo attached to {camera:?}");
        }
        self.target = Some(camera);
        self.hovered = None;
        self.drag = None;
    }

    /// Detach from any cone.
    pub fn detach(&mut self) {
        self.target = None;
        self.hovered = None;
        self.drag = None;
    }

    /// The cone the gizmo is attached to.
    #[must_use]
    pub fn target(&self) -> Option<TrackedCamera> {
        self.target
    }

    /// Handle under the pointer (or being dragged).
    #[must_use]
    pub fn hovered(&self) -> Option<Axis> {
        self.drag.map(|d| d.axis).or(self.hovered)
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handle length for a gizmo at `origin` seen from `eye`.
    #[must_use]
    pub fn handle_length(origin: Vec3, eye: Vec3) -> f32 {
        origin.distance(eye).max(f32::EPSILON) * HANDLE_SCALE
    }

    /// The handle nearest `ray`, if within pick distance.
    #[must_use]
    pub fn pick(ray: &Ray, origin: Vec3, eye: Vec3) -> Option<Axis> {
        let length = Self::handle_length(origin, eye);
        let radius = length * PICK_RADIUS;
        Axis::ALL
            .into_iter()
            .map(|axis| {
                let end = origin + axis.direction() * length;
                (axis, ray.distance_to_segment(origin, end))
            })
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(axis, _)| axis)
    }

    /// Refresh the hovered handle. Ignored while dragging or detached.
    pub fn hover(&mut self, ray: Option<&Ray>, origin: Vec3, eye: Vec3) {
        if self.target.is_none() || self.drag.is_some() {
            return;
        }
        self.hovered = ray.and_then(|r| Self::pick(r, origin, eye));
    }

    /// Start dragging if the pointer ray grabs a handle. Returns whether a
    /// drag began.
    pub fn begin_drag(&mut self, ray: &Ray, origin: Vec3, eye: Vec3) -> bool {
        if self.target.is_none() {
            return false;
        }
        let Some(axis) = Self::pick(ray, origin, eye) else {
            return false;
        };
        let Some((_, grab)) = ray.closest_params(origin, axis.direction())
        else {
            return false;
        };
        self.hovered = Some(axis);
        self.drag = Some(Drag {
            axis,
            start: origin,
            grab,
        });
        true
    }

    /// New target position for the pointer ray, or `None` if not dragging
    /// or the ray runs parallel to the grabbed axis.
    #[must_use]
    pub fn drag_to(&self, ray: &Ray) -> Option<Vec3> {
        let drag = self.drag?;
        let dir = drag.axis.direction();
        let (_, t) = ray.closest_params(drag.start, dir)?;
        Some(drag.start + dir * (t - drag.grab))
    }

    /// Finish the current drag.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Line-list vertices for the three handles at `origin`.
    #[must_use]
    pub fn line_vertices(&self, origin: Vec3, eye: Vec3) -> Vec<GizmoVertex> {
        if self.target.is_none() {
            return Vec::new();
        }
        let length = Self::handle_length(origin, eye);
        let active = self.hovered();
        Axis::ALL
            .into_iter()
            .flat_map(|axis| {
                let hex = if active == Some(axis) {
                    ACTIVE_COLOR
                } else {
                    axis.color()
                };
                let [r, g, b] = hex_to_linear(hex);
                let color = [r, g, b, 1.0];
                let end = origin + axis.direction() * length;
                [
                    GizmoVertex {
                        position: origin.to_array(),
                        color,
                    },
                    GizmoVertex {
                        position: end.to_array(),
                        color,
                    },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;
    use crate::camera::Camera;

    fn overview() -> (Camera, Mat4, Mat4) {
        let mut camera =
            Camera::looking_at_origin(Vec3::new(0.0, 10.0, 40.0), 30.0);
        camera.aspect = 640.0 / 720.0;
        let vp = camera.build_matrix();
        (camera, vp, vp.inverse())
    }

    /// Ray through the on-screen projection of a world point.
    fn ray_through(p: Vec3) -> Ray {
        let (_, vp, inv) = overview();
        let ndc = vp.project_point3(p).truncate();
        Ray::from_ndc(ndc, inv).unwrap()
    }

    fn attached_at(origin: Vec3) -> (TranslateGizmo, Vec3, f32) {
        let (camera, _, _) = overview();
        let mut gizmo = TranslateGizmo::new();
        gizmo.attach(TrackedCamera::Green);
        let length = TranslateGizmo::handle_length(origin, camera.eye);
        (gizmo, camera.eye, length)
    }

    #[test]
    fn hover_picks_the_axis_under_the_pointer() {
        let origin = Vec3::new(5.0, 5.0, 5.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        for axis in Axis::ALL {
            let mid = origin + axis.direction() * length * 0.6;
            gizmo.hover(Some(&ray_through(mid)), origin, eye);
            assert_eq!(gizmo.hovered(), Some(axis));
        }
        gizmo.hover(Some(&ray_through(Vec3::new(-8.0, 0.0, 0.0))), origin, eye);
        assert_eq!(gizmo.hovered(), None);
    }

    #[test]
    fn detached_gizmo_ignores_the_pointer() {
        let origin = Vec3::new(5.0, 5.0, 5.0);
        let (_, eye, length) = attached_at(origin);
        let mut gizmo = TranslateGizmo::new();
        let ray = ray_through(origin + Vec3::X * length * 0.5);
        gizmo.hover(Some(&ray), origin, eye);
        assert_eq!(gizmo.hovered(), None);
        assert!(!gizmo.begin_drag(&ray, origin, eye));
        assert!(gizmo.line_vertices(origin, eye).is_empty());
    }

    #[test]
    fn drag_moves_only_along_the_grabbed_axis() {
        let origin = Vec3::new(5.0, 5.0, 5.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        let grab = origin + Vec3::X * length * 0.5;
        assert!(gizmo.begin_drag(&ray_through(grab), origin, eye));
        assert!(gizmo.is_dragging());
        assert_eq!(gizmo.hovered(), Some(Axis::X));

        // Pointer slides 1.5 units along X and wanders off-axis.
        let moved = grab + Vec3::new(1.5, 0.8, 0.0);
        let new_pos = gizmo.drag_to(&ray_through(moved)).unwrap();
        assert!((new_pos.y - origin.y).abs() < 1e-4);
        assert!((new_pos.z - origin.z).abs() < 1e-4);
        assert!(new_pos.x > origin.x);

        // Returning to the grab point restores the start position.
        let back = gizmo.drag_to(&ray_through(grab)).unwrap();
        assert!((back - origin).length() < 1e-3);

        gizmo.end_drag();
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.drag_to(&ray_through(moved)), None);
    }

    #[test]
    fn drag_along_x_tracks_pointer_offset() {
        let origin = Vec3::new(0.0, 2.0, 0.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        let grab = origin + Vec3::X * length * 0.5;
        assert!(gizmo.begin_drag(&ray_through(grab), origin, eye));
        let new_pos = gizmo.drag_to(&ray_through(grab + Vec3::X * 2.0)).unwrap();
        assert!((new_pos - (origin + Vec3::X * 2.0)).length() < 1e-3);
    }

    #[test]
    fn parallel_ray_gives_no_update() {
        let origin = Vec3::new(0.0, 0.0, 0.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        assert!(gizmo.begin_drag(
            &ray_through(origin + Vec3::X * length * 0.5),
            origin,
            eye
        ));
        let along_x = Ray {
            origin: Vec3::new(-10.0, 0.0, 0.0),
            direction: Vec3::X,
        };
        assert_eq!(gizmo.drag_to(&along_x), None);
    }

    #[test]
    fn hover_is_frozen_while_dragging() {
        let origin = Vec3::new(-5.0, 5.0, 5.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        assert!(gizmo.begin_drag(
            &ray_through(origin + Vec3::Y * length * 0.5),
            origin,
            eye
        ));
        gizmo.hover(None, origin, eye);
        assert_eq!(gizmo.hovered(), Some(Axis::Y));
    }

    #[test]
    fn attach_and_detach_reset_interaction() {
        let origin = Vec3::new(5.0, 5.0, 5.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        assert!(gizmo.begin_drag(
            &ray_through(origin + Vec3::Z * length * 0.5),
            origin,
            eye
        ));
        gizmo.attach(TrackedCamera::Red);
        assert_eq!(gizmo.target(), Some(TrackedCamera::Red));
        assert!(!gizmo.is_dragging());
        gizmo.detach();
        assert_eq!(gizmo.target(), None);
        assert_eq!(gizmo.hovered(), None);
    }

    #[test]
    fn handles_keep_constant_screen_size() {
        let (_, vp, _) = overview();
        let eye = Vec3::new(0.0, 10.0, 40.0);
        let screen_len = |origin: Vec3| {
            let len = TranslateGizmo::handle_length(origin, eye);
            let a = vp.project_point3(origin).truncate();
            let b = vp.project_point3(origin + Vec3::X * len).truncate();
            a.distance(b)
        };
        let near = screen_len(Vec3::new(0.0, 0.0, 20.0));
        let far = screen_len(Vec3::new(0.0, 0.0, -20.0));
        assert!((near - far).abs() / near < 0.05);
    }

    #[test]
    fn hovered_handle_is_drawn_highlighted() {
        let origin = Vec3::new(5.0, 5.0, 5.0);
        let (mut gizmo, eye, length) = attached_at(origin);
        let verts = gizmo.line_vertices(origin, eye);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(verts[0].position, origin.to_array());

        gizmo.hover(
            Some(&ray_through(origin + Vec3::Z * length * 0.6)),
            origin,
            eye,
        );
        let verts = gizmo.line_vertices(origin, eye);
        assert_eq!(verts[4].color, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(verts[0].color, [1.0, 0.0, 0.0, 1.0]);
    }
}

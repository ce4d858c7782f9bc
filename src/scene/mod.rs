//! Scene state: the three cameras and the two cone markers, derived from
//! the options records once per frame.
//!
//! The static props (ground slab and centre box) never move; their
//! transforms and colours live here as constants so the renderer and the
//! tests agree on them.

/// Procedural box and cone meshes.
pub mod mesh_gen;

use glam::{Mat4, Quat, Vec3};

use crate::camera::{look_rotation, Camera};
use crate::options::Options;
use crate::viewport::{ViewId, ViewLayout};

/// Largest absolute value any tracked-camera eye coordinate may take.
pub const EYE_CLAMP: f32 = 20.0;

/// Ground slab base colour (sRGB).
pub const GROUND_COLOR: u32 = 0x007d_7c7c;
/// Centre box colour (sRGB).
pub const BOX_COLOR: u32 = 0x004f_709c;

/// One of the two user-positioned cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedCamera {
    /// Renders into the bottom-right view.
    Green,
    /// Renders into the top-right view.
    Red,
}

impl TrackedCamera {
    /// Both tracked cameras.
    pub const ALL: [TrackedCamera; 2] = [TrackedCamera::Green, TrackedCamera::Red];

    /// The viewport this camera renders into.
    #[must_use]
    pub fn view(self) -> ViewId {
        match self {
            Self::Green => ViewId::Green,
            Self::Red => ViewId::Red,
        }
    }

    /// Cone colour: the background of this camera's viewport.
    #[must_use]
    pub fn color(self) -> u32 {
        self.view().spec().background
    }
}

/// Where a cone marker sits and which way its tip faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConePose {
    /// Raw (unclamped) position record.
    pub position: Vec3,
    /// Look-at rotation with the tip (local +Z) towards the origin.
    pub rotation: Quat,
}

impl ConePose {
    /// Pose for a cone at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: look_rotation(Vec3::ZERO, position, Vec3::Y),
        }
    }

    /// Model matrix (rotation then translation).
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Clamp every component of a tracked position to the eye bounds.
#[must_use]
pub fn clamp_eye(position: Vec3) -> Vec3 {
    position.clamp(Vec3::splat(-EYE_CLAMP), Vec3::splat(EYE_CLAMP))
}

/// Model matrix of the ground slab: a thin box half a unit below the
/// origin, flipped upside down about X.
#[must_use]
pub fn ground_transform() -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_rotation_x(std::f32::consts::PI),
        Vec3::new(0.0, -0.5, 0.0),
    )
}

/// Derived per-frame state: one camera per view and one pose per cone.
#[derive(Debug, Clone)]
pub struct SceneState {
    overview: Camera,
    green: Camera,
    red: Camera,
    green_cone: ConePose,
    red_cone: ConePose,
}

impl SceneState {
    /// State derived from `options` for a window of the given layout.
    #[must_use]
    pub fn new(options: &Options, layout: &ViewLayout) -> Self {
        let overview_fovy = ViewId::Overview.spec().fovy;
        let mut state = Self {
            overview: Camera::looking_at_origin(
                options.overview.eye(),
                overview_fovy,
            ),
            green: Camera::looking_at_origin(Vec3::ZERO, ViewId::Green.spec().fovy),
            red: Camera::looking_at_origin(Vec3::ZERO, ViewId::Red.spec().fovy),
            green_cone: ConePose::at(Vec3::ZERO),
            red_cone: ConePose::at(Vec3::ZERO),
        };
        state.update(options, layout);
        state
    }

    /// Recompute every camera and cone from the position records.
    ///
    /// Camera eyes are clamped to `±EYE_CLAMP`; cones follow the raw
    /// records. Views without pixels keep their previous aspect.
    pub fn update(&mut self, options: &Options, layout: &ViewLayout) {
        self.overview.eye = options.overview.eye();
        for camera in TrackedCamera::ALL {
            let position = Vec3::from(options.tracked(camera).position);
            let eye = clamp_eye(position);
            let (cam, cone) = match camera {
                TrackedCamera::Green => (&mut self.green, &mut self.green_cone),
                TrackedCamera::Red => (&mut self.red, &mut self.red_cone),
            };
            cam.eye = eye;
            *cone = ConePose::at(position);
        }

        for (view, rect) in layout.visible() {
            self.camera_mut(view).aspect = rect.aspect();
        }
    }

    /// The camera rendering into `view`.
    #[must_use]
    pub fn camera(&self, view: ViewId) -> &Camera {
        match view {
            ViewId::Overview => &self.overview,
            ViewId::Green => &self.green,
            ViewId::Red => &self.red,
        }
    }

    fn camera_mut(&mut self, view: ViewId) -> &mut Camera {
        match view {
            ViewId::Overview => &mut self.overview,
            ViewId::Green => &mut self.green,
            ViewId::Red => &mut self.red,
        }
    }

    /// Pose of a tracked camera's cone marker.
    #[must_use]
    pub fn cone(&self, camera: TrackedCamera) -> &ConePose {
        match camera {
            TrackedCamera::Green => &self.green_cone,
            TrackedCamera::Red => &self.red_cone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_with(green: Vec3, red: Vec3) -> Options {
        let mut opts = Options::default();
        opts.tracked_mut(TrackedCamera::Green).position = green.into();
        opts.tracked_mut(TrackedCamera::Red).position = red.into();
        opts
    }

    #[test]
    fn defaults_place_cameras_and_cones() {
        let layout = ViewLayout::new(1280, 720);
        let state = SceneState::new(&Options::default(), &layout);
        assert_eq!(
            state.camera(ViewId::Overview).eye,
            Vec3::new(0.0, 10.0, 40.0)
        );
        assert_eq!(state.camera(ViewId::Green).eye, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(state.camera(ViewId::Red).eye, Vec3::new(-5.0, 5.0, 5.0));
        assert_eq!(
            state.cone(TrackedCamera::Red).position,
            Vec3::new(-5.0, 5.0, 5.0)
        );
        for view in ViewId::ALL {
            assert_eq!(state.camera(view).target, Vec3::ZERO);
            assert_eq!(state.camera(view).fovy, view.spec().fovy);
        }
    }

    #[test]
    fn eyes_are_clamped_but_cones_are_not() {
        let layout = ViewLayout::new(800, 600);
        let far = Vec3::new(35.0, -25.0, 12.0);
        let opts = options_with(far, Vec3::new(-100.0, 0.5, 20.0));
        let state = SceneState::new(&opts, &layout);

        assert_eq!(
            state.camera(ViewId::Green).eye,
            Vec3::new(20.0, -20.0, 12.0)
        );
        assert_eq!(
            state.camera(ViewId::Red).eye,
            Vec3::new(-20.0, 0.5, 20.0)
        );
        assert_eq!(state.cone(TrackedCamera::Green).position, far);
        for camera in TrackedCamera::ALL {
            let eye = state.camera(camera.view()).eye;
            assert!(eye.abs().max_element() <= EYE_CLAMP);
        }
    }

    #[test]
    fn cone_tip_points_at_the_origin() {
        let pos = Vec3::new(3.0, -2.0, 7.0);
        let pose = ConePose::at(pos);
        let tip_dir = pose.rotation * Vec3::Z;
        assert!((tip_dir - (-pos).normalize()).length() < 1e-5);

        let tip_world = pose.model_matrix().transform_point3(Vec3::Z);
        assert!(tip_world.length() < pos.length());
    }

    #[test]
    fn cone_at_origin_stays_finite() {
        let pose = ConePose::at(Vec3::ZERO);
        assert!(pose.rotation.is_finite());
        assert!(pose.model_matrix().is_finite());
        let above = ConePose::at(Vec3::new(0.0, 6.0, 0.0));
        assert!(above.rotation.is_finite());
    }

    #[test]
    fn aspect_follows_the_layout() {
        let layout = ViewLayout::new(1280, 720);
        let mut state = SceneState::new(&Options::default(), &layout);
        assert!((state.camera(ViewId::Overview).aspect - 640.0 / 720.0).abs() < 1e-6);
        assert!((state.camera(ViewId::Green).aspect - 640.0 / 360.0).abs() < 1e-6);

        state.update(&Options::default(), &ViewLayout::new(400, 800));
        assert!((state.camera(ViewId::Red).aspect - 200.0 / 400.0).abs() < 1e-6);
    }

    #[test]
    fn update_tracks_option_edits() {
        let layout = ViewLayout::new(640, 480);
        let mut opts = Options::default();
        let mut state = SceneState::new(&opts, &layout);
        opts.overview.z = 25.0;
        opts.tracked_mut(TrackedCamera::Red).position.x = 1.5;
        state.update(&opts, &layout);
        assert_eq!(state.camera(ViewId::Overview).eye.z, 25.0);
        assert_eq!(state.camera(ViewId::Red).eye.x, 1.5);
        assert_eq!(state.cone(TrackedCamera::Red).position.x, 1.5);
    }

    #[test]
    fn cone_colors_match_their_views() {
        assert_eq!(TrackedCamera::Green.color(), 0x0000_4225);
        assert_eq!(TrackedCamera::Red.color(), 0x00c6_3d2f);
    }

    #[test]
    fn ground_sits_below_the_box() {
        let m = ground_transform();
        let centre = m.transform_point3(Vec3::ZERO);
        assert!((centre - Vec3::new(0.0, -0.5, 0.0)).length() < 1e-6);
        // Flipped: local up maps to world down.
        let up = m.transform_vector3(Vec3::Y);
        assert!((up + Vec3::Y).length() < 1e-6);
    }
}

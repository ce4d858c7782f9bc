use glam::{Mat3, Mat4, Quat, Vec3};

/// Rotation whose local +Z axis points from `target` towards `eye`.
///
/// Matches the classic `lookAt(eye, target, up)` basis: `z = eye - target`,
/// `x = up × z`, `y = z × x`. Coincident points fall back to `z = +Z`, and
/// an `up` parallel to `z` nudges `z` slightly so the basis never
/// degenerates.
#[must_use]
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z = Vec3::Z;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Near plane shared by every view.
    pub const ZNEAR: f32 = 0.1;
    /// Far plane shared by every view.
    pub const ZFAR: f32 = 100.0;

    /// Camera at `eye` looking at the world origin.
    #[must_use]
    pub fn looking_at_origin(eye: Vec3, fovy: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy,
            znear: Self::ZNEAR,
            zfar: Self::ZFAR,
        }
    }

    /// World-to-camera transform. Built from [`look_rotation`] so that
    /// degenerate eye/up combinations stay finite.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        let rotation = look_rotation(self.eye, self.target, self.up);
        Mat4::from_rotation_translation(rotation, self.eye).inverse()
    }

    /// Projection matrix (`[0, 1]` depth range).
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// Per-view GPU uniform: camera matrix, eye, and viewport background.
pub struct ViewUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position (w unused).
    pub eye: [f32; 4],
    /// Linear background colour of the viewport (a = 1).
    pub background: [f32; 4],
}

impl ViewUniform {
    /// Uniform for `camera` drawn over `background` (linear RGB).
    #[must_use]
    pub fn new(camera: &Camera, background: [f32; 3]) -> Self {
        let [r, g, b] = background;
        Self {
            view_proj: camera.build_matrix().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            background: [r, g, b, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn local_z_points_from_target_to_eye() {
        let eye = Vec3::new(5.0, 5.0, 5.0);
        let rot = look_rotation(eye, Vec3::ZERO, Vec3::Y);
        assert_vec_close(rot * Vec3::Z, eye.normalize());
        // Local +Y stays in the upper hemisphere.
        assert!((rot * Vec3::Y).y > 0.0);
    }

    #[test]
    fn reversed_arguments_point_at_target() {
        let pos = Vec3::new(-5.0, 5.0, 5.0);
        let rot = look_rotation(Vec3::ZERO, pos, Vec3::Y);
        assert_vec_close(rot * Vec3::Z, (-pos).normalize());
    }

    #[test]
    fn coincident_points_fall_back_to_identity() {
        let rot = look_rotation(Vec3::ZERO, Vec3::ZERO, Vec3::Y);
        assert!(rot.is_finite());
        assert_vec_close(rot * Vec3::Z, Vec3::Z);
    }

    #[test]
    fn up_parallel_to_view_stays_finite() {
        let rot = look_rotation(Vec3::new(0.0, 8.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(rot.is_finite());
        assert!((rot.length() - 1.0).abs() < 1e-4);
        assert!((rot * Vec3::Z).y > 0.99);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let mut camera = Camera::looking_at_origin(Vec3::new(0.0, 10.0, 40.0), 30.0);
        camera.aspect = 16.0 / 9.0;
        let clip = camera.build_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn view_matches_glam_look_at_in_the_regular_case() {
        let camera = Camera::looking_at_origin(Vec3::new(3.0, 4.0, 12.0), 45.0);
        let expected = Mat4::look_at_rh(camera.eye, Vec3::ZERO, Vec3::Y);
        assert!(camera.build_view().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn uniform_carries_eye_and_background() {
        let camera = Camera::looking_at_origin(Vec3::new(1.0, 2.0, 3.0), 45.0);
        let uniform = ViewUniform::new(&camera, [0.1, 0.2, 0.3]);
        assert_eq!(uniform.eye, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.background, [0.1, 0.2, 0.3, 1.0]);
    }
}

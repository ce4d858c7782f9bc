use glam::{Mat4, Vec2, Vec3};

/// Below this `sin²` of the angle between two lines they are treated as
/// parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A half-line in world space with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point (on the near plane for unprojected rays).
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray through a point in normalized device coordinates.
    ///
    /// `inv_view_proj` is the inverse of the camera's view-projection
    /// matrix. NDC depth runs `0..1` (near..far). Returns `None` if the
    /// unprojected near and far points coincide.
    #[must_use]
    pub fn from_ndc(ndc: Vec2, inv_view_proj: Mat4) -> Option<Self> {
        let near = inv_view_proj.project_point3(ndc.extend(0.0));
        let far = inv_view_proj.project_point3(ndc.extend(1.0));
        let direction = (far - near).try_normalize()?;
        Some(Self {
            origin: near,
            direction,
        })
    }

    /// Point at distance `s` along the ray.
    #[must_use]
    pub fn at(&self, s: f32) -> Vec3 {
        self.origin + self.direction * s
    }

    /// Parameters `(s, t)` of the closest points between this ray's line
    /// and the line `point + t * dir` (`dir` unit length).
    ///
    /// Returns `None` when the lines are (nearly) parallel and the closest
    /// point is not unique.
    #[must_use]
    pub fn closest_params(&self, point: Vec3, dir: Vec3) -> Option<(f32, f32)> {
        let w0 = self.origin - point;
        let b = self.direction.dot(dir);
        let d = self.direction.dot(w0);
        let e = dir.dot(w0);
        // Both directions are unit, so a = c = 1.
        let denom = 1.0 - b * b;
        if denom < PARALLEL_EPSILON {
            return None;
        }
        let s = (b * e - d) / denom;
        let t = (e - b * d) / denom;
        Some((s, t))
    }

    /// Shortest distance from the ray to the segment `a..b`.
    #[must_use]
    pub fn distance_to_segment(&self, a: Vec3, b: Vec3) -> f32 {
        let Some(dir) = (b - a).try_normalize() else {
            return self.distance_to_point(a);
        };
        let len = a.distance(b);
        let t = self
            .closest_params(a, dir)
            .map_or(0.0, |(_, t)| t)
            .clamp(0.0, len);
        self.distance_to_point(a + dir * t)
    }

    /// Shortest distance from the ray to a point.
    #[must_use]
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        let s = (p - self.origin).dot(self.direction).max(0.0);
        self.at(s).distance(p)
    }
}

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec2, Vec3};

/// Vertex format shared by every scene mesh.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Vertex buffer layout matching `scene.wgsl`'s `VertexInput`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        let uvs = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(MeshVertex::new(corner, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Axis-aligned box centred on the origin. Each face has its own four
/// vertices so normals stay flat and every face gets the full `0..1` UV
/// square.
#[must_use]
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let h = Vec3::new(width, height, depth) * 0.5;
    let mut mesh = MeshData::default();

    // (normal, u axis, v axis): corners run counter-clockwise seen from
    // outside.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in faces {
        let centre = n * h;
        let du = u * h;
        let dv = v * h;
        mesh.push_quad(
            [
                centre - du - dv,
                centre + du - dv,
                centre + du + dv,
                centre - du + dv,
            ],
            n,
        );
    }
    mesh
}

/// Cone of the given base `radius` and `height`, centred on the origin,
/// with a flat base cap. The tip points along local +Z.
#[must_use]
pub fn cone_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height * 0.5;
    // Built along +Y, then turned a quarter turn about X so +Y becomes +Z.
    let to_z = Quat::from_rotation_x(FRAC_PI_2);
    let mut mesh = MeshData::default();

    // Side: one tip vertex and one base vertex per ring step so each
    // slice carries its own slanted normal.
    let slope = radius / height;
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let theta = u * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(sin, slope, cos).normalize();
        let tip = Vec3::new(0.0, half, 0.0);
        let rim = Vec3::new(radius * sin, -half, radius * cos);
        mesh.vertices
            .push(MeshVertex::new(to_z * tip, to_z * normal, Vec2::new(u, 0.0)));
        mesh.vertices
            .push(MeshVertex::new(to_z * rim, to_z * normal, Vec2::new(u, 1.0)));
    }
    for i in 0..segments {
        let tip = i * 2;
        let rim = tip + 1;
        let next_rim = rim + 2;
        mesh.indices.extend_from_slice(&[tip, rim, next_rim]);
    }

    // Base cap facing -Y (local -Z after the turn).
    let centre = mesh.vertices.len() as u32;
    let down = to_z * Vec3::NEG_Y;
    mesh.vertices.push(MeshVertex::new(
        to_z * Vec3::new(0.0, -half, 0.0),
        down,
        Vec2::splat(0.5),
    ));
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let rim = Vec3::new(radius * sin, -half, radius * cos);
        mesh.vertices.push(MeshVertex::new(
            to_z * rim,
            down,
            Vec2::new(sin.mul_add(0.5, 0.5), cos.mul_add(0.5, 0.5)),
        ));
    }
    for i in 0..segments {
        let a = centre + 1 + i;
        mesh.indices.extend_from_slice(&[centre, a + 1, a]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(mesh: &MeshData) {
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5, "normal {n:?}");
        }
    }

    fn assert_indices_in_range(mesh: &MeshData) {
        let n = mesh.vertices.len() as u32;
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn box_has_flat_faces() {
        let mesh = box_mesh(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_unit_normals(&mesh);
        assert_indices_in_range(&mesh);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert!((p.abs() - Vec3::splat(0.5)).abs().max_element() < 1e-6);
            // Each vertex lies on the face its normal names.
            assert!((p.dot(Vec3::from(v.normal)) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn box_faces_wind_outwards() {
        let mesh = box_mesh(10.0, 0.1, 10.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(n) > 0.0);
        }
    }

    #[test]
    fn slab_extents_follow_dimensions() {
        let mesh = box_mesh(10.0, 0.1, 10.0);
        let max = mesh
            .vertices
            .iter()
            .map(|v| Vec3::from(v.position))
            .fold(Vec3::splat(f32::MIN), Vec3::max);
        assert!((max - Vec3::new(5.0, 0.05, 5.0)).length() < 1e-6);
    }

    #[test]
    fn cone_counts() {
        let mesh = cone_mesh(0.5, 1.0, 16);
        // 17 side pairs + cap centre + 17 cap ring.
        assert_eq!(mesh.vertices.len(), 17 * 2 + 1 + 17);
        assert_eq!(mesh.indices.len(), 16 * 3 * 2);
        assert_unit_normals(&mesh);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn cone_tip_points_along_z() {
        let mesh = cone_mesh(0.5, 1.0, 16);
        let tip = Vec3::from(mesh.vertices[0].position);
        assert!((tip - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);
        let furthest = mesh
            .vertices
            .iter()
            .map(|v| v.position[2])
            .fold(f32::MIN, f32::max);
        assert!((furthest - 0.5).abs() < 1e-6);
        // Base ring sits in the z = -0.5 plane at the full radius.
        let rim = Vec3::from(mesh.vertices[1].position);
        assert!((rim.z + 0.5).abs() < 1e-6);
        assert!((rim.truncate().length() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cone_side_winds_outwards() {
        let mesh = cone_mesh(0.5, 1.0, 16);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // Outward from the cone's axis or away from the base.
            let outward = if (a.z + 0.5).abs() < 1e-6
                && (b.z + 0.5).abs() < 1e-6
                && (c.z + 0.5).abs() < 1e-6
            {
                Vec3::NEG_Z
            } else {
                Vec3::new(centroid.x, centroid.y, 0.0)
            };
            assert!(face_normal.dot(outward) > 0.0);
        }
    }

    #[test]
    fn too_few_segments_are_raised() {
        let mesh = cone_mesh(1.0, 1.0, 1);
        assert_eq!(mesh.indices.len(), 3 * 3 * 2);
    }
}

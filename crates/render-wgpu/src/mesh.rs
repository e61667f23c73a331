use bytemuck::{Pod, Zeroable};
use lumen_scene::Primitive;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side triangle list for one primitive.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Tessellate a scene primitive.
    pub fn for_primitive(primitive: &Primitive) -> Self {
        match *primitive {
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments, height_segments),
            Primitive::Plane { width, height } => plane(width, height),
            Primitive::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments, tubular_segments),
        }
    }
}

/// UV sphere with poles on the Y axis. Pole rows emit no degenerate
/// triangles.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshData::with_capacity(
        ((ws + 1) * (hs + 1)) as usize,
        (ws * (hs - 1) * 6) as usize,
    );

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_p, cos_p) = (u * TAU).sin_cos();
            let normal = [-cos_p * sin_t, cos_t, sin_p * sin_t];
            mesh.vertices.push(Vertex {
                position: normal.map(|c| c * radius),
                normal,
                uv: [u, 1.0 - v],
            });
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// Single quad in the XY plane facing +Z.
pub fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let normal = [0.0, 0.0, 1.0];
    let corners = [
        ([-hw, -hh], [0.0, 0.0]),
        ([hw, -hh], [1.0, 0.0]),
        ([hw, hh], [1.0, 1.0]),
        ([-hw, hh], [0.0, 1.0]),
    ];
    MeshData {
        vertices: corners
            .iter()
            .map(|&([x, y], uv)| Vertex {
                position: [x, y, 0.0],
                normal,
                uv,
            })
            .collect(),
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Torus around the Z axis. `radius` is the distance from the centre to the
/// middle of the tube.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let rs = radial_segments.max(3);
    let ts = tubular_segments.max(3);
    let mut mesh =
        MeshData::with_capacity(((rs + 1) * (ts + 1)) as usize, (rs * ts * 6) as usize);

    for j in 0..=rs {
        let v = j as f32 / rs as f32;
        let (sin_v, cos_v) = (v * TAU).sin_cos();
        for i in 0..=ts {
            let u = i as f32 / ts as f32;
            let (sin_u, cos_u) = (u * TAU).sin_cos();
            let ring = radius + tube * cos_v;
            let position = [ring * cos_u, ring * sin_u, tube * sin_v];
            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
            mesh.vertices.push(Vertex {
                position,
                normal,
                uv: [u, v],
            });
        }
    }

    let row = ts + 1;
    for j in 1..=rs {
        for i in 1..=ts {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    fn indices_in_range(mesh: &MeshData) -> bool {
        let n = mesh.vertex_count() as u32;
        mesh.indices.iter().all(|&i| i < n)
    }

    #[test]
    fn showcase_sphere_counts() {
        let mesh = sphere(0.5, 16, 16);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        assert_eq!(mesh.triangle_count(), 16 * 15 * 2);
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = sphere(0.5, 16, 16);
        for v in &mesh.vertices {
            assert!((len(v.position) - 0.5).abs() < 1e-5);
            assert!((len(v.normal) - 1.0).abs() < 1e-5);
        }
        assert_eq!(mesh.vertices[0].position[1], 0.5);
    }

    #[test]
    fn plane_faces_positive_z() {
        let mesh = plane(1.0, 1.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.position[0].abs(), 0.5);
            assert_eq!(v.position[1].abs(), 0.5);
        }
    }

    #[test]
    fn showcase_torus_geometry() {
        let mesh = torus(0.3, 0.2, 16, 32);
        assert_eq!(mesh.vertex_count(), 17 * 33);
        assert_eq!(mesh.triangle_count(), 16 * 32 * 2);
        assert!(indices_in_range(&mesh));
        for v in &mesh.vertices {
            let p = v.position;
            let ring = (p[0] * p[0] + p[1] * p[1]).sqrt();
            let tube_dist = ((ring - 0.3).powi(2) + p[2] * p[2]).sqrt();
            assert!((tube_dist - 0.2).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_segment_counts_are_raised() {
        let mesh = sphere(1.0, 0, 0);
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn for_primitive_dispatches() {
        let mesh = MeshData::for_primitive(&Primitive::Plane {
            width: 2.0,
            height: 4.0,
        });
        assert_eq!(mesh.vertices[2].position, [1.0, 2.0, 0.0]);
    }
}

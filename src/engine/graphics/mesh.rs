//! CPU-side procedural mesh generation.
//!
//! These meshes are staging data. The renderer uploads them into GPU
//! vertex/index buffers and hands back a `MeshHandle`.

use std::f32::consts::{PI, TAU};

use vulkano::buffer::BufferContents;
use vulkano::pipeline::graphics::vertex_input::Vertex;

/// Vertex layout shared by every body mesh.
///
/// - `pos`: object-space position
/// - `normal`: object-space unit normal
#[derive(BufferContents, Vertex, Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct CpuVertex {
    #[format(R32G32B32_SFLOAT)]
    pub pos: [f32; 3],
    #[format(R32G32B32_SFLOAT)]
    pub normal: [f32; 3],
}

/// CPU-side mesh data.
///
/// Contract:
/// - `vertices` + `indices` fully define geometry as a triangle list.
/// - Every index is `< vertices.len()`.
#[derive(Debug, Clone)]
pub struct CpuMesh {
    pub vertices: Vec<CpuVertex>,
    pub indices_u32: Vec<u32>,
}

impl CpuMesh {
    pub fn new(vertices: Vec<CpuVertex>, indices_u32: Vec<u32>) -> Self {
        Self {
            vertices,
            indices_u32,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices_u32.len() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Procedural mesh constructors.
///
/// Triangles are counter-clockwise when seen from outside the shape.
pub struct MeshFactory;

impl MeshFactory {
    pub const DEFAULT_SPHERE_SLICES: u32 = 48;
    pub const DEFAULT_SPHERE_STACKS: u32 = 24;

    /// Unit-radius UV sphere centred at the origin, poles on +/-Y.
    ///
    /// `slices` are meridian segments around Y, `stacks` are latitude bands.
    /// The seam column is duplicated, so there are `(slices + 1) * (stacks + 1)`
    /// vertices. Values below 3 slices / 2 stacks are raised to that minimum.
    pub fn uv_sphere(slices: u32, stacks: u32) -> CpuMesh {
        let slices = slices.max(3);
        let stacks = stacks.max(2);

        let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
        for stack in 0..=stacks {
            // 0 at the north pole, PI at the south pole.
            let phi = PI * stack as f32 / stacks as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            for slice in 0..=slices {
                let theta = TAU * slice as f32 / slices as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();

                let p = [sin_phi * cos_theta, cos_phi, -sin_phi * sin_theta];
                vertices.push(CpuVertex { pos: p, normal: p });
            }
        }

        let ring = slices + 1;
        let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * ring + slice;
                let b = a + ring;

                // The pole rows would produce degenerate triangles; skip them.
                if stack != 0 {
                    indices.extend_from_slice(&[a, b, a + 1]);
                }
                if stack != stacks - 1 {
                    indices.extend_from_slice(&[a + 1, b, b + 1]);
                }
            }
        }

        CpuMesh::new(vertices, indices)
    }

    pub fn default_sphere() -> CpuMesh {
        Self::uv_sphere(Self::DEFAULT_SPHERE_SLICES, Self::DEFAULT_SPHERE_STACKS)
    }

    /// Unit cube centred at the origin (half extent 0.5), flat-shaded.
    ///
    /// 24 vertices (4 per face) so each face gets its own normal.
    pub fn cube() -> CpuMesh {
        // (normal, u axis, v axis); u x v == normal keeps the winding CCW.
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (n, u, v) in FACES {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let pos = [0, 1, 2].map(|i| 0.5 * (n[i] + su * u[i] + sv * v[i]));
                vertices.push(CpuVertex { pos, normal: n });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        CpuMesh::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn face_normal(mesh: &CpuMesh, tri: &[u32]) -> Vec3 {
        let p = |i: u32| Vec3::from(mesh.vertices[i as usize].pos);
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        (b - a).cross(c - a)
    }

    #[test]
    fn sphere_vertex_count_and_unit_normals() {
        let mesh = MeshFactory::uv_sphere(16, 8);
        assert_eq!(mesh.vertex_count(), 17 * 9);

        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(Vec3::from(v.pos).abs_diff_eq(n, 1e-6));
        }
    }

    #[test]
    fn sphere_indices_are_in_range_and_outward() {
        let mesh = MeshFactory::uv_sphere(12, 6);
        assert_eq!(mesh.index_count() % 3, 0);
        // Two pole rows of single triangles plus full quads elsewhere.
        assert_eq!(mesh.index_count(), 12 * 6 * 6 - 2 * 12 * 3);

        for tri in mesh.indices_u32.chunks(3) {
            assert!(tri.iter().all(|&i| i < mesh.vertex_count()));
            let centroid: Vec3 = tri
                .iter()
                .map(|&i| Vec3::from(mesh.vertices[i as usize].pos))
                .sum::<Vec3>()
                / 3.0;
            assert!(face_normal(&mesh, tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn degenerate_sphere_arguments_are_raised() {
        let mesh = MeshFactory::uv_sphere(0, 0);
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert!(mesh.index_count() > 0);
    }

    #[test]
    fn cube_faces_point_outward() {
        let mesh = MeshFactory::cube();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);

        for tri in mesh.indices_u32.chunks(3) {
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face_normal(&mesh, tri).normalize().abs_diff_eq(n, 1e-5));
        }
        for v in &mesh.vertices {
            assert!(v.pos.iter().all(|c| c.abs() == 0.5));
        }
    }
}

//! CPU-side mesh generation for the handful of shapes the scene uses.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// UV sphere centered at the origin. `segments` around the equator, `rings`
/// from pole to pole.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Mesh {
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for ring in 0..=rings {
        let theta = std::f32::consts::PI * ring as f32 / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for segment in 0..=segments {
            let phi = TAU * segment as f32 / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                // d(position)/d(phi), normalized.
                tangent: [-sin_phi, 0.0, cos_phi],
                uv: [
                    segment as f32 / segments as f32,
                    ring as f32 / rings as f32,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = (ring * stride + segment) as u16;
            let b = a + stride as u16;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// Torus in the XY plane: `major` from the center to the tube's center,
/// `tube` the tube radius.
pub fn torus(major: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let mut vertices =
        Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);
    for j in 0..=radial_segments {
        let v = TAU * j as f32 / radial_segments as f32;
        let (sin_v, cos_v) = v.sin_cos();
        for i in 0..=tubular_segments {
            let u = TAU * i as f32 / tubular_segments as f32;
            let (sin_u, cos_u) = u.sin_cos();

            vertices.push(Vertex {
                position: [
                    (major + tube * cos_v) * cos_u,
                    (major + tube * cos_v) * sin_u,
                    tube * sin_v,
                ],
                normal: [cos_v * cos_u, cos_v * sin_u, sin_v],
                tangent: [-sin_u, cos_u, 0.0],
                uv: [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity((radial_segments * tubular_segments * 6) as usize);
    let stride = tubular_segments + 1;
    for j in 0..radial_segments {
        for i in 0..tubular_segments {
            let a = (j * stride + i) as u16;
            let b = a + stride as u16;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// Axis-aligned cube of the given edge length, uv-mapped per face.
pub fn cube(size: f32) -> Mesh {
    let h = size * 0.5;

    // (normal, tangent); the face corners are derived from the pair.
    let faces: [([f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, tangent) in faces {
        let n = glam::Vec3::from(normal);
        let t = glam::Vec3::from(tangent);
        let b = n.cross(t);

        let base = vertices.len() as u16;
        for (corner, uv) in [
            (n * h - t * h - b * h, [0.0, 1.0]),
            (n * h + t * h - b * h, [1.0, 1.0]),
            (n * h + t * h + b * h, [1.0, 0.0]),
            (n * h - t * h + b * h, [0.0, 0.0]),
        ] {
            vertices.push(Vertex {
                position: corner.to_array(),
                normal,
                tangent,
                uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit(v: [f32; 3]) {
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-4, "not unit length: {:?}", v);
    }

    #[test]
    fn sphere_has_expected_counts_and_unit_normals() {
        let mesh = uv_sphere(3.0, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.indices.len(), 32 * 32 * 6);
        for vertex in &mesh.vertices {
            assert_unit(vertex.normal);
            assert_unit(vertex.tangent);
            let r = glam::Vec3::from(vertex.position).length();
            assert!((r - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn torus_stays_within_its_radii() {
        let mesh = torus(8.0, 1.5, 16, 100);
        assert_eq!(mesh.vertices.len(), 17 * 101);
        assert_eq!(mesh.indices.len(), 16 * 100 * 6);
        for vertex in &mesh.vertices {
            assert_unit(vertex.normal);
            let p = glam::Vec3::from(vertex.position);
            let ring_distance = (glam::vec2(p.x, p.y).length() - 8.0).hypot(p.z);
            assert!((ring_distance - 1.5).abs() < 1e-3);
        }
    }

    #[test]
    fn cube_is_24_vertices_36_indices() {
        let mesh = cube(3.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for vertex in &mesh.vertices {
            for c in vertex.position {
                assert!((c.abs() - 1.5).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn indices_stay_in_bounds() {
        for mesh in [uv_sphere(0.25, 24, 24), torus(8.0, 1.5, 16, 100), cube(3.0)] {
            let max = mesh.vertices.len() as u16;
            assert!(mesh.indices.iter().all(|&i| i < max));
        }
    }
}

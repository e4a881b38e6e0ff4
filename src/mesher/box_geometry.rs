//! Axis-aligned box primitive.
//!
//! Boxes are centered on the origin and emit one quad per face in the order
//! +X, -X, +Y, -Y, +Z, -Z. Each quad lists its corners row by row: vertex 0
//! is the (u=0, top) corner, 1 is (u=1, top), 2 is (u=0, bottom) and 3 is
//! (u=1, bottom). The box UV mapper depends on this ordering.

use super::geometry::{Mesh, Vertex};

/// Vertices emitted per face.
pub const VERTICES_PER_FACE: usize = 4;

/// Faces emitted per box.
pub const FACE_COUNT: usize = 6;

/// Plane layout for one face: which position components the plane's
/// (u, v, w) axes write to, the u/v directions, and the signed plane extents
/// along u, v and w.
struct FacePlane {
    axes: [usize; 3],
    u_dir: f32,
    v_dir: f32,
    extents: [f32; 3],
}

fn face_planes(width: f32, height: f32, depth: f32) -> [FacePlane; FACE_COUNT] {
    const X: usize = 0;
    const Y: usize = 1;
    const Z: usize = 2;

    [
        // +X
        FacePlane { axes: [Z, Y, X], u_dir: -1.0, v_dir: -1.0, extents: [depth, height, width] },
        // -X
        FacePlane { axes: [Z, Y, X], u_dir: 1.0, v_dir: -1.0, extents: [depth, height, -width] },
        // +Y
        FacePlane { axes: [X, Z, Y], u_dir: 1.0, v_dir: 1.0, extents: [width, depth, height] },
        // -Y
        FacePlane { axes: [X, Z, Y], u_dir: 1.0, v_dir: -1.0, extents: [width, depth, -height] },
        // +Z
        FacePlane { axes: [X, Y, Z], u_dir: 1.0, v_dir: -1.0, extents: [width, height, depth] },
        // -Z
        FacePlane { axes: [X, Y, Z], u_dir: -1.0, v_dir: -1.0, extents: [width, height, -depth] },
    ]
}

/// Build a box of the given size with per-face default UVs spanning `[0, 1]`.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> Mesh {
    let mut mesh = Mesh::new();

    for plane in face_planes(width, height, depth) {
        let [u_axis, v_axis, w_axis] = plane.axes;
        let [plane_w, plane_h, plane_d] = plane.extents;
        let start = mesh.vertex_count() as u32;

        for iy in 0..2 {
            let y = iy as f32 * plane_h - plane_h / 2.0;
            for ix in 0..2 {
                let x = ix as f32 * plane_w - plane_w / 2.0;

                let mut position = [0.0f32; 3];
                position[u_axis] = x * plane.u_dir;
                position[v_axis] = y * plane.v_dir;
                position[w_axis] = plane_d / 2.0;

                let mut normal = [0.0f32; 3];
                normal[w_axis] = if plane_d > 0.0 { 1.0 } else { -1.0 };

                let uv = [ix as f32, 1.0 - iy as f32];
                mesh.add_vertex(Vertex::new(position, normal, uv));
            }
        }

        // Corners: a=0 (top-left), b=2, c=3, d=1
        mesh.add_triangle(start, start + 2, start + 1);
        mesh.add_triangle(start + 2, start + 3, start + 1);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_box_counts() {
        let mesh = box_mesh(2.0, 12.0, 2.0);
        assert_eq!(mesh.vertex_count(), VERTICES_PER_FACE * FACE_COUNT);
        assert_eq!(mesh.triangle_count(), 2 * FACE_COUNT);
    }

    #[test]
    fn test_box_is_centered() {
        let bounds = box_mesh(12.0, 1.0, 12.0).bounds().unwrap();
        assert_eq!(bounds.min, [-6.0, -0.5, -6.0]);
        assert_eq!(bounds.max, [6.0, 0.5, 6.0]);
    }

    #[test]
    fn test_face_normals_in_emission_order() {
        let mesh = box_mesh(1.0, 2.0, 3.0);
        let expected = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for (face, normal) in expected.iter().enumerate() {
            for corner in 0..VERTICES_PER_FACE {
                let v = &mesh.vertices[face * VERTICES_PER_FACE + corner];
                assert_eq!(&v.normal, normal, "face {} corner {}", face, corner);
            }
        }
    }

    #[test]
    fn test_faces_lie_on_their_planes() {
        let mesh = box_mesh(8.0, 8.0, 8.0);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!((p.dot(n) - 4.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_triangles_wind_outward() {
        let mesh = box_mesh(2.0, 3.0, 4.0);
        for tri in mesh.indices.chunks_exact(3) {
            let a = Vec3::from(mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from(mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from(mesh.vertices[tri[2] as usize].position);
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn test_default_uv_corners() {
        let mesh = box_mesh(1.0, 1.0, 1.0);
        let corners: Vec<[f32; 2]> = mesh.vertices[..4].iter().map(|v| v.uv).collect();
        assert_eq!(corners, vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
    }
}

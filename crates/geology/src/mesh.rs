//! CPU-side triangle meshes for reconstructed core pieces.

use crate::polygon;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Vertex for core sample meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SampleVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl SampleVertex {
    pub fn new(position: Vec3, uv: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.into(),
            normal: [0.0, 1.0, 0.0],
            uv: uv.into(),
            color,
        }
    }
}

/// Indexed triangle list. Owns its buffers; dropping the mesh releases them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleMesh {
    pub vertices: Vec<SampleVertex>,
    pub indices: Vec<u32>,
}

impl SampleMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of the vertex positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(self.vertices.first()?.position);
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Vec3::from(v.position);
            (min.min(p), max.max(p))
        }))
    }

    /// Raw vertex bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Vertex count and index count as little-endian `u32`, then the raw vertex and
    /// index buffers. This is the layout `coredrill` exports.
    pub fn packed(&self) -> Vec<u8> {
        let (vertices, indices) = (self.vertex_bytes(), self.index_bytes());
        let mut bytes = Vec::with_capacity(8 + vertices.len() + indices.len());
        bytes.extend_from_slice(&(self.vertices.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.indices.len() as u32).to_le_bytes());
        bytes.extend_from_slice(vertices);
        bytes.extend_from_slice(indices);
        bytes
    }

    /// Set every vertex color.
    pub fn set_color(&mut self, color: [f32; 4]) {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
    }

    /// Smooth normals: accumulate each triangle's face normal into its vertices, then
    /// normalize. Zero-area triangles contribute nothing; the number skipped is returned.
    /// A vertex touched only by degenerate triangles gets +Y.
    pub fn recalculate_normals(&mut self) -> usize {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        let mut skipped = 0;

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = Vec3::from(self.vertices[i0].position);
            let v1 = Vec3::from(self.vertices[i1].position);
            let v2 = Vec3::from(self.vertices[i2].position);

            let Some(n) = (v1 - v0).cross(v2 - v0).try_normalize() else {
                skipped += 1;
                continue;
            };
            normals[i0] += n;
            normals[i1] += n;
            normals[i2] += n;
        }

        for (vertex, n) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).into();
        }
        skipped
    }

    /// Closed cylinder with radius 1 spanning y in [-1, 1], centred on the origin.
    /// Scale by `(r, h / 2, r)` to size it. Rims are split from the caps so both shade flat.
    pub fn unit_cylinder(sides: usize, color: [f32; 4]) -> Self {
        let sides = sides.max(3);
        let mut mesh = SampleMesh::default();

        // Side wall: a seam column is duplicated so UVs wrap cleanly.
        for i in 0..=sides {
            let u = i as f32 / sides as f32;
            let angle = u * TAU;
            let (x, z) = (angle.cos(), angle.sin());
            let mut top = SampleVertex::new(Vec3::new(x, 1.0, z), Vec2::new(u, 0.0), color);
            let mut bottom = SampleVertex::new(Vec3::new(x, -1.0, z), Vec2::new(u, 1.0), color);
            top.normal = [x, 0.0, z];
            bottom.normal = [x, 0.0, z];
            mesh.vertices.push(top);
            mesh.vertices.push(bottom);
        }
        for i in 0..sides as u32 {
            let top = i * 2;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;
            mesh.indices.extend_from_slice(&[top, next_top, bottom]);
            mesh.indices.extend_from_slice(&[next_top, next_bottom, bottom]);
        }

        for (y, normal) in [(1.0f32, Vec3::Y), (-1.0, Vec3::NEG_Y)] {
            let center = mesh.vertices.len() as u32;
            let mut hub = SampleVertex::new(Vec3::new(0.0, y, 0.0), Vec2::splat(0.5), color);
            hub.normal = normal.into();
            mesh.vertices.push(hub);
            for i in 0..sides {
                let angle = i as f32 * TAU / sides as f32;
                let (x, z) = (angle.cos(), angle.sin());
                let mut v = SampleVertex::new(
                    Vec3::new(x, y, z),
                    Vec2::new(x * 0.5 + 0.5, z * 0.5 + 0.5),
                    color,
                );
                v.normal = normal.into();
                mesh.vertices.push(v);
            }
            for i in 0..sides as u32 {
                let a = center + 1 + i;
                let b = center + 1 + (i + 1) % sides as u32;
                if y > 0.0 {
                    mesh.indices.extend_from_slice(&[center, b, a]);
                } else {
                    mesh.indices.extend_from_slice(&[center, a, b]);
                }
            }
        }
        mesh
    }

    /// Vertex count produced by [`SampleMesh::unit_cylinder`].
    pub fn unit_cylinder_vertex_count(sides: usize) -> usize {
        let sides = sides.max(3);
        (sides + 1) * 2 + (sides + 1) * 2
    }

    /// Extrude a counter-clockwise polygon into a prism.
    ///
    /// The top ring sits at local y = 0 and the bottom ring at y = -height. Caps are
    /// fanned from vertex 0, which gives `n - 2` triangles per cap, and each edge adds
    /// two side triangles. UVs map x/z into the polygon's bounding box. Returns `None`
    /// for fewer than 3 vertices.
    pub fn extrude_polygon(polygon: &[Vec2], height: f32, color: [f32; 4]) -> Option<Self> {
        let n = polygon.len();
        if n < 3 {
            return None;
        }
        let (min, max) = polygon::bounds(polygon)?;
        let extent = max - min;
        let uv = |p: Vec2| {
            Vec2::new(
                if extent.x < 0.001 { 0.5 } else { (p.x - min.x) / extent.x },
                if extent.y < 0.001 { 0.5 } else { (p.y - min.y) / extent.y },
            )
        };

        let mut mesh = SampleMesh {
            vertices: Vec::with_capacity(n * 2),
            indices: Vec::with_capacity((2 * (n - 2) + 2 * n) * 3),
        };
        for p in polygon {
            mesh.vertices.push(SampleVertex::new(Vec3::new(p.x, 0.0, p.y), uv(*p), color));
        }
        for p in polygon {
            mesh.vertices.push(SampleVertex::new(Vec3::new(p.x, -height, p.y), uv(*p), color));
        }

        let n = n as u32;
        // Polygon CCW in (x, z) seen from +y is clockwise, so the top cap reverses it.
        for i in 1..n - 1 {
            mesh.indices.extend_from_slice(&[0, i + 1, i]);
        }
        for i in 1..n - 1 {
            mesh.indices.extend_from_slice(&[n, n + i, n + i + 1]);
        }
        for i in 0..n {
            let next = (i + 1) % n;
            mesh.indices.extend_from_slice(&[i, next, n + i]);
            mesh.indices.extend_from_slice(&[next, n + next, n + i]);
        }

        mesh.recalculate_normals();
        Some(mesh)
    }

    /// Triangles with (near) zero area.
    pub fn degenerate_triangle_count(&self) -> usize {
        self.indices
            .chunks_exact(3)
            .filter(|tri| {
                let v0 = Vec3::from(self.vertices[tri[0] as usize].position);
                let v1 = Vec3::from(self.vertices[tri[1] as usize].position);
                let v2 = Vec3::from(self.vertices[tri[2] as usize].position);
                (v1 - v0).cross(v2 - v0).try_normalize().is_none()
            })
            .count()
    }

    /// Sum of triangle areas.
    pub fn surface_area(&self) -> f32 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let v0 = Vec3::from(self.vertices[tri[0] as usize].position);
                let v1 = Vec3::from(self.vertices[tri[1] as usize].position);
                let v2 = Vec3::from(self.vertices[tri[2] as usize].position);
                (v1 - v0).cross(v2 - v0).length() * 0.5
            })
            .sum()
    }

    /// Every index in range, every position finite, every normal unit length.
    pub fn is_well_formed(&self) -> bool {
        self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < self.vertices.len())
            && self.vertices.iter().all(|v| {
                Vec3::from(v.position).is_finite()
                    && (Vec3::from(v.normal).length() - 1.0).abs() < 1e-3
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle count of an extruded `n`-gon: two fanned caps plus two per edge.
    fn prism_triangle_count(n: usize) -> usize {
        if n < 3 {
            0
        } else {
            2 * (n - 2) + 2 * n
        }
    }
    use crate::polygon::{circle_polygon, sector_polygon};

    const GREY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

    #[test]
    fn triangle_prism_has_fan_caps_and_six_side_triangles() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let mesh = SampleMesh::extrude_polygon(&tri, 2.0, GREY).expect("prism");
        assert_eq!(mesh.vertex_count(), 6);
        // One triangle per cap from the fan, two per edge on the sides.
        assert_eq!(mesh.triangle_count(), 1 + 1 + 6);
        assert_eq!(mesh.triangle_count(), prism_triangle_count(3));
        assert_eq!(mesh.triangle_count() * 3, mesh.indices.len());
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn extrusion_spans_zero_to_minus_height() {
        let square = circle_polygon(Vec2::ZERO, 1.0, 4);
        let mesh = SampleMesh::extrude_polygon(&square, 3.0, GREY).expect("prism");
        let (min, max) = mesh.bounds().expect("bounds");
        assert!((max.y - 0.0).abs() < 1e-6);
        assert!((min.y + 3.0).abs() < 1e-6);
    }

    #[test]
    fn prism_caps_face_outward() {
        let square = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        let mesh = SampleMesh::extrude_polygon(&square, 1.0, GREY).expect("prism");
        let face = |t: usize| {
            let p = |k: usize| Vec3::from(mesh.vertices[mesh.indices[t * 3 + k] as usize].position);
            (p(1) - p(0)).cross(p(2) - p(0))
        };
        assert!(face(0).y > 0.0, "top cap faces up");
        assert!(face(2).y < 0.0, "bottom cap faces down");
        // First side triangle is on the edge at z = -1.
        assert!(face(4).z < 0.0, "side faces outward");
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        assert!(SampleMesh::extrude_polygon(&[Vec2::ZERO, Vec2::X], 1.0, GREY).is_none());
        assert_eq!(prism_triangle_count(2), 0);
    }

    #[test]
    fn collinear_polygon_does_not_produce_nan_normals() {
        let line = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
        let mut mesh = SampleMesh::extrude_polygon(&line, 1.0, GREY).expect("prism");
        let skipped = mesh.recalculate_normals();
        assert!(skipped >= 2, "both caps are zero-area, skipped {}", skipped);
        assert!(mesh.is_well_formed());
        // A zero-width bounding dimension maps to the middle of the texture.
        assert!(mesh.vertices.iter().all(|v| v.uv[1] == 0.5));
    }

    #[test]
    fn unit_cylinder_is_closed_and_sized() {
        let mesh = SampleMesh::unit_cylinder(24, GREY);
        assert_eq!(mesh.vertex_count(), SampleMesh::unit_cylinder_vertex_count(24));
        assert_eq!(mesh.triangle_count(), 24 * 4);
        let (min, max) = mesh.bounds().expect("bounds");
        assert!((min - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
        assert!((max - Vec3::new(1.0, 1.0, 1.0)).length() < 1e-5);
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn sector_prism_surface_area() {
        let sector = sector_polygon(1.0, 0.0, std::f32::consts::PI, 64);
        let mesh = SampleMesh::extrude_polygon(&sector, 1.0, GREY).expect("prism");
        // Two half discs, a curved wall and a flat 2x1 wall through the axis.
        let expected = std::f32::consts::PI + std::f32::consts::PI + 2.0;
        assert!((mesh.surface_area() - expected).abs() / expected < 0.01);
    }

    #[test]
    fn packed_layout_has_counts_then_buffers() {
        let mesh = SampleMesh::unit_cylinder(8, GREY);
        let vertex_len = mesh.vertex_count() * std::mem::size_of::<SampleVertex>();
        assert_eq!(mesh.vertex_bytes().len(), vertex_len);
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);

        let packed = mesh.packed();
        assert_eq!(packed.len(), 8 + vertex_len + mesh.indices.len() * 4);
        assert_eq!(&packed[0..4], &(mesh.vertex_count() as u32).to_le_bytes()[..]);
        assert_eq!(&packed[4..8], &(mesh.indices.len() as u32).to_le_bytes()[..]);
        assert_eq!(&packed[8..8 + vertex_len], mesh.vertex_bytes());
        assert_eq!(&packed[8 + vertex_len..], mesh.index_bytes());
    }
}

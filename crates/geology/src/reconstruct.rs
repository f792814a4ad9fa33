//! Geometry reconstruction: turns a sample record into per-piece meshes placed
//! under a single anchor, with volumes, masses, and cosmetic contact/boundary lines.

use crate::anomaly::Anomaly;
use crate::layer::{LayerCategory, LayerId};
use crate::mesh::SampleMesh;
use crate::polygon::{self, circle_polygon, ensure_counter_clockwise};
use crate::sample::{ContactType, GeologicalSampleData, LayerInfo, LayerSampleSegment};
use engine_core::{Tint, Transform};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use uuid::Uuid;

/// Total mass never drops below this.
pub const MIN_SAMPLE_MASS: f32 = 0.1;

/// Configuration for sample reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Sides of the cylinder used for single-layer segments.
    pub cylinder_sides: usize,
    /// Blend toward white applied to every odd single-layer segment.
    pub alternate_lighten: f32,
    /// Emit boundary rings when the sample has more than this many segments.
    pub boundary_ring_threshold: usize,
    /// Ring radius relative to the drilling radius.
    pub boundary_ring_scale: f32,
    pub boundary_ring_segments: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            cylinder_sides: 24,
            alternate_lighten: 0.2,
            boundary_ring_threshold: 3,
            boundary_ring_scale: 1.01,
            boundary_ring_segments: 32,
        }
    }
}

/// Irregularity measures feeding the complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeologicalFeatures {
    pub surface_roughness: f32,
    pub thickness_variation: f32,
}

impl Default for GeologicalFeatures {
    fn default() -> Self {
        Self {
            surface_roughness: 0.1,
            thickness_variation: 0.05,
        }
    }
}

/// Physical outcome of cutting one piece out of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutResult {
    pub volume: f32,
    /// Closed surface of the piece.
    pub surface_area: f32,
    pub depth_start: f32,
    pub depth_end: f32,
    pub is_valid: bool,
    pub features: GeologicalFeatures,
}

impl CutResult {
    pub fn thickness(&self) -> f32 {
        self.depth_end - self.depth_start
    }
}

/// Mesh plus placement relative to the sample anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceGeometry {
    pub mesh: SampleMesh,
    pub transform: Transform,
}

impl PieceGeometry {
    /// Bounds in anchor space.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.transform
            .transformed_bounds(self.mesh.vertices.iter().map(|v| Vec3::from(v.position)))
    }
}

/// One reconstructed piece: a whole single-layer segment, or one layer's prism
/// inside a multi-layer segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSegment {
    pub segment_index: usize,
    pub layer: LayerId,
    pub name: String,
    pub category: LayerCategory,
    pub geometry: PieceGeometry,
    pub color: [f32; 4],
    pub cut_result: CutResult,
    pub mass: f32,
    /// Volume centroid in anchor space.
    pub local_center: Vec3,
}

impl LayerSegment {
    /// Name used for scene nodes, e.g. `Segment_2_Depth_1.40`.
    pub fn label(&self) -> String {
        format!("Segment_{}_Depth_{:.2}", self.segment_index, self.cut_result.depth_start)
    }
}

/// Cosmetic polyline along a contact, in anchor space.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactLine {
    pub layer_a: LayerId,
    pub layer_b: LayerId,
    pub contact_type: ContactType,
    pub points: Vec<Vec3>,
}

/// A sample ready for presentation. Owns every mesh buffer it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedSample {
    pub sample_id: Uuid,
    /// World position of the anchor (the top of the core).
    pub position: Vec3,
    pub total_volume: f32,
    pub total_height: f32,
    /// Center of mass in anchor space.
    pub local_center_of_mass: Vec3,
    pub center_of_mass: Vec3,
    pub total_mass: f32,
    pub layer_segments: Vec<LayerSegment>,
    pub contact_lines: Vec<ContactLine>,
    pub boundary_rings: Vec<Vec<Vec3>>,
    pub anomalies: Vec<Anomaly>,
    pub original_data: GeologicalSampleData,
}

impl ReconstructedSample {
    pub fn is_empty(&self) -> bool {
        self.layer_segments.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.layer_segments
            .iter()
            .map(|s| s.geometry.mesh.vertex_count())
            .sum()
    }

    /// Bounds of all pieces in anchor space.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.layer_segments
            .iter()
            .filter_map(|s| s.geometry.bounds())
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }

    /// All pieces baked into one mesh in anchor space.
    pub fn combined_mesh(&self) -> SampleMesh {
        let mut combined = SampleMesh::default();
        for segment in &self.layer_segments {
            let base = combined.vertices.len() as u32;
            let transform = &segment.geometry.transform;
            for vertex in &segment.geometry.mesh.vertices {
                let mut v = *vertex;
                v.position = transform.transform_point(Vec3::from(v.position)).into();
                let n = transform.rotation * (Vec3::from(v.normal) / transform.scale);
                v.normal = n.try_normalize().unwrap_or(Vec3::Y).into();
                combined.vertices.push(v);
            }
            combined
                .indices
                .extend(segment.geometry.mesh.indices.iter().map(|i| base + i));
        }
        combined
    }
}

/// Volume of one layer's share of a segment.
pub(crate) fn piece_volume(info: &LayerInfo, segment: &LayerSampleSegment, radius: f32) -> f32 {
    let fraction = if segment.is_multi_layer() { info.area_percentage } else { 1.0 };
    fraction * PI * radius * radius * segment.segment_height
}

/// Volume centroid of one piece in anchor space.
pub(crate) fn piece_center(info: &LayerInfo, segment: &LayerSampleSegment, depth_start: f32) -> Vec3 {
    let y = -(segment.mid_depth() - depth_start);
    if segment.is_multi_layer() {
        let c = polygon::centroid(&info.boundary_shape);
        Vec3::new(c.x, y, c.y)
    } else {
        Vec3::new(0.0, y, 0.0)
    }
}

/// Builds meshes for a sample record.
#[derive(Debug, Clone, Default)]
pub struct SampleReconstructor {
    pub config: ReconstructionConfig,
}

/// Reconstruct with default settings.
pub fn reconstruct(data: &GeologicalSampleData, position: Vec3) -> ReconstructedSample {
    SampleReconstructor::default().reconstruct(data, position)
}

impl SampleReconstructor {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    /// Build every piece, shallowest first, anchored at `position`.
    pub fn reconstruct(&self, data: &GeologicalSampleData, position: Vec3) -> ReconstructedSample {
        let radius = data.drilling_radius;
        let mut sample = ReconstructedSample {
            sample_id: data.sample_id,
            position,
            total_volume: 0.0,
            total_height: 0.0,
            local_center_of_mass: Vec3::ZERO,
            center_of_mass: position,
            total_mass: MIN_SAMPLE_MASS,
            layer_segments: Vec::new(),
            contact_lines: Vec::new(),
            boundary_rings: Vec::new(),
            anomalies: Vec::new(),
            original_data: data.clone(),
        };

        let mut segments: Vec<(usize, &LayerSampleSegment)> = data.segments.iter().enumerate().collect();
        segments.sort_by(|a, b| a.1.depth.total_cmp(&b.1.depth));

        let cylinder = SampleMesh::unit_cylinder(self.config.cylinder_sides, [1.0; 4]);
        for (index, segment) in segments {
            if segment.layers_in_section.is_empty() {
                sample.anomalies.push(
                    Anomaly::EmptySegment {
                        index,
                        depth: segment.depth,
                    }
                    .report(),
                );
                continue;
            }
            let top = -(segment.depth - data.depth_start);

            if segment.is_multi_layer() {
                for info in &segment.layers_in_section {
                    if let Some(piece) = self.prism_piece(index, info, segment, data, &mut sample.anomalies) {
                        sample.layer_segments.push(piece);
                    }
                }
                for interface in &segment.interfaces {
                    sample.contact_lines.push(ContactLine {
                        layer_a: interface.layer_a,
                        layer_b: interface.layer_b,
                        contact_type: interface.contact_type,
                        points: interface
                            .contact_line
                            .iter()
                            .map(|p| *p + Vec3::new(0.0, top, 0.0))
                            .collect(),
                    });
                }
            } else {
                let info = &segment.layers_in_section[0];
                sample
                    .layer_segments
                    .push(self.cylinder_piece(index, info, segment, data, &cylinder));
            }
            sample.total_height += segment.segment_height;
        }

        if data.segments.len() > self.config.boundary_ring_threshold {
            let ring = circle_polygon(
                Vec2::ZERO,
                radius * self.config.boundary_ring_scale,
                self.config.boundary_ring_segments,
            );
            for segment in data.segments.iter().skip(1) {
                let y = -(segment.depth - data.depth_start);
                sample
                    .boundary_rings
                    .push(ring.iter().map(|p| Vec3::new(p.x, y, p.y)).collect());
            }
        }

        let mut weighted = Vec3::ZERO;
        let mut mass = 0.0;
        for piece in &sample.layer_segments {
            sample.total_volume += piece.cut_result.volume;
            weighted += piece.local_center * piece.cut_result.volume;
            mass += piece.mass;
        }
        if sample.total_volume > 0.0 {
            sample.local_center_of_mass = weighted / sample.total_volume;
        }
        sample.center_of_mass = position + sample.local_center_of_mass;
        sample.total_mass = mass.max(MIN_SAMPLE_MASS);

        log::info!(
            "Reconstructed sample {}: {} pieces, volume {:.3}, mass {:.3}, {} anomalies",
            sample.sample_id,
            sample.layer_segments.len(),
            sample.total_volume,
            sample.total_mass,
            sample.anomalies.len()
        );
        sample
    }

    /// A cut is valid when its mesh is well formed and has no zero-area triangles.
    fn cut_result(&self, segment: &LayerSampleSegment, mesh: &SampleMesh, volume: f32, surface_area: f32) -> CutResult {
        CutResult {
            volume,
            surface_area,
            depth_start: segment.depth,
            depth_end: segment.bottom(),
            is_valid: mesh.is_well_formed() && mesh.degenerate_triangle_count() == 0,
            features: GeologicalFeatures::default(),
        }
    }

    fn cylinder_piece(
        &self,
        index: usize,
        info: &LayerInfo,
        segment: &LayerSampleSegment,
        data: &GeologicalSampleData,
        cylinder: &SampleMesh,
    ) -> LayerSegment {
        let radius = data.drilling_radius;
        let height = segment.segment_height;
        let center = piece_center(info, segment, data.depth_start);

        let mut tint = Tint(info.color);
        if index % 2 == 1 {
            tint = tint.lightened(self.config.alternate_lighten);
        }
        let mut mesh = cylinder.clone();
        mesh.set_color(tint.0);

        let volume = piece_volume(info, segment, radius);
        let surface_area = 2.0 * PI * radius * height + 2.0 * PI * radius * radius;
        log::debug!(
            "Segment {} ({}): cylinder r={:.3} h={:.3} at y={:.3}",
            index,
            info.name,
            radius,
            height,
            center.y
        );
        let cut_result = self.cut_result(segment, &mesh, volume, surface_area);
        LayerSegment {
            segment_index: index,
            layer: info.layer,
            name: info.name.clone(),
            category: info.category,
            geometry: PieceGeometry {
                mesh,
                transform: Transform::from_position_scale(center, Vec3::new(radius, height * 0.5, radius)),
            },
            color: tint.0,
            cut_result,
            mass: volume * info.category.density(),
            local_center: center,
        }
    }

    fn prism_piece(
        &self,
        index: usize,
        info: &LayerInfo,
        segment: &LayerSampleSegment,
        data: &GeologicalSampleData,
        anomalies: &mut Vec<Anomaly>,
    ) -> Option<LayerSegment> {
        let mut shape = info.boundary_shape.clone();
        ensure_counter_clockwise(&mut shape);
        let Some(mesh) = SampleMesh::extrude_polygon(&shape, segment.segment_height, info.color) else {
            anomalies.push(
                Anomaly::DegeneratePolygon {
                    layer: info.layer,
                    vertices: shape.len(),
                }
                .report(),
            );
            return None;
        };
        let degenerate = mesh.degenerate_triangle_count();
        if degenerate > 0 {
            anomalies.push(
                Anomaly::DegenerateTriangles {
                    layer: info.layer,
                    count: degenerate,
                }
                .report(),
            );
        }

        let volume = piece_volume(info, segment, data.drilling_radius);
        let surface_area = mesh.surface_area();
        let top = Vec3::new(0.0, -(segment.depth - data.depth_start), 0.0);
        log::debug!(
            "Segment {} ({}): prism of {} vertices, {:.0}% of section",
            index,
            info.name,
            shape.len(),
            info.area_percentage * 100.0
        );
        let cut_result = self.cut_result(segment, &mesh, volume, surface_area);
        Some(LayerSegment {
            segment_index: index,
            layer: info.layer,
            name: info.name.clone(),
            category: info.category,
            geometry: PieceGeometry {
                mesh,
                transform: Transform::from_position(top),
            },
            color: info.color,
            cut_result,
            mass: volume * info.category.density(),
            local_center: piece_center(info, segment, data.depth_start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_sample;
    use crate::intersection::LayerIntersection;
    use crate::layer::{Layer, LayerCatalog};
    use crate::sample::DrillingParams;

    fn catalog() -> LayerCatalog {
        [
            Layer::new(LayerId(1), "Topsoil", LayerCategory::Soil),
            Layer::new(LayerId(2), "Sandstone", LayerCategory::Sedimentary),
            Layer::new(LayerId(3), "Granite", LayerCategory::Igneous),
            Layer::new(LayerId(4), "Slate", LayerCategory::Metamorphic),
        ]
        .into_iter()
        .collect()
    }

    fn sample(bands: &[(u32, f32, f32, f32)], params: DrillingParams) -> GeologicalSampleData {
        let bands: Vec<LayerIntersection> = bands
            .iter()
            .map(|&(id, entry, exit, coverage)| {
                LayerIntersection::new(LayerId(id), params.position, entry, exit).with_coverage(coverage)
            })
            .collect();
        build_sample(&bands, &params, &catalog())
    }

    #[test]
    fn single_layer_cylinder_volume() {
        let params = DrillingParams::new(Vec3::new(0.0, 10.0, 0.0), 0.5, 5.0);
        let data = sample(&[(3, 0.0, 5.0, 1.0)], params);
        let rec = reconstruct(&data, Vec3::new(3.0, 0.0, 0.0));

        assert_eq!(rec.layer_segments.len(), 1);
        let expected = 5.0 * PI * 0.25;
        assert!((rec.total_volume - expected).abs() < 1e-4, "volume {}", rec.total_volume);
        assert!((rec.total_mass - expected * 2.7).abs() < 1e-3);

        let piece = &rec.layer_segments[0];
        assert!((piece.geometry.transform.position.y + 2.5).abs() < 1e-5);
        assert_eq!(piece.geometry.transform.scale, Vec3::new(0.5, 2.5, 0.5));
        let (min, max) = piece.geometry.bounds().expect("bounds");
        assert!(max.y.abs() < 1e-5 && (min.y + 5.0).abs() < 1e-5);
        assert!((rec.center_of_mass - Vec3::new(3.0, -2.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn stacked_segments_do_not_overlap() {
        let params = DrillingParams::new(Vec3::ZERO, 0.5, 6.0);
        let data = sample(
            &[(1, 0.0, 1.0, 1.0), (2, 1.0, 2.5, 1.0), (3, 2.5, 4.0, 1.0), (4, 4.0, 6.0, 1.0)],
            params,
        );
        let rec = reconstruct(&data, Vec3::ZERO);
        assert_eq!(rec.layer_segments.len(), 4);

        let mut previous_bottom = 0.0f32;
        for piece in &rec.layer_segments {
            let (min, max) = piece.geometry.bounds().expect("bounds");
            assert!((max.y - previous_bottom).abs() < 1e-4, "gap or overlap at {}", max.y);
            previous_bottom = min.y;
        }
        assert!((previous_bottom + 6.0).abs() < 1e-4);
        assert!((rec.total_height - 6.0).abs() < 1e-5);
        // More than three segments: one ring per internal boundary.
        assert_eq!(rec.boundary_rings.len(), 3);
    }

    #[test]
    fn odd_segments_are_lightened() {
        let params = DrillingParams::new(Vec3::ZERO, 0.5, 2.0);
        let data = sample(&[(1, 0.0, 1.0, 1.0), (1, 1.0, 2.0, 1.0)], params);
        // Identical neighbours merge into one segment.
        assert_eq!(data.segments.len(), 1);

        let data = sample(&[(1, 0.0, 1.0, 1.0), (2, 1.0, 2.0, 1.0)], params);
        let rec = reconstruct(&data, Vec3::ZERO);
        let base = LayerCategory::Sedimentary.base_color();
        let lit = rec.layer_segments[1].color;
        assert!(lit[0] > base[0] && (lit[3] - base[3]).abs() < 1e-6);
        assert_eq!(rec.layer_segments[0].color, LayerCategory::Soil.base_color());
    }

    #[test]
    fn multi_layer_segment_extrudes_prisms() {
        let params = DrillingParams::new(Vec3::ZERO, 1.0, 2.0);
        let data = sample(&[(2, 0.0, 2.0, 0.6), (3, 0.0, 2.0, 0.4)], params);
        let rec = reconstruct(&data, Vec3::ZERO);

        assert_eq!(rec.layer_segments.len(), 2);
        let segment_volume = PI * 2.0;
        assert!((rec.total_volume - segment_volume).abs() < 1e-4);
        let first = &rec.layer_segments[0];
        assert!((first.cut_result.volume - 0.6 * segment_volume).abs() < 1e-4);
        for piece in &rec.layer_segments {
            let mesh = &piece.geometry.mesh;
            assert_eq!(mesh.triangle_count() * 3, mesh.indices.len());
            assert!(mesh.is_well_formed());
        }
        assert!(rec.layer_segments.iter().all(|p| p.cut_result.is_valid));
        assert_eq!(rec.contact_lines.len(), 1);
        assert!(rec.contact_lines[0].points.iter().all(|p| (p.y + 1.0).abs() < 1e-5));
        assert!(rec.anomalies.is_empty());
    }

    #[test]
    fn flat_sector_gives_an_invalid_cut() {
        let params = DrillingParams::new(Vec3::ZERO, 1.0, 1.0);
        let mut data = sample(&[(2, 0.0, 1.0, 0.5), (3, 0.0, 1.0, 0.5)], params);
        data.segments[0].layers_in_section[1].boundary_shape =
            vec![Vec2::ZERO, Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.0)];

        let rec = reconstruct(&data, Vec3::ZERO);
        assert_eq!(rec.layer_segments.len(), 2);
        assert!(rec.layer_segments[0].cut_result.is_valid);
        assert!(!rec.layer_segments[1].cut_result.is_valid);
        assert!(rec
            .anomalies
            .iter()
            .any(|a| matches!(a, Anomaly::DegenerateTriangles { .. })));
    }

    #[test]
    fn degenerate_pieces_are_skipped() {
        let params = DrillingParams::new(Vec3::ZERO, 1.0, 2.0);
        let mut data = sample(&[(2, 0.0, 1.0, 0.5), (3, 0.0, 1.0, 0.5), (4, 1.0, 2.0, 1.0)], params);
        data.segments[0].layers_in_section[1].boundary_shape.truncate(2);
        data.segments.push(LayerSampleSegment {
            depth: 2.0,
            segment_height: 1.0,
            layers_in_section: Vec::new(),
            interfaces: Vec::new(),
        });

        let rec = reconstruct(&data, Vec3::ZERO);
        assert_eq!(rec.layer_segments.len(), 2, "one prism and one cylinder survive");
        assert!(rec
            .anomalies
            .iter()
            .any(|a| matches!(a, Anomaly::DegeneratePolygon { vertices: 2, .. })));
        assert!(rec
            .anomalies
            .iter()
            .any(|a| matches!(a, Anomaly::EmptySegment { index: 2, .. })));
    }

    #[test]
    fn empty_sample_reconstructs_to_nothing() {
        let data = sample(&[], DrillingParams::default());
        let rec = reconstruct(&data, Vec3::ZERO);
        assert!(rec.is_empty());
        assert_eq!(rec.total_volume, 0.0);
        assert_eq!(rec.total_mass, MIN_SAMPLE_MASS);
        assert!(rec.bounds().is_none());
        assert!(rec.combined_mesh().is_empty());
    }

    #[test]
    fn reconstruction_is_repeatable() {
        let params = DrillingParams::new(Vec3::ZERO, 0.75, 4.0);
        let data = sample(
            &[(1, 0.0, 1.0, 1.0), (2, 1.0, 3.0, 0.7), (3, 1.0, 3.0, 0.3), (4, 3.0, 4.0, 1.0)],
            params,
        );
        let a = reconstruct(&data, Vec3::ZERO);
        let b = reconstruct(&data, Vec3::ZERO);
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.combined_mesh().triangle_count(), b.combined_mesh().triangle_count());
        assert_eq!(a.bounds(), b.bounds());
        assert_eq!(a.layer_segments, b.layer_segments);
    }

    #[test]
    fn range_samples_start_at_the_anchor() {
        let params = DrillingParams::new(Vec3::ZERO, 0.5, 8.0).with_range(5.0, 8.0);
        let data = sample(&[(1, 5.0, 6.0, 1.0), (2, 6.0, 8.0, 1.0)], params);
        let rec = reconstruct(&data, Vec3::ZERO);
        let (min, max) = rec.bounds().expect("bounds");
        assert!(max.y.abs() < 1e-5);
        assert!((min.y + 3.0).abs() < 1e-5);
        assert_eq!(rec.layer_segments[0].label(), "Segment_0_Depth_5.00");
    }

    #[test]
    fn combined_mesh_is_well_formed() {
        let params = DrillingParams::new(Vec3::ZERO, 0.5, 3.0);
        let data = sample(&[(1, 0.0, 1.0, 1.0), (2, 1.0, 3.0, 0.5), (4, 1.0, 3.0, 0.5)], params);
        let rec = reconstruct(&data, Vec3::ZERO);
        let mesh = rec.combined_mesh();
        assert!(mesh.is_well_formed());
        assert_eq!(mesh.vertex_count(), rec.vertex_count());
    }
}

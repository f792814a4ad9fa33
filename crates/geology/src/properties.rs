//! Physical properties of a sample: volume, density-weighted mass, center of
//! mass, and the inspection summary shown for each collected core.

use crate::layer::LayerCategory;
use crate::mesh::SampleMesh;
use crate::reconstruct::{
    piece_center, piece_volume, GeologicalFeatures, ReconstructedSample, ReconstructionConfig,
    MIN_SAMPLE_MASS,
};
use crate::sample::GeologicalSampleData;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate physical properties derived from a sample record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    pub total_volume: f32,
    /// Never below [`MIN_SAMPLE_MASS`].
    pub total_mass: f32,
    /// In anchor space (top of the core at the origin).
    pub center_of_mass: Vec3,
    pub complexity_score: f32,
    pub dominant_category: Option<LayerCategory>,
    /// Volume of each segment, in segment order.
    pub segment_volumes: Vec<f32>,
    /// Volume per category, in order of first appearance.
    pub category_volumes: Vec<(LayerCategory, f32)>,
}

/// Diagnostic score: 10 per piece plus each piece's mesh detail and irregularity.
pub fn complexity_score<I>(pieces: I) -> f32
where
    I: IntoIterator<Item = (usize, GeologicalFeatures)>,
{
    pieces.into_iter().fold(0.0, |score, (vertices, features)| {
        score
            + 10.0
            + vertices as f32 * 0.01
            + features.surface_roughness
            + features.thickness_variation * 10.0
    })
}

/// Category with the largest cumulative volume. Ties keep the first encountered.
pub fn dominant_category(volumes: &[(LayerCategory, f32)]) -> Option<LayerCategory> {
    let mut best: Option<(LayerCategory, f32)> = None;
    for &(category, volume) in volumes {
        if best.map_or(true, |(_, v)| volume > v) {
            best = Some((category, volume));
        }
    }
    best.map(|(category, _)| category)
}

fn add_volume(volumes: &mut Vec<(LayerCategory, f32)>, category: LayerCategory, volume: f32) {
    match volumes.iter_mut().find(|(c, _)| *c == category) {
        Some((_, v)) => *v += volume,
        None => volumes.push((category, volume)),
    }
}

/// Compute properties straight from the record, without building meshes.
///
/// Pieces the reconstructor would skip (empty segments, boundaries with fewer than
/// three vertices) are skipped here too, and vertex counts are those the
/// reconstructor's meshes would have, so the results agree with
/// [`ReconstructedSample`] for the same config.
pub fn compute_statistics(data: &GeologicalSampleData, config: &ReconstructionConfig) -> PhysicalProperties {
    let radius = data.drilling_radius;
    let mut total_volume = 0.0;
    let mut mass = 0.0;
    let mut weighted = Vec3::ZERO;
    let mut segment_volumes = Vec::with_capacity(data.segments.len());
    let mut category_volumes = Vec::new();
    let mut pieces = Vec::new();

    for segment in &data.segments {
        let mut segment_volume = 0.0;
        for info in &segment.layers_in_section {
            let vertices = if segment.is_multi_layer() {
                if info.boundary_shape.len() < 3 {
                    continue;
                }
                info.boundary_shape.len() * 2
            } else {
                SampleMesh::unit_cylinder_vertex_count(config.cylinder_sides)
            };
            let volume = piece_volume(info, segment, radius);
            segment_volume += volume;
            mass += volume * info.category.density();
            weighted += piece_center(info, segment, data.depth_start) * volume;
            add_volume(&mut category_volumes, info.category, volume);
            pieces.push((vertices, GeologicalFeatures::default()));
        }
        total_volume += segment_volume;
        segment_volumes.push(segment_volume);
    }

    let properties = PhysicalProperties {
        total_volume,
        total_mass: f32::max(mass, MIN_SAMPLE_MASS),
        center_of_mass: if total_volume > 0.0 { weighted / total_volume } else { Vec3::ZERO },
        complexity_score: complexity_score(pieces),
        dominant_category: dominant_category(&category_volumes),
        segment_volumes,
        category_volumes,
    };
    log::debug!(
        "Sample {}: volume {:.3}, mass {:.3}, complexity {:.2}",
        data.sample_id,
        properties.total_volume,
        properties.total_mass,
        properties.complexity_score
    );
    properties
}

/// Per-sample summary for inspection displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub sample_id: Uuid,
    pub total_volume: f32,
    pub total_mass: f32,
    /// Reconstructed pieces; a layer cut twice counts twice.
    pub layer_count: usize,
    /// Mean mid-depth of the pieces, from the drill origin.
    pub average_depth: f32,
    pub dominant_category: Option<LayerCategory>,
    pub complexity_score: f32,
}

impl SampleStatistics {
    pub fn from_reconstructed(sample: &ReconstructedSample) -> Self {
        let pieces = &sample.layer_segments;
        let mut volumes = Vec::new();
        for piece in pieces {
            add_volume(&mut volumes, piece.category, piece.cut_result.volume);
        }
        let average_depth = if pieces.is_empty() {
            0.0
        } else {
            pieces
                .iter()
                .map(|p| (p.cut_result.depth_start + p.cut_result.depth_end) * 0.5)
                .sum::<f32>()
                / pieces.len() as f32
        };

        Self {
            sample_id: sample.sample_id,
            total_volume: sample.total_volume,
            total_mass: sample.total_mass,
            layer_count: pieces.len(),
            average_depth,
            dominant_category: dominant_category(&volumes),
            complexity_score: complexity_score(
                pieces
                    .iter()
                    .map(|p| (p.geometry.mesh.vertex_count(), p.cut_result.features)),
            ),
        }
    }
}

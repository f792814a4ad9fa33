//! Sample records: depth-ordered segments with per-layer fractions, contacts, and totals.

use crate::anomaly::Anomaly;
use crate::intersection::DRILL_DOWN;
use crate::layer::{LayerCategory, LayerId};
use chrono::{DateTime, Utc};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where and how far to drill. Depths are measured down from `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillingParams {
    pub position: Vec3,
    pub direction: Vec3,
    pub radius: f32,
    /// Bottom of the drilled range.
    pub depth: f32,
    /// Top of the drilled range. Zero unless drilling from a tower into a deeper interval.
    pub depth_start: f32,
}

impl Default for DrillingParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: DRILL_DOWN,
            radius: 0.5,
            depth: 5.0,
            depth_start: 0.0,
        }
    }
}

impl DrillingParams {
    pub fn new(position: Vec3, radius: f32, depth: f32) -> Self {
        Self {
            position,
            radius,
            depth,
            ..Default::default()
        }
    }

    pub fn with_range(mut self, depth_start: f32, depth_end: f32) -> Self {
        self.depth_start = depth_start;
        self.depth = depth_end;
        self
    }
}

/// One layer's share of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub layer: LayerId,
    pub name: String,
    pub category: LayerCategory,
    /// Polygon in the segment's horizontal plane; `Vec2(x, y)` is local `(x, _, y)`.
    pub boundary_shape: Vec<Vec2>,
    /// Fraction of the segment's cross-section, in `[0, 1]`.
    pub area_percentage: f32,
    pub thickness: f32,
    pub dip_angle: f32,
    pub color: [f32; 4],
    pub material: Option<String>,
    pub formation: String,
}

/// Relationship between two layers that touch inside a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    #[default]
    Conformable,
    Unconformable,
    Disconformable,
    Intrusive,
    Fault,
    Gradational,
}

impl ContactType {
    /// Classify by the angle (degrees) between the two layers' bedding normals.
    pub fn from_angle(degrees: f32) -> Self {
        if degrees < 10.0 {
            ContactType::Conformable
        } else if degrees > 45.0 {
            ContactType::Unconformable
        } else {
            ContactType::Disconformable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInterface {
    pub layer_a: LayerId,
    pub layer_b: LayerId,
    /// Shared boundary in segment-local space, at the segment's mid-height.
    pub contact_line: Vec<Vec3>,
    /// Degrees between the layers' bedding normals.
    pub contact_angle: f32,
    pub contact_type: ContactType,
}

/// A depth slice of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSampleSegment {
    /// Top of the segment, measured from the drill origin.
    pub depth: f32,
    pub segment_height: f32,
    pub layers_in_section: Vec<LayerInfo>,
    pub interfaces: Vec<ContactInterface>,
}

impl LayerSampleSegment {
    pub fn bottom(&self) -> f32 {
        self.depth + self.segment_height
    }

    pub fn mid_depth(&self) -> f32 {
        self.depth + self.segment_height * 0.5
    }

    pub fn is_multi_layer(&self) -> bool {
        self.layers_in_section.len() > 1
    }
}

/// Totals for one layer category across the whole sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStatistic {
    pub layer_type: LayerCategory,
    /// Name of the first layer of this category encountered.
    pub layer_name: String,
    /// Area-weighted thickness: a layer filling 40% of a 2 m segment adds 0.8 m.
    pub total_thickness: f32,
    pub number_of_segments: usize,
    pub average_dip_angle: f32,
    pub percentage_of_sample: f32,
}

/// Everything recorded by one drilling action. Immutable after it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologicalSampleData {
    pub sample_id: Uuid,
    pub drilling_position: Vec3,
    pub drilling_direction: Vec3,
    pub drilling_radius: f32,
    pub drilling_depth: f32,
    pub depth_start: f32,
    pub collection_time: DateTime<Utc>,
    /// Ordered shallowest first, non-overlapping.
    pub segments: Vec<LayerSampleSegment>,
    pub layer_stats: Vec<LayerStatistic>,
    /// Distinct formation names in depth order.
    pub identified_formations: Vec<String>,
    pub anomalies: Vec<Anomaly>,
}

impl GeologicalSampleData {
    /// A sample with no segments, for when nothing was detected.
    pub fn empty(params: &DrillingParams) -> Self {
        Self {
            sample_id: Uuid::new_v4(),
            drilling_position: params.position,
            drilling_direction: params.direction,
            drilling_radius: params.radius,
            drilling_depth: params.depth,
            depth_start: params.depth_start,
            collection_time: Utc::now(),
            segments: Vec::new(),
            layer_stats: Vec::new(),
            identified_formations: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    pub fn params(&self) -> DrillingParams {
        DrillingParams {
            position: self.drilling_position,
            direction: self.drilling_direction,
            radius: self.drilling_radius,
            depth: self.drilling_depth,
            depth_start: self.depth_start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment heights (gaps excluded).
    pub fn total_height(&self) -> f32 {
        self.segments.iter().map(|s| s.segment_height).sum()
    }

    /// Distinct layers, in order of first appearance.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        let mut ids = Vec::new();
        for info in self.segments.iter().flat_map(|s| &s.layers_in_section) {
            if !ids.contains(&info.layer) {
                ids.push(info.layer);
            }
        }
        ids
    }
}

//! Layer intersection detection along a vertical drilling probe.
//!
//! A probe is cast from well above the drill origin straight down. Each layer is
//! identified by the highest surface hit recorded for it (its top face); a layer's
//! bottom is the next layer's top, and the deepest layer is open-ended. Bands are
//! then converted to depths below the drill origin and clipped to the drilling range.

use crate::layer::LayerId;
use crate::MIN_LAYER_THICKNESS;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Squared length below which summed column directions carry no bearing.
const BEARING_EPSILON: f32 = 1e-6;

/// Drilling direction. Only vertical probes are supported.
pub const DRILL_DOWN: Vec3 = Vec3::NEG_Y;

/// What a probe hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// The top (or any face) of a geological layer.
    Layer(LayerId),
    /// Towers, platforms, equipment: anything that is not rock.
    NonGeological,
}

/// One surface crossing reported by a [`SurfaceProbe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub point: Vec3,
    pub surface: SurfaceKind,
}

impl ProbeHit {
    pub fn layer(point: Vec3, id: LayerId) -> Self {
        Self { point, surface: SurfaceKind::Layer(id) }
    }

    pub fn non_geological(point: Vec3) -> Self {
        Self { point, surface: SurfaceKind::NonGeological }
    }

    pub fn layer_id(&self) -> Option<LayerId> {
        match self.surface {
            SurfaceKind::Layer(id) => Some(id),
            SurfaceKind::NonGeological => None,
        }
    }
}

/// Spatial query used by the detector: every surface crossed by a ray, not just the first.
///
/// Implementations must be safe to call concurrently from several drilling operations.
pub trait SurfaceProbe {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<ProbeHit>;
}

impl<T: SurfaceProbe + ?Sized> SurfaceProbe for &T {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<ProbeHit> {
        (**self).probe(origin, direction, max_distance)
    }
}

/// A layer band along the probe, in depths below the drill origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerIntersection {
    pub layer: LayerId,
    pub entry_depth: f32,
    pub exit_depth: f32,
    pub entry_point: Vec3,
    pub exit_point: Vec3,
    /// Fraction of the drill footprint this layer occupies over the band (1 for a single probe).
    pub coverage: f32,
    /// Horizontal direction from the drill axis towards where the layer sits in the
    /// footprint, as an angle in the x/z plane. `None` when the layer fills the footprint
    /// evenly or only one column was probed.
    #[serde(default)]
    pub bearing: Option<f32>,
}

impl LayerIntersection {
    pub fn new(layer: LayerId, origin: Vec3, entry_depth: f32, exit_depth: f32) -> Self {
        Self {
            layer,
            entry_depth,
            exit_depth,
            entry_point: origin + DRILL_DOWN * entry_depth,
            exit_point: origin + DRILL_DOWN * exit_depth,
            coverage: 1.0,
            bearing: None,
        }
    }

    pub fn with_coverage(mut self, coverage: f32) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_bearing(mut self, bearing: f32) -> Self {
        self.bearing = Some(bearing);
        self
    }
}

/// Configuration for layer detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// How far above the drill origin the probe starts.
    pub probe_height: f32,
    /// How far below the drilling range the deepest layer is assumed to extend.
    pub bottom_extension: f32,
    /// Bands at or below this thickness are discarded.
    pub min_thickness: f32,
    /// Number of probe columns on the footprint ring (plus one on the axis).
    pub footprint_columns: usize,
    /// Ring radius as a fraction of the drilling radius.
    pub footprint_ring: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            probe_height: 50.0,
            bottom_extension: 10.0,
            min_thickness: MIN_LAYER_THICKNESS,
            footprint_columns: 8,
            footprint_ring: 0.7,
        }
    }
}

/// Converts vertical probes into ordered layer bands.
#[derive(Debug, Clone, Default)]
pub struct IntersectionDetector {
    pub config: DetectorConfig,
}

/// A layer's vertical band at one probe column, in world elevations.
#[derive(Debug, Clone, Copy)]
struct ColumnBand {
    layer: LayerId,
    top: f32,
    bottom: f32,
}

impl IntersectionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Bands crossed by a vertical probe from `origin`, clipped to `[0, max_distance]`.
    pub fn detect<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Vec<LayerIntersection> {
        if direction.normalize_or_zero().dot(DRILL_DOWN) < 0.999 {
            log::warn!(
                "Only vertical drilling is supported; probing straight down instead of {}",
                direction
            );
        }
        self.detect_range(probe, origin, 0.0, max_distance)
    }

    /// Bands crossed by a vertical probe from `origin`, clipped to `[depth_start, depth_end]`.
    /// Depths stay measured from `origin`.
    pub fn detect_range<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
        origin: Vec3,
        depth_start: f32,
        depth_end: f32,
    ) -> Vec<LayerIntersection> {
        let bands = self.column_bands(probe, origin, depth_end);
        let mut intersections = Vec::with_capacity(bands.len());

        for band in bands {
            let entry = (origin.y - band.top).max(depth_start);
            let exit = (origin.y - band.bottom).min(depth_end);
            if entry < depth_end && exit > depth_start && exit - entry > self.config.min_thickness {
                intersections.push(LayerIntersection::new(band.layer, origin, entry, exit));
            } else if entry < depth_end && exit > depth_start {
                log::debug!(
                    "Dropping layer {} band {:.4}..{:.4}: thinner than {}",
                    band.layer,
                    entry,
                    exit,
                    self.config.min_thickness
                );
            }
        }

        log::debug!(
            "Probe at ({:.2}, {:.2}) found {} layer bands in {:.2}..{:.2}",
            origin.x,
            origin.z,
            intersections.len(),
            depth_start,
            depth_end
        );
        intersections
    }

    /// Probe the axis and a ring of columns across the drill footprint and report,
    /// per depth window, each layer's share of the columns as its `coverage`.
    ///
    /// A layer hit by part of the ring also gets the mean direction of those ring
    /// columns as its `bearing`, so its boundary sector can face the side it came from.
    pub fn detect_footprint<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
        origin: Vec3,
        radius: f32,
        depth_start: f32,
        depth_end: f32,
    ) -> Vec<LayerIntersection> {
        let ring = self.config.footprint_columns;
        let ring_radius = radius * self.config.footprint_ring;
        let mut offsets = Vec::with_capacity(ring + 1);
        // The axis column goes last.
        for i in 0..ring {
            let angle = i as f32 * TAU / ring as f32;
            offsets.push(Vec2::new(angle.cos(), angle.sin()) * ring_radius);
        }
        offsets.push(Vec2::ZERO);

        let columns: Vec<Vec<LayerIntersection>> = offsets
            .iter()
            .map(|o| self.detect_range(probe, origin + Vec3::new(o.x, 0.0, o.y), depth_start, depth_end))
            .collect();

        let mut breaks: Vec<f32> = columns
            .iter()
            .flatten()
            .flat_map(|i| [i.entry_depth, i.exit_depth])
            .collect();
        breaks.sort_by(|a, b| a.total_cmp(b));
        breaks.dedup_by(|b, a| (*b - *a).abs() <= self.config.min_thickness);

        let column_count = columns.len() as f32;
        let mut result = Vec::new();
        for window in breaks.windows(2) {
            let (top, bottom) = (window[0], window[1]);
            if bottom - top <= self.config.min_thickness {
                continue;
            }
            let mid = (top + bottom) * 0.5;
            let mut counts: Vec<(LayerId, usize, Vec2)> = Vec::new();
            for (column, offset) in columns.iter().zip(&offsets) {
                let Some(hit) = column
                    .iter()
                    .find(|i| i.entry_depth <= mid && mid < i.exit_depth)
                else {
                    continue;
                };
                let direction = offset.normalize_or_zero();
                match counts.iter_mut().find(|(id, _, _)| *id == hit.layer) {
                    Some((_, n, heading)) => {
                        *n += 1;
                        *heading += direction;
                    }
                    None => counts.push((hit.layer, 1, direction)),
                }
            }
            for (layer, n, heading) in counts {
                let mut band = LayerIntersection::new(layer, origin, top, bottom)
                    .with_coverage(n as f32 / column_count);
                if n < columns.len() && heading.length_squared() > BEARING_EPSILON {
                    band = band.with_bearing(heading.y.atan2(heading.x));
                }
                result.push(band);
            }
        }
        log::debug!(
            "Footprint probe ({} columns) produced {} windowed bands",
            columns.len(),
            result.len()
        );
        result
    }

    /// Collect each layer's top surface under `column` and derive its bottom from the
    /// next layer down. Sorted shallowest first.
    fn column_bands<P: SurfaceProbe + ?Sized>(
        &self,
        probe: &P,
        column: Vec3,
        depth_end: f32,
    ) -> Vec<ColumnBand> {
        let start = column + Vec3::Y * self.config.probe_height;
        let reach = self.config.probe_height + depth_end + self.config.bottom_extension;

        let mut tops: HashMap<LayerId, f32> = HashMap::new();
        for hit in probe.probe(start, DRILL_DOWN, reach) {
            let Some(id) = hit.layer_id() else {
                continue;
            };
            tops.entry(id)
                .and_modify(|top| *top = top.max(hit.point.y))
                .or_insert(hit.point.y);
        }

        let mut sorted: Vec<(LayerId, f32)> = tops.into_iter().collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let floor = column.y - depth_end - self.config.bottom_extension;
        (0..sorted.len())
            .map(|i| ColumnBand {
                layer: sorted[i].0,
                top: sorted[i].1,
                bottom: sorted.get(i + 1).map_or(floor, |next| next.1),
            })
            .collect()
    }
}

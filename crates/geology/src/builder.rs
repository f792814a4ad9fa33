//! Builds a [`GeologicalSampleData`] from detected layer bands.
//!
//! Band boundaries are swept into depth windows. A window crossed by one layer
//! becomes a single-layer segment; a window shared by several layers (a lens or
//! a dipping contact inside the drill footprint) becomes one multi-layer segment
//! whose layers split the core's cross-section into pie sectors sized by their
//! coverage. Windows no band covers are gaps and produce no segment.

use crate::anomaly::Anomaly;
use crate::intersection::LayerIntersection;
use crate::layer::{Layer, LayerCatalog, LayerId};
use crate::polygon::{circle_polygon, sector_polygon};
use crate::sample::{
    ContactInterface, ContactType, DrillingParams, GeologicalSampleData, LayerInfo,
    LayerSampleSegment, LayerStatistic,
};
use crate::MIN_LAYER_THICKNESS;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub min_thickness: f32,
    /// Adjacent windows with the same layers merge when every fraction differs by less than this.
    pub merge_tolerance: f32,
    /// Allowed deviation of a segment's area fractions from 1 before they are renormalized.
    pub fraction_tolerance: f32,
    /// Full-circle resolution of boundary shapes.
    pub boundary_segments: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_thickness: MIN_LAYER_THICKNESS,
            merge_tolerance: 0.1,
            fraction_tolerance: 1e-3,
            boundary_segments: 32,
        }
    }
}

/// A layer inside a window: raw coverage weight and the summed direction it was seen in.
#[derive(Debug, Clone, Copy)]
struct Member {
    layer: LayerId,
    weight: f32,
    heading: Vec2,
}

impl Member {
    fn bearing(&self) -> Option<f32> {
        (self.heading.length_squared() > 1e-8).then(|| self.heading.y.atan2(self.heading.x).rem_euclid(TAU))
    }
}

/// A depth window and the layers present in it.
#[derive(Debug, Clone)]
struct Window {
    top: f32,
    bottom: f32,
    members: Vec<Member>,
}

impl Window {
    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn fractions(&self) -> Vec<f32> {
        let sum: f32 = self.members.iter().map(|m| m.weight).sum();
        self.members.iter().map(|m| m.weight / sum).collect()
    }

    fn same_layers(&self, other: &Window) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .zip(&other.members)
                .all(|(a, b)| a.layer == b.layer)
    }

    /// Sector order and the angle the first sector starts at. Layers with a bearing come
    /// first, counter-clockwise by bearing, and the first is centred on its own bearing.
    /// The rest follow in window order. Without any bearing the sectors start at 0.
    fn sector_layout(&self, fractions: &[f32]) -> (Vec<usize>, f32) {
        let mut measured: Vec<(usize, f32)> = self
            .members
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.bearing().map(|b| (i, b)))
            .collect();
        measured.sort_by(|a, b| a.1.total_cmp(&b.1));
        let start = measured.first().map_or(0.0, |&(i, b)| b - fractions[i] * PI);

        let unmeasured = (0..self.members.len()).filter(|i| !measured.iter().any(|&(j, _)| j == *i));
        let order = measured.iter().map(|&(i, _)| i).chain(unmeasured).collect();
        (order, start)
    }
}

/// Turns ordered layer bands into a sample record.
pub struct SampleBuilder<'a> {
    catalog: &'a LayerCatalog,
    config: BuilderConfig,
}

/// Build a sample with default settings.
pub fn build_sample(
    intersections: &[LayerIntersection],
    params: &DrillingParams,
    catalog: &LayerCatalog,
) -> GeologicalSampleData {
    SampleBuilder::new(catalog).build(intersections, params)
}

impl<'a> SampleBuilder<'a> {
    pub fn new(catalog: &'a LayerCatalog) -> Self {
        Self {
            catalog,
            config: BuilderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(&self, intersections: &[LayerIntersection], params: &DrillingParams) -> GeologicalSampleData {
        let mut sample = GeologicalSampleData::empty(params);

        let bands = self.valid_bands(intersections, params, &mut sample.anomalies);
        if bands.is_empty() {
            sample
                .anomalies
                .push(Anomaly::NoLayersDetected { origin: params.position }.report());
            return sample;
        }

        let windows = self.merge_windows(self.sweep(&bands));
        let mut unknown: Vec<LayerId> = Vec::new();
        for window in &windows {
            let segment = self.segment(window, params, &mut unknown, &mut sample.anomalies);
            sample.segments.push(segment);
        }

        sample.layer_stats = layer_statistics(&sample.segments);
        sample.identified_formations = formations(&sample.segments);

        log::info!(
            "Built sample {}: {} segments, {} layers, {:.2} m of core",
            sample.sample_id,
            sample.segments.len(),
            sample.layer_ids().len(),
            sample.total_height()
        );
        sample
    }

    /// Clip bands to the drilled range and discard those too thin to keep.
    fn valid_bands(
        &self,
        intersections: &[LayerIntersection],
        params: &DrillingParams,
        anomalies: &mut Vec<Anomaly>,
    ) -> Vec<LayerIntersection> {
        let mut bands = Vec::with_capacity(intersections.len());
        for band in intersections {
            let entry = band.entry_depth.max(params.depth_start);
            let exit = band.exit_depth.min(params.depth);
            if exit <= params.depth_start || entry >= params.depth || band.coverage <= 0.0 {
                continue;
            }
            if exit - entry <= self.config.min_thickness {
                anomalies.push(
                    Anomaly::BandTooThin {
                        layer: band.layer,
                        entry,
                        exit,
                    }
                    .report(),
                );
                continue;
            }
            bands.push(LayerIntersection {
                entry_depth: entry,
                exit_depth: exit,
                ..*band
            });
        }
        bands
    }

    /// Split the bands at every boundary into windows, keeping input order among layers.
    fn sweep(&self, bands: &[LayerIntersection]) -> Vec<Window> {
        let mut breaks: Vec<f32> = bands
            .iter()
            .flat_map(|b| [b.entry_depth, b.exit_depth])
            .collect();
        breaks.sort_by(|a, b| a.total_cmp(b));
        breaks.dedup_by(|b, a| (*b - *a).abs() <= self.config.min_thickness);

        let mut windows = Vec::new();
        for pair in breaks.windows(2) {
            let (top, bottom) = (pair[0], pair[1]);
            if bottom - top <= self.config.min_thickness {
                continue;
            }
            let mid = (top + bottom) * 0.5;
            let mut members: Vec<Member> = Vec::new();
            for band in bands.iter().filter(|b| b.entry_depth <= mid && mid < b.exit_depth) {
                let heading = band
                    .bearing
                    .map_or(Vec2::ZERO, |b| Vec2::new(b.cos(), b.sin()) * band.coverage);
                match members.iter_mut().find(|m| m.layer == band.layer) {
                    Some(m) => {
                        m.weight += band.coverage;
                        m.heading += heading;
                    }
                    None => members.push(Member {
                        layer: band.layer,
                        weight: band.coverage,
                        heading,
                    }),
                }
            }
            if members.is_empty() {
                log::debug!("No layer between {:.3} and {:.3}; leaving a gap", top, bottom);
                continue;
            }
            windows.push(Window { top, bottom, members });
        }
        windows
    }

    /// Merge touching windows that hold the same layers in nearly the same proportions.
    fn merge_windows(&self, windows: Vec<Window>) -> Vec<Window> {
        let mut merged: Vec<Window> = Vec::with_capacity(windows.len());
        for window in windows {
            if let Some(prev) = merged.last_mut() {
                let touching = (window.top - prev.bottom).abs() <= self.config.min_thickness;
                let similar = prev.same_layers(&window)
                    && prev
                        .fractions()
                        .iter()
                        .zip(window.fractions())
                        .all(|(a, b)| (a - b).abs() < self.config.merge_tolerance);
                if touching && similar {
                    let (h0, h1) = (prev.height(), window.height());
                    for (member, next) in prev.members.iter_mut().zip(&window.members) {
                        member.weight = (member.weight * h0 + next.weight * h1) / (h0 + h1);
                        member.heading = member.heading * h0 + next.heading * h1;
                    }
                    prev.bottom = window.bottom;
                    continue;
                }
            }
            merged.push(window);
        }
        merged
    }

    fn segment(
        &self,
        window: &Window,
        params: &DrillingParams,
        unknown: &mut Vec<LayerId>,
        anomalies: &mut Vec<Anomaly>,
    ) -> LayerSampleSegment {
        let height = window.height();
        let sum: f32 = window.members.iter().map(|m| m.weight).sum();
        if (sum - 1.0).abs() > self.config.fraction_tolerance {
            anomalies.push(Anomaly::AreaFractionsNormalized { depth: window.top, sum }.report());
        }

        let fractions = window.fractions();
        let (order, first_angle) = window.sector_layout(&fractions);
        let layers: Vec<Layer> = order
            .iter()
            .map(|&i| {
                let id = window.members[i].layer;
                match self.catalog.get(id) {
                    Some(layer) => layer.clone(),
                    None => {
                        if !unknown.contains(&id) {
                            unknown.push(id);
                            anomalies.push(Anomaly::UnknownLayer(id).report());
                        }
                        Layer::unknown(id)
                    }
                }
            })
            .collect();

        let mut start = first_angle;
        let mut layers_in_section = Vec::with_capacity(layers.len());
        let mut boundaries = Vec::with_capacity(layers.len());
        for (layer, fraction) in layers.iter().zip(order.iter().map(|&i| &fractions[i])) {
            let boundary_shape = if layers.len() == 1 {
                circle_polygon(Vec2::ZERO, params.radius, self.config.boundary_segments)
            } else {
                sector_polygon(params.radius, start, start + fraction * TAU, self.config.boundary_segments)
            };
            start += fraction * TAU;
            boundaries.push(start);
            layers_in_section.push(LayerInfo {
                layer: layer.id,
                name: layer.name.clone(),
                category: layer.category,
                boundary_shape,
                area_percentage: *fraction,
                thickness: height,
                dip_angle: layer.dip_angle,
                color: layer.color,
                material: layer.material.clone(),
                formation: layer.formation.clone(),
            });
        }

        let interfaces = contacts(&layers, first_angle, &boundaries, params.radius, height);
        LayerSampleSegment {
            depth: window.top,
            segment_height: height,
            layers_in_section,
            interfaces,
        }
    }
}

/// Contacts between neighbouring sectors. Sector `i` ends at `boundaries[i]` where
/// sector `i + 1` begins; the last sector closes against the first along `first_angle`.
fn contacts(
    layers: &[Layer],
    first_angle: f32,
    boundaries: &[f32],
    radius: f32,
    height: f32,
) -> Vec<ContactInterface> {
    let rim = |angle: f32| Vec3::new(angle.cos() * radius, -height * 0.5, angle.sin() * radius);
    let center = Vec3::new(0.0, -height * 0.5, 0.0);
    let contact = |a: &Layer, b: &Layer, line: Vec<Vec3>| {
        let angle = a.normal().angle_between(b.normal()).to_degrees();
        ContactInterface {
            layer_a: a.id,
            layer_b: b.id,
            contact_line: line,
            contact_angle: angle,
            contact_type: ContactType::from_angle(angle),
        }
    };

    match layers.len() {
        0 | 1 => Vec::new(),
        // Two sectors share both radii, so their contact runs rim to rim through the axis.
        2 => vec![contact(&layers[0], &layers[1], vec![rim(boundaries[0]), center, rim(first_angle)])],
        n => (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                let angle = if j == 0 { first_angle } else { boundaries[i] };
                contact(&layers[i], &layers[j], vec![center, rim(angle)])
            })
            .collect(),
    }
}

/// Per-category totals. Categories appear in order of first occurrence.
fn layer_statistics(segments: &[LayerSampleSegment]) -> Vec<LayerStatistic> {
    struct Acc {
        stat: LayerStatistic,
        dip_sum: f32,
        entries: usize,
        last_segment: Option<usize>,
    }

    let mut accs: Vec<Acc> = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        for info in &segment.layers_in_section {
            let pos = match accs.iter().position(|a| a.stat.layer_type == info.category) {
                Some(pos) => pos,
                None => {
                    accs.push(Acc {
                        stat: LayerStatistic {
                            layer_type: info.category,
                            layer_name: info.name.clone(),
                            total_thickness: 0.0,
                            number_of_segments: 0,
                            average_dip_angle: 0.0,
                            percentage_of_sample: 0.0,
                        },
                        dip_sum: 0.0,
                        entries: 0,
                        last_segment: None,
                    });
                    accs.len() - 1
                }
            };
            let acc = &mut accs[pos];
            acc.stat.total_thickness += segment.segment_height * info.area_percentage;
            acc.dip_sum += info.dip_angle;
            acc.entries += 1;
            if acc.last_segment != Some(index) {
                acc.stat.number_of_segments += 1;
                acc.last_segment = Some(index);
            }
        }
    }

    let total: f32 = accs.iter().map(|a| a.stat.total_thickness).sum();
    accs.into_iter()
        .map(|acc| {
            let mut stat = acc.stat;
            stat.average_dip_angle = if acc.entries > 0 {
                acc.dip_sum / acc.entries as f32
            } else {
                0.0
            };
            stat.percentage_of_sample = if total > 0.0 { stat.total_thickness / total } else { 0.0 };
            stat
        })
        .collect()
}

fn formations(segments: &[LayerSampleSegment]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for info in segments.iter().flat_map(|s| &s.layers_in_section) {
        if !info.formation.is_empty() && !names.contains(&info.formation) {
            names.push(info.formation.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyKind;
    use crate::intersection::tests::PlaneStrata;
    use crate::intersection::{IntersectionDetector, DRILL_DOWN};
    use crate::layer::LayerCategory;
    use crate::polygon::signed_area;

    fn catalog() -> LayerCatalog {
        [
            Layer::new(LayerId(1), "Topsoil", LayerCategory::Soil).with_formation("Quaternary cover"),
            Layer::new(LayerId(2), "Sandstone", LayerCategory::Sedimentary)
                .with_formation("Red Beds")
                .with_dip(5.0, Vec3::Z),
            Layer::new(LayerId(3), "Granite", LayerCategory::Igneous)
                .with_formation("Basement")
                .with_dip(60.0, Vec3::X),
            Layer::new(LayerId(4), "Shale", LayerCategory::Sedimentary).with_formation("Red Beds"),
        ]
        .into_iter()
        .collect()
    }

    fn origin() -> Vec3 {
        Vec3::new(0.0, 10.0, 0.0)
    }

    fn band(id: u32, entry: f32, exit: f32) -> LayerIntersection {
        LayerIntersection::new(LayerId(id), origin(), entry, exit)
    }

    fn assert_ordered(sample: &GeologicalSampleData) {
        for pair in sample.segments.windows(2) {
            assert!(
                pair[0].bottom() <= pair[1].depth + 1e-4,
                "segments overlap: {:?} then {:?}",
                (pair[0].depth, pair[0].segment_height),
                (pair[1].depth, pair[1].segment_height)
            );
        }
        for segment in &sample.segments {
            assert!(segment.segment_height > MIN_LAYER_THICKNESS);
            let sum: f32 = segment.layers_in_section.iter().map(|l| l.area_percentage).sum();
            assert!((sum - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn stacked_bands_become_single_layer_segments() {
        let catalog = catalog();
        let strata = PlaneStrata::flat(&[(1, 10.0), (2, 9.0), (3, 6.5)]);
        let bands = IntersectionDetector::default().detect(&strata, origin(), DRILL_DOWN, 5.0);
        let params = DrillingParams::new(origin(), 0.5, 5.0);
        let sample = build_sample(&bands, &params, &catalog);

        assert_eq!(sample.segments.len(), 3);
        assert!(sample.segments.iter().all(|s| !s.is_multi_layer()));
        assert_ordered(&sample);
        assert!((sample.total_height() - 5.0).abs() < 1e-4);
        assert_eq!(sample.identified_formations, vec!["Quaternary cover", "Red Beds", "Basement"]);
        assert!(sample.anomalies.is_empty());

        let circle = &sample.segments[0].layers_in_section[0].boundary_shape;
        assert_eq!(circle.len(), 32);
    }

    #[test]
    fn single_layer_fills_the_range() {
        let sample = build_sample(&[band(3, 0.0, 5.0)], &DrillingParams::new(origin(), 0.5, 5.0), &catalog());
        assert_eq!(sample.segments.len(), 1);
        let segment = &sample.segments[0];
        assert_eq!(segment.depth, 0.0);
        assert!((segment.segment_height - 5.0).abs() < 1e-6);
        assert_eq!(segment.layers_in_section[0].area_percentage, 1.0);
        assert!(segment.interfaces.is_empty());
    }

    #[test]
    fn no_bands_gives_empty_sample_with_detection_anomaly() {
        let sample = build_sample(&[], &DrillingParams::default(), &catalog());
        assert!(sample.is_empty());
        assert!(sample.layer_stats.is_empty());
        assert_eq!(sample.anomalies.len(), 1);
        assert_eq!(sample.anomalies[0].kind(), AnomalyKind::Detection);
    }

    #[test]
    fn thin_bands_are_discarded() {
        let sample = build_sample(&[band(1, 1.0, 1.005)], &DrillingParams::default(), &catalog());
        assert!(sample.is_empty());
        assert!(matches!(sample.anomalies[0], Anomaly::BandTooThin { .. }));
        assert!(matches!(sample.anomalies[1], Anomaly::NoLayersDetected { .. }));
    }

    #[test]
    fn overlapping_bands_form_multi_layer_segment() {
        // A granite lens occupying 30% of the footprint between 2 and 3 m.
        let bands = [
            band(2, 0.0, 5.0).with_coverage(0.7),
            band(3, 2.0, 3.0).with_coverage(0.3),
        ];
        let sample = build_sample(&bands, &DrillingParams::new(origin(), 0.5, 5.0), &catalog());
        assert_ordered(&sample);
        assert_eq!(sample.segments.len(), 3);

        let lens = &sample.segments[1];
        assert!(lens.is_multi_layer());
        assert!((lens.depth - 2.0).abs() < 1e-5);
        assert!((lens.layers_in_section[0].area_percentage - 0.7).abs() < 1e-5);
        assert!((lens.layers_in_section[1].area_percentage - 0.3).abs() < 1e-5);

        let footprint = std::f32::consts::PI * 0.25;
        let area: f32 = lens
            .layers_in_section
            .iter()
            .map(|l| signed_area(&l.boundary_shape).abs())
            .sum();
        assert!((area - footprint).abs() / footprint < 0.02, "sector areas {} vs {}", area, footprint);

        assert_eq!(lens.interfaces.len(), 1);
        let contact = &lens.interfaces[0];
        assert_eq!(contact.contact_line.len(), 3);
        assert_eq!(contact.contact_type, ContactType::Unconformable);

        // The sandstone above and below the lens reports the coverage it was given.
        assert!(sample
            .anomalies
            .iter()
            .any(|a| matches!(a, Anomaly::AreaFractionsNormalized { .. })));
    }

    #[test]
    fn three_layer_window_closes_the_ring() {
        let bands = [
            band(1, 0.0, 1.0).with_coverage(0.5),
            band(2, 0.0, 1.0).with_coverage(0.25),
            band(4, 0.0, 1.0).with_coverage(0.25),
        ];
        let sample = build_sample(&bands, &DrillingParams::new(origin(), 1.0, 1.0), &catalog());
        let segment = &sample.segments[0];
        assert_eq!(segment.interfaces.len(), 3);
        let last = &segment.interfaces[2];
        assert_eq!((last.layer_a, last.layer_b), (LayerId(4), LayerId(1)));
        assert!((last.contact_line[1] - Vec3::new(1.0, -0.5, 0.0)).length() < 1e-5);
        assert!(sample.anomalies.is_empty());
    }

    #[test]
    fn sectors_face_the_side_each_layer_was_seen_on() {
        // Granite seen toward +x on a third of the footprint, sandstone on the rest toward -x.
        let bands = [
            band(2, 0.0, 1.0).with_coverage(2.0 / 3.0).with_bearing(PI),
            band(3, 0.0, 1.0).with_coverage(1.0 / 3.0).with_bearing(0.0),
        ];
        let sample = build_sample(&bands, &DrillingParams::new(origin(), 1.0, 1.0), &catalog());
        let segment = &sample.segments[0];
        assert_eq!(segment.layers_in_section[0].layer, LayerId(3), "sectors run by bearing");

        let granite = crate::polygon::centroid(&segment.layers_in_section[0].boundary_shape);
        assert!(granite.x > 0.3 && granite.y.abs() < 1e-3, "granite centroid {granite:?}");
        let sandstone = crate::polygon::centroid(&segment.layers_in_section[1].boundary_shape);
        assert!(sandstone.x < -0.1 && sandstone.y.abs() < 1e-3, "sandstone centroid {sandstone:?}");

        // The contact runs along both sector edges, 60 degrees either side of +x.
        let line = &segment.interfaces[0].contact_line;
        let edge = Vec3::new(0.5, -0.5, 3f32.sqrt() * 0.5);
        assert!((line[0] - edge).length() < 1e-4, "got {:?}", line[0]);
        assert!((line[2] - Vec3::new(edge.x, edge.y, -edge.z)).length() < 1e-4, "got {:?}", line[2]);
    }

    #[test]
    fn similar_windows_merge() {
        let bands = [
            band(1, 0.0, 2.0).with_coverage(0.5),
            band(2, 0.0, 2.0).with_coverage(0.5),
            band(1, 2.0, 4.0).with_coverage(0.55),
            band(2, 2.0, 4.0).with_coverage(0.45),
        ];
        let sample = build_sample(&bands, &DrillingParams::new(origin(), 0.5, 4.0), &catalog());
        assert_eq!(sample.segments.len(), 1);
        let merged = &sample.segments[0];
        assert!((merged.segment_height - 4.0).abs() < 1e-5);
        assert!((merged.layers_in_section[0].area_percentage - 0.525).abs() < 1e-5);
    }

    #[test]
    fn gaps_produce_no_segment() {
        let bands = [band(1, 0.0, 1.0), band(2, 2.0, 3.0)];
        let sample = build_sample(&bands, &DrillingParams::new(origin(), 0.5, 3.0), &catalog());
        assert_eq!(sample.segments.len(), 2);
        assert!((sample.segments[1].depth - 2.0).abs() < 1e-6);
        assert!((sample.total_height() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_layer_uses_placeholder() {
        let sample = build_sample(&[band(99, 0.0, 2.0)], &DrillingParams::default(), &catalog());
        let info = &sample.segments[0].layers_in_section[0];
        assert_eq!(info.category, LayerCategory::Other);
        assert_eq!(sample.anomalies, vec![Anomaly::UnknownLayer(LayerId(99))]);
    }

    #[test]
    fn stats_group_by_category() {
        let bands = [band(2, 0.0, 1.0), band(3, 1.0, 2.5), band(4, 2.5, 4.0)];
        let sample = build_sample(&bands, &DrillingParams::new(origin(), 0.5, 4.0), &catalog());
        assert_eq!(sample.layer_stats.len(), 2);

        let sed = sample
            .layer_stats
            .iter()
            .find(|s| s.layer_type == LayerCategory::Sedimentary)
            .expect("sedimentary stats");
        assert_eq!(sed.layer_name, "Sandstone");
        assert_eq!(sed.number_of_segments, 2);
        assert!((sed.total_thickness - 2.5).abs() < 1e-5);
        assert!((sed.average_dip_angle - 2.5).abs() < 1e-5);
        assert!((sed.percentage_of_sample - 2.5 / 4.0).abs() < 1e-5);

        let total: f32 = sample.layer_stats.iter().map(|s| s.percentage_of_sample).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn range_bands_are_clipped() {
        let params = DrillingParams::new(origin(), 0.5, 6.0).with_range(2.0, 6.0);
        let sample = build_sample(&[band(1, 0.0, 3.0), band(2, 3.0, 9.0)], &params, &catalog());
        assert_eq!(sample.segments[0].depth, 2.0);
        assert!((sample.segments[1].bottom() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn sample_serializes_through_ron() {
        let sample = build_sample(&[band(1, 0.0, 1.0), band(2, 1.0, 2.0)], &DrillingParams::default(), &catalog());
        let text = ron::to_string(&sample).expect("serialize");
        let back: GeologicalSampleData = ron::from_str(&text).expect("deserialize");
        assert_eq!(back.sample_id, sample.sample_id);
        assert_eq!(back.segments.len(), 2);
    }
}

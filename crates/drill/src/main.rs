//! coredrill: drills one core at a configured site and prints what came up.
//!
//! Usage: `coredrill [config.ron] [--write-config]`

use anyhow::{Context, Result};
use drill::config;
use drill::scene::Children;
use drill::{DrillConfig, SampleScene, StrataWorld};
use geology::{
    compute_statistics, DrillingParams, GeologicalSampleData, IntersectionDetector, ReconstructedSample,
    SampleBuilder, SampleReconstructor, SampleStatistics, DRILL_DOWN,
};
use glam::Vec3;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let write_config = args.iter().any(|a| a == "--write-config");
    let path = args.iter().find(|a| !a.starts_with("--")).map(PathBuf::from);

    let config = DrillConfig::load(path.as_deref());
    if write_config {
        let target = path.unwrap_or_else(config::config_path);
        config.save(&target);
        log::info!("Wrote config to {:?}", target);
    }

    let mut site = StrataWorld::from_config(&config).context("building drilling site from config")?;
    let (x, z) = (config.drill.x, config.drill.z);
    let surface = site
        .surface_height_at(x, z)
        .with_context(|| format!("no geological surface below ({x}, {z})"))?;
    let origin = Vec3::new(x, surface, z);

    let params = DrillingParams::new(origin, config.drill.radius, config.drill.depth)
        .with_range(config.drill.depth_start, config.drill.depth);
    let detector = IntersectionDetector::new(config.detector.clone());
    let intersections = if config.drill.footprint {
        detector.detect_footprint(&site, origin, params.radius, params.depth_start, params.depth)
    } else if params.depth_start > 0.0 {
        detector.detect_range(&site, origin, params.depth_start, params.depth)
    } else {
        detector.detect(&site, origin, DRILL_DOWN, params.depth)
    };

    let data = SampleBuilder::new(site.catalog())
        .with_config(config.builder.clone())
        .build(&intersections, &params);
    let anchor = origin - Vec3::Y * params.depth_start;
    let sample = SampleReconstructor::new(config.reconstruction.clone()).reconstruct(&data, anchor);
    let properties = compute_statistics(&data, &config.reconstruction);

    print_report(&data, &sample);
    if let Some(target) = &config.drill.export_mesh {
        let mesh = sample.combined_mesh();
        std::fs::write(target, mesh.packed()).with_context(|| format!("writing mesh to {:?}", target))?;
        log::info!(
            "Exported {} vertices, {} triangles to {:?}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            target
        );
    }
    println!(
        "Calculated: volume {:.4} m³, mass {:.3} t, complexity {:.2}",
        properties.total_volume, properties.total_mass, properties.complexity_score
    );

    let mut scene = SampleScene::new();
    let entity = scene.spawn(sample, &mut site.physics);
    log::info!("Sample anchored as {:?}; {} sample(s) in scene", entity, scene.active().len());
    if let Ok(children) = scene.world.get::<&Children>(entity) {
        for &piece in &children.0 {
            if let Some(transform) = scene.world_transform(piece) {
                log::debug!("Piece {:?} at {:?}", piece, transform.position);
            }
        }
    }
    Ok(())
}

fn print_report(data: &GeologicalSampleData, sample: &ReconstructedSample) {
    println!("Sample {} collected {}", data.sample_id, data.collection_time.format("%Y-%m-%d %H:%M:%S"));
    println!(
        "  at ({:.2}, {:.2}, {:.2}), r = {:.2}, depth {:.2}..{:.2}",
        data.drilling_position.x,
        data.drilling_position.y,
        data.drilling_position.z,
        data.drilling_radius,
        data.depth_start,
        data.drilling_depth
    );
    if data.is_empty() {
        println!("  empty core: no layers detected");
    }
    for (i, segment) in data.segments.iter().enumerate() {
        let layers: Vec<String> = segment
            .layers_in_section
            .iter()
            .map(|l| format!("{} {:.0}%", l.name, l.area_percentage * 100.0))
            .collect();
        println!(
            "  [{i}] {:6.2} .. {:6.2}  {}",
            segment.depth,
            segment.bottom(),
            layers.join(", ")
        );
        for contact in &segment.interfaces {
            println!(
                "        contact {} / {}: {:?} ({:.1}°)",
                contact.layer_a, contact.layer_b, contact.contact_type, contact.contact_angle
            );
        }
    }
    for stat in &data.layer_stats {
        println!(
            "  {:?} ({}): {:.2} m in {} segment(s), {:.0}% of core, mean dip {:.1}°",
            stat.layer_type,
            stat.layer_name,
            stat.total_thickness,
            stat.number_of_segments,
            stat.percentage_of_sample * 100.0,
            stat.average_dip_angle
        );
    }
    if !data.identified_formations.is_empty() {
        println!("  Formations: {}", data.identified_formations.join(" / "));
    }

    let stats = SampleStatistics::from_reconstructed(sample);
    println!(
        "Reconstructed: {} piece(s), volume {:.4} m³, mass {:.3} t, mean depth {:.2}, dominant {:?}",
        stats.layer_count,
        stats.total_volume,
        stats.total_mass,
        stats.average_depth,
        stats.dominant_category
    );
    for anomaly in data.anomalies.iter().chain(&sample.anomalies) {
        println!("  ! {anomaly}");
    }
}

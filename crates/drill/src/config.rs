//! Drilling site configuration (drill settings, strata, equipment). Loaded from coredrill.ron at startup.

use geology::{BuilderConfig, DetectorConfig, LayerCategory, ReconstructionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "coredrill.ron";

/// Site settings. Loaded from `coredrill.ron` in the current directory, or from a path on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillConfig {
    #[serde(default)]
    pub drill: DrillSettings,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerConfig>,
    #[serde(default = "default_equipment")]
    pub equipment: Vec<EquipmentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillSettings {
    /// Horizontal drilling position; the drill starts on the topmost layer below it.
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Bottom of the drilled interval, below the surface.
    #[serde(default = "default_depth")]
    pub depth: f32,
    /// Top of the drilled interval. Non-zero when drilling from a tower.
    #[serde(default)]
    pub depth_start: f32,
    /// Probe a ring of columns across the bit instead of the axis only.
    #[serde(default = "default_true")]
    pub footprint: bool,
    /// Write the reconstructed sample's combined mesh here, packed as counts then buffers.
    #[serde(default)]
    pub export_mesh: Option<PathBuf>,
}

/// A layer volume, placed as an axis-aligned box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub id: u32,
    pub name: String,
    pub category: LayerCategory,
    /// Falls back to the category color.
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub dip_angle: f32,
    #[serde(default = "default_strike")]
    pub strike: [f32; 3],
    #[serde(default)]
    pub formation: String,
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

/// Non-geological obstacle (tower, platform) that probes must ignore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentConfig {
    pub name: String,
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

fn default_radius() -> f32 {
    0.5
}
fn default_depth() -> f32 {
    8.0
}
fn default_true() -> bool {
    true
}
fn default_strike() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

fn layer(
    id: u32,
    name: &str,
    category: LayerCategory,
    formation: &str,
    top: f32,
    bottom: f32,
) -> LayerConfig {
    LayerConfig {
        id,
        name: name.to_string(),
        category,
        color: None,
        material: None,
        dip_angle: 0.0,
        strike: default_strike(),
        formation: formation.to_string(),
        center: [0.0, (top + bottom) * 0.5, 0.0],
        half_extents: [20.0, (top - bottom) * 0.5, 20.0],
    }
}

/// Five flat layers with a granite lens cutting the sandstone near the default drill site.
fn default_layers() -> Vec<LayerConfig> {
    let mut sandstone = layer(3, "Red Sandstone", LayerCategory::Sedimentary, "Red Beds", -1.5, -4.0);
    sandstone.dip_angle = 5.0;
    let mut lens = layer(6, "Granite Dyke", LayerCategory::Igneous, "Basement", -2.5, -4.0);
    lens.center = [0.6, -3.25, 0.0];
    lens.half_extents = [0.5, 0.75, 20.0];
    lens.dip_angle = 70.0;
    lens.strike = [0.0, 0.0, 1.0];
    vec![
        layer(1, "Topsoil", LayerCategory::Soil, "Quaternary Cover", 0.0, -0.5),
        layer(2, "River Gravel", LayerCategory::Alluvium, "Quaternary Cover", -0.5, -1.5),
        sandstone,
        lens,
        layer(4, "Slate", LayerCategory::Metamorphic, "Old Shelf", -4.0, -6.0),
        layer(5, "Bedrock", LayerCategory::Bedrock, "Basement", -6.0, -30.0),
    ]
}

fn default_equipment() -> Vec<EquipmentConfig> {
    vec![
        EquipmentConfig {
            name: "Platform".to_string(),
            center: [0.0, 0.1, 0.0],
            half_extents: [1.5, 0.1, 1.5],
        },
        EquipmentConfig {
            name: "Tower".to_string(),
            center: [0.0, 3.0, 1.2],
            half_extents: [0.2, 3.0, 0.2],
        },
    ]
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            radius: default_radius(),
            depth: default_depth(),
            depth_start: 0.0,
            footprint: default_true(),
            export_mesh: None,
        }
    }
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            drill: DrillSettings::default(),
            detector: DetectorConfig::default(),
            builder: BuilderConfig::default(),
            reconstruction: ReconstructionConfig::default(),
            layers: default_layers(),
            equipment: default_equipment(),
        }
    }
}

impl DrillConfig {
    /// Load config from `path`, or `coredrill.ron` when `None`. If the file is missing or invalid,
    /// returns default config.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map_or_else(config_path, Path::to_path_buf);
        match std::fs::read_to_string(&path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }

    /// Save current config to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}

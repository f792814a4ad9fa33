//! Layer catalog: identity, category, and display metadata for each stratum.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identity of a geological layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rock/soil kind of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerCategory {
    Soil,
    Sedimentary,
    Igneous,
    Metamorphic,
    Alluvium,
    Bedrock,
    /// Unclassified material; uses the default density.
    Other,
}

/// Density used when a category has no specific entry (mass per unit volume).
pub const DEFAULT_DENSITY: f32 = 2.5;

impl LayerCategory {
    /// Density table (mass per unit volume).
    pub fn density(self) -> f32 {
        match self {
            LayerCategory::Soil => 1.5,
            LayerCategory::Sedimentary => 2.3,
            LayerCategory::Igneous => 2.7,
            LayerCategory::Metamorphic => 2.8,
            LayerCategory::Alluvium => 1.8,
            LayerCategory::Bedrock => 2.9,
            LayerCategory::Other => DEFAULT_DENSITY,
        }
    }

    /// Fallback display color (RGBA) when a layer supplies none.
    pub fn base_color(self) -> [f32; 4] {
        match self {
            LayerCategory::Soil => [0.42, 0.32, 0.22, 1.0],
            LayerCategory::Sedimentary => [0.76, 0.66, 0.48, 1.0],
            LayerCategory::Igneous => [0.30, 0.28, 0.30, 1.0],
            LayerCategory::Metamorphic => [0.50, 0.52, 0.58, 1.0],
            LayerCategory::Alluvium => [0.62, 0.55, 0.40, 1.0],
            LayerCategory::Bedrock => [0.22, 0.20, 0.22, 1.0],
            LayerCategory::Other => [0.5, 0.5, 0.5, 1.0],
        }
    }
}

/// A named stratum. Its vertical extent is not stored; it is discovered by probing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub category: LayerCategory,
    pub color: [f32; 4],
    /// Render material name, if the presentation layer has one.
    pub material: Option<String>,
    /// Inclination of the bedding plane in degrees.
    pub dip_angle: f32,
    /// Horizontal strike direction of the bedding plane.
    pub strike: Vec3,
    pub formation: String,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, category: LayerCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            color: category.base_color(),
            material: None,
            dip_angle: 0.0,
            strike: Vec3::Z,
            formation: String::new(),
        }
    }

    /// Placeholder for a layer the catalog does not know about.
    pub fn unknown(id: LayerId) -> Self {
        Self::new(id, format!("Layer {}", id.0), LayerCategory::Other)
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_dip(mut self, dip_angle: f32, strike: Vec3) -> Self {
        self.dip_angle = dip_angle;
        self.strike = strike;
        self
    }

    pub fn with_formation(mut self, formation: impl Into<String>) -> Self {
        self.formation = formation.into();
        self
    }

    /// Bedding-plane normal from strike and dip.
    pub fn normal(&self) -> Vec3 {
        let strike = self.strike.try_normalize().unwrap_or(Vec3::Z);
        let dip_dir = Vec3::Y.cross(strike);
        let dip = self.dip_angle.to_radians();
        (Vec3::Y * dip.cos() + dip_dir * dip.sin())
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }
}

/// Read-only lookup of layer metadata by identity.
///
/// Shared by reference across drilling operations; it is never mutated while a
/// sample is being built, so concurrent reads need no locking.
#[derive(Debug, Clone, Default)]
pub struct LayerCatalog {
    layers: HashMap<LayerId, Layer>,
}

impl LayerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer, replacing any previous entry with the same id.
    pub fn insert(&mut self, layer: Layer) {
        self.layers.insert(layer.id, layer);
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }
}

impl FromIterator<Layer> for LayerCatalog {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for layer in iter {
            catalog.insert(layer);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_table_matches_categories() {
        assert_eq!(LayerCategory::Soil.density(), 1.5);
        assert_eq!(LayerCategory::Bedrock.density(), 2.9);
        assert_eq!(LayerCategory::Other.density(), DEFAULT_DENSITY);
    }

    #[test]
    fn flat_layer_normal_points_up() {
        let layer = Layer::new(LayerId(1), "Topsoil", LayerCategory::Soil);
        assert!((layer.normal() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn dipping_layer_normal_tilts_by_dip() {
        let layer = Layer::new(LayerId(2), "Shale", LayerCategory::Sedimentary).with_dip(30.0, Vec3::Z);
        let angle = layer.normal().angle_between(Vec3::Y).to_degrees();
        assert!((angle - 30.0).abs() < 1e-3, "angle was {}", angle);
    }

    #[test]
    fn catalog_lookup_by_id() {
        let catalog: LayerCatalog = [
            Layer::new(LayerId(1), "Topsoil", LayerCategory::Soil),
            Layer::new(LayerId(2), "Granite", LayerCategory::Igneous),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(LayerId(2)).map(|l| l.name.as_str()), Some("Granite"));
        assert!(catalog.get(LayerId(9)).is_none());
    }
}

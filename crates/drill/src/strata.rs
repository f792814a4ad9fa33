//! Rapier-backed drilling site: layer and equipment colliders, with an explicit
//! map from collider to owner so probes can tell rock from equipment.

use crate::config::DrillConfig;
use geology::{Layer, LayerCatalog, LayerId, ProbeHit, SurfaceProbe};
use glam::Vec3;
use physics::{ColliderHandle, CollisionGroup, PhysicsWorld};
use std::collections::HashMap;
use thiserror::Error;

/// Height above which surface queries start.
const SKY_HEIGHT: f32 = 1000.0;

#[derive(Debug, Error)]
pub enum StrataError {
    #[error("{name}: half extents {half_extents:?} must all be positive")]
    InvalidExtents { name: String, half_extents: [f32; 3] },

    #[error("layer id {0} is used more than once")]
    DuplicateLayer(u32),
}

/// What a collider belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOwner {
    Layer(LayerId),
    Equipment(String),
}

/// The site's static geometry plus the layer catalog.
pub struct StrataWorld {
    pub physics: PhysicsWorld,
    owners: HashMap<ColliderHandle, SurfaceOwner>,
    catalog: LayerCatalog,
}

fn check_extents(name: &str, half_extents: [f32; 3]) -> Result<Vec3, StrataError> {
    let v = Vec3::from(half_extents);
    if v.cmple(Vec3::ZERO).any() || !v.is_finite() {
        return Err(StrataError::InvalidExtents {
            name: name.to_string(),
            half_extents,
        });
    }
    Ok(v)
}

impl StrataWorld {
    pub fn from_config(config: &DrillConfig) -> Result<Self, StrataError> {
        let mut physics = PhysicsWorld::new();
        let mut owners = HashMap::new();
        let mut catalog = LayerCatalog::new();

        for lc in &config.layers {
            if catalog.get(LayerId(lc.id)).is_some() {
                return Err(StrataError::DuplicateLayer(lc.id));
            }
            let half_extents = check_extents(&lc.name, lc.half_extents)?;
            let handle = physics.add_static_cuboid(Vec3::from(lc.center), half_extents, CollisionGroup::Strata);
            owners.insert(handle, SurfaceOwner::Layer(LayerId(lc.id)));

            let mut layer = Layer::new(LayerId(lc.id), lc.name.clone(), lc.category)
                .with_dip(lc.dip_angle, Vec3::from(lc.strike))
                .with_formation(lc.formation.clone());
            if let Some(color) = lc.color {
                layer = layer.with_color(color);
            }
            layer.material = lc.material.clone();
            catalog.insert(layer);
        }

        for eq in &config.equipment {
            let half_extents = check_extents(&eq.name, eq.half_extents)?;
            let handle = physics.add_static_cuboid(Vec3::from(eq.center), half_extents, CollisionGroup::Equipment);
            owners.insert(handle, SurfaceOwner::Equipment(eq.name.clone()));
        }

        physics.update_query_pipeline();
        log::info!(
            "Site ready: {} layers, {} pieces of equipment",
            catalog.len(),
            config.equipment.len()
        );
        Ok(Self {
            physics,
            owners,
            catalog,
        })
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    pub fn owner(&self, collider: ColliderHandle) -> Option<&SurfaceOwner> {
        self.owners.get(&collider)
    }

    /// Elevation of the topmost layer surface under `(x, z)`, ignoring equipment.
    pub fn surface_height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.physics
            .raycast_group(Vec3::new(x, SKY_HEIGHT, z), Vec3::NEG_Y, SKY_HEIGHT * 2.0, CollisionGroup::Strata)
            .map(|hit| hit.point.y)
    }
}

impl SurfaceProbe for StrataWorld {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<ProbeHit> {
        self.physics
            .raycast_all(origin, direction, max_distance)
            .into_iter()
            .map(|hit| match self.owner(hit.collider) {
                Some(SurfaceOwner::Layer(id)) => ProbeHit::layer(hit.point, *id),
                Some(SurfaceOwner::Equipment(_)) | None => ProbeHit::non_geological(hit.point),
            })
            .collect()
    }
}

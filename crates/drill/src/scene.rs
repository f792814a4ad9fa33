//! Presentation scene: each reconstructed sample is an anchor entity that owns the
//! sample and its physics body, with one child entity per piece.

use engine_core::{Name, Parent, Tint, Transform};
use geology::{ReconstructedSample, SampleStatistics};
use hecs::{Entity, World};
use glam::Vec3;
use physics::{PhysicsBody, PhysicsWorld};

/// Child entity marker: which piece of the parent's sample this node draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceIndex(pub usize);

/// Children of a sample anchor, for cascading despawn.
#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<Entity>);

#[derive(Default)]
pub struct SampleScene {
    pub world: World,
}

impl SampleScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a sample anchor with its pieces and a kinematic body sized to the core.
    pub fn spawn(&mut self, sample: ReconstructedSample, physics: &mut PhysicsWorld) -> Entity {
        let stats = SampleStatistics::from_reconstructed(&sample);
        let body = physics.add_sample_body(
            sample.position,
            sample.original_data.drilling_radius,
            sample.total_height,
            sample.total_mass,
        );
        physics.update_query_pipeline();

        let pieces: Vec<(Transform, Name, Tint)> = sample
            .layer_segments
            .iter()
            .map(|s| (s.geometry.transform, Name::new(s.label()), Tint(s.color)))
            .collect();
        let anchor = self.world.spawn((
            Transform::from_position(sample.position),
            Name::new(format!("Sample_{}", sample.sample_id)),
            body,
            stats,
            sample,
            Children::default(),
        ));

        let children: Vec<Entity> = pieces
            .into_iter()
            .enumerate()
            .map(|(i, (transform, name, tint))| {
                self.world
                    .spawn((transform, Parent(anchor), name, tint, PieceIndex(i)))
            })
            .collect();
        log::debug!("Spawned sample {:?} with {} pieces", anchor, children.len());
        match self.world.query_one_mut::<&mut Children>(anchor) {
            Ok(list) => list.0 = children,
            Err(e) => log::warn!("Sample {:?} lost its piece list: {}", anchor, e),
        }
        anchor
    }

    /// Move a sample's anchor to `position`. Pieces follow through their parent and
    /// the kinematic body is stepped to the new place.
    pub fn place(&mut self, anchor: Entity, position: Vec3, physics: &mut PhysicsWorld) -> bool {
        let Ok((transform, sample, body)) = self
            .world
            .query_one_mut::<(&mut Transform, &mut ReconstructedSample, &PhysicsBody)>(anchor)
        else {
            return false;
        };
        physics.set_kinematic_position(body.rigid_body, position);
        physics.step();
        // The anchor follows wherever the body ended up.
        let placed = physics
            .get_body_transform(body.rigid_body)
            .map_or(position, |t| t.position);
        transform.position = placed;
        sample.position = placed;
        sample.center_of_mass = placed + sample.local_center_of_mass;
        log::debug!("Placed sample {} at {:?}", sample.sample_id, placed);
        true
    }

    /// Destroy a sample: its pieces, its body, and the mesh buffers it owns.
    pub fn despawn(&mut self, anchor: Entity, physics: &mut PhysicsWorld) -> bool {
        self.take(anchor, physics).is_some()
    }

    /// Remove a sample from the scene and hand it over, e.g. to storage.
    pub fn take(&mut self, anchor: Entity, physics: &mut PhysicsWorld) -> Option<ReconstructedSample> {
        let children = self
            .world
            .get::<&Children>(anchor)
            .map(|c| c.0.clone())
            .unwrap_or_default();
        let body = self.world.get::<&PhysicsBody>(anchor).ok().map(|b| *b);
        let sample = self.world.remove_one::<ReconstructedSample>(anchor).ok()?;

        for child in children {
            let _ = self.world.despawn(child);
        }
        let _ = self.world.despawn(anchor);
        if let Some(body) = body {
            physics.remove_body(body.rigid_body);
            physics.update_query_pipeline();
        }
        log::debug!("Removed sample {}", sample.sample_id);
        Some(sample)
    }

    /// Anchors of every sample in the scene.
    pub fn active(&self) -> Vec<Entity> {
        self.world
            .query::<&ReconstructedSample>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    /// World transform of a piece: the anchor's transform composed with the piece's own.
    pub fn world_transform(&self, piece: Entity) -> Option<Transform> {
        let local = *self.world.get::<&Transform>(piece).ok()?;
        let parent = self.world.get::<&Parent>(piece).ok()?.0;
        let anchor = *self.world.get::<&Transform>(parent).ok()?;
        Some(anchor.mul_transform(&local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geology::{build_sample, reconstruct, DrillingParams, Layer, LayerCatalog, LayerCategory, LayerId, LayerIntersection};
    use glam::Vec3;

    fn sample(position: Vec3) -> ReconstructedSample {
        let catalog: LayerCatalog = [
            Layer::new(LayerId(1), "Topsoil", LayerCategory::Soil),
            Layer::new(LayerId(2), "Granite", LayerCategory::Igneous),
        ]
        .into_iter()
        .collect();
        let params = DrillingParams::new(position, 0.5, 4.0);
        let bands = [
            LayerIntersection::new(LayerId(1), position, 0.0, 1.0),
            LayerIntersection::new(LayerId(2), position, 1.0, 4.0),
        ];
        reconstruct(&build_sample(&bands, &params, &catalog), position)
    }

    #[test]
    fn spawn_creates_anchor_and_children() {
        let mut scene = SampleScene::new();
        let mut physics = PhysicsWorld::new();
        let anchor = scene.spawn(sample(Vec3::new(2.0, 0.0, 0.0)), &mut physics);

        assert_eq!(scene.active(), vec![anchor]);
        let children = scene.world.get::<&Children>(anchor).expect("children").0.clone();
        assert_eq!(children.len(), 2);

        let name = scene.world.get::<&Name>(children[1]).expect("name").0.clone();
        assert_eq!(name, "Segment_1_Depth_1.00");
        let world = scene.world_transform(children[1]).expect("transform");
        assert!((world.position - Vec3::new(2.0, -2.5, 0.0)).length() < 1e-5);

        let stats = scene.world.get::<&SampleStatistics>(anchor).expect("stats");
        assert_eq!(stats.layer_count, 2);
        assert_eq!(physics.rigid_body_set.len(), 1);
    }

    #[test]
    fn take_removes_everything() {
        let mut scene = SampleScene::new();
        let mut physics = PhysicsWorld::new();
        let anchor = scene.spawn(sample(Vec3::ZERO), &mut physics);
        let other = scene.spawn(sample(Vec3::X * 5.0), &mut physics);

        let taken = scene.take(anchor, &mut physics).expect("sample");
        assert_eq!(taken.layer_segments.len(), 2);
        assert_eq!(scene.active(), vec![other]);
        assert_eq!(scene.world.len(), 3, "other anchor and its two pieces remain");
        assert_eq!(physics.rigid_body_set.len(), 1);

        assert!(scene.despawn(other, &mut physics));
        assert!(!scene.despawn(other, &mut physics));
        assert_eq!(scene.world.len(), 0);
        assert_eq!(physics.collider_set.len(), 0);
    }

    #[test]
    fn place_moves_anchor_pieces_and_body() {
        let mut scene = SampleScene::new();
        let mut physics = PhysicsWorld::new();
        let anchor = scene.spawn(sample(Vec3::ZERO), &mut physics);
        let target = Vec3::new(3.0, 1.0, -1.0);
        assert!(scene.place(anchor, target, &mut physics));

        let children = scene.world.get::<&Children>(anchor).expect("children").0.clone();
        let world = scene.world_transform(children[1]).expect("transform");
        assert!((world.position - (target + Vec3::new(0.0, -2.5, 0.0))).length() < 1e-4);

        let (body, com, local) = {
            let body = *scene.world.get::<&PhysicsBody>(anchor).expect("body");
            let sample = scene.world.get::<&ReconstructedSample>(anchor).expect("sample");
            (body, sample.center_of_mass, sample.local_center_of_mass)
        };
        assert!((com - (target + local)).length() < 1e-4);
        let moved = physics.get_body_transform(body.rigid_body).expect("rigid body");
        assert!((moved.position - target).length() < 1e-4);

        assert!(scene.despawn(anchor, &mut physics));
        assert!(!scene.place(anchor, Vec3::ZERO, &mut physics));
    }
}


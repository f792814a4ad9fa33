//! Physics world management with Rapier3D.

use crate::collision::{CollisionGroup, PhysicsBody};
use engine_core::{Transform, Vec3};
use rapier3d::prelude::*;

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for raycasting. Call after adding or moving colliders.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a kinematic rigid body.
    pub fn add_kinematic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a static axis-aligned cuboid with no parent body.
    /// `center`: world position of the box center. `half_extents`: half sizes in X, Y, Z.
    pub fn add_static_cuboid(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        group: CollisionGroup,
    ) -> ColliderHandle {
        let groups = match group {
            CollisionGroup::Strata => CollisionGroup::strata(),
            CollisionGroup::Equipment => CollisionGroup::equipment(),
            CollisionGroup::Sample => CollisionGroup::sample(),
            CollisionGroup::Trigger => CollisionGroup::trigger(),
        };
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .translation(vector![center.x, center.y, center.z])
        .collision_groups(CollisionGroup::interaction_groups(groups))
        .build();
        self.collider_set.insert(collider)
    }

    /// Kinematic body for a reconstructed core sample hanging from its anchor.
    ///
    /// The body sits at the anchor. The capsule hangs half the sample height below it
    /// and spans the whole height; the sensor box is 1.1 times the sample's bounds.
    pub fn add_sample_body(&mut self, anchor: Vec3, radius: f32, height: f32, mass: f32) -> PhysicsBody {
        let radius = radius.max(0.001);
        let height = height.max(0.001);
        let body = self.add_kinematic_body(anchor);
        let offset = vector![0.0, -height * 0.5, 0.0];

        let half_height = (height * 0.5 - radius).max(0.0);
        let capsule = ColliderBuilder::capsule_y(half_height, radius)
            .translation(offset)
            .mass(mass)
            .collision_groups(CollisionGroup::interaction_groups(CollisionGroup::sample()))
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(capsule, body, &mut self.rigid_body_set);

        let trigger = ColliderBuilder::cuboid(radius * 1.1, height * 0.55, radius * 1.1)
            .translation(offset)
            .sensor(true)
            .collision_groups(CollisionGroup::interaction_groups(CollisionGroup::trigger()))
            .build();
        let trigger = self
            .collider_set
            .insert_with_parent(trigger, body, &mut self.rigid_body_set);

        log::debug!(
            "Sample body at {:?}: capsule r={:.3} h={:.3}, mass {:.3}",
            anchor,
            radius,
            height,
            mass
        );
        PhysicsBody {
            rigid_body: body,
            collider: Some(collider),
            trigger: Some(trigger),
        }
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z),
                rotation: glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
                scale: Vec3::ONE,
            }
        })
    }

    /// Set the position a kinematic body reaches on the next [`step`](Self::step).
    pub fn set_kinematic_position(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the drilling site.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Geological layer volumes
    Strata = 1 << 0,
    /// Drill towers, platforms and other equipment
    Equipment = 1 << 1,
    /// Reconstructed core samples
    Sample = 1 << 2,
    /// Interaction volumes (sensors)
    Trigger = 1 << 3,
}

impl CollisionGroup {
    pub fn bits(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// Layer volumes: hit by probes, collide with everything.
    pub fn strata() -> (Group, Group) {
        (Self::Strata.bits(), Group::ALL)
    }

    /// Equipment collides with everything but is never reported to geological probes.
    pub fn equipment() -> (Group, Group) {
        (Self::Equipment.bits(), Group::ALL)
    }

    /// Samples rest on strata and equipment, touch each other, and are seen by triggers.
    pub fn sample() -> (Group, Group) {
        let membership = Self::Sample.bits();
        let filter = Group::from_bits_retain(
            Self::Strata as u32 | Self::Equipment as u32 | Self::Sample as u32 | Self::Trigger as u32,
        );
        (membership, filter)
    }

    /// Sensors only detect samples.
    pub fn trigger() -> (Group, Group) {
        (Self::Trigger.bits(), Self::Sample.bits())
    }

    pub fn interaction_groups(pair: (Group, Group)) -> InteractionGroups {
        InteractionGroups::new(pair.0, pair.1)
    }

    /// Query groups that only see colliders in `group`.
    pub fn query(group: CollisionGroup) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, group.bits())
    }
}

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
    /// Interaction sensor attached to the same body, if any.
    pub trigger: Option<ColliderHandle>,
}

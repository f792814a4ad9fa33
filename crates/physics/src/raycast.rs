//! Raycasting for layer probes and surface queries.

use crate::{CollisionGroup, PhysicsWorld};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

fn to_ray(origin: Vec3, direction: Vec3) -> Ray {
    Ray::new(
        point![origin.x, origin.y, origin.z],
        vector![direction.x, direction.y, direction.z],
    )
}

fn to_hit(ray: &Ray, collider: ColliderHandle, intersection: RayIntersection) -> RaycastHit {
    let point = ray.point_at(intersection.time_of_impact);
    RaycastHit {
        collider,
        distance: intersection.time_of_impact,
        point: Vec3::new(point.x, point.y, point.z),
        normal: Vec3::new(
            intersection.normal.x,
            intersection.normal.y,
            intersection.normal.z,
        ),
    }
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        self.raycast_filtered(origin, direction, max_distance, QueryFilter::default())
    }

    /// First hit among colliders in `group`.
    pub fn raycast_group(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        group: CollisionGroup,
    ) -> Option<RaycastHit> {
        let filter = QueryFilter::default().groups(CollisionGroup::query(group));
        self.raycast_filtered(origin, direction, max_distance, filter)
    }

    pub fn raycast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = to_ray(origin, direction);
        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| to_hit(&ray, collider, intersection))
    }

    /// Cast a ray and return all hits up to max_distance, nearest first.
    pub fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit> {
        self.raycast_all_filtered(origin, direction, max_distance, QueryFilter::default())
    }

    pub fn raycast_all_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<RaycastHit> {
        let ray = to_ray(origin, direction);
        let mut hits = Vec::new();

        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
            |collider, intersection: RayIntersection| {
                hits.push(to_hit(&ray, collider, intersection));
                true // Continue searching
            },
        );

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and non-uniform scale (no rotation).
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Map a point from local space into the space this transform is expressed in.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    /// Compose `self` (parent) with `child`, giving the child's transform in the parent's space.
    /// Exact for uniform parent scale; non-uniform parent scale with child rotation would shear.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Axis-aligned bounds of local-space `points` after transformation.
    /// Returns `None` for an empty iterator.
    pub fn transformed_bounds<I>(&self, points: I) -> Option<(Vec3, Vec3)>
    where
        I: IntoIterator<Item = Vec3>,
    {
        points.into_iter().fold(None, |acc, p| {
            let p = self.transform_point(p);
            Some(match acc {
                None => (p, p),
                Some((min, max)) => (min.min(p), max.max(p)),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn transform_point_applies_scale_then_translation() {
        let t = Transform::from_position_scale(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.5, 1.5, 0.5));
        let p = t.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!((p - Vec3::new(0.5, -0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn mul_transform_matches_matrix_product() {
        let parent = Transform::from_position(Vec3::new(3.0, 1.0, -2.0));
        let child = Transform::from_position_scale(Vec3::new(0.0, -1.5, 0.0), Vec3::splat(2.0));
        let composed = parent.mul_transform(&child);
        let matrix = |t: &Transform| Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.position);
        let expected = matrix(&parent) * matrix(&child);
        let p = Vec3::new(0.25, 0.5, 0.75);
        assert!((composed.transform_point(p) - expected.transform_point3(p)).length() < 1e-5);
    }

    #[test]
    fn transformed_bounds_empty_is_none() {
        assert!(Transform::default().transformed_bounds(Vec::new()).is_none());
    }
}

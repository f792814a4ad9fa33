//! Common ECS components used by presentation scenes.

/// Links a child entity to the anchor it is placed under. The child's `Transform`
/// is expressed in the parent's space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Human-readable label, e.g. `Segment_2_Depth_1.40`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Display color (RGBA) applied on top of the mesh's vertex colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint(pub [f32; 4]);

impl Default for Tint {
    fn default() -> Self {
        Self([1.0, 1.0, 1.0, 1.0])
    }
}

impl Tint {
    /// Linear blend toward white by `amount` (0 = unchanged, 1 = white). Alpha is kept.
    pub fn lightened(self, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let [r, g, b, a] = self.0;
        Self([r + (1.0 - r) * t, g + (1.0 - g) * t, b + (1.0 - b) * t, a])
    }
}

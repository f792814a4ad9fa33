//! Drill-core sampling: layer detection along a vertical probe, depth-ordered
//! sample records, procedural core geometry, and physical properties.
//!
//! Pipeline: [`IntersectionDetector`] → [`SampleBuilder`] →
//! {[`SampleReconstructor`], [`compute_statistics`]}.

pub mod anomaly;
pub mod builder;
pub mod intersection;
pub mod layer;
pub mod mesh;
pub mod polygon;
pub mod properties;
pub mod reconstruct;
pub mod sample;

pub use anomaly::*;
pub use builder::*;
pub use intersection::*;
pub use layer::*;
pub use mesh::*;
pub use polygon::*;
pub use properties::*;
pub use reconstruct::*;
pub use sample::*;

/// Bands and segments thinner than this (world units) are discarded.
pub const MIN_LAYER_THICKNESS: f32 = 0.01;

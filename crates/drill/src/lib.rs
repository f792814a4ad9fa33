//! Drilling site glue: configuration, a rapier-backed stratigraphy that answers
//! layer probes, and the hecs scene that owns reconstructed samples.

pub mod config;
pub mod scene;
pub mod strata;

pub use config::DrillConfig;
pub use scene::SampleScene;
pub use strata::{StrataError, StrataWorld, SurfaceOwner};

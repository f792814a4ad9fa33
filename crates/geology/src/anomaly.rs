//! Locally recovered anomalies.
//!
//! Nothing in the sampling pipeline is fatal. When input is degenerate the
//! affected piece is skipped (or corrected) and an [`Anomaly`] is logged and
//! recorded on the output, so an empty or partial sample is still a valid value.

use crate::layer::LayerId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyKind {
    /// Nothing usable was found along the probe.
    Detection,
    /// A piece of geometry could not be built.
    Geometry,
    /// Input values were inconsistent and were corrected.
    DataInconsistency,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum Anomaly {
    #[error("no geological layers detected below {origin}")]
    NoLayersDetected { origin: Vec3 },

    #[error("layer {layer} band {entry:.3}..{exit:.3} is thinner than the minimum thickness")]
    BandTooThin { layer: LayerId, entry: f32, exit: f32 },

    #[error("layer {0} is not in the catalog; using placeholder metadata")]
    UnknownLayer(LayerId),

    #[error("segment {index} at depth {depth:.3} has no layers")]
    EmptySegment { index: usize, depth: f32 },

    #[error("layer {layer} boundary has {vertices} vertices; at least 3 are needed to extrude")]
    DegeneratePolygon { layer: LayerId, vertices: usize },

    #[error("skipped {count} zero-area triangles while shading layer {layer}")]
    DegenerateTriangles { layer: LayerId, count: usize },

    #[error("area fractions at depth {depth:.3} summed to {sum:.4}; normalized to 1")]
    AreaFractionsNormalized { depth: f32, sum: f32 },
}

impl Anomaly {
    pub fn kind(&self) -> AnomalyKind {
        match self {
            Anomaly::NoLayersDetected { .. } | Anomaly::BandTooThin { .. } => AnomalyKind::Detection,
            Anomaly::EmptySegment { .. }
            | Anomaly::DegeneratePolygon { .. }
            | Anomaly::DegenerateTriangles { .. } => AnomalyKind::Geometry,
            Anomaly::UnknownLayer(_) | Anomaly::AreaFractionsNormalized { .. } => {
                AnomalyKind::DataInconsistency
            }
        }
    }

    /// Log at warn level and hand the anomaly back for recording.
    pub fn report(self) -> Self {
        log::warn!("{:?} anomaly: {}", self.kind(), self);
        self
    }
}

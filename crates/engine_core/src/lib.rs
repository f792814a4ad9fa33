//! Core types shared by the drilling workspace.
//!
//! This crate provides the foundational types used across all systems:
//! - Transform and spatial helpers for placing sample pieces under an anchor
//! - Scene components for the hecs presentation world

pub mod components;
pub mod transform;

pub use components::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};

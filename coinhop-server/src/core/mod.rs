//! Core primitives.
//!
//! Geometry and tuning constants shared by the simulation.

pub mod constants;
pub mod shapes;
pub mod vec2;

// Re-export core types
pub use shapes::{Circle, Rect};
pub use vec2::Vec2;

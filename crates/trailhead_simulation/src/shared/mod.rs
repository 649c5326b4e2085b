//! Shared — cross-cutting типы (геометрия, цвет, camera constraints)
//!
//! Используются во всех доменах:
//! - Bounds (AABB для зон, volumes, camera limits)
//! - Rgba (feedback цвета, serde-friendly)
//! - TutorialCamera (constraints, которые выставляет секвенсор)

pub mod bounds;
pub mod camera;
pub mod color;

// Re-export all
pub use bounds::*;
pub use camera::*;
pub use color::*;

//! ECS Components для world objects
//!
//! Организация по доменам:
//! - world: identity и присутствие в мире (ObjectId, Presence, Interactive, Activator, Player, InteractionVolume)
//! - movement: флаги locomotion контроллера (JumpAbility, Locomotion)
//!
//! Поведенческие компоненты (Interactable, ProximityDetector, TutorialZone) живут
//! в своих subsystem модулях.

pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use movement::*;
pub use world::*;

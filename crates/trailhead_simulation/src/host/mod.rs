//! Host module: граница симуляции с движком
//!
//! - adapters: FeedbackAdapter / AudioAdapter / WorldAdapter / UiAdapter + HostAdapters resource
//! - recording: LoggingHost (runner), RecordingHost (тесты)
//! - systems: forward событий тика в адаптеры (SimulationSet::Host)
//! - rapier_bridge: sensor CollisionEvent → OccupancyEvent

use bevy::prelude::*;

pub mod adapters;
pub mod rapier_bridge;
pub mod recording;
pub mod systems;

pub use adapters::{AudioAdapter, FeedbackAdapter, HostAdapters, UiAdapter, WorldAdapter};
pub use rapier_bridge::{forward_rapier_collisions, occupancy_sensor, RapierOccupancyPlugin};
pub use recording::{HostCall, LoggingHost, RecordingHost};
pub use systems::{forward_interaction_output, forward_tutorial_ui, forward_world_commands};

use crate::SimulationSet;

/// Host Bridge Plugin
///
/// HostAdapters вставляется пустым, если host не зарегистрировал свой до плагина.
pub struct HostBridgePlugin;

impl Plugin for HostBridgePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HostAdapters>();

        app.add_systems(
            FixedUpdate,
            (forward_interaction_output, forward_world_commands, forward_tutorial_ui)
                .chain()
                .in_set(SimulationSet::Host),
        );
    }
}

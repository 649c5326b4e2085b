//! World sync: object registry + применение WorldCommand
//!
//! - ObjectRegistry — ObjectId → Entity (rebuild в SimulationSet::Index)
//! - WorldCommand — SetActive / Teleport / ConfigureCamera / UnlockExtraJump

use bevy::prelude::*;

pub mod commands;
pub mod registry;

pub use commands::{apply_world_commands, WorldCommand};
pub use registry::{rebuild_object_registry, ObjectRegistry};

use crate::SimulationSet;

pub struct WorldSyncPlugin;

impl Plugin for WorldSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ObjectRegistry>().add_event::<WorldCommand>();

        app.add_systems(
            FixedUpdate,
            (
                rebuild_object_registry.in_set(SimulationSet::Index),
                apply_world_commands.in_set(SimulationSet::World),
            ),
        );
    }
}

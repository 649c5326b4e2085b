//! Detection module: кто на что смотрит и на чём стоит
//!
//! - spatial: SpatialQuery trait + VolumeIndex (AABB ray casts)
//! - detector: ProximityDetector + ActionInput (forward ray, key edge, downward probe)
//! - overlap: headless occupancy для trigger volumes (opt-in plugin)

use bevy::prelude::*;

pub mod detector;
pub mod overlap;
pub mod spatial;
pub mod systems;

#[cfg(test)]
mod detector_tests;

pub use detector::{
    probe_transitions, select_target, ActionInput, KeyDispatch, ProximityDetector, DEFAULT_INTERACT_DISTANCE,
    DEFAULT_PROBE_HEIGHT, DEFAULT_PROBE_RANGE,
};
pub use overlap::{VolumeOverlapPlugin, VolumeOverlaps};
pub use spatial::{rebuild_volume_index, IndexedVolume, RayHit, SpatialQuery, VolumeIndex};
pub use systems::{dispatch_detector_input, probe_pressure_plates, scan_for_interactables};

use crate::SimulationSet;

/// Detection Plugin
///
/// - rebuild_volume_index — SimulationSet::Index
/// - scan → input → probe — SimulationSet::Detection (chain)
pub struct DetectionPlugin;

impl Plugin for DetectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VolumeIndex>();

        app.add_systems(
            FixedUpdate,
            (
                rebuild_volume_index.in_set(SimulationSet::Index),
                (scan_for_interactables, dispatch_detector_input, probe_pressure_plates)
                    .chain()
                    .in_set(SimulationSet::Detection),
            ),
        );
    }
}

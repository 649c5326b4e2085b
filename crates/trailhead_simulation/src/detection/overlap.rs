//! Volume overlap без physics engine
//!
//! Headless прогоны (runner, тесты) не поднимают rapier, поэтому occupancy
//! для trigger volumes, overlap plates и tutorial zones считается здесь:
//! позиция activator'а внутри AABB цели. С rapier используйте
//! `RapierOccupancyPlugin` вместо этого plugin'а.

use std::collections::BTreeSet;

use bevy::prelude::*;

use super::spatial::VolumeIndex;
use crate::components::{Activator, Presence};
use crate::interaction::OccupancyEvent;
use crate::SimulationSet;

/// Текущие пары (target, activator), которые перекрываются
#[derive(Resource, Debug, Default)]
pub struct VolumeOverlaps {
    pairs: BTreeSet<(Entity, Entity)>,
}

impl VolumeOverlaps {
    pub fn contains(&self, target: Entity, activator: Entity) -> bool {
        self.pairs.contains(&(target, activator))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Система: diff перекрытий с прошлым тиком → OccupancyEvent enter/exit
///
/// Цель, пропавшая из индекса (скрыта), выпадает из пар без exit: её occupancy
/// уже сброшена при disable.
pub fn detect_volume_overlaps(
    index: Res<VolumeIndex>,
    mut overlaps: ResMut<VolumeOverlaps>,
    activators: Query<(Entity, &Transform, Option<&Presence>), With<Activator>>,
    mut occupancy: EventWriter<OccupancyEvent>,
) {
    let mut current = BTreeSet::new();

    for (activator, transform, presence) in activators.iter() {
        if presence.is_some_and(|presence| !presence.active) {
            continue;
        }

        let position = transform.translation;
        for volume in index.volumes().iter().filter(|volume| volume.overlap_target) {
            if volume.entity == activator || !volume.bounds.contains(position) {
                continue;
            }

            let pair = (volume.entity, activator);
            current.insert(pair);
            if !overlaps.pairs.contains(&pair) {
                let from_above = position.y >= volume.bounds.center().y;
                occupancy.write(OccupancyEvent::enter(volume.entity, activator, from_above));
            }
        }
    }

    let still_indexed = |target: Entity| index.volumes().iter().any(|volume| volume.entity == target);
    for &(target, activator) in overlaps.pairs.difference(&current) {
        if still_indexed(target) {
            occupancy.write(OccupancyEvent::exit(target, activator));
        }
    }

    overlaps.pairs = current;
}

/// Headless occupancy из InteractionVolume (без rapier)
pub struct VolumeOverlapPlugin;

impl Plugin for VolumeOverlapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VolumeOverlaps>().add_systems(
            FixedUpdate,
            detect_volume_overlaps
                .in_set(SimulationSet::Detection)
                .before(super::systems::scan_for_interactables),
        );
    }
}

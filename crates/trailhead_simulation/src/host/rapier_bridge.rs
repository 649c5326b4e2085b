//! Rapier bridge: sensor collisions → OccupancyEvent
//!
//! Альтернатива `VolumeOverlapPlugin`, когда в App есть `RapierPhysicsPlugin`.
//! Trigger volumes, overlap plates и tutorial zones получают sensor collider,
//! activator (игрок) — обычный collider. Пара без Activator игнорируется.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{Activator, InteractionVolume};
use crate::interaction::OccupancyEvent;
use crate::SimulationSet;

/// Sensor collider по размеру InteractionVolume
///
/// # Usage
/// ```ignore
/// let volume = InteractionVolume::cuboid(Vec3::new(1.0, 0.1, 1.0));
/// commands.spawn((ObjectId(12), volume, Interactable::new("plate", config), occupancy_sensor(&volume)));
/// ```
pub fn occupancy_sensor(volume: &InteractionVolume) -> (Collider, Sensor, ActiveEvents) {
    let half = volume.half_extents;
    (
        Collider::cuboid(half.x, half.y, half.z),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
    )
}

/// Система: CollisionEvent::Started/Stopped → OccupancyEvent enter/exit
///
/// Порядок entities в CollisionEvent не гарантирован: target — тот, у кого
/// InteractionVolume, activator — тот, у кого Activator.
pub fn forward_rapier_collisions(
    mut collisions: EventReader<CollisionEvent>,
    volumes: Query<&Transform, With<InteractionVolume>>,
    activators: Query<&Transform, With<Activator>>,
    mut occupancy: EventWriter<OccupancyEvent>,
) {
    for collision in collisions.read() {
        let (a, b, started) = match *collision {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };

        let pair = if volumes.contains(a) && activators.contains(b) {
            Some((a, b))
        } else if volumes.contains(b) && activators.contains(a) {
            Some((b, a))
        } else {
            None
        };
        let Some((target, activator)) = pair else {
            continue;
        };

        if started {
            let from_above = match (volumes.get(target), activators.get(activator)) {
                (Ok(target_transform), Ok(activator_transform)) => {
                    activator_transform.translation.y >= target_transform.translation.y
                }
                _ => false,
            };
            occupancy.write(OccupancyEvent::enter(target, activator, from_above));
        } else {
            occupancy.write(OccupancyEvent::exit(target, activator));
        }
    }
}

/// Occupancy из rapier sensor events (вместо VolumeOverlapPlugin)
pub struct RapierOccupancyPlugin;

impl Plugin for RapierOccupancyPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>()
            .add_systems(FixedUpdate, forward_rapier_collisions.in_set(SimulationSet::Detection));
    }
}

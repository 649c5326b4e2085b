//! Spatial query collaborator
//!
//! `SpatialQuery` — граница с физикой: ray cast, hits по возрастанию distance.
//! `VolumeIndex` — встроенная реализация поверх `InteractionVolume` (AABB),
//! пересобирается каждый тик. Host с настоящей физикой может подменить её
//! своей реализацией трейта.

use bevy::prelude::*;

use crate::components::{Interactive, InteractionVolume, ObjectId, Presence};
use crate::interaction::{Interactable, InteractionMode};
use crate::shared::Bounds;
use crate::tutorial::TutorialZone;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    pub distance: f32,
}

pub trait SpatialQuery {
    /// Все пересечения луча, отсортированные по возрастанию distance.
    /// `direction` нормализован.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit>;
}

/// Один активный volume в индексе
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedVolume {
    pub object: ObjectId,
    pub entity: Entity,
    pub bounds: Bounds,
    /// Тег Interactive (цель для ProximityDetector)
    pub interactive: bool,
    /// None = volume без Interactable (стена, зона)
    pub mode: Option<InteractionMode>,
    /// Solid pressure plate: за неё отвечает downward probe
    pub probe_plate: bool,
    /// Получает overlap enter/exit (trigger volumes, overlap plates, tutorial zones)
    pub overlap_target: bool,
}

/// Индекс активных volumes (Resource)
#[derive(Resource, Debug, Default)]
pub struct VolumeIndex {
    /// Отсортирован по ObjectId (binary search + детерминированный порядок)
    volumes: Vec<IndexedVolume>,
}

impl VolumeIndex {
    pub fn rebuild(&mut self, volumes: impl IntoIterator<Item = IndexedVolume>) {
        self.volumes.clear();
        self.volumes.extend(volumes);
        self.volumes.sort_by_key(|volume| (volume.object, volume.entity));
    }

    pub fn get(&self, object: ObjectId) -> Option<&IndexedVolume> {
        self.volumes
            .binary_search_by_key(&object, |volume| volume.object)
            .ok()
            .map(|index| &self.volumes[index])
    }

    pub fn bounds_of(&self, object: ObjectId) -> Option<Bounds> {
        self.get(object).map(|volume| volume.bounds)
    }

    pub fn is_interactive(&self, object: ObjectId) -> bool {
        self.get(object).is_some_and(|volume| volume.interactive)
    }

    pub fn mode_of(&self, object: ObjectId) -> Option<InteractionMode> {
        self.get(object).and_then(|volume| volume.mode)
    }

    pub fn is_probe_plate(&self, object: ObjectId) -> bool {
        self.get(object).is_some_and(|volume| volume.probe_plate)
    }

    pub fn volumes(&self) -> &[IndexedVolume] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl SpatialQuery for VolumeIndex {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .volumes
            .iter()
            .filter_map(|volume| {
                volume
                    .bounds
                    .intersect_ray(origin, direction, max_distance)
                    .map(|distance| RayHit {
                        object: volume.object,
                        distance,
                    })
            })
            .collect();

        // Равные distance → по ObjectId (стабильно между прогонами)
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.object.cmp(&b.object)));
        hits
    }
}

/// Система: пересобрать VolumeIndex из активных объектов (SimulationSet::Index)
///
/// Используется `Transform`, не `GlobalTransform`: world objects — корневые entities.
pub fn rebuild_volume_index(
    mut index: ResMut<VolumeIndex>,
    volumes: Query<(
        Entity,
        &ObjectId,
        &Transform,
        &InteractionVolume,
        &Presence,
        Has<Interactive>,
        Has<TutorialZone>,
        Option<&Interactable>,
    )>,
) {
    let active = volumes.iter().filter(|(.., presence, _, _, _)| presence.active).map(
        |(entity, object, transform, volume, _, interactive, zone, interactable)| {
            let mode = interactable.map(|interactable| interactable.mode());
            let probe_plate = interactable.is_some_and(|interactable| interactable.is_probe_plate());
            let overlap_target = zone
                || interactable.is_some_and(|interactable| {
                    interactable.mode().reacts_to_occupancy() && !interactable.is_probe_plate()
                });

            IndexedVolume {
                object: *object,
                entity,
                bounds: volume.bounds_at(transform.translation),
                interactive,
                mode,
                probe_plate,
                overlap_target,
            }
        },
    );

    index.rebuild(active);
}

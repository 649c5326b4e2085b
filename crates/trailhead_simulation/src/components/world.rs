//! World object компоненты: stable id, presence, теги, interaction volumes

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::Bounds;

/// Stable ID объекта мира (задаётся сценой/скриптом, не Entity)
///
/// Все cross-object ссылки (секвенсор → targets, detector → current_detected)
/// хранят `ObjectId`, не Entity: удаление объекта не оставляет висячих ссылок,
/// lookup идёт через `ObjectRegistry`. Каждый world object получает `Presence`.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
#[require(Presence)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

/// Активен ли объект в мире (аналог SetActive)
///
/// Неактивные объекты не детектятся, не получают occupancy и не тикают.
/// Host engine зеркалит флаг через `WorldCommand::SetActive`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Presence {
    pub active: bool,
}

impl Default for Presence {
    fn default() -> Self {
        Self { active: true }
    }
}

impl Presence {
    pub fn hidden() -> Self {
        Self { active: false }
    }
}

/// Тег "interactive": ProximityDetector учитывает только такие hits
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Interactive;

/// Тело, которое может активировать triggers/plates (обычно игрок)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Activator;

/// Player marker
///
/// Секвенсор телепортирует игрока и проверяет ReachZone по его Transform.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Activator)]
pub struct Player;

/// Box volume объекта для ray/containment queries
///
/// Центр = Transform.translation + offset. Rotation игнорируется (AABB).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Presence)]
pub struct InteractionVolume {
    pub half_extents: Vec3,
    pub offset: Vec3,
}

impl Default for InteractionVolume {
    fn default() -> Self {
        Self {
            half_extents: Vec3::splat(0.5), // 1m куб
            offset: Vec3::ZERO,
        }
    }
}

impl InteractionVolume {
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            offset: Vec3::ZERO,
        }
    }

    /// World-space bounds при заданной позиции объекта
    pub fn bounds_at(&self, translation: Vec3) -> Bounds {
        Bounds::from_center_size(translation + self.offset, self.half_extents * 2.0)
    }
}

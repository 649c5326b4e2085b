//! TutorialPhase: одна стадия туториала

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::ObjectId;
use crate::shared::CameraConfig;

/// Условие завершения фазы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionKind {
    /// Активация конкретного объекта (notify_interaction)
    Interaction { target: ObjectId },
    /// Игрок внутри зоны (containment каждый тик или overlap notification)
    ReachZone { zone: ObjectId },
    Timer { duration: f32 },
    /// N разных объектов
    CollectMultiple { count: u32 },
    /// Только manual_complete_phase / complete_current_phase
    Manual,
}

/// Куда поставить игрока на входе в фазу
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPlacement {
    pub position: Vec3,
    /// Euler, градусы (Y → X → Z)
    pub rotation_degrees: Vec3,
}

impl PlayerPlacement {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.z.to_radians(),
        )
    }
}

/// Phase-local прогресс (сбрасывается на каждом входе)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseProgress {
    pub is_complete: bool,
    pub items_collected: u32,
    pub elapsed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorialPhase {
    pub name: String,
    /// Текст инструкции для UI (приходит в PhaseStarted)
    pub description: String,
    pub completion: CompletionKind,
    pub spawn_set: Vec<ObjectId>,
    pub hide_set: Vec<ObjectId>,
    pub player_placement: Option<PlayerPlacement>,
    pub camera: Option<CameraConfig>,
    pub unlocks_double_jump: bool,
    pub progress: PhaseProgress,
}

impl TutorialPhase {
    pub fn new(name: impl Into<String>, completion: CompletionKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            completion,
            spawn_set: Vec::new(),
            hide_set: Vec::new(),
            player_placement: None,
            camera: None,
            unlocks_double_jump: false,
            progress: PhaseProgress::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_spawn(mut self, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        self.spawn_set.extend(objects);
        self
    }

    pub fn with_hide(mut self, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        self.hide_set.extend(objects);
        self
    }

    pub fn with_placement(mut self, position: Vec3, rotation_degrees: Vec3) -> Self {
        self.player_placement = Some(PlayerPlacement {
            position,
            rotation_degrees,
        });
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn unlocking_double_jump(mut self) -> Self {
        self.unlocks_double_jump = true;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_complete
    }
}

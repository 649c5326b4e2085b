//! Встроенные адаптеры: LoggingHost (runner) и RecordingHost (тесты, replay)

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use super::adapters::{AudioAdapter, FeedbackAdapter, UiAdapter, WorldAdapter};
use crate::components::ObjectId;
use crate::error::HostError;
use crate::interaction::{ClipId, MaterialId};
use crate::logger;
use crate::shared::{CameraConfig, Rgba};

/// Пишет каждый вызов в logger (info)
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHost;

impl FeedbackAdapter for LoggingHost {
    fn apply_color(&mut self, object: ObjectId, color: Rgba) -> Result<(), HostError> {
        logger::log_info(&format!("Host: {:?} color {:?}", object, color));
        Ok(())
    }

    fn apply_material(&mut self, object: ObjectId, material: &MaterialId) -> Result<(), HostError> {
        logger::log_info(&format!("Host: {:?} material {}", object, material.0));
        Ok(())
    }

    fn set_local_offset(&mut self, object: ObjectId, offset: Vec3) -> Result<(), HostError> {
        logger::log(&format!("Host: {:?} offset {}", object, offset));
        Ok(())
    }
}

impl AudioAdapter for LoggingHost {
    fn play_one_shot(&mut self, object: ObjectId, clip: &ClipId) -> Result<(), HostError> {
        logger::log_info(&format!("Host: {:?} plays '{}'", object, clip.0));
        Ok(())
    }
}

impl WorldAdapter for LoggingHost {
    fn set_active(&mut self, object: ObjectId, active: bool) -> Result<(), HostError> {
        logger::log_info(&format!("Host: {:?} active = {}", object, active));
        Ok(())
    }

    fn teleport(&mut self, object: ObjectId, position: Vec3, _rotation: Quat) -> Result<(), HostError> {
        logger::log_info(&format!("Host: {:?} teleport {}", object, position));
        Ok(())
    }

    fn configure_camera(&mut self, camera: ObjectId, config: &CameraConfig) -> Result<(), HostError> {
        logger::log_info(&format!("Host: camera {:?} {:?}", camera, config));
        Ok(())
    }
}

impl UiAdapter for LoggingHost {
    fn show_phase(&mut self, index: usize, name: &str, description: &str) -> Result<(), HostError> {
        logger::log_info(&format!("UI: [{}] {} | {}", index, name, description));
        Ok(())
    }

    fn tutorial_finished(&mut self) -> Result<(), HostError> {
        logger::log_info("UI: tutorial finished");
        Ok(())
    }
}

/// Один вызов адаптера
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Color { object: ObjectId, color: Rgba },
    Material { object: ObjectId, material: MaterialId },
    Offset { object: ObjectId, offset: Vec3 },
    Sound { object: ObjectId, clip: ClipId },
    SetActive { object: ObjectId, active: bool },
    Teleport { object: ObjectId, position: Vec3 },
    Camera { camera: ObjectId },
    UnlockJump { object: ObjectId },
    Phase { index: usize, name: String },
    Finished,
}

/// Записывает вызовы в общий журнал (клоны делят один журнал)
///
/// `fail_on` → вызовы для этого объекта возвращают HostError::UnknownObject
/// (проверка, что сбой host не ломает тик).
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
    fail_on: Option<ObjectId>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(object: ObjectId) -> Self {
        Self {
            calls: Arc::default(),
            fail_on: Some(object),
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, object: Option<ObjectId>, call: HostCall) -> Result<(), HostError> {
        if let (Some(object), Some(failing)) = (object, self.fail_on) {
            if object == failing {
                return Err(HostError::UnknownObject(object));
            }
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        Ok(())
    }
}

impl FeedbackAdapter for RecordingHost {
    fn apply_color(&mut self, object: ObjectId, color: Rgba) -> Result<(), HostError> {
        self.record(Some(object), HostCall::Color { object, color })
    }

    fn apply_material(&mut self, object: ObjectId, material: &MaterialId) -> Result<(), HostError> {
        self.record(
            Some(object),
            HostCall::Material {
                object,
                material: material.clone(),
            },
        )
    }

    fn set_local_offset(&mut self, object: ObjectId, offset: Vec3) -> Result<(), HostError> {
        self.record(Some(object), HostCall::Offset { object, offset })
    }
}

impl AudioAdapter for RecordingHost {
    fn play_one_shot(&mut self, object: ObjectId, clip: &ClipId) -> Result<(), HostError> {
        self.record(
            Some(object),
            HostCall::Sound {
                object,
                clip: clip.clone(),
            },
        )
    }
}

impl WorldAdapter for RecordingHost {
    fn set_active(&mut self, object: ObjectId, active: bool) -> Result<(), HostError> {
        self.record(Some(object), HostCall::SetActive { object, active })
    }

    fn teleport(&mut self, object: ObjectId, position: Vec3, _rotation: Quat) -> Result<(), HostError> {
        self.record(Some(object), HostCall::Teleport { object, position })
    }

    fn configure_camera(&mut self, camera: ObjectId, _config: &CameraConfig) -> Result<(), HostError> {
        self.record(Some(camera), HostCall::Camera { camera })
    }

    fn unlock_extra_jump(&mut self, object: ObjectId) -> Result<(), HostError> {
        self.record(Some(object), HostCall::UnlockJump { object })
    }
}

impl UiAdapter for RecordingHost {
    fn show_phase(&mut self, index: usize, name: &str, _description: &str) -> Result<(), HostError> {
        self.record(
            None,
            HostCall::Phase {
                index,
                name: name.to_string(),
            },
        )
    }

    fn tutorial_finished(&mut self) -> Result<(), HostError> {
        self.record(None, HostCall::Finished)
    }
}

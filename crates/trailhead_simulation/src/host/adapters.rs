//! Host adapter traits
//!
//! Граница ECS → host engine (рендер, звук, сцена, UI). Симуляция не знает,
//! кто на другой стороне: Godot bridge, Unity plugin или headless logging.
//! Ошибка адаптера не фатальна: forward система логирует её и идёт дальше.

use bevy::prelude::*;

use crate::components::ObjectId;
use crate::error::HostError;
use crate::interaction::{ClipId, MaterialId};
use crate::shared::{CameraConfig, Rgba};

/// Визуальный feedback interactables
pub trait FeedbackAdapter: Send + Sync {
    fn apply_color(&mut self, object: ObjectId, color: Rgba) -> Result<(), HostError>;
    fn apply_material(&mut self, object: ObjectId, material: &MaterialId) -> Result<(), HostError>;
    /// Local offset визуала (press animation)
    fn set_local_offset(&mut self, object: ObjectId, offset: Vec3) -> Result<(), HostError>;
}

pub trait AudioAdapter: Send + Sync {
    fn play_one_shot(&mut self, object: ObjectId, clip: &ClipId) -> Result<(), HostError>;
}

/// Зеркало WorldCommand на стороне сцены
pub trait WorldAdapter: Send + Sync {
    fn set_active(&mut self, object: ObjectId, active: bool) -> Result<(), HostError>;
    fn teleport(&mut self, object: ObjectId, position: Vec3, rotation: Quat) -> Result<(), HostError>;

    fn configure_camera(&mut self, _camera: ObjectId, _config: &CameraConfig) -> Result<(), HostError> {
        Ok(())
    }

    fn unlock_extra_jump(&mut self, _object: ObjectId) -> Result<(), HostError> {
        Ok(())
    }
}

/// Инструкции туториала (текст фазы, финал)
pub trait UiAdapter: Send + Sync {
    fn show_phase(&mut self, index: usize, name: &str, description: &str) -> Result<(), HostError>;
    fn tutorial_finished(&mut self) -> Result<(), HostError>;
}

/// Зарегистрированные адаптеры (Resource)
///
/// Отсутствующий адаптер = события этого типа не форвардятся.
///
/// # Usage
/// ```ignore
/// app.insert_resource(HostAdapters::default().with_audio(MyAudio::new()));
/// ```
#[derive(Resource, Default)]
pub struct HostAdapters {
    pub feedback: Option<Box<dyn FeedbackAdapter>>,
    pub audio: Option<Box<dyn AudioAdapter>>,
    pub world: Option<Box<dyn WorldAdapter>>,
    pub ui: Option<Box<dyn UiAdapter>>,
}

impl HostAdapters {
    pub fn with_feedback(mut self, adapter: impl FeedbackAdapter + 'static) -> Self {
        self.feedback = Some(Box::new(adapter));
        self
    }

    pub fn with_audio(mut self, adapter: impl AudioAdapter + 'static) -> Self {
        self.audio = Some(Box::new(adapter));
        self
    }

    pub fn with_world(mut self, adapter: impl WorldAdapter + 'static) -> Self {
        self.world = Some(Box::new(adapter));
        self
    }

    pub fn with_ui(mut self, adapter: impl UiAdapter + 'static) -> Self {
        self.ui = Some(Box::new(adapter));
        self
    }

    /// Один и тот же адаптер на все четыре роли (logging, recording)
    pub fn uniform<A>(adapter: A) -> Self
    where
        A: FeedbackAdapter + AudioAdapter + WorldAdapter + UiAdapter + Clone + 'static,
    {
        Self::default()
            .with_feedback(adapter.clone())
            .with_audio(adapter.clone())
            .with_world(adapter.clone())
            .with_ui(adapter)
    }

    pub fn is_empty(&self) -> bool {
        self.feedback.is_none() && self.audio.is_none() && self.world.is_none() && self.ui.is_none()
    }
}

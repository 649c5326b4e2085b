//! Interaction события
//!
//! Входящие (host/physics/detector → ECS):
//! - OccupancyEvent — overlap enter/exit activator'а с volume объекта
//! - InteractIntent — клавиша на обнаруженном объекте
//! - PlateProbeEvent — downward probe нашёл/потерял плиту
//! - HighlightChanged — объект попал/ушёл из прицела детектора
//! - ResetInteractable / ForceActivation — административные команды
//!
//! Исходящие (ECS → host/tutorial):
//! - FeedbackRequested, AudioCue — команды для адаптеров
//! - InteractableActivated/Deactivated/Stay — для hooks и UI
//! - InteractionNotified — кредит для TutorialSequencer

use bevy::prelude::*;

use super::feedback::FeedbackCommand;
use super::interactable::ClipId;
use crate::components::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyTransition {
    Enter,
    Exit,
}

/// Overlap callback от physics collaborator
///
/// Приходит через очередь событий и применяется только внутри FixedUpdate chain.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct OccupancyEvent {
    pub target: Entity,
    pub activator: Entity,
    pub transition: OccupancyTransition,
    /// Activator находится над volume (контакт сверху)
    pub from_above: bool,
}

impl OccupancyEvent {
    pub fn enter(target: Entity, activator: Entity, from_above: bool) -> Self {
        Self {
            target,
            activator,
            transition: OccupancyTransition::Enter,
            from_above,
        }
    }

    pub fn exit(target: Entity, activator: Entity) -> Self {
        Self {
            target,
            activator,
            transition: OccupancyTransition::Exit,
            from_above: false,
        }
    }
}

/// Клавиша взаимодействия, направленная на конкретный объект
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractIntent {
    pub target: ObjectId,
    pub interactor: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeContact {
    Pressed,
    Released,
}

/// Результат downward probe детектора (только solid pressure plates)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlateProbeEvent {
    pub plate: ObjectId,
    pub activator: Entity,
    pub contact: ProbeContact,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HighlightChanged {
    pub target: ObjectId,
    pub highlighted: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ResetInteractable {
    pub target: ObjectId,
}

/// Force activate/deactivate в обход policy
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ForceActivation {
    pub target: ObjectId,
    pub active: bool,
}

/// Команда для FeedbackAdapter
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FeedbackRequested {
    pub object: ObjectId,
    pub command: FeedbackCommand,
}

/// One-shot звук для AudioAdapter
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AudioCue {
    pub object: ObjectId,
    pub clip: ClipId,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractableActivated {
    pub entity: Entity,
    pub object: ObjectId,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractableDeactivated {
    pub entity: Entity,
    pub object: ObjectId,
}

/// Объект occupied в этом тике (каждый тик пока внутри)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractableStay {
    pub entity: Entity,
    pub object: ObjectId,
}

/// Объект с notify_sequencer активирован
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionNotified {
    pub object: ObjectId,
}

//! Tutorial события
//!
//! Входящие: TutorialCommand (UI/debug/скрипты), ZoneEntered, ResetTutorialZone.
//! Исходящие: PhaseStarted, PhaseCompleted, TutorialFinished (для UI).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::ObjectId;

/// Административные команды секвенсору
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorialCommand {
    /// Спрятать все spawn sets и стартовать start_index
    Start,
    StartPhase(usize),
    JumpToPhase(usize),
    Restart,
    /// Завершить текущую фазу, только если она Manual
    ManualComplete,
    /// Завершить текущую фазу независимо от условия
    CompleteCurrent,
}

/// Игрок вошёл в TutorialZone
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneEntered {
    pub zone: ObjectId,
}

/// Вернуть зону в исходное состояние (reached = false, снова активна)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTutorialZone {
    pub zone: ObjectId,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PhaseStarted {
    pub index: usize,
    pub name: String,
    pub description: String,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PhaseCompleted {
    pub index: usize,
    pub name: String,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialFinished;

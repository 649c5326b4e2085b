//! Closed enumerations, которые конфигурируют Interactable
//!
//! Режим, политика и edge ортогональны: каждая комбинация валидна,
//! поведение выбирается одним `match` на месте использования.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default cooldown для `ActivationPolicy::EveryTime` (секунды)
pub const DEFAULT_COOLDOWN: f32 = 1.0;

/// На какие физические события реагирует объект
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Только клавиша взаимодействия
    #[default]
    Manual,
    /// Trigger volume (overlap enter/exit)
    Trigger,
    /// Физическая плита (overlap или downward probe)
    PressurePlate,
    /// Клавиша + trigger volume
    Hybrid,
}

impl InteractionMode {
    /// Реагирует ли режим на occupancy (overlap/probe)
    pub fn reacts_to_occupancy(self) -> bool {
        !matches!(self, InteractionMode::Manual)
    }

    /// Является ли клавиша штатным входом (не override)
    pub fn accepts_manual(self) -> bool {
        matches!(self, InteractionMode::Manual | InteractionMode::Hybrid)
    }
}

/// Правило повторной активации
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationPolicy {
    /// Одна активация за жизнь объекта (до reset)
    #[default]
    Once,
    /// Каждый раз, не чаще чем раз в `cooldown` секунд (PressurePlate: без cooldown)
    EveryTime {
        #[serde(default = "default_cooldown")]
        cooldown: f32,
    },
    /// Каждая попытка переключает Idle ↔ Active
    Toggleable,
    /// Active ровно пока объект occupied
    WhileOccupied,
}

fn default_cooldown() -> f32 {
    DEFAULT_COOLDOWN
}

impl ActivationPolicy {
    pub fn every_time() -> Self {
        ActivationPolicy::EveryTime {
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// Какой occupancy переход порождает попытку активации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEdge {
    #[default]
    OnEnter,
    /// Активация после dwell (или на первом occupied тике при нулевом dwell)
    OnStay,
    OnExit,
    OnEnterAndExit,
}

impl TriggerEdge {
    pub fn fires_on_enter(self) -> bool {
        matches!(self, TriggerEdge::OnEnter | TriggerEdge::OnEnterAndExit)
    }

    pub fn fires_on_exit(self) -> bool {
        matches!(self, TriggerEdge::OnExit | TriggerEdge::OnEnterAndExit)
    }

    /// Edges, для которых `required_dwell_time` откладывает активацию
    pub fn waits_for_dwell(self) -> bool {
        matches!(self, TriggerEdge::OnEnter | TriggerEdge::OnStay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ActivationState {
    #[default]
    Idle,
    Active,
}

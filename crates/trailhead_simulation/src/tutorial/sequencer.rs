//! TutorialSequencer: линейная последовательность фаз
//!
//! Чистое ядро без ECS доступа: операции меняют состояние и кладут
//! `SequencerEffect` в очередь, системы (tutorial::systems) превращают их
//! в WorldCommand и UI события.
//!
//! # State machine
//!
//! ```text
//! NotStarted ─start─▶ Transitioning{target} ─delay─▶ InPhase ─complete─▶ Transitioning{next}
//!                                                        │
//!                                                        └─complete (последняя)─▶ Complete
//! ```
//!
//! Пока идёт переход, новый start_phase отклоняется (TransitionInProgress),
//! notifications игнорируются (текущая фаза уже complete).

use std::collections::HashSet;

use crate::components::ObjectId;
use crate::error::SequencerError;
use crate::logger;
use crate::world::WorldCommand;

use super::events::{PhaseCompleted, PhaseStarted};
use super::phase::{CompletionKind, TutorialPhase};
use crate::shared::Bounds;

pub const DEFAULT_TRANSITION_DELAY: f32 = 0.5;

/// Остаток задержки ниже этого считается нулём (float накопление dt)
const TRANSITION_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerConfig {
    pub start_index: usize,
    /// Секунды между complete и входом в следующую фазу (0 = синхронно)
    pub transition_delay: f32,
    pub player: Option<ObjectId>,
    pub camera: Option<ObjectId>,
    /// Стартовать на первом тике без TutorialCommand::Start
    pub auto_start: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            start_index: 0,
            transition_delay: DEFAULT_TRANSITION_DELAY,
            player: None,
            camera: None,
            auto_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequencerState {
    NotStarted,
    Transitioning { target: usize, remaining: f32 },
    InPhase,
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEffect {
    World(WorldCommand),
    PhaseStarted(PhaseStarted),
    PhaseCompleted(PhaseCompleted),
    Finished,
}

#[derive(bevy::prelude::Resource, Debug, Clone)]
pub struct TutorialSequencer {
    phases: Vec<TutorialPhase>,
    config: SequencerConfig,
    current_index: Option<usize>,
    state: SequencerState,
    /// Объекты, уже засчитанные за прогон (сбрасывается только restart)
    interacted: HashSet<ObjectId>,
    finished: bool,
    pending_auto_start: bool,
    effects: Vec<SequencerEffect>,
}

impl TutorialSequencer {
    pub fn new(phases: Vec<TutorialPhase>, config: SequencerConfig) -> Self {
        Self {
            phases,
            pending_auto_start: config.auto_start,
            config,
            current_index: None,
            state: SequencerState::NotStarted,
            interacted: HashSet::new(),
            finished: false,
            effects: Vec::new(),
        }
    }

    // ---- queries ----

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn phases(&self) -> &[TutorialPhase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<&TutorialPhase> {
        self.phases.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_phase(&self) -> Option<&TutorialPhase> {
        self.current_index.and_then(|index| self.phases.get(index))
    }

    pub fn is_started(&self) -> bool {
        self.state != SequencerState::NotStarted
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, SequencerState::Transitioning { .. })
    }

    pub fn is_complete(&self) -> bool {
        self.state == SequencerState::Complete
    }

    pub fn has_interacted(&self, object: ObjectId) -> bool {
        self.interacted.contains(&object)
    }

    pub fn interacted_count(&self) -> usize {
        self.interacted.len()
    }

    pub fn drain_effects(&mut self) -> std::vec::Drain<'_, SequencerEffect> {
        self.effects.drain(..)
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// true ровно один раз: auto start ещё не выполнялся и секвенсор не запущен
    pub fn take_auto_start(&mut self) -> bool {
        std::mem::take(&mut self.pending_auto_start) && !self.is_started()
    }

    // ---- lifecycle ----

    /// Спрятать spawn sets всех фаз и начать с `start_index`
    pub fn start(&mut self) -> Result<(), SequencerError> {
        let start_index = self.config.start_index;
        if start_index >= self.phases.len() {
            return Err(SequencerError::PhaseOutOfRange {
                index: start_index,
                len: self.phases.len(),
            });
        }
        if let SequencerState::Transitioning { target, .. } = self.state {
            return Err(SequencerError::TransitionInProgress { target });
        }

        let hidden: Vec<ObjectId> = self.phases.iter().flat_map(|phase| phase.spawn_set.iter().copied()).collect();
        for object in hidden {
            self.set_active(object, false);
        }

        logger::log_info(&format!("[Tutorial] start ({} phases)", self.phases.len()));
        self.begin_transition(start_index);
        Ok(())
    }

    /// Выйти из текущей фазы (спрятать её spawn set) и запланировать вход в `index`
    pub fn start_phase(&mut self, index: usize) -> Result<(), SequencerError> {
        if index >= self.phases.len() {
            return Err(SequencerError::PhaseOutOfRange {
                index,
                len: self.phases.len(),
            });
        }
        if let SequencerState::Transitioning { target, .. } = self.state {
            return Err(SequencerError::TransitionInProgress { target });
        }

        if let Some(current) = self.current_index {
            let outgoing = self.phases[current].spawn_set.clone();
            for object in outgoing {
                self.set_active(object, false);
            }
        }

        self.begin_transition(index);
        Ok(())
    }

    pub fn jump_to_phase(&mut self, index: usize) -> Result<(), SequencerError> {
        logger::log_info(&format!("[Tutorial] jump to phase {}", index));
        self.start_phase(index)
    }

    /// Сбросить прогресс всех фаз и interacted set, начать с `start_index`
    pub fn restart(&mut self) -> Result<(), SequencerError> {
        if let SequencerState::Transitioning { target, .. } = self.state {
            return Err(SequencerError::TransitionInProgress { target });
        }
        if self.config.start_index >= self.phases.len() {
            return Err(SequencerError::PhaseOutOfRange {
                index: self.config.start_index,
                len: self.phases.len(),
            });
        }

        self.interacted.clear();
        self.finished = false;
        for phase in &mut self.phases {
            phase.progress = Default::default();
        }

        logger::log_info("[Tutorial] restart");
        self.start_phase(self.config.start_index)
    }

    /// Завершить текущую фазу независимо от условия
    ///
    /// Возвращает false, если фазы нет, она уже complete или идёт переход.
    pub fn complete_current_phase(&mut self) -> bool {
        if self.state != SequencerState::InPhase {
            return false;
        }
        let Some(index) = self.current_index else {
            return false;
        };

        let phase = &mut self.phases[index];
        if phase.progress.is_complete {
            return false;
        }
        phase.progress.is_complete = true;
        let name = phase.name.clone();
        let unlocks_double_jump = phase.unlocks_double_jump;

        logger::log_info(&format!("[Tutorial] phase {} '{}' complete", index, name));

        if unlocks_double_jump {
            match self.config.player {
                Some(player) => self.push_world(WorldCommand::UnlockExtraJump { object: player }),
                None => logger::log_warning(&format!("{}", SequencerError::MissingReference("player"))),
            }
        }

        self.effects.push(SequencerEffect::PhaseCompleted(PhaseCompleted { index, name }));

        let next = index + 1;
        if next < self.phases.len() {
            if let Err(err) = self.start_phase(next) {
                logger::log_warning(&format!("[Tutorial] {}", err));
            }
        } else {
            self.state = SequencerState::Complete;
            if !self.finished {
                self.finished = true;
                logger::log_info("[Tutorial] all phases complete");
                self.effects.push(SequencerEffect::Finished);
            }
        }
        true
    }

    /// Завершить текущую фазу, только если её условие Manual
    pub fn manual_complete_phase(&mut self) -> bool {
        let is_manual = self
            .current_phase()
            .is_some_and(|phase| phase.completion == CompletionKind::Manual);
        is_manual && self.complete_current_phase()
    }

    // ---- notifications ----

    /// Объект активирован (interaction/hook). true → засчитано впервые за прогон.
    pub fn notify_interaction(&mut self, object: ObjectId) -> bool {
        let Some(index) = self.accepting_phase() else {
            return false;
        };
        if !self.interacted.insert(object) {
            return false;
        }

        match self.phases[index].completion {
            CompletionKind::Interaction { target } if target == object => {
                self.complete_current_phase();
            }
            CompletionKind::CollectMultiple { count } => {
                let progress = &mut self.phases[index].progress;
                progress.items_collected += 1;
                logger::log(&format!("[Tutorial] collected {}/{}", progress.items_collected, count));
                if progress.items_collected >= count {
                    self.complete_current_phase();
                }
            }
            _ => {}
        }
        true
    }

    /// Игрок вошёл в зону (overlap notification)
    pub fn notify_zone_entered(&mut self, zone: ObjectId) -> bool {
        let Some(index) = self.accepting_phase() else {
            return false;
        };

        match self.phases[index].completion {
            CompletionKind::ReachZone { zone: target } if target == zone => self.complete_current_phase(),
            _ => false,
        }
    }

    // ---- tick ----

    /// Продвинуть переход, таймер и containment проверку
    ///
    /// `zone_bounds` отдаёт bounds активной зоны (None = зона скрыта/неизвестна).
    pub fn tick(
        &mut self,
        dt: f32,
        player_position: Option<bevy::math::Vec3>,
        zone_bounds: impl Fn(ObjectId) -> Option<Bounds>,
    ) {
        match self.state {
            SequencerState::Transitioning { target, remaining } => {
                let remaining = remaining - dt;
                if remaining <= TRANSITION_EPSILON {
                    self.enter_phase(target);
                } else {
                    self.state = SequencerState::Transitioning { target, remaining };
                }
                return;
            }
            SequencerState::InPhase => {}
            SequencerState::NotStarted | SequencerState::Complete => return,
        }

        let Some(index) = self.current_index else {
            return;
        };
        let phase = &mut self.phases[index];
        if phase.progress.is_complete {
            return;
        }

        let should_complete = match phase.completion {
            CompletionKind::Timer { duration } => {
                phase.progress.elapsed += dt;
                phase.progress.elapsed >= duration
            }
            CompletionKind::CollectMultiple { count } => phase.progress.items_collected >= count,
            CompletionKind::ReachZone { zone } => player_position
                .zip(zone_bounds(zone))
                .is_some_and(|(position, bounds)| bounds.contains(position)),
            CompletionKind::Interaction { .. } | CompletionKind::Manual => false,
        };

        if should_complete {
            self.complete_current_phase();
        }
    }

    // ---- internal ----

    fn accepting_phase(&self) -> Option<usize> {
        if self.state != SequencerState::InPhase {
            return None;
        }
        self.current_index
            .filter(|&index| !self.phases[index].progress.is_complete)
    }

    fn begin_transition(&mut self, target: usize) {
        if self.config.transition_delay <= 0.0 {
            self.enter_phase(target);
        } else {
            self.state = SequencerState::Transitioning {
                target,
                remaining: self.config.transition_delay,
            };
        }
    }

    /// Вход в фазу: прогресс, spawn → hide, игрок, камера, PhaseStarted
    ///
    /// Объект из обоих наборов остаётся скрытым (hide применяется последним).
    fn enter_phase(&mut self, index: usize) {
        self.current_index = Some(index);
        self.state = SequencerState::InPhase;

        let phase = &mut self.phases[index];
        phase.progress = Default::default();
        let phase = phase.clone();

        logger::log_info(&format!("[Tutorial] phase {} '{}' started", index, phase.name));

        for &object in &phase.spawn_set {
            self.set_active(object, true);
        }
        for &object in &phase.hide_set {
            self.set_active(object, false);
        }

        if let Some(placement) = phase.player_placement {
            match self.config.player {
                Some(player) => self.push_world(WorldCommand::Teleport {
                    object: player,
                    position: placement.position,
                    rotation: placement.rotation(),
                }),
                None => logger::log_warning(&format!("{}", SequencerError::MissingReference("player"))),
            }
        }

        if let Some(camera_config) = phase.camera {
            match self.config.camera {
                Some(camera) => self.push_world(WorldCommand::ConfigureCamera {
                    camera,
                    config: camera_config,
                }),
                None => logger::log_warning(&format!("{}", SequencerError::MissingReference("camera"))),
            }
        }

        self.effects.push(SequencerEffect::PhaseStarted(PhaseStarted {
            index,
            name: phase.name,
            description: phase.description,
        }));
    }

    fn set_active(&mut self, object: ObjectId, active: bool) {
        self.push_world(WorldCommand::SetActive { object, active });
    }

    fn push_world(&mut self, command: WorldCommand) {
        self.effects.push(SequencerEffect::World(command));
    }
}

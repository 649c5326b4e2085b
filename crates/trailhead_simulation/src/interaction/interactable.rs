//! Interactable: activation state machine одного world object
//!
//! Компонент чистый: методы мутируют состояние и складывают `InteractionEffect`
//! в очередь. Системы (`interaction::systems`) превращают эффекты в события
//! (feedback, audio, sequencer notification, disable).
//!
//! Входы:
//! - `interact` — клавиша (через ProximityDetector)
//! - `on_occupancy_enter/exit` — overlap volume (physics bridge)
//! - `probe_press/probe_release` — downward probe детектора (solid plates)
//! - `tick` — dwell, WhileOccupied re-assert, stay, press animation

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::feedback::{FeedbackCommand, FeedbackConfig, FeedbackState};
use super::policy::{ActivationPolicy, ActivationState, InteractionMode, TriggerEdge};
use crate::components::Interactive;
use crate::logger;

/// Host-side идентификатор звукового клипа
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Побочный эффект перехода (дренируется системой в события)
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    Feedback(FeedbackCommand),
    Audio(ClipId),
    Activated,
    Deactivated,
    /// Сообщить секвенсору (notify_sequencer = true)
    NotifySequencer,
    /// Убрать объект из мира (disable_after_activation)
    Disable,
    /// Объект occupied в этом тике
    Stay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractableConfig {
    pub mode: InteractionMode,
    pub policy: ActivationPolicy,
    pub trigger_edge: TriggerEdge,

    /// Секунды непрерывной occupancy до активации (0 = сразу)
    pub required_dwell_time: f32,
    pub deactivate_on_exit: bool,

    /// Trigger/PressurePlate принимают клавишу как override
    pub accept_manual_override: bool,
    /// Enter засчитывается только сверху (from_above)
    pub require_standing_on_top: bool,
    /// PressurePlate с overlap volume: downward probe её игнорирует
    pub plate_uses_overlap: bool,

    pub feedback: FeedbackConfig,
    pub activation_sound: Option<ClipId>,
    pub deactivation_sound: Option<ClipId>,

    pub notify_sequencer: bool,
    pub disable_after_activation: bool,
    pub revert_on_disable: bool,

    pub debug_logs: bool,
}

impl Default for InteractableConfig {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Manual,
            policy: ActivationPolicy::Once,
            trigger_edge: TriggerEdge::OnEnter,
            required_dwell_time: 0.0,
            deactivate_on_exit: true,
            accept_manual_override: true,
            require_standing_on_top: false,
            plate_uses_overlap: false,
            feedback: FeedbackConfig::default(),
            activation_sound: None,
            deactivation_sound: None,
            notify_sequencer: false,
            disable_after_activation: false,
            revert_on_disable: true,
            debug_logs: false,
        }
    }
}

/// Interactable component
///
/// # Usage
/// ```ignore
/// commands.spawn((
///     ObjectId(10),
///     Transform::from_xyz(0.0, 0.0, -2.0),
///     InteractionVolume::default(),
///     Interactable::new("Button", InteractableConfig {
///         mode: InteractionMode::Manual,
///         policy: ActivationPolicy::Toggleable,
///         ..Default::default()
///     }),
/// ));
/// ```
#[derive(Component, Debug, Clone)]
#[require(Interactive)]
pub struct Interactable {
    pub label: String,
    pub config: InteractableConfig,

    state: ActivationState,
    ever_activated: bool,
    occupancy: u32,
    /// Downward probe видит игрока на плите
    probe_witness: bool,
    dwell_time: f32,
    /// Dwell активация уже сработала в текущем периоде occupancy
    dwell_consumed: bool,
    last_activation: Option<f32>,
    feedback: FeedbackState,

    effects: Vec<InteractionEffect>,
}

impl Interactable {
    pub fn new(label: impl Into<String>, config: InteractableConfig) -> Self {
        Self {
            label: label.into(),
            config,
            state: ActivationState::Idle,
            ever_activated: false,
            occupancy: 0,
            probe_witness: false,
            dwell_time: 0.0,
            dwell_consumed: false,
            last_activation: None,
            feedback: FeedbackState::default(),
            effects: Vec::new(),
        }
    }

    // ========== Queries ==========

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ActivationState::Active
    }

    pub fn ever_activated(&self) -> bool {
        self.ever_activated
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Occupied = overlap counter > 0 или probe видит игрока
    pub fn is_occupied(&self) -> bool {
        self.occupancy > 0 || self.probe_witness
    }

    pub fn dwell_time(&self) -> f32 {
        self.dwell_time
    }

    pub fn mode(&self) -> InteractionMode {
        self.config.mode
    }

    pub fn press_offset(&self) -> Vec3 {
        self.feedback.press_offset
    }

    /// Probe отвечает только за solid plates
    pub fn is_probe_plate(&self) -> bool {
        self.config.mode == InteractionMode::PressurePlate && !self.config.plate_uses_overlap
    }

    pub fn drain_effects(&mut self) -> std::vec::Drain<'_, InteractionEffect> {
        self.effects.drain(..)
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    // ========== Inputs ==========

    /// Клавиша взаимодействия.
    ///
    /// Manual/Hybrid → попытка активации. Trigger/PressurePlate → только при
    /// `accept_manual_override`, иначе no-op.
    pub fn interact(&mut self, now: f32) {
        if !self.config.mode.accepts_manual() && !self.config.accept_manual_override {
            self.debug(&format!("interact ignored: mode {:?}", self.config.mode));
            return;
        }

        self.debug("manual interact");
        self.try_activate(now);
    }

    /// Overlap enter. `from_above` = activator над объектом (для require_standing_on_top).
    pub fn on_occupancy_enter(&mut self, from_above: bool, now: f32) {
        if !self.config.mode.reacts_to_occupancy() {
            return;
        }
        if self.config.require_standing_on_top && !from_above {
            self.debug("enter rejected: activator is not on top");
            return;
        }

        let was_occupied = self.is_occupied();
        self.occupancy += 1;
        if !was_occupied {
            self.on_occupied(now);
        }
    }

    /// Overlap exit (counter насыщается на 0)
    pub fn on_occupancy_exit(&mut self, now: f32) {
        if !self.config.mode.reacts_to_occupancy() {
            return;
        }

        let was_occupied = self.is_occupied();
        self.occupancy = self.occupancy.saturating_sub(1);
        if was_occupied && !self.is_occupied() {
            self.on_vacated(now);
        }
    }

    /// Probe нашёл игрока на плите. Если плита ещё не occupied — force activate.
    pub fn probe_press(&mut self, now: f32) {
        if self.probe_witness {
            return;
        }

        let was_occupied = self.is_occupied();
        self.probe_witness = true;
        if was_occupied {
            return;
        }

        self.debug("probe: activator on plate");
        self.reset_dwell();
        self.force_activate(now);
    }

    /// Probe потерял игрока: exit processing (deactivate_on_exit и т.п.)
    pub fn probe_release(&mut self, now: f32) {
        if !self.probe_witness {
            return;
        }

        self.probe_witness = false;
        if !self.is_occupied() {
            self.debug("probe: activator left plate");
            self.on_vacated(now);
        }
    }

    /// Per-tick update (только для активных объектов)
    pub fn tick(&mut self, dt: f32, now: f32) {
        if self.config.mode.reacts_to_occupancy() {
            self.tick_occupancy(dt, now);
        }

        let active = self.is_active();
        if let Some(command) = self.config.feedback.step_press(&mut self.feedback, active, dt) {
            self.effects.push(InteractionEffect::Feedback(command));
        }
    }

    fn tick_occupancy(&mut self, dt: f32, now: f32) {
        if !self.is_occupied() {
            // WhileOccupied: Active только пока occupied
            if self.config.policy == ActivationPolicy::WhileOccupied && self.is_active() {
                self.deactivate();
            }
            return;
        }

        self.dwell_time += dt;

        if !self.dwell_consumed && self.config.trigger_edge.waits_for_dwell() {
            let dwell = self.config.required_dwell_time;
            let due = if dwell > 0.0 {
                self.dwell_time >= dwell
            } else {
                // OnStay без dwell: первый occupied тик (OnEnter уже сработал на enter)
                self.config.trigger_edge == TriggerEdge::OnStay
            };

            // Отклонённая policy попытка повторяется каждый тик, пока occupied
            if due && !self.is_active() {
                self.try_activate(now);
                if self.is_active() {
                    self.dwell_consumed = true;
                    self.debug(&format!("dwell reached ({:.2}s)", self.dwell_time));
                }
            }
        }

        // Re-assert даже если кто-то деактивировал извне
        if self.config.policy == ActivationPolicy::WhileOccupied && !self.is_active() {
            self.activate(now);
        }

        self.effects.push(InteractionEffect::Stay);
    }

    // ========== Transitions ==========

    fn on_occupied(&mut self, now: f32) {
        self.reset_dwell();
        self.debug("occupied");

        if self.config.trigger_edge.fires_on_enter() && self.config.required_dwell_time <= 0.0 {
            self.try_activate(now);
        }
    }

    fn on_vacated(&mut self, now: f32) {
        self.reset_dwell();
        self.debug("vacated");

        if self.config.trigger_edge.fires_on_exit() {
            self.try_activate(now);
        }
        if self.config.deactivate_on_exit && self.is_active() {
            self.deactivate();
        }
    }

    fn reset_dwell(&mut self) {
        self.dwell_time = 0.0;
        self.dwell_consumed = false;
    }

    /// Dispatch по activation policy. Запрещённая попытка = тихий no-op.
    pub fn try_activate(&mut self, now: f32) {
        match self.config.policy {
            ActivationPolicy::Once => {
                if !self.ever_activated {
                    self.activate(now);
                }
            }
            ActivationPolicy::EveryTime { cooldown } => {
                // Физическая плита реактивируется сразу на каждом edge
                let ready = self.config.mode == InteractionMode::PressurePlate
                    || self.last_activation.is_none_or(|last| now - last >= cooldown);
                if ready {
                    self.activate(now);
                }
            }
            ActivationPolicy::Toggleable => {
                if self.is_active() {
                    self.deactivate();
                } else {
                    self.activate(now);
                }
            }
            ActivationPolicy::WhileOccupied => {
                let occupied = self.is_occupied();
                if occupied && !self.is_active() {
                    self.activate(now);
                } else if !occupied && self.is_active() {
                    self.deactivate();
                }
            }
        }
    }

    /// Bypass policy
    pub fn force_activate(&mut self, now: f32) {
        self.activate(now);
    }

    /// Bypass policy
    pub fn force_deactivate(&mut self) {
        self.deactivate();
    }

    fn activate(&mut self, now: f32) {
        self.state = ActivationState::Active;
        self.ever_activated = true;
        self.last_activation = Some(now);
        self.debug("ACTIVATED");

        if let Some(command) = self.config.feedback.on_activate(&mut self.feedback) {
            self.effects.push(InteractionEffect::Feedback(command));
        }
        if let Some(clip) = &self.config.activation_sound {
            self.effects.push(InteractionEffect::Audio(clip.clone()));
        }
        self.effects.push(InteractionEffect::Activated);
        if self.config.notify_sequencer {
            self.effects.push(InteractionEffect::NotifySequencer);
        }
        if self.config.disable_after_activation {
            self.effects.push(InteractionEffect::Disable);
        }
    }

    fn deactivate(&mut self) {
        self.state = ActivationState::Idle;
        self.debug("DEACTIVATED");

        if let Some(command) = self.config.feedback.for_state(false) {
            self.effects.push(InteractionEffect::Feedback(command));
        }
        if let Some(clip) = &self.config.deactivation_sound {
            self.effects.push(InteractionEffect::Audio(clip.clone()));
        }
        self.effects.push(InteractionEffect::Deactivated);
    }

    // ========== Lifecycle ==========

    /// Полный сброс в начальное состояние (объект остаётся в мире)
    pub fn reset(&mut self) {
        self.state = ActivationState::Idle;
        self.ever_activated = false;
        self.occupancy = 0;
        self.probe_witness = false;
        self.last_activation = None;
        self.reset_dwell();
        self.feedback.palette_index = 0;

        if let Some(command) = self.config.feedback.revert(&mut self.feedback) {
            self.effects.push(InteractionEffect::Feedback(command));
        }
        if let Some(command) = self.config.feedback.for_state(false) {
            self.effects.push(InteractionEffect::Feedback(command));
        }
        self.debug("reset");
    }

    /// Объект убран из мира: occupancy больше не валидна, visuals откатываются.
    /// WhileOccupied деактивируется сразу (скрытые объекты не тикают).
    pub fn on_disabled(&mut self) {
        self.occupancy = 0;
        self.probe_witness = false;
        self.reset_dwell();

        if self.config.policy == ActivationPolicy::WhileOccupied && self.is_active() {
            self.deactivate();
        }

        if self.config.revert_on_disable {
            if let Some(command) = self.config.feedback.revert(&mut self.feedback) {
                self.effects.push(InteractionEffect::Feedback(command));
            }
        }
    }

    /// Highlight под прицелом детектора
    pub fn set_highlight(&mut self, on: bool) {
        if self.feedback.highlighted == on {
            return;
        }
        self.feedback.highlighted = on;

        if let Some(command) = self.config.feedback.highlight(on, self.is_active()) {
            self.effects.push(InteractionEffect::Feedback(command));
        }
    }

    fn debug(&self, message: &str) {
        if self.config.debug_logs {
            logger::log(&format!("[Interactable] {}: {}", self.label, message));
        }
    }
}

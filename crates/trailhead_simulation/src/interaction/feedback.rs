//! Visual feedback: какие команды отдать FeedbackAdapter на каждом переходе
//!
//! ECS не трогает материалы и меши. Interactable вычисляет `FeedbackCommand`,
//! host применяет его к renderer/transform своего объекта.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::Rgba;

pub const DEFAULT_PRESS_DEPTH: f32 = 0.1;
pub const DEFAULT_PRESS_SPEED: f32 = 5.0;

/// Ближе этого press offset считается доехавшим до цели
const PRESS_SNAP_DISTANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    None,
    #[default]
    ColorChange,
    ColorCycle,
    MaterialSwap,
    PressAnimation,
}

/// Host-side идентификатор материала
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub String);

impl From<&str> for MaterialId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Одна команда для FeedbackAdapter (все идемпотентны)
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackCommand {
    Color(Rgba),
    Material(MaterialId),
    /// Local offset нажимаемой части (pressure pad)
    LocalOffset(Vec3),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub kind: FeedbackKind,

    pub active_color: Rgba,
    pub inactive_color: Rgba,
    /// Цвет до первого feedback (None = host не сообщил, revert пропускается)
    pub original_color: Option<Rgba>,

    /// ColorCycle palette (по порядку)
    pub palette: Vec<Rgba>,
    /// true → после последнего цвета снова первый, false → остаёмся на последнем
    pub loop_palette: bool,

    pub active_material: Option<MaterialId>,
    pub inactive_material: Option<MaterialId>,
    pub original_material: Option<MaterialId>,

    pub use_highlight: bool,
    pub highlight_material: Option<MaterialId>,

    pub press_depth: f32,
    /// Approach rate (1/сек) для exponential smoothing
    pub press_speed: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            kind: FeedbackKind::ColorChange,
            active_color: Rgba::GREEN,
            inactive_color: Rgba::GRAY,
            original_color: None,
            palette: vec![Rgba::YELLOW, Rgba::RED, Rgba::GREEN, Rgba::BLUE],
            loop_palette: true,
            active_material: None,
            inactive_material: None,
            original_material: None,
            use_highlight: false,
            highlight_material: None,
            press_depth: DEFAULT_PRESS_DEPTH,
            press_speed: DEFAULT_PRESS_SPEED,
        }
    }
}

/// Runtime состояние feedback (palette cursor, текущий press offset)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackState {
    pub palette_index: usize,
    pub press_offset: Vec3,
    pub highlighted: bool,
}

impl FeedbackConfig {
    pub fn pressed_offset(&self) -> Vec3 {
        Vec3::NEG_Y * self.press_depth
    }

    /// Команда на переход в Active.
    ///
    /// ColorCycle сдвигает cursor palette (wrap или clamp на последнем).
    pub fn on_activate(&self, state: &mut FeedbackState) -> Option<FeedbackCommand> {
        match self.kind {
            FeedbackKind::ColorChange => Some(FeedbackCommand::Color(self.active_color)),
            FeedbackKind::ColorCycle => {
                let color = *self.palette.get(state.palette_index)?;
                state.palette_index += 1;
                if state.palette_index >= self.palette.len() {
                    state.palette_index = if self.loop_palette {
                        0
                    } else {
                        self.palette.len() - 1
                    };
                }
                Some(FeedbackCommand::Color(color))
            }
            FeedbackKind::MaterialSwap => self.active_material.clone().map(FeedbackCommand::Material),
            // Press offset едет в step_press
            FeedbackKind::PressAnimation | FeedbackKind::None => None,
        }
    }

    /// Команда, отражающая текущее состояние (deactivate, reset)
    pub fn for_state(&self, active: bool) -> Option<FeedbackCommand> {
        match self.kind {
            FeedbackKind::ColorChange => Some(FeedbackCommand::Color(if active {
                self.active_color
            } else {
                self.inactive_color
            })),
            FeedbackKind::MaterialSwap => {
                let material = if active {
                    &self.active_material
                } else {
                    &self.inactive_material
                };
                material.clone().map(FeedbackCommand::Material)
            }
            // ColorCycle остаётся на последнем цвете
            FeedbackKind::ColorCycle | FeedbackKind::PressAnimation | FeedbackKind::None => None,
        }
    }

    /// Откат к исходному виду (reset, disable)
    pub fn revert(&self, state: &mut FeedbackState) -> Option<FeedbackCommand> {
        match self.kind {
            FeedbackKind::ColorChange | FeedbackKind::ColorCycle => {
                self.original_color.map(FeedbackCommand::Color)
            }
            FeedbackKind::MaterialSwap => self.original_material.clone().map(FeedbackCommand::Material),
            FeedbackKind::PressAnimation => {
                state.press_offset = Vec3::ZERO;
                Some(FeedbackCommand::LocalOffset(Vec3::ZERO))
            }
            FeedbackKind::None => None,
        }
    }

    /// Один шаг press animation: `pos += (target - pos) * min(1, rate * dt)`.
    ///
    /// Возвращает команду только если offset изменился.
    pub fn step_press(&self, state: &mut FeedbackState, active: bool, dt: f32) -> Option<FeedbackCommand> {
        if self.kind != FeedbackKind::PressAnimation {
            return None;
        }

        let target = if active { self.pressed_offset() } else { Vec3::ZERO };
        if state.press_offset == target {
            return None;
        }

        let factor = (self.press_speed * dt).clamp(0.0, 1.0);
        let mut next = state.press_offset + (target - state.press_offset) * factor;
        if next.distance(target) < PRESS_SNAP_DISTANCE {
            next = target;
        }
        if next == state.press_offset {
            return None;
        }

        state.press_offset = next;
        Some(FeedbackCommand::LocalOffset(next))
    }

    /// Highlight материал для manual объектов под прицелом.
    ///
    /// При снятии highlight восстанавливается active/inactive материал, иначе original.
    pub fn highlight(&self, on: bool, active: bool) -> Option<FeedbackCommand> {
        if !self.use_highlight {
            return None;
        }
        let highlight = self.highlight_material.as_ref()?;

        let material = if on {
            Some(highlight)
        } else if active && self.active_material.is_some() {
            self.active_material.as_ref()
        } else if !active && self.inactive_material.is_some() {
            self.inactive_material.as_ref()
        } else {
            self.original_material.as_ref()
        };

        material.cloned().map(FeedbackCommand::Material)
    }
}

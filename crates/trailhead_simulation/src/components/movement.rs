//! Movement компоненты: состояние, которое tutorial меняет у locomotion контроллера
//!
//! Сам контроллер (CharacterBody / CharacterController) живёт в host engine.
//! ECS хранит только флаги, которые host читает каждый кадр.

use bevy::prelude::*;

/// Количество прыжков в воздухе (host locomotion читает `max_jumps`)
///
/// # Usage
/// ```ignore
/// commands.spawn((Player, JumpAbility::default(), Locomotion::default()));
/// ```
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct JumpAbility {
    pub max_jumps: u32,
    pub extra_jump_unlocked: bool,
}

impl Default for JumpAbility {
    fn default() -> Self {
        Self {
            max_jumps: 1,
            extra_jump_unlocked: false,
        }
    }
}

impl JumpAbility {
    /// Разблокировать двойной прыжок.
    ///
    /// Идемпотентно: повторный вызов не добавляет прыжков сверх второго.
    /// Возвращает true только при первом unlock.
    pub fn unlock_extra_jump(&mut self) -> bool {
        let newly_unlocked = !self.extra_jump_unlocked;
        self.extra_jump_unlocked = true;
        self.max_jumps = self.max_jumps.max(2);
        newly_unlocked
    }
}

/// Включён ли locomotion контроллер
///
/// Выключается ровно на время teleport (иначе host interpolation тянет тело назад).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub enabled: bool,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self { enabled: true }
    }
}

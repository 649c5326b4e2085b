//! Ошибки симуляции
//!
//! Ни одна из них не фатальна: системы логируют и продолжают тик в последнем валидном
//! состоянии. `Result` нужен чтобы граница (system / host adapter) решала, что логировать.

use thiserror::Error;

use crate::components::ObjectId;

/// Configuration faults секвенсора (логируются как warning, операция = no-op)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SequencerError {
    #[error("phase index {index} out of range (phases: {len})")]
    PhaseOutOfRange { index: usize, len: usize },

    #[error("phase transition to {target} already in progress")]
    TransitionInProgress { target: usize },

    #[error("tutorial has not been started")]
    NotStarted,

    #[error("missing reference: {0}")]
    MissingReference(&'static str),
}

/// Ошибки загрузки tutorial script / settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid script: {0}")]
    Invalid(String),
}

/// Сбой внешнего коллаборатора (feedback/audio/world adapter)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("object {0:?} is unknown to the host")]
    UnknownObject(ObjectId),

    #[error("host adapter failed: {0}")]
    Adapter(String),
}

/// Сбой пользовательского activation hook (ловится на границе вызова)
#[derive(Debug, Error, Clone, PartialEq)]
#[error("activation hook '{hook}' failed: {reason}")]
pub struct HookError {
    pub hook: String,
    pub reason: String,
}

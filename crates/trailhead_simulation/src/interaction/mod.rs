//! Interaction system module
//!
//! ECS ответственность:
//! - Interactable state machine (mode × policy × edge × feedback)
//! - Occupancy counting (overlap events + detector probe)
//! - Activation hooks
//!
//! Host ответственность:
//! - Overlap detection (physics), применение материалов/offset, звук
//!
//! Поток: OccupancyEvent / InteractIntent / PlateProbeEvent → Interactable →
//! InteractionEffect → FeedbackRequested / AudioCue / InteractionNotified / WorldCommand

use bevy::prelude::*;

pub mod events;
pub mod feedback;
pub mod hooks;
pub mod interactable;
pub mod policy;
pub mod systems;


pub use events::*;
pub use feedback::{FeedbackCommand, FeedbackConfig, FeedbackKind, FeedbackState, MaterialId};
pub use hooks::{ActivationHook, ActivationHooks};
pub use interactable::{ClipId, Interactable, InteractableConfig, InteractionEffect};
pub use policy::{ActivationPolicy, ActivationState, InteractionMode, TriggerEdge};
pub use systems::{dispatch_interaction_effects, process_interaction_inputs, tick_interactables};

use crate::SimulationSet;

/// Interaction Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. process_interaction_inputs — SimulationSet::Interaction
/// 2. tick_interactables — SimulationSet::Interaction
/// 3. dispatch_interaction_effects — SimulationSet::InteractionEffects
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivationHooks>();

        // Регистрация событий
        app.add_event::<OccupancyEvent>()
            .add_event::<InteractIntent>()
            .add_event::<PlateProbeEvent>()
            .add_event::<HighlightChanged>()
            .add_event::<ResetInteractable>()
            .add_event::<ForceActivation>()
            .add_event::<FeedbackRequested>()
            .add_event::<AudioCue>()
            .add_event::<InteractableActivated>()
            .add_event::<InteractableDeactivated>()
            .add_event::<InteractableStay>()
            .add_event::<InteractionNotified>();

        app.add_systems(
            FixedUpdate,
            (
                (process_interaction_inputs, tick_interactables)
                    .chain()
                    .in_set(SimulationSet::Interaction),
                dispatch_interaction_effects.in_set(SimulationSet::InteractionEffects),
            ),
        );
    }
}

//! Tutorial module: последовательность фаз поверх interaction
//!
//! - phase: TutorialPhase, CompletionKind, PlayerPlacement
//! - sequencer: TutorialSequencer (Resource, чистое ядро + очередь эффектов)
//! - zone: TutorialZone (ReachZone через overlap)
//! - systems: команды, notifications, tick, dispatch
//!
//! # Usage
//! ```ignore
//! let phases = vec![
//!     TutorialPhase::new("Press the button", CompletionKind::Interaction { target: ObjectId(10) }),
//!     TutorialPhase::new("Wait", CompletionKind::Timer { duration: 5.0 }),
//! ];
//! app.insert_resource(TutorialSequencer::new(phases, SequencerConfig::default()));
//! ```

use bevy::prelude::*;

pub mod events;
pub mod phase;
pub mod sequencer;
pub mod systems;
pub mod zone;

#[cfg(test)]
mod sequencer_tests;

pub use events::*;
pub use phase::{CompletionKind, PhaseProgress, PlayerPlacement, TutorialPhase};
pub use sequencer::{SequencerConfig, SequencerEffect, SequencerState, TutorialSequencer, DEFAULT_TRANSITION_DELAY};
pub use systems::{
    collect_tutorial_notifications, dispatch_sequencer_effects, handle_tutorial_commands, handle_zone_occupancy,
    tick_tutorial,
};
pub use zone::TutorialZone;

use crate::SimulationSet;

/// Tutorial Plugin
///
/// Все системы в SimulationSet::Tutorial: после InteractionEffects (notifications
/// этого тика уже записаны), до World (WorldCommand применяются в том же тике).
pub struct TutorialPlugin;

impl Plugin for TutorialPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TutorialCommand>()
            .add_event::<ZoneEntered>()
            .add_event::<ResetTutorialZone>()
            .add_event::<PhaseStarted>()
            .add_event::<PhaseCompleted>()
            .add_event::<TutorialFinished>();

        app.add_systems(
            FixedUpdate,
            (
                handle_zone_occupancy,
                handle_tutorial_commands,
                collect_tutorial_notifications,
                tick_tutorial,
                dispatch_sequencer_effects,
            )
                .chain()
                .in_set(SimulationSet::Tutorial),
        );
    }
}

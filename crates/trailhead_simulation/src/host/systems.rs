//! Forward системы (SimulationSet::Host): события тика → HostAdapters

use bevy::prelude::*;

use super::adapters::HostAdapters;
use crate::error::HostError;
use crate::interaction::{AudioCue, FeedbackCommand, FeedbackRequested};
use crate::logger;
use crate::tutorial::{PhaseStarted, TutorialFinished};
use crate::world::WorldCommand;

fn report(result: Result<(), HostError>, context: &str) {
    if let Err(err) = result {
        logger::log_error(&format!("Host {}: {}", context, err));
    }
}

/// Система: feedback + audio
pub fn forward_interaction_output(
    mut adapters: ResMut<HostAdapters>,
    mut feedback: EventReader<FeedbackRequested>,
    mut audio: EventReader<AudioCue>,
) {
    match adapters.feedback.as_mut() {
        Some(adapter) => {
            for event in feedback.read() {
                let result = match &event.command {
                    FeedbackCommand::Color(color) => adapter.apply_color(event.object, *color),
                    FeedbackCommand::Material(material) => adapter.apply_material(event.object, material),
                    FeedbackCommand::LocalOffset(offset) => adapter.set_local_offset(event.object, *offset),
                };
                report(result, "feedback");
            }
        }
        None => feedback.clear(),
    }

    match adapters.audio.as_mut() {
        Some(adapter) => {
            for event in audio.read() {
                report(adapter.play_one_shot(event.object, &event.clip), "audio");
            }
        }
        None => audio.clear(),
    }
}

/// Система: WorldCommand → WorldAdapter
pub fn forward_world_commands(mut adapters: ResMut<HostAdapters>, mut world_commands: EventReader<WorldCommand>) {
    let Some(adapter) = adapters.world.as_mut() else {
        world_commands.clear();
        return;
    };

    for command in world_commands.read() {
        let result = match command {
            WorldCommand::SetActive { object, active } => adapter.set_active(*object, *active),
            WorldCommand::Teleport {
                object,
                position,
                rotation,
            } => adapter.teleport(*object, *position, *rotation),
            WorldCommand::ConfigureCamera { camera, config } => adapter.configure_camera(*camera, config),
            WorldCommand::UnlockExtraJump { object } => adapter.unlock_extra_jump(*object),
        };
        report(result, "world");
    }
}

/// Система: PhaseStarted / TutorialFinished → UiAdapter
pub fn forward_tutorial_ui(
    mut adapters: ResMut<HostAdapters>,
    mut started: EventReader<PhaseStarted>,
    mut finished: EventReader<TutorialFinished>,
) {
    let Some(adapter) = adapters.ui.as_mut() else {
        started.clear();
        finished.clear();
        return;
    };

    for event in started.read() {
        report(adapter.show_phase(event.index, &event.name, &event.description), "ui");
    }
    for _ in finished.read() {
        report(adapter.tutorial_finished(), "ui");
    }
}

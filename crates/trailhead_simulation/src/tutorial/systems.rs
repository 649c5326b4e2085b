//! Tutorial systems (SimulationSet::Tutorial, chain)
//!
//! 1. handle_zone_occupancy — overlap игрока с TutorialZone → ZoneEntered
//! 2. handle_tutorial_commands — TutorialCommand → операции секвенсора
//! 3. collect_tutorial_notifications — InteractionNotified / ZoneEntered
//! 4. tick_tutorial — переход, таймер, containment
//! 5. dispatch_sequencer_effects — эффекты → WorldCommand и UI события
//!
//! `TutorialSequencer` — опциональный resource: без скрипта системы no-op.

use bevy::prelude::*;

use super::events::*;
use super::sequencer::{SequencerEffect, TutorialSequencer};
use super::zone::TutorialZone;
use crate::components::{ObjectId, Player, Presence};
use crate::detection::VolumeIndex;
use crate::error::SequencerError;
use crate::interaction::{InteractionNotified, OccupancyEvent, OccupancyTransition};
use crate::logger;
use crate::world::{ObjectRegistry, WorldCommand};

/// Система: вход игрока в зону, reset зон
pub fn handle_zone_occupancy(
    mut occupancy: EventReader<OccupancyEvent>,
    mut resets: EventReader<ResetTutorialZone>,
    registry: Res<ObjectRegistry>,
    mut zones: Query<(&ObjectId, &mut TutorialZone, &Presence)>,
    players: Query<(), With<Player>>,
    mut entered: EventWriter<ZoneEntered>,
    mut world_commands: EventWriter<WorldCommand>,
) {
    for event in resets.read() {
        let Some((_, mut zone, _)) = registry.get(event.zone).and_then(|entity| zones.get_mut(entity).ok()) else {
            logger::log_warning(&format!("ResetTutorialZone: {:?} is not a zone", event.zone));
            continue;
        };
        zone.reset();
        world_commands.write(WorldCommand::SetActive {
            object: event.zone,
            active: true,
        });
    }

    for event in occupancy.read() {
        if event.transition != OccupancyTransition::Enter {
            continue;
        }
        let Ok((&object, mut zone, presence)) = zones.get_mut(event.target) else {
            continue;
        };
        if !presence.active || !players.contains(event.activator) {
            continue;
        }
        if !zone.try_reach() {
            continue;
        }

        logger::log(&format!("[Tutorial] zone {:?} reached", object));
        entered.write(ZoneEntered { zone: object });

        if zone.disable_after_reached {
            world_commands.write(WorldCommand::SetActive { object, active: false });
        }
    }
}

/// Система: административные команды
///
/// Отклонённая команда (неверный индекс, переход в процессе) → warning, состояние не меняется.
pub fn handle_tutorial_commands(
    mut commands: EventReader<TutorialCommand>,
    sequencer: Option<ResMut<TutorialSequencer>>,
    mut zones: Query<&mut TutorialZone>,
) {
    let Some(mut sequencer) = sequencer else {
        for command in commands.read() {
            logger::log_warning(&format!("[Tutorial] {:?} ignored: no sequencer", command));
        }
        return;
    };

    for command in commands.read() {
        let result = match *command {
            TutorialCommand::ManualComplete | TutorialCommand::CompleteCurrent if !sequencer.is_started() => {
                Err(SequencerError::NotStarted)
            }
            TutorialCommand::Start => sequencer.start(),
            TutorialCommand::StartPhase(index) => sequencer.start_phase(index),
            TutorialCommand::JumpToPhase(index) => sequencer.jump_to_phase(index),
            TutorialCommand::Restart => sequencer.restart().map(|()| {
                for mut zone in zones.iter_mut() {
                    zone.reset();
                }
            }),
            TutorialCommand::ManualComplete => {
                if !sequencer.manual_complete_phase() {
                    logger::log(&format!("[Tutorial] manual complete ignored in {:?}", sequencer.state()));
                }
                Ok(())
            }
            TutorialCommand::CompleteCurrent => {
                if !sequencer.complete_current_phase() {
                    logger::log(&format!("[Tutorial] complete ignored in {:?}", sequencer.state()));
                }
                Ok(())
            }
        };

        if let Err(err) = result {
            logger::log_warning(&format!("[Tutorial] {:?} rejected: {}", command, err));
        }
    }
}

/// Система: notifications от interaction и зон
pub fn collect_tutorial_notifications(
    mut notified: EventReader<InteractionNotified>,
    mut entered: EventReader<ZoneEntered>,
    sequencer: Option<ResMut<TutorialSequencer>>,
) {
    let Some(mut sequencer) = sequencer else {
        notified.clear();
        entered.clear();
        return;
    };

    for event in notified.read() {
        if sequencer.notify_interaction(event.object) {
            logger::log(&format!("[Tutorial] interaction with {:?} counted", event.object));
        }
    }
    for event in entered.read() {
        sequencer.notify_zone_entered(event.zone);
    }
}

/// Система: auto start + tick секвенсора
///
/// Позиция игрока берётся из Transform (через ObjectRegistry), bounds зон из VolumeIndex
/// (скрытая зона в индекс не попадает).
pub fn tick_tutorial(
    time: Res<Time<Fixed>>,
    sequencer: Option<ResMut<TutorialSequencer>>,
    registry: Res<ObjectRegistry>,
    index: Res<VolumeIndex>,
    transforms: Query<&Transform>,
) {
    let Some(mut sequencer) = sequencer else {
        return;
    };

    if sequencer.take_auto_start() {
        if let Err(err) = sequencer.start() {
            logger::log_warning(&format!("[Tutorial] auto start failed: {}", err));
        }
    }

    let player_position = sequencer
        .config()
        .player
        .and_then(|player| registry.get(player))
        .and_then(|entity| transforms.get(entity).ok())
        .map(|transform| transform.translation);

    sequencer.tick(time.delta_secs(), player_position, |zone| index.bounds_of(zone));
}

/// Система: эффекты секвенсора → события
pub fn dispatch_sequencer_effects(
    sequencer: Option<ResMut<TutorialSequencer>>,
    mut world_commands: EventWriter<WorldCommand>,
    mut started: EventWriter<PhaseStarted>,
    mut completed: EventWriter<PhaseCompleted>,
    mut finished: EventWriter<TutorialFinished>,
) {
    let Some(mut sequencer) = sequencer else {
        return;
    };
    if !sequencer.has_pending_effects() {
        return;
    }

    let effects: Vec<SequencerEffect> = sequencer.drain_effects().collect();
    for effect in effects {
        match effect {
            SequencerEffect::World(command) => {
                world_commands.write(command);
            }
            SequencerEffect::PhaseStarted(event) => {
                started.write(event);
            }
            SequencerEffect::PhaseCompleted(event) => {
                completed.write(event);
            }
            SequencerEffect::Finished => {
                finished.write(TutorialFinished);
            }
        }
    }
}

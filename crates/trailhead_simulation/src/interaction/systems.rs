//! Interaction systems
//!
//! Порядок внутри тика:
//! 1. process_interaction_inputs — очереди событий → методы Interactable
//! 2. tick_interactables — dwell / WhileOccupied / stay / press animation
//! 3. dispatch_interaction_effects — эффекты → события, hooks

use bevy::prelude::*;

use super::events::*;
use super::hooks::ActivationHooks;
use super::interactable::{Interactable, InteractionEffect};
use crate::components::{ObjectId, Presence};
use crate::logger;
use crate::world::{ObjectRegistry, WorldCommand};

/// Система: применить входящие события к Interactable.
///
/// Неактивные объекты (Presence.active = false) события игнорируют.
/// Порядок: reset → force → overlap → probe → key → highlight.
#[allow(clippy::too_many_arguments)]
pub fn process_interaction_inputs(
    time: Res<Time<Fixed>>,
    registry: Res<ObjectRegistry>,
    mut resets: EventReader<ResetInteractable>,
    mut forces: EventReader<ForceActivation>,
    mut occupancy: EventReader<OccupancyEvent>,
    mut probes: EventReader<PlateProbeEvent>,
    mut intents: EventReader<InteractIntent>,
    mut highlights: EventReader<HighlightChanged>,
    mut interactables: Query<(&mut Interactable, &Presence)>,
) {
    let now = time.elapsed_secs();

    // Reset работает и для неактивных объектов (restart сцены)
    for event in resets.read() {
        let Some(entity) = registry.get(event.target) else {
            logger::log_warning(&format!("ResetInteractable: unknown object {:?}", event.target));
            continue;
        };
        if let Ok((mut interactable, _)) = interactables.get_mut(entity) {
            interactable.reset();
        }
    }

    for event in forces.read() {
        let Some((mut interactable, _)) = registry
            .get(event.target)
            .and_then(|entity| interactables.get_mut(entity).ok())
            .filter(|(_, presence)| presence.active)
        else {
            continue;
        };

        if event.active {
            interactable.force_activate(now);
        } else {
            interactable.force_deactivate();
        }
    }

    for event in occupancy.read() {
        // Target может быть не Interactable (например TutorialZone)
        let Ok((mut interactable, presence)) = interactables.get_mut(event.target) else {
            continue;
        };
        if !presence.active {
            continue;
        }

        match event.transition {
            OccupancyTransition::Enter => interactable.on_occupancy_enter(event.from_above, now),
            OccupancyTransition::Exit => interactable.on_occupancy_exit(now),
        }
    }

    for event in probes.read() {
        let Some((mut interactable, _)) = registry
            .get(event.plate)
            .and_then(|entity| interactables.get_mut(entity).ok())
            .filter(|(_, presence)| presence.active)
        else {
            continue;
        };

        match event.contact {
            ProbeContact::Pressed => interactable.probe_press(now),
            ProbeContact::Released => interactable.probe_release(now),
        }
    }

    for event in intents.read() {
        let Some((mut interactable, _)) = registry
            .get(event.target)
            .and_then(|entity| interactables.get_mut(entity).ok())
            .filter(|(_, presence)| presence.active)
        else {
            logger::log_warning(&format!(
                "InteractIntent: {:?} is not an active interactable",
                event.target
            ));
            continue;
        };

        interactable.interact(now);
    }

    for event in highlights.read() {
        if let Some((mut interactable, _)) = registry
            .get(event.target)
            .and_then(|entity| interactables.get_mut(entity).ok())
        {
            interactable.set_highlight(event.highlighted);
        }
    }
}

/// Система: per-tick update активных Interactable
pub fn tick_interactables(time: Res<Time<Fixed>>, mut interactables: Query<(&mut Interactable, &Presence)>) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    for (mut interactable, presence) in interactables.iter_mut() {
        if presence.active {
            interactable.tick(dt, now);
        }
    }
}

/// Система: превратить накопленные эффекты в события (SimulationSet::InteractionEffects)
///
/// Activated/Deactivated также уходят в ActivationHooks; упавший hook логируется.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_interaction_effects(
    mut interactables: Query<(Entity, Option<&ObjectId>, &mut Interactable)>,
    mut hooks: ResMut<ActivationHooks>,
    mut feedback: EventWriter<FeedbackRequested>,
    mut audio: EventWriter<AudioCue>,
    mut activated: EventWriter<InteractableActivated>,
    mut deactivated: EventWriter<InteractableDeactivated>,
    mut stays: EventWriter<InteractableStay>,
    mut notified: EventWriter<InteractionNotified>,
    mut world_commands: EventWriter<WorldCommand>,
) {
    for (entity, object, mut interactable) in interactables.iter_mut() {
        if !interactable.has_pending_effects() {
            continue;
        }

        let Some(object) = object.copied() else {
            // Без ObjectId эффекты некому адресовать
            logger::log_warning(&format!(
                "Interactable '{}' ({:?}) has no ObjectId, effects dropped",
                interactable.label, entity
            ));
            interactable.clear_effects();
            continue;
        };

        let effects: Vec<InteractionEffect> = interactable.drain_effects().collect();
        for effect in effects {
            match effect {
                InteractionEffect::Feedback(command) => {
                    feedback.write(FeedbackRequested { object, command });
                }
                InteractionEffect::Audio(clip) => {
                    audio.write(AudioCue { object, clip });
                }
                InteractionEffect::Activated => {
                    activated.write(InteractableActivated { entity, object });
                    hooks.dispatch(object, true);
                }
                InteractionEffect::Deactivated => {
                    deactivated.write(InteractableDeactivated { entity, object });
                    hooks.dispatch(object, false);
                }
                InteractionEffect::NotifySequencer => {
                    notified.write(InteractionNotified { object });
                }
                InteractionEffect::Disable => {
                    world_commands.write(WorldCommand::SetActive { object, active: false });
                }
                InteractionEffect::Stay => {
                    stays.write(InteractableStay { entity, object });
                }
            }
        }
    }
}

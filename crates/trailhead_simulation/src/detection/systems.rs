//! Detection systems (SimulationSet::Detection)
//!
//! Порядок: scan_for_interactables → dispatch_detector_input → probe_pressure_plates

use bevy::prelude::*;

use super::detector::{ActionInput, KeyDispatch, ProximityDetector};
use super::spatial::VolumeIndex;
use crate::components::{ObjectId, Presence};
use crate::interaction::{HighlightChanged, InteractIntent, PlateProbeEvent};
use crate::logger;

/// Система: forward scan всех детекторов
///
/// Лог и HighlightChanged только при смене цели (без спама каждый тик).
pub fn scan_for_interactables(
    index: Res<VolumeIndex>,
    mut detectors: Query<(&mut ProximityDetector, &Transform, Option<&ObjectId>, Option<&Presence>)>,
    mut highlights: EventWriter<HighlightChanged>,
) {
    for (mut detector, transform, self_id, presence) in detectors.iter_mut() {
        if presence.is_some_and(|presence| !presence.active) {
            continue;
        }

        let Some((previous, current)) =
            detector.scan(transform, &*index, self_id.copied(), |object| index.is_interactive(object))
        else {
            continue;
        };

        match current {
            Some(object) => logger::log(&format!("Detector: interactable detected {:?}", object)),
            None => logger::log("Detector: no interactable"),
        }

        if let Some(object) = previous {
            highlights.write(HighlightChanged {
                target: object,
                highlighted: false,
            });
        }
        if let Some(object) = current {
            highlights.write(HighlightChanged {
                target: object,
                highlighted: true,
            });
        }
    }
}

/// Система: rising edge клавиши → InteractIntent
pub fn dispatch_detector_input(
    index: Res<VolumeIndex>,
    mut detectors: Query<(Entity, &ProximityDetector, &mut ActionInput, Option<&Presence>)>,
    mut intents: EventWriter<InteractIntent>,
) {
    for (entity, detector, mut input, presence) in detectors.iter_mut() {
        // Edge потребляется даже у неактивного агента (нет "отложенного" нажатия)
        let pressed = input.take_rising_edge();
        if !pressed || presence.is_some_and(|presence| !presence.active) {
            continue;
        }

        match detector.dispatch_key(|object| index.mode_of(object)) {
            KeyDispatch::NoTarget => {}
            KeyDispatch::Interact(target) => {
                logger::log(&format!("Detector: interact with {:?}", target));
                intents.write(InteractIntent {
                    target,
                    interactor: entity,
                });
            }
            KeyDispatch::SuppressedPlate(target) => {
                logger::log(&format!("Detector: {:?} is a pressure plate, key ignored", target));
            }
            KeyDispatch::NotInteractable(target) => {
                logger::log_warning(&format!("Detector: {:?} is tagged interactive but has no Interactable", target));
            }
        }
    }
}

/// Система: downward probe для solid pressure plates
pub fn probe_pressure_plates(
    index: Res<VolumeIndex>,
    mut detectors: Query<(Entity, &mut ProximityDetector, &Transform, Option<&ObjectId>, Option<&Presence>)>,
    mut probes: EventWriter<PlateProbeEvent>,
) {
    for (entity, mut detector, transform, self_id, presence) in detectors.iter_mut() {
        if presence.is_some_and(|presence| !presence.active) {
            continue;
        }

        let transitions =
            detector.probe(transform, &*index, self_id.copied(), |object| index.is_probe_plate(object));

        for (plate, contact) in transitions {
            probes.write(PlateProbeEvent {
                plate,
                activator: entity,
                contact,
            });
        }
    }
}

//! ProximityDetector: ray scanner агента
//!
//! Каждый тик:
//! - forward ray → ближайший interactive hit (не своё тело) = `current_detected`
//! - rising edge клавиши → InteractIntent (pressure plates клавишей не жмутся)
//! - downward probe → solid pressure plate под ногами (Pressed/Released)

use bevy::prelude::*;

use super::spatial::{RayHit, SpatialQuery};
use crate::components::ObjectId;
use crate::interaction::{InteractionMode, ProbeContact};

pub const DEFAULT_INTERACT_DISTANCE: f32 = 3.0;
pub const DEFAULT_PROBE_RANGE: f32 = 1.0;
/// Probe стартует выше pivot (pivot у ног)
pub const DEFAULT_PROBE_HEIGHT: f32 = 0.5;

/// Activation input одного действия (host пишет `pressed` каждый кадр)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionInput {
    pub pressed: bool,
    was_pressed: bool,
}

impl ActionInput {
    pub fn set(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Rising edge с прошлого вызова (потребляет edge)
    pub fn take_rising_edge(&mut self) -> bool {
        let edge = self.pressed && !self.was_pressed;
        self.was_pressed = self.pressed;
        edge
    }
}

/// Решение по нажатию клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDispatch {
    NoTarget,
    Interact(ObjectId),
    /// PressurePlate: клавиша не форвардится
    SuppressedPlate(ObjectId),
    /// Interactive тег есть, Interactable нет
    NotInteractable(ObjectId),
}

/// Proximity detector component
///
/// # Usage
/// ```ignore
/// commands.spawn((
///     ObjectId(1),
///     Player,
///     Transform::default(),
///     ProximityDetector::default(),
/// ));
/// // host каждый кадр:
/// input.set(keyboard.pressed(KeyCode::KeyE));
/// ```
#[derive(Component, Debug, Clone, PartialEq)]
#[require(ActionInput)]
pub struct ProximityDetector {
    pub interact_distance: f32,
    /// Смещение origin в local space агента
    pub origin_offset: Vec3,
    /// Доворот направления (Euler, градусы), применяется поверх forward
    pub direction_euler_offset: Vec3,

    pub probe_enabled: bool,
    pub probe_height: f32,
    pub probe_range: f32,

    current_detected: Option<ObjectId>,
    probed_plate: Option<ObjectId>,
}

impl Default for ProximityDetector {
    fn default() -> Self {
        Self {
            interact_distance: DEFAULT_INTERACT_DISTANCE,
            origin_offset: Vec3::ZERO,
            direction_euler_offset: Vec3::ZERO,
            probe_enabled: true,
            probe_height: DEFAULT_PROBE_HEIGHT,
            probe_range: DEFAULT_PROBE_RANGE,
            current_detected: None,
            probed_plate: None,
        }
    }
}

impl ProximityDetector {
    pub fn new(interact_distance: f32) -> Self {
        Self {
            interact_distance,
            ..Default::default()
        }
    }

    pub fn current_detected(&self) -> Option<ObjectId> {
        self.current_detected
    }

    pub fn probed_plate(&self) -> Option<ObjectId> {
        self.probed_plate
    }

    /// Origin и нормализованное направление forward ray
    pub fn ray(&self, transform: &Transform) -> (Vec3, Vec3) {
        let origin = transform.translation + transform.rotation * self.origin_offset;
        let offset = Quat::from_euler(
            EulerRot::YXZ,
            self.direction_euler_offset.y.to_radians(),
            self.direction_euler_offset.x.to_radians(),
            self.direction_euler_offset.z.to_radians(),
        );
        let direction = (offset * (transform.rotation * Vec3::NEG_Z)).normalize_or(Vec3::NEG_Z);
        (origin, direction)
    }

    /// Forward scan. Возвращает `Some((previous, current))` если цель сменилась.
    pub fn scan(
        &mut self,
        transform: &Transform,
        spatial: &impl SpatialQuery,
        self_id: Option<ObjectId>,
        is_interactive: impl Fn(ObjectId) -> bool,
    ) -> Option<(Option<ObjectId>, Option<ObjectId>)> {
        let (origin, direction) = self.ray(transform);
        let hits = spatial.cast_ray(origin, direction, self.interact_distance);
        let detected = select_target(&hits, self_id, is_interactive);

        if detected == self.current_detected {
            return None;
        }

        let previous = self.current_detected;
        self.current_detected = detected;
        Some((previous, detected))
    }

    /// Что делать с нажатием клавиши для текущей цели
    pub fn dispatch_key(&self, mode_of: impl Fn(ObjectId) -> Option<InteractionMode>) -> KeyDispatch {
        let Some(target) = self.current_detected else {
            return KeyDispatch::NoTarget;
        };

        match mode_of(target) {
            Some(InteractionMode::PressurePlate) => KeyDispatch::SuppressedPlate(target),
            Some(_) => KeyDispatch::Interact(target),
            None => KeyDispatch::NotInteractable(target),
        }
    }

    /// Downward probe. Возвращает переходы Released/Pressed (в таком порядке).
    pub fn probe(
        &mut self,
        transform: &Transform,
        spatial: &impl SpatialQuery,
        self_id: Option<ObjectId>,
        is_probe_plate: impl Fn(ObjectId) -> bool,
    ) -> Vec<(ObjectId, ProbeContact)> {
        let found = if self.probe_enabled {
            let origin = transform.translation + Vec3::Y * self.probe_height;
            spatial
                .cast_ray(origin, Vec3::NEG_Y, self.probe_range)
                .into_iter()
                // Первое, во что упирается probe (кроме своего тела), должно быть плитой
                .find(|hit| Some(hit.object) != self_id)
                .map(|hit| hit.object)
                .filter(|object| is_probe_plate(*object))
        } else {
            None
        };

        let transitions = probe_transitions(self.probed_plate, found);
        self.probed_plate = found;
        transitions
    }
}

/// Первый interactive hit, не являющийся собственным телом агента.
///
/// Не-interactive hits пропускаются (поиск продолжается за ними).
pub fn select_target(
    hits: &[RayHit],
    self_id: Option<ObjectId>,
    is_interactive: impl Fn(ObjectId) -> bool,
) -> Option<ObjectId> {
    hits.iter()
        .map(|hit| hit.object)
        .filter(|object| Some(*object) != self_id)
        .find(|object| is_interactive(*object))
}

pub fn probe_transitions(previous: Option<ObjectId>, found: Option<ObjectId>) -> Vec<(ObjectId, ProbeContact)> {
    if previous == found {
        return Vec::new();
    }

    let mut transitions = Vec::with_capacity(2);
    if let Some(plate) = previous {
        transitions.push((plate, ProbeContact::Released));
    }
    if let Some(plate) = found {
        transitions.push((plate, ProbeContact::Pressed));
    }
    transitions
}

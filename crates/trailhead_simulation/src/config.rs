//! Data-driven tutorial scripts (JSON)
//!
//! `TutorialScript` описывает сцену целиком: настройки тика, игрока, камеру,
//! interactable объекты, зоны, фазы и (для headless runner) autopilot действия.
//! `spawn_into` спавнит объекты и вставляет `TutorialSequencer`.
//!
//! Векторы в JSON — массивы `[x, y, z]`.
//!
//! # Usage
//! ```ignore
//! let script = TutorialScript::load("scripts/tutorial.json")?;
//! let mut app = create_headless_app(&script.settings);
//! let scene = script.spawn_into(app.world_mut());
//! ```

use std::collections::HashSet;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{InteractionVolume, JumpAbility, Locomotion, ObjectId, Player, Presence};
use crate::detection::{ActionInput, ProximityDetector, DEFAULT_INTERACT_DISTANCE, DEFAULT_PROBE_RANGE};
use crate::error::ConfigError;
use crate::interaction::{ActivationPolicy, Interactable, InteractableConfig};
use crate::shared::{Bounds, CameraConfig, TutorialCamera};
use crate::tutorial::{
    CompletionKind, SequencerConfig, TutorialCommand, TutorialPhase, TutorialSequencer, TutorialZone,
    DEFAULT_TRANSITION_DELAY,
};

pub const DEFAULT_TICK_HZ: f64 = 60.0;

/// Глобальные параметры прогона
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_hz: f64,
    pub transition_delay: f32,
    pub interact_distance: f32,
    pub probe_range: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            transition_delay: DEFAULT_TRANSITION_DELAY,
            interact_distance: DEFAULT_INTERACT_DISTANCE,
            probe_range: DEFAULT_PROBE_RANGE,
        }
    }
}

impl SimulationSettings {
    pub fn tick_seconds(&self) -> f32 {
        (1.0 / self.tick_hz) as f32
    }
}

fn vec3(value: [f32; 3]) -> Vec3 {
    Vec3::from_array(value)
}

/// Конечное и >= 0 (NaN не проходит)
fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn default_half_extents() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

fn default_true() -> bool {
    true
}

fn default_eye_height() -> f32 {
    1.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub id: ObjectId,
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler, градусы
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
    /// Origin forward ray над pivot (pivot у ног)
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    pub id: ObjectId,
    #[serde(default)]
    pub fixed_height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub id: ObjectId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_half_extents")]
    pub half_extents: [f32; 3],
    #[serde(default = "default_true")]
    pub active: bool,
    /// None → статичный volume (стена, препятствие для ray)
    #[serde(default)]
    pub interactable: Option<InteractableConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: ObjectId,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_half_extents")]
    pub half_extents: [f32; 3],
    #[serde(default)]
    pub can_trigger_multiple_times: bool,
    #[serde(default = "default_true")]
    pub disable_after_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPhaseSpec {
    pub fixed_height: Option<f32>,
    pub region: Option<RegionSpec>,
    pub limit_tag: Option<String>,
}

impl From<&CameraPhaseSpec> for CameraConfig {
    fn from(spec: &CameraPhaseSpec) -> Self {
        CameraConfig {
            fixed_height: spec.fixed_height,
            region: spec
                .region
                .as_ref()
                .map(|region| Bounds::from_min_max(vec3(region.min), vec3(region.max))),
            limit_tag: spec.limit_tag.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub completion: CompletionKind,
    #[serde(default)]
    pub spawn: Vec<ObjectId>,
    #[serde(default)]
    pub hide: Vec<ObjectId>,
    #[serde(default)]
    pub placement: Option<PlacementSpec>,
    #[serde(default)]
    pub camera: Option<CameraPhaseSpec>,
    #[serde(default)]
    pub unlocks_double_jump: bool,
}

impl From<&PhaseSpec> for TutorialPhase {
    fn from(spec: &PhaseSpec) -> Self {
        let mut phase = TutorialPhase::new(spec.name.clone(), spec.completion.clone())
            .with_description(spec.description.clone())
            .with_spawn(spec.spawn.iter().copied())
            .with_hide(spec.hide.iter().copied());

        if let Some(placement) = &spec.placement {
            phase = phase.with_placement(vec3(placement.position), vec3(placement.rotation_degrees));
        }
        if let Some(camera) = &spec.camera {
            phase = phase.with_camera(camera.into());
        }
        if spec.unlocks_double_jump {
            phase = phase.unlocking_double_jump();
        }
        phase
    }
}

/// Autopilot: действие над игроком в заданный тик (headless runner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutopilotAction {
    MovePlayer { position: [f32; 3] },
    /// Yaw/pitch игрока (градусы)
    Look {
        yaw_degrees: f32,
        #[serde(default)]
        pitch_degrees: f32,
    },
    /// Нажать клавишу взаимодействия (отпускается следующим `release_interact`)
    PressInteract,
    ReleaseInteract,
    Command { command: TutorialCommand },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotStep {
    pub tick: u32,
    pub action: AutopilotAction,
}

impl AutopilotAction {
    /// Применить действие к миру (до шага симуляции)
    pub fn apply(&self, world: &mut World, player: Entity) {
        match self {
            AutopilotAction::MovePlayer { position } => {
                if let Some(mut transform) = world.get_mut::<Transform>(player) {
                    transform.translation = vec3(*position);
                }
            }
            AutopilotAction::Look {
                yaw_degrees,
                pitch_degrees,
            } => {
                if let Some(mut transform) = world.get_mut::<Transform>(player) {
                    transform.rotation = Quat::from_euler(
                        EulerRot::YXZ,
                        yaw_degrees.to_radians(),
                        pitch_degrees.to_radians(),
                        0.0,
                    );
                }
            }
            AutopilotAction::PressInteract | AutopilotAction::ReleaseInteract => {
                let pressed = matches!(self, AutopilotAction::PressInteract);
                if let Some(mut input) = world.get_mut::<ActionInput>(player) {
                    input.set(pressed);
                }
            }
            AutopilotAction::Command { command } => {
                world.send_event(*command);
            }
        }
    }
}

/// Весь tutorial сценарий
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialScript {
    #[serde(default)]
    pub settings: SimulationSettings,
    pub player: PlayerSpec,
    #[serde(default)]
    pub camera: Option<CameraSpec>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
    pub phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub autopilot: Vec<AutopilotStep>,
}

/// Entities, созданные `spawn_into`
#[derive(Debug, Clone)]
pub struct SpawnedScene {
    pub player: Entity,
    pub camera: Option<Entity>,
    pub objects: Vec<(ObjectId, Entity)>,
}

impl SpawnedScene {
    pub fn entity(&self, id: ObjectId) -> Option<Entity> {
        self.objects.iter().find(|(object, _)| *object == id).map(|(_, entity)| *entity)
    }
}

impl TutorialScript {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let script: TutorialScript = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Проверка ссылок и диапазонов (до спавна)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if self.settings.tick_hz.is_nan() || self.settings.tick_hz <= 0.0 {
            return invalid(format!("tick_hz must be positive, got {}", self.settings.tick_hz));
        }
        if !is_non_negative(self.settings.transition_delay) {
            return invalid("transition_delay must be a non-negative number".to_string());
        }
        if self.phases.is_empty() {
            return invalid("script has no phases".to_string());
        }
        if self.start_index >= self.phases.len() {
            return invalid(format!(
                "start_index {} out of range ({} phases)",
                self.start_index,
                self.phases.len()
            ));
        }

        let mut ids = HashSet::new();
        let all_ids = std::iter::once(self.player.id)
            .chain(self.camera.iter().map(|camera| camera.id))
            .chain(self.objects.iter().map(|object| object.id))
            .chain(self.zones.iter().map(|zone| zone.id));
        for id in all_ids {
            if !ids.insert(id) {
                return invalid(format!("duplicate object id {:?}", id));
            }
        }

        for object in &self.objects {
            let Some(config) = &object.interactable else {
                continue;
            };
            if !is_non_negative(config.required_dwell_time) {
                return invalid(format!("object {:?} has invalid dwell time", object.id));
            }
            if let ActivationPolicy::EveryTime { cooldown } = config.policy {
                if !is_non_negative(cooldown) {
                    return invalid(format!("object {:?} has invalid cooldown {}", object.id, cooldown));
                }
            }
        }

        let objects: HashSet<ObjectId> = self.objects.iter().map(|object| object.id).collect();
        let zones: HashSet<ObjectId> = self.zones.iter().map(|zone| zone.id).collect();

        for (index, phase) in self.phases.iter().enumerate() {
            match phase.completion {
                CompletionKind::Interaction { target } if !objects.contains(&target) => {
                    return invalid(format!("phase {} targets unknown object {:?}", index, target));
                }
                CompletionKind::ReachZone { zone } if !zones.contains(&zone) => {
                    return invalid(format!("phase {} targets unknown zone {:?}", index, zone));
                }
                CompletionKind::Timer { duration } if !is_non_negative(duration) => {
                    return invalid(format!("phase {} has invalid timer {}", index, duration));
                }
                _ => {}
            }

            for id in phase.spawn.iter().chain(&phase.hide) {
                if !ids.contains(id) {
                    return invalid(format!("phase {} references unknown object {:?}", index, id));
                }
            }
        }

        Ok(())
    }

    pub fn build_sequencer(&self) -> TutorialSequencer {
        let phases = self.phases.iter().map(TutorialPhase::from).collect();
        TutorialSequencer::new(
            phases,
            SequencerConfig {
                start_index: self.start_index,
                transition_delay: self.settings.transition_delay,
                player: Some(self.player.id),
                camera: self.camera.as_ref().map(|camera| camera.id),
                auto_start: true,
            },
        )
    }

    /// Спавн игрока, камеры, объектов и зон + `TutorialSequencer` resource
    pub fn spawn_into(&self, world: &mut World) -> SpawnedScene {
        let rotation = vec3(self.player.rotation_degrees);
        let mut detector = ProximityDetector::new(self.settings.interact_distance);
        detector.probe_range = self.settings.probe_range;
        detector.origin_offset = Vec3::Y * self.player.eye_height;

        let player = world
            .spawn((
                self.player.id,
                Player,
                Transform::from_translation(vec3(self.player.position)).with_rotation(Quat::from_euler(
                    EulerRot::YXZ,
                    rotation.y.to_radians(),
                    rotation.x.to_radians(),
                    rotation.z.to_radians(),
                )),
                detector,
                JumpAbility::default(),
                Locomotion::default(),
            ))
            .id();

        let camera = self.camera.as_ref().map(|spec| {
            let mut rig = TutorialCamera::default();
            if let Some(height) = spec.fixed_height {
                rig.fixed_height = height;
                rig.use_initial_height = false;
            }
            world.spawn((spec.id, rig, Transform::default())).id()
        });

        let mut objects = vec![(self.player.id, player)];
        if let (Some(spec), Some(entity)) = (&self.camera, camera) {
            objects.push((spec.id, entity));
        }

        for spec in &self.objects {
            let presence = Presence { active: spec.active };
            let volume = InteractionVolume::cuboid(vec3(spec.half_extents));
            let transform = Transform::from_translation(vec3(spec.position));

            let mut entity = world.spawn((spec.id, presence, volume, transform));
            if let Some(config) = &spec.interactable {
                let label = if spec.label.is_empty() {
                    format!("object-{}", spec.id.0)
                } else {
                    spec.label.clone()
                };
                entity.insert(Interactable::new(label, config.clone()));
            }
            objects.push((spec.id, entity.id()));
        }

        for spec in &self.zones {
            let entity = world
                .spawn((
                    spec.id,
                    InteractionVolume::cuboid(vec3(spec.half_extents)),
                    Transform::from_translation(vec3(spec.position)),
                    TutorialZone::new(spec.can_trigger_multiple_times, spec.disable_after_reached),
                ))
                .id();
            objects.push((spec.id, entity));
        }

        world.insert_resource(self.build_sequencer());

        SpawnedScene {
            player,
            camera,
            objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionMode;

    const SCRIPT: &str = r#"{
        "settings": { "transition_delay": 0.0 },
        "player": { "id": 1, "position": [0, 0, 0] },
        "camera": { "id": 2 },
        "objects": [
            { "id": 10, "label": "button", "position": [0, 1.5, -2],
              "interactable": { "mode": "manual", "policy": { "kind": "once" }, "notify_sequencer": true } },
            { "id": 11, "label": "plate", "position": [0, 0, -5], "half_extents": [1, 0.1, 1], "active": false,
              "interactable": { "mode": "pressure_plate", "policy": { "kind": "every_time", "cooldown": 2.0 } } }
        ],
        "zones": [ { "id": 20, "position": [0, 0, -10], "half_extents": [2, 2, 2] } ],
        "phases": [
            { "name": "Press", "completion": { "type": "interaction", "target": 10 } },
            { "name": "Walk", "completion": { "type": "reach_zone", "zone": 20 }, "spawn": [11],
              "placement": { "position": [0, 0, -3] }, "camera": { "fixed_height": 8 } }
        ]
    }"#;

    #[test]
    fn test_parse_script_with_defaults() {
        let script = TutorialScript::from_json(SCRIPT).unwrap();

        assert_eq!(script.settings.tick_hz, DEFAULT_TICK_HZ);
        assert_eq!(script.settings.interact_distance, DEFAULT_INTERACT_DISTANCE);
        assert_eq!(script.player.eye_height, 1.5);
        assert!(script.zones[0].disable_after_reached);

        let plate = script.objects[1].interactable.as_ref().unwrap();
        assert_eq!(plate.mode, InteractionMode::PressurePlate);
        assert_eq!(plate.policy, ActivationPolicy::EveryTime { cooldown: 2.0 });
    }

    #[test]
    fn test_build_sequencer_from_script() {
        let script = TutorialScript::from_json(SCRIPT).unwrap();
        let sequencer = script.build_sequencer();

        assert_eq!(sequencer.phases().len(), 2);
        assert_eq!(sequencer.config().player, Some(ObjectId(1)));
        assert_eq!(sequencer.config().camera, Some(ObjectId(2)));
        let walk = &sequencer.phases()[1];
        assert_eq!(walk.spawn_set, vec![ObjectId(11)]);
        assert_eq!(walk.camera.as_ref().and_then(|camera| camera.fixed_height), Some(8.0));
    }

    #[test]
    fn test_validate_rejects_unknown_target() {
        let json = SCRIPT.replace(r#""target": 10"#, r#""target": 99"#);
        assert!(matches!(TutorialScript::from_json(&json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let json = SCRIPT.replace(r#""id": 20"#, r#""id": 10"#);
        assert!(matches!(TutorialScript::from_json(&json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite_durations() {
        let mut script = TutorialScript::from_json(SCRIPT).unwrap();
        script.phases[1].completion = CompletionKind::Timer { duration: f32::NAN };
        assert!(matches!(script.validate(), Err(ConfigError::Invalid(_))));

        let mut script = TutorialScript::from_json(SCRIPT).unwrap();
        if let Some(config) = script.objects[1].interactable.as_mut() {
            config.policy = ActivationPolicy::EveryTime { cooldown: f32::NAN };
        }
        assert!(matches!(script.validate(), Err(ConfigError::Invalid(_))));

        let mut script = TutorialScript::from_json(SCRIPT).unwrap();
        if let Some(config) = script.objects[0].interactable.as_mut() {
            config.required_dwell_time = -1.0;
        }
        assert!(matches!(script.validate(), Err(ConfigError::Invalid(_))));

        let mut script = TutorialScript::from_json(SCRIPT).unwrap();
        script.settings.transition_delay = f32::INFINITY;
        assert!(matches!(script.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(TutorialScript::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_spawn_into_world() {
        let script = TutorialScript::from_json(SCRIPT).unwrap();
        let mut world = World::new();
        let scene = script.spawn_into(&mut world);

        let plate = scene.entity(ObjectId(11)).unwrap();
        assert!(!world.get::<Presence>(plate).unwrap().active);
        assert!(world.get::<Interactable>(plate).is_some());

        let detector = world.get::<ProximityDetector>(scene.player).unwrap();
        assert_eq!(detector.origin_offset, Vec3::new(0.0, 1.5, 0.0));
        assert!(world.get::<ActionInput>(scene.player).is_some());
        assert!(world.contains_resource::<TutorialSequencer>());
    }

    #[test]
    fn test_autopilot_step_json() {
        let step: AutopilotStep =
            serde_json::from_str(r#"{ "tick": 5, "action": { "kind": "move_player", "position": [1, 0, 2] } }"#)
                .unwrap();
        assert_eq!(step.tick, 5);
        assert_eq!(step.action, AutopilotAction::MovePlayer { position: [1.0, 0.0, 2.0] });
    }
}

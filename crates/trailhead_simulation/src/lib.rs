//! Trailhead Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: interactable объекты + tutorial sequencer
//!
//! HYBRID ARCHITECTURE:
//! - ECS = логика (activation state machines, occupancy, detector, фазы туториала)
//! - Host engine = физика, рендер, звук, UI (через `host` adapters)
//!
//! Один логический тик = один прогон `FixedUpdate`, порядок задаёт `SimulationSet`.

use std::time::Duration;

use bevy::prelude::*;

// Публичные модули
pub mod components;
pub mod config;
pub mod detection;
pub mod error;
pub mod host;
pub mod interaction;
pub mod logger;
pub mod shared;
pub mod tutorial;
pub mod world;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{SimulationSettings, TutorialScript};
pub use detection::{DetectionPlugin, ProximityDetector, VolumeIndex, VolumeOverlapPlugin};
pub use error::{ConfigError, HookError, HostError, SequencerError};
pub use host::{HostAdapters, HostBridgePlugin, RapierOccupancyPlugin};
pub use interaction::{Interactable, InteractableConfig, InteractionPlugin};
pub use logger::{init_logger, set_log_level, set_logger, LogLevel, LogPrinter, LOGGER_LEVEL};
pub use tutorial::{TutorialPlugin, TutorialSequencer};
pub use world::{ObjectRegistry, WorldCommand, WorldSyncPlugin};

/// Порядок фаз тика (FixedUpdate, chain)
///
/// - Index: ObjectRegistry + VolumeIndex из текущего мира
/// - Detection: overlap, forward scan, key input, plate probe
/// - Interaction: входящие события → Interactable, tick
/// - InteractionEffects: эффекты → события, hooks
/// - Tutorial: зоны, команды, notifications, tick секвенсора
/// - World: WorldCommand → Presence / Transform / camera / jump
/// - Host: forward в host adapters
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Index,
    Detection,
    Interaction,
    InteractionEffects,
    Tutorial,
    World,
    Host,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Источник occupancy не включён: `VolumeOverlapPlugin` (headless) или
/// `RapierOccupancyPlugin` (с физикой) добавляет host.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Time<Fixed>>() {
            app.insert_resource(Time::<Fixed>::from_hz(config::DEFAULT_TICK_HZ));
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Index,
                SimulationSet::Detection,
                SimulationSet::Interaction,
                SimulationSet::InteractionEffects,
                SimulationSet::Tutorial,
                SimulationSet::World,
                SimulationSet::Host,
            )
                .chain(),
        );

        app.add_plugins((
            WorldSyncPlugin,
            DetectionPlugin,
            InteractionPlugin,
            TutorialPlugin,
            HostBridgePlugin,
        ));
    }
}

/// Создаёт Bevy App для headless симуляции (без рендера и физики)
///
/// Время двигает вызывающий: `step_fixed` / `step_tick`.
pub fn create_headless_app(settings: &SimulationSettings) -> App {
    let mut app = App::new();
    init_logger();
    app.insert_resource(Time::<Fixed>::from_hz(settings.tick_hz))
        .add_plugins((SimulationPlugin, VolumeOverlapPlugin));

    app
}

/// Один тик с явным dt (детерминированно, без wall clock)
pub fn step_fixed(app: &mut App, dt: f32) {
    let world = app.world_mut();
    if let Some(mut time) = world.get_resource_mut::<Time<Fixed>>() {
        time.advance_by(Duration::from_secs_f32(dt));
    }
    world.run_schedule(FixedUpdate);
}

/// Один тик длиной `Time<Fixed>::timestep()`
pub fn step_tick(app: &mut App) {
    let dt = app
        .world()
        .get_resource::<Time<Fixed>>()
        .map(|time| time.timestep().as_secs_f32())
        .unwrap_or(1.0 / config::DEFAULT_TICK_HZ as f32);
    step_fixed(app, dt);
}

/// Конец кадра: swap event буферов (долгие прогоны без роста очередей)
///
/// Тесты обычно не вызывают: события тика остаются доступны для проверок.
pub fn end_frame(app: &mut App) {
    if let Err(err) = app.world_mut().try_run_schedule(First) {
        logger::log_warning(&format!("end_frame: {}", err));
    }
}

//! Tutorial integration tests
//!
//! Полный headless App: detector → interactable → sequencer → world commands.
//! Время двигается только через step_fixed (детерминированно).

use bevy::prelude::*;
use trailhead_simulation::detection::ActionInput;
use trailhead_simulation::interaction::{ActivationPolicy, InteractionMode};
use trailhead_simulation::tutorial::{
    CompletionKind, PhaseCompleted, PhaseStarted, SequencerConfig, SequencerState, TutorialCommand, TutorialFinished,
    TutorialPhase, TutorialZone,
};
use trailhead_simulation::*;

const PLAYER: ObjectId = ObjectId(1);
const BUTTON: ObjectId = ObjectId(10);
const ZONE: ObjectId = ObjectId(20);

const DT: f32 = 0.5;

fn create_tutorial_app() -> App {
    create_headless_app(&SimulationSettings {
        transition_delay: 0.0,
        ..Default::default()
    })
}

/// Игрок смотрит вдоль -Z, ray origin на высоте 1.5
fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    let mut detector = ProximityDetector::default();
    detector.origin_offset = Vec3::Y * 1.5;

    app.world_mut()
        .spawn((
            PLAYER,
            Player,
            Transform::from_translation(position),
            detector,
            JumpAbility::default(),
            Locomotion::default(),
        ))
        .id()
}

fn interactable(mode: InteractionMode, policy: ActivationPolicy) -> InteractableConfig {
    InteractableConfig {
        mode,
        policy,
        notify_sequencer: true,
        ..Default::default()
    }
}

/// Кнопка на уровне глаз в 2м перед игроком (стоящим в начале координат)
fn spawn_button(app: &mut App, id: ObjectId, config: InteractableConfig) -> Entity {
    app.world_mut()
        .spawn((
            id,
            Transform::from_xyz(0.0, 1.5, -2.0),
            InteractionVolume::default(),
            Interactable::new("button", config),
        ))
        .id()
}

fn insert_sequencer(app: &mut App, phases: Vec<TutorialPhase>) {
    app.insert_resource(TutorialSequencer::new(
        phases,
        SequencerConfig {
            transition_delay: 0.0,
            player: Some(PLAYER),
            ..Default::default()
        },
    ));
}

fn press_key(app: &mut App, player: Entity) {
    if let Some(mut input) = app.world_mut().get_mut::<ActionInput>(player) {
        input.set(true);
    }
    step_fixed(app, DT);
    if let Some(mut input) = app.world_mut().get_mut::<ActionInput>(player) {
        input.set(false);
    }
    step_fixed(app, DT);
}

fn count<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().len()
}

fn sequencer(app: &App) -> &TutorialSequencer {
    app.world().resource::<TutorialSequencer>()
}

#[test]
fn test_interaction_then_timer_full_app() {
    let mut app = create_tutorial_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    spawn_button(&mut app, BUTTON, interactable(InteractionMode::Manual, ActivationPolicy::Once));
    insert_sequencer(
        &mut app,
        vec![
            TutorialPhase::new("Press", CompletionKind::Interaction { target: BUTTON }),
            TutorialPhase::new("Wait", CompletionKind::Timer { duration: 5.0 }),
        ],
    );

    step_fixed(&mut app, DT);
    assert_eq!(sequencer(&app).current_index(), Some(0));

    // Press tick: phase 0 complete, phase 1 стартует и сразу тикает (0.5s)
    if let Some(mut input) = app.world_mut().get_mut::<ActionInput>(player) {
        input.set(true);
    }
    step_fixed(&mut app, DT);
    assert_eq!(sequencer(&app).current_index(), Some(1));
    assert_eq!(count::<PhaseCompleted>(&app), 1);

    for _ in 0..8 {
        step_fixed(&mut app, DT);
    }
    assert!(!sequencer(&app).is_complete());

    step_fixed(&mut app, DT);
    assert!(sequencer(&app).is_complete());
    assert_eq!(count::<PhaseCompleted>(&app), 2);
    assert_eq!(count::<TutorialFinished>(&app), 1);
}

#[test]
fn test_reach_zone_completes_once() {
    let mut app = create_tutorial_app();
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 10.0));
    let zone = app
        .world_mut()
        .spawn((
            ZONE,
            Transform::from_xyz(0.0, 0.0, -10.0),
            InteractionVolume::cuboid(Vec3::splat(1.0)),
            TutorialZone::default(),
        ))
        .id();
    insert_sequencer(
        &mut app,
        vec![
            TutorialPhase::new("Walk", CompletionKind::ReachZone { zone: ZONE }),
            TutorialPhase::new("Done", CompletionKind::Manual),
        ],
    );

    step_fixed(&mut app, DT);
    assert_eq!(count::<PhaseCompleted>(&app), 0);

    // Overlap notification и containment check в одном тике
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 0.0, -10.0);
    for _ in 0..5 {
        step_fixed(&mut app, DT);
    }

    assert_eq!(count::<PhaseCompleted>(&app), 1);
    assert_eq!(sequencer(&app).current_index(), Some(1));
    // disable_after_reached
    assert!(!app.world().get::<Presence>(zone).unwrap().active);
    assert!(app.world().get::<TutorialZone>(zone).unwrap().has_been_reached());
}

#[test]
fn test_duplicate_notification_counted_once() {
    let mut app = create_tutorial_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    spawn_button(
        &mut app,
        BUTTON,
        interactable(InteractionMode::Manual, ActivationPolicy::EveryTime { cooldown: 0.0 }),
    );
    insert_sequencer(
        &mut app,
        vec![TutorialPhase::new("Collect", CompletionKind::CollectMultiple { count: 2 })],
    );
    step_fixed(&mut app, DT);

    press_key(&mut app, player);
    press_key(&mut app, player);

    assert_eq!(count::<interaction::InteractableActivated>(&app), 2);
    assert_eq!(count::<interaction::InteractionNotified>(&app), 2);
    let phase = sequencer(&app).current_phase().unwrap();
    assert_eq!(phase.progress.items_collected, 1);
    assert!(!sequencer(&app).is_complete());
}

#[test]
fn test_restart_after_complete() {
    let mut app = create_tutorial_app();
    spawn_player(&mut app, Vec3::ZERO);
    insert_sequencer(
        &mut app,
        vec![
            TutorialPhase::new("A", CompletionKind::Manual),
            TutorialPhase::new("B", CompletionKind::Manual),
        ],
    );
    step_fixed(&mut app, DT);

    for _ in 0..2 {
        app.world_mut().send_event(TutorialCommand::ManualComplete);
        step_fixed(&mut app, DT);
    }
    assert!(sequencer(&app).is_complete());
    assert_eq!(count::<TutorialFinished>(&app), 1);

    app.world_mut().send_event(TutorialCommand::Restart);
    step_fixed(&mut app, DT);

    assert_eq!(sequencer(&app).state(), SequencerState::InPhase);
    assert_eq!(sequencer(&app).current_index(), Some(0));
    assert_eq!(sequencer(&app).interacted_count(), 0);
    assert_eq!(count::<PhaseStarted>(&app), 3);
}

#[test]
fn test_phase_entry_spawns_places_and_unlocks() {
    let mut app = create_tutorial_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let crate_a = app
        .world_mut()
        .spawn((ObjectId(30), Transform::default(), InteractionVolume::default()))
        .id();
    let crate_b = app
        .world_mut()
        .spawn((ObjectId(31), Transform::default(), InteractionVolume::default()))
        .id();
    insert_sequencer(
        &mut app,
        vec![
            TutorialPhase::new("Jump", CompletionKind::Manual)
                .with_spawn([ObjectId(30)])
                .with_placement(Vec3::new(5.0, 0.0, 5.0), Vec3::ZERO)
                .unlocking_double_jump(),
            TutorialPhase::new("Next", CompletionKind::Manual).with_spawn([ObjectId(31)]),
        ],
    );

    step_fixed(&mut app, DT);
    let presence = |app: &App, entity: Entity| app.world().get::<Presence>(entity).unwrap().active;
    assert!(presence(&app, crate_a));
    assert!(!presence(&app, crate_b));
    assert_eq!(
        app.world().get::<Transform>(player).unwrap().translation,
        Vec3::new(5.0, 0.0, 5.0)
    );
    assert!(app.world().get::<Locomotion>(player).unwrap().enabled);
    assert_eq!(app.world().get::<JumpAbility>(player).unwrap().max_jumps, 1);

    app.world_mut().send_event(TutorialCommand::ManualComplete);
    step_fixed(&mut app, DT);

    assert_eq!(app.world().get::<JumpAbility>(player).unwrap().max_jumps, 2);
    assert!(!presence(&app, crate_a));
    assert!(presence(&app, crate_b));
}

#[test]
fn test_invalid_command_is_noop() {
    let mut app = create_tutorial_app();
    spawn_player(&mut app, Vec3::ZERO);
    insert_sequencer(&mut app, vec![TutorialPhase::new("Only", CompletionKind::Manual)]);
    step_fixed(&mut app, DT);

    app.world_mut().send_event(TutorialCommand::JumpToPhase(9));
    app.world_mut().send_event(TutorialCommand::CompleteCurrent);
    step_fixed(&mut app, DT);

    // JumpToPhase(9) отклонён, CompleteCurrent прошёл
    assert!(sequencer(&app).is_complete());
    assert_eq!(count::<PhaseStarted>(&app), 1);
}

#[test]
fn test_script_demo_like_flow() {
    let script = TutorialScript::from_json(
        r#"{
            "settings": { "transition_delay": 0.0 },
            "player": { "id": 1 },
            "objects": [
                { "id": 10, "position": [0, 1.5, -2],
                  "interactable": { "notify_sequencer": true, "disable_after_activation": true } }
            ],
            "phases": [
                { "name": "Press", "completion": { "type": "interaction", "target": 10 } },
                { "name": "Wait", "completion": { "type": "timer", "duration": 1.0 } }
            ]
        }"#,
    )
    .unwrap();

    let mut app = create_headless_app(&script.settings);
    let scene = script.spawn_into(app.world_mut());
    step_fixed(&mut app, DT);
    press_key(&mut app, scene.player);

    let button = scene.entity(BUTTON).unwrap();
    assert!(!app.world().get::<Presence>(button).unwrap().active);
    assert_eq!(sequencer(&app).current_index(), Some(1));

    step_fixed(&mut app, DT);
    assert!(sequencer(&app).is_complete());
}

//! Headless tutorial runner
//!
//! Запускает tutorial script (или встроенное демо) без рендера: autopilot
//! двигает игрока, LoggingHost печатает всё, что ушло бы в движок.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use trailhead_simulation::host::{HostAdapters, LoggingHost};
use trailhead_simulation::{
    create_headless_app, end_frame, logger, set_log_level, step_tick, LogLevel, TutorialScript, TutorialSequencer,
};

/// Демо: кнопка → плита → два collectible → зона → таймер
const DEMO_SCRIPT: &str = r#"{
    "settings": { "tick_hz": 60, "transition_delay": 0.5 },
    "player": { "id": 1, "position": [0, 0, 0] },
    "camera": { "id": 2, "fixed_height": 6 },
    "objects": [
        { "id": 10, "label": "button", "position": [0, 1.5, -2],
          "interactable": { "mode": "manual", "policy": { "kind": "once" }, "notify_sequencer": true,
                            "activation_sound": "click" } },
        { "id": 11, "label": "plate", "position": [0, 0, -6], "half_extents": [1, 0.1, 1],
          "interactable": { "mode": "pressure_plate", "policy": { "kind": "while_occupied" },
                            "notify_sequencer": true, "feedback": { "kind": "press_animation" } } },
        { "id": 12, "label": "crystal-left", "position": [-2, 1.5, -10],
          "interactable": { "notify_sequencer": true, "disable_after_activation": true } },
        { "id": 13, "label": "crystal-right", "position": [2, 1.5, -10],
          "interactable": { "notify_sequencer": true, "disable_after_activation": true } }
    ],
    "zones": [ { "id": 20, "position": [0, 1, -14], "half_extents": [2, 2, 2] } ],
    "phases": [
        { "name": "Interact", "description": "Look at the button and press E",
          "completion": { "type": "interaction", "target": 10 } },
        { "name": "Pressure plate", "description": "Step on the plate",
          "completion": { "type": "interaction", "target": 11 }, "spawn": [11] },
        { "name": "Collect", "description": "Collect both crystals",
          "completion": { "type": "collect_multiple", "count": 2 }, "spawn": [12, 13],
          "camera": { "fixed_height": 8, "limit_tag": "arena" } },
        { "name": "Exit", "description": "Walk to the exit",
          "completion": { "type": "reach_zone", "zone": 20 }, "spawn": [20], "unlocks_double_jump": true },
        { "name": "Breathe", "description": "Well done",
          "completion": { "type": "timer", "duration": 1.0 },
          "placement": { "position": [0, 0, 0], "rotation_degrees": [0, 180, 0] } }
    ],
    "autopilot": [
        { "tick": 40, "action": { "kind": "press_interact" } },
        { "tick": 41, "action": { "kind": "release_interact" } },
        { "tick": 90, "action": { "kind": "move_player", "position": [0, 0, -6] } },
        { "tick": 130, "action": { "kind": "move_player", "position": [0, 0, -10] } },
        { "tick": 131, "action": { "kind": "look", "yaw_degrees": 90 } },
        { "tick": 133, "action": { "kind": "press_interact" } },
        { "tick": 134, "action": { "kind": "release_interact" } },
        { "tick": 135, "action": { "kind": "look", "yaw_degrees": -90 } },
        { "tick": 137, "action": { "kind": "press_interact" } },
        { "tick": 138, "action": { "kind": "release_interact" } },
        { "tick": 180, "action": { "kind": "look", "yaw_degrees": 0 } },
        { "tick": 181, "action": { "kind": "move_player", "position": [0, 0, -14] } }
    ]
}"#;

#[derive(Parser, Debug)]
#[command(name = "trailhead", about = "Headless tutorial simulation runner")]
struct Args {
    /// Tutorial script (JSON). Без него — встроенное демо
    #[arg(long)]
    script: Option<PathBuf>,

    /// Максимум тиков
    #[arg(long, default_value_t = 1200)]
    ticks: u32,

    /// Переопределить tick rate из скрипта
    #[arg(long)]
    hz: Option<f64>,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let args = Args::parse();
    set_log_level(args.log_level);

    let loaded = match &args.script {
        Some(path) => TutorialScript::load(path),
        None => TutorialScript::from_json(DEMO_SCRIPT),
    };
    let mut script = match loaded {
        Ok(script) => script,
        Err(err) => {
            eprintln!("trailhead: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Some(hz) = args.hz {
        script.settings.tick_hz = hz;
        if let Err(err) = script.validate() {
            eprintln!("trailhead: {}", err);
            return ExitCode::FAILURE;
        }
    }

    println!(
        "Starting Trailhead headless run ({} phases, {} Hz)",
        script.phases.len(),
        script.settings.tick_hz
    );

    let mut app = create_headless_app(&script.settings);
    app.insert_resource(HostAdapters::uniform(LoggingHost));
    let scene = script.spawn_into(app.world_mut());

    for tick in 0..args.ticks {
        for step in script.autopilot.iter().filter(|step| step.tick == tick) {
            logger::log(&format!("Autopilot tick {}: {:?}", tick, step.action));
            step.action.apply(app.world_mut(), scene.player);
        }

        step_tick(&mut app);
        end_frame(&mut app);

        let complete = app
            .world()
            .get_resource::<TutorialSequencer>()
            .is_some_and(|sequencer| sequencer.is_complete());
        if complete {
            println!("Tutorial complete at tick {}", tick);
            return ExitCode::SUCCESS;
        }
    }

    let phase = app
        .world()
        .get_resource::<TutorialSequencer>()
        .and_then(|sequencer| sequencer.current_phase().map(|phase| phase.name.clone()));
    println!("Stopped after {} ticks, current phase: {:?}", args.ticks, phase);
    ExitCode::SUCCESS
}

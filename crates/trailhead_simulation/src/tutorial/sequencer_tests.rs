//! TutorialSequencer unit tests (без ECS)

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::components::ObjectId;
    use crate::error::SequencerError;
    use crate::shared::{Bounds, CameraConfig};
    use crate::tutorial::{
        CompletionKind, PhaseCompleted, SequencerConfig, SequencerEffect, SequencerState, TutorialPhase,
        TutorialSequencer,
    };
    use crate::world::WorldCommand;

    const PLAYER: ObjectId = ObjectId(1);
    const CAMERA: ObjectId = ObjectId(2);
    const BUTTON: ObjectId = ObjectId(10);
    const ZONE: ObjectId = ObjectId(20);

    fn config(delay: f32) -> SequencerConfig {
        SequencerConfig {
            transition_delay: delay,
            player: Some(PLAYER),
            camera: Some(CAMERA),
            ..Default::default()
        }
    }

    fn no_zones(_: ObjectId) -> Option<Bounds> {
        None
    }

    fn completed(sequencer: &mut TutorialSequencer) -> Vec<PhaseCompleted> {
        sequencer
            .drain_effects()
            .filter_map(|effect| match effect {
                SequencerEffect::PhaseCompleted(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    fn interaction_then_timer() -> TutorialSequencer {
        TutorialSequencer::new(
            vec![
                TutorialPhase::new("Press", CompletionKind::Interaction { target: BUTTON }),
                TutorialPhase::new("Wait", CompletionKind::Timer { duration: 5.0 }),
            ],
            config(0.0),
        )
    }

    #[test]
    fn test_interaction_then_timer_runs_to_completion() {
        let mut sequencer = interaction_then_timer();
        sequencer.start().unwrap();
        assert_eq!(sequencer.current_index(), Some(0));
        assert_eq!(sequencer.state(), SequencerState::InPhase);

        assert!(sequencer.notify_interaction(BUTTON));
        assert_eq!(sequencer.current_index(), Some(1));

        for _ in 0..4 {
            sequencer.tick(1.0, None, no_zones);
        }
        assert!(!sequencer.is_complete());

        sequencer.tick(1.0, None, no_zones);
        assert!(sequencer.is_complete());

        let effects: Vec<SequencerEffect> = sequencer.drain_effects().collect();
        let completed_count = effects
            .iter()
            .filter(|effect| matches!(effect, SequencerEffect::PhaseCompleted(_)))
            .count();
        let finished_count = effects
            .iter()
            .filter(|effect| matches!(effect, SequencerEffect::Finished))
            .count();
        assert_eq!(completed_count, 2);
        assert_eq!(finished_count, 1);
    }

    #[test]
    fn test_start_hides_every_spawn_set() {
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("A", CompletionKind::Manual).with_spawn([ObjectId(30)]),
                TutorialPhase::new("B", CompletionKind::Manual).with_spawn([ObjectId(31), ObjectId(32)]),
            ],
            config(0.0),
        );
        sequencer.start().unwrap();

        let commands: Vec<WorldCommand> = sequencer
            .drain_effects()
            .filter_map(|effect| match effect {
                SequencerEffect::World(command) => Some(command),
                _ => None,
            })
            .collect();

        for object in [ObjectId(30), ObjectId(31), ObjectId(32)] {
            assert!(commands.contains(&WorldCommand::SetActive { object, active: false }));
        }
        // Phase A spawn set активируется после общего hide
        assert_eq!(
            commands.last(),
            Some(&WorldCommand::SetActive {
                object: ObjectId(30),
                active: true
            })
        );
    }

    #[test]
    fn test_hide_set_wins_over_spawn_set() {
        const SHARED: ObjectId = ObjectId(50);
        let mut sequencer = TutorialSequencer::new(
            vec![TutorialPhase::new("A", CompletionKind::Manual)
                .with_spawn([SHARED])
                .with_hide([SHARED])],
            config(0.0),
        );
        sequencer.start().unwrap();

        let last = sequencer
            .drain_effects()
            .filter_map(|effect| match effect {
                SequencerEffect::World(command @ WorldCommand::SetActive { object: SHARED, .. }) => Some(command),
                _ => None,
            })
            .last();
        assert_eq!(
            last,
            Some(WorldCommand::SetActive {
                object: SHARED,
                active: false
            })
        );
    }

    #[test]
    fn test_phase_entry_teleports_and_configures_camera() {
        let camera = CameraConfig {
            fixed_height: Some(8.0),
            ..Default::default()
        };
        let mut sequencer = TutorialSequencer::new(
            vec![TutorialPhase::new("A", CompletionKind::Manual)
                .with_placement(Vec3::new(1.0, 0.0, 2.0), Vec3::ZERO)
                .with_camera(camera.clone())],
            config(0.0),
        );
        sequencer.start().unwrap();

        let effects: Vec<SequencerEffect> = sequencer.drain_effects().collect();
        assert!(effects.contains(&SequencerEffect::World(WorldCommand::Teleport {
            object: PLAYER,
            position: Vec3::new(1.0, 0.0, 2.0),
            rotation: Quat::IDENTITY,
        })));
        assert!(effects.contains(&SequencerEffect::World(WorldCommand::ConfigureCamera {
            camera: CAMERA,
            config: camera,
        })));
        assert!(matches!(effects.last(), Some(SequencerEffect::PhaseStarted(started)) if started.index == 0));
    }

    #[test]
    fn test_missing_player_skips_placement() {
        let mut sequencer = TutorialSequencer::new(
            vec![TutorialPhase::new("A", CompletionKind::Manual).with_placement(Vec3::ONE, Vec3::ZERO)],
            SequencerConfig {
                transition_delay: 0.0,
                ..Default::default()
            },
        );
        sequencer.start().unwrap();

        assert!(!sequencer
            .drain_effects()
            .any(|effect| matches!(effect, SequencerEffect::World(WorldCommand::Teleport { .. }))));
        assert_eq!(sequencer.state(), SequencerState::InPhase);
    }

    #[test]
    fn test_zone_notification_and_containment_complete_once() {
        let zone_bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("Reach", CompletionKind::ReachZone { zone: ZONE }),
                TutorialPhase::new("Done", CompletionKind::Manual),
            ],
            config(0.5),
        );
        sequencer.start().unwrap();
        sequencer.tick(0.5, None, no_zones);
        assert_eq!(sequencer.state(), SequencerState::InPhase);
        sequencer.drain_effects().for_each(drop);

        // Overlap notification и containment в одном тике
        assert!(sequencer.notify_zone_entered(ZONE));
        sequencer.tick(0.1, Some(Vec3::ZERO), |zone| (zone == ZONE).then_some(zone_bounds));

        let events = completed(&mut sequencer);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 0);
    }

    #[test]
    fn test_zone_containment_completes_without_notification() {
        let zone_bounds = Bounds::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let mut sequencer = TutorialSequencer::new(
            vec![TutorialPhase::new("Reach", CompletionKind::ReachZone { zone: ZONE })],
            config(0.0),
        );
        sequencer.start().unwrap();

        sequencer.tick(0.1, Some(Vec3::new(5.0, 0.0, 0.0)), |_| Some(zone_bounds));
        assert!(!sequencer.is_complete());

        sequencer.tick(0.1, Some(Vec3::new(0.5, 0.0, 0.0)), |_| Some(zone_bounds));
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_collect_multiple_counts_distinct_objects() {
        let mut sequencer = TutorialSequencer::new(
            vec![TutorialPhase::new("Collect", CompletionKind::CollectMultiple { count: 3 })],
            config(0.0),
        );
        sequencer.start().unwrap();

        assert!(sequencer.notify_interaction(ObjectId(40)));
        assert!(!sequencer.notify_interaction(ObjectId(40)));
        assert!(sequencer.notify_interaction(ObjectId(41)));
        assert_eq!(sequencer.current_phase().map(|phase| phase.progress.items_collected), Some(2));
        assert!(!sequencer.is_complete());

        assert!(sequencer.notify_interaction(ObjectId(42)));
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_interacted_set_spans_phases() {
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("First", CompletionKind::Manual),
                TutorialPhase::new("Collect", CompletionKind::CollectMultiple { count: 1 }),
            ],
            config(0.0),
        );
        sequencer.start().unwrap();

        // Объект засчитан в фазе 0 → в фазе 1 не считается повторно
        assert!(sequencer.notify_interaction(ObjectId(40)));
        assert!(sequencer.manual_complete_phase());
        assert!(!sequencer.notify_interaction(ObjectId(40)));
        assert!(!sequencer.is_complete());

        assert!(sequencer.notify_interaction(ObjectId(41)));
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_start_phase_rejected_during_transition() {
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("A", CompletionKind::Manual),
                TutorialPhase::new("B", CompletionKind::Manual),
            ],
            config(0.5),
        );
        sequencer.start().unwrap();

        assert_eq!(
            sequencer.start_phase(1),
            Err(SequencerError::TransitionInProgress { target: 0 })
        );
        assert!(sequencer.restart().is_err());

        sequencer.tick(0.5, None, no_zones);
        assert_eq!(sequencer.state(), SequencerState::InPhase);
        assert_eq!(sequencer.current_index(), Some(0));
    }

    #[test]
    fn test_out_of_range_is_rejected_without_state_change() {
        let mut sequencer = interaction_then_timer();
        sequencer.start().unwrap();

        assert_eq!(
            sequencer.jump_to_phase(7),
            Err(SequencerError::PhaseOutOfRange { index: 7, len: 2 })
        );
        assert_eq!(sequencer.current_index(), Some(0));
        assert_eq!(sequencer.state(), SequencerState::InPhase);

        let empty = &mut TutorialSequencer::new(Vec::new(), config(0.0));
        assert!(matches!(empty.start(), Err(SequencerError::PhaseOutOfRange { .. })));
    }

    #[test]
    fn test_notifications_ignored_while_transitioning() {
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("A", CompletionKind::Interaction { target: BUTTON }),
                TutorialPhase::new("B", CompletionKind::CollectMultiple { count: 1 }),
            ],
            config(0.5),
        );
        sequencer.start().unwrap();
        sequencer.tick(0.5, None, no_zones);

        assert!(sequencer.notify_interaction(BUTTON));
        assert!(sequencer.is_transitioning());

        // Фаза A уже complete, B ещё не началась
        assert!(!sequencer.notify_interaction(ObjectId(50)));
        assert!(!sequencer.has_interacted(ObjectId(50)));

        sequencer.tick(0.25, None, no_zones);
        sequencer.tick(0.25, None, no_zones);
        assert_eq!(sequencer.current_index(), Some(1));
        assert!(sequencer.notify_interaction(ObjectId(50)));
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_manual_complete_only_for_manual_phase() {
        let mut sequencer = interaction_then_timer();
        sequencer.start().unwrap();

        assert!(!sequencer.manual_complete_phase());
        assert!(sequencer.complete_current_phase());
        assert_eq!(sequencer.current_index(), Some(1));
    }

    #[test]
    fn test_double_jump_unlock_on_completion() {
        let mut sequencer = TutorialSequencer::new(
            vec![TutorialPhase::new("Jump", CompletionKind::Manual).unlocking_double_jump()],
            config(0.0),
        );
        sequencer.start().unwrap();
        sequencer.drain_effects().for_each(drop);

        assert!(sequencer.manual_complete_phase());
        let effects: Vec<SequencerEffect> = sequencer.drain_effects().collect();
        assert_eq!(
            effects.first(),
            Some(&SequencerEffect::World(WorldCommand::UnlockExtraJump { object: PLAYER }))
        );
    }

    #[test]
    fn test_finished_fires_once_per_run() {
        let mut sequencer = TutorialSequencer::new(vec![TutorialPhase::new("Only", CompletionKind::Manual)], config(0.0));
        sequencer.start().unwrap();
        assert!(sequencer.manual_complete_phase());
        assert!(!sequencer.manual_complete_phase());
        assert!(!sequencer.complete_current_phase());

        let finished = |sequencer: &mut TutorialSequencer| {
            sequencer
                .drain_effects()
                .filter(|effect| matches!(effect, SequencerEffect::Finished))
                .count()
        };
        assert_eq!(finished(&mut sequencer), 1);

        sequencer.restart().unwrap();
        assert_eq!(sequencer.current_index(), Some(0));
        assert!(sequencer.manual_complete_phase());
        assert_eq!(finished(&mut sequencer), 1);
    }

    #[test]
    fn test_restart_resets_progress_and_interacted() {
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("Collect", CompletionKind::CollectMultiple { count: 2 }),
                TutorialPhase::new("Wait", CompletionKind::Timer { duration: 1.0 }),
            ],
            config(0.0),
        );
        sequencer.start().unwrap();
        sequencer.notify_interaction(ObjectId(40));
        sequencer.notify_interaction(ObjectId(41));
        assert_eq!(sequencer.current_index(), Some(1));

        sequencer.restart().unwrap();
        assert_eq!(sequencer.current_index(), Some(0));
        assert_eq!(sequencer.interacted_count(), 0);
        assert!(sequencer.phases().iter().all(|phase| !phase.is_complete()));
        assert!(sequencer.notify_interaction(ObjectId(40)));
    }

    #[test]
    fn test_timer_elapsed_resets_on_reentry() {
        let mut sequencer = TutorialSequencer::new(
            vec![
                TutorialPhase::new("Wait", CompletionKind::Timer { duration: 2.0 }),
                TutorialPhase::new("Other", CompletionKind::Manual),
            ],
            config(0.0),
        );
        sequencer.start().unwrap();
        sequencer.tick(1.5, None, no_zones);
        sequencer.jump_to_phase(1).unwrap();
        sequencer.jump_to_phase(0).unwrap();

        sequencer.tick(1.5, None, no_zones);
        assert_eq!(sequencer.current_index(), Some(0));
        sequencer.tick(0.5, None, no_zones);
        assert_eq!(sequencer.current_index(), Some(1));
    }
}

//! Tests for ProximityDetector.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::components::ObjectId;
    use crate::detection::{
        probe_transitions, select_target, ActionInput, KeyDispatch, ProximityDetector, RayHit, SpatialQuery,
    };
    use crate::interaction::{InteractionMode, ProbeContact};

    /// Фиксированный ответ ray cast (без геометрии)
    struct ScriptedHits(Vec<RayHit>);

    impl SpatialQuery for ScriptedHits {
        fn cast_ray(&self, _origin: Vec3, _direction: Vec3, max_distance: f32) -> Vec<RayHit> {
            self.0
                .iter()
                .copied()
                .filter(|hit| hit.distance <= max_distance)
                .collect()
        }
    }

    fn hit(object: u32, distance: f32) -> RayHit {
        RayHit {
            object: ObjectId(object),
            distance,
        }
    }

    #[test]
    fn test_select_skips_self_and_non_interactive() {
        let hits = [hit(1, 0.0), hit(2, 1.0), hit(3, 2.0)];

        // 1 = своё тело, 2 = стена без тега
        let target = select_target(&hits, Some(ObjectId(1)), |object| object != ObjectId(2));
        assert_eq!(target, Some(ObjectId(3)));
    }

    #[test]
    fn test_select_none_without_interactive_hits() {
        let hits = [hit(2, 1.0)];
        assert_eq!(select_target(&hits, None, |_| false), None);
        assert_eq!(select_target(&[], None, |_| true), None);
    }

    #[test]
    fn test_scan_reports_only_changes() {
        let mut detector = ProximityDetector::default();
        let transform = Transform::default();
        let spatial = ScriptedHits(vec![hit(5, 2.0)]);

        assert_eq!(
            detector.scan(&transform, &spatial, None, |_| true),
            Some((None, Some(ObjectId(5))))
        );
        assert_eq!(detector.scan(&transform, &spatial, None, |_| true), None);

        let empty = ScriptedHits(Vec::new());
        assert_eq!(
            detector.scan(&transform, &empty, None, |_| true),
            Some((Some(ObjectId(5)), None))
        );
        assert_eq!(detector.current_detected(), None);
    }

    #[test]
    fn test_scan_respects_interact_distance() {
        let mut detector = ProximityDetector::new(3.0);
        let spatial = ScriptedHits(vec![hit(5, 3.5)]);

        detector.scan(&Transform::default(), &spatial, None, |_| true);
        assert_eq!(detector.current_detected(), None);
    }

    #[test]
    fn test_ray_follows_agent_rotation() {
        let detector = ProximityDetector::default();
        let transform = Transform::from_xyz(1.0, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

        let (origin, direction) = detector.ray(&transform);
        assert_eq!(origin, Vec3::new(1.0, 0.0, 0.0));
        // Поворот на +90° вокруг Y: forward (-Z) → -X
        assert!(direction.abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn test_key_suppressed_for_pressure_plate() {
        let mut detector = ProximityDetector::default();
        let spatial = ScriptedHits(vec![hit(7, 1.0)]);
        detector.scan(&Transform::default(), &spatial, None, |_| true);

        let plate = detector.dispatch_key(|_| Some(InteractionMode::PressurePlate));
        assert_eq!(plate, KeyDispatch::SuppressedPlate(ObjectId(7)));

        let hybrid = detector.dispatch_key(|_| Some(InteractionMode::Hybrid));
        assert_eq!(hybrid, KeyDispatch::Interact(ObjectId(7)));

        let decoration = detector.dispatch_key(|_| None);
        assert_eq!(decoration, KeyDispatch::NotInteractable(ObjectId(7)));
    }

    #[test]
    fn test_key_without_target() {
        let detector = ProximityDetector::default();
        assert_eq!(detector.dispatch_key(|_| Some(InteractionMode::Manual)), KeyDispatch::NoTarget);
    }

    #[test]
    fn test_rising_edge_only_once_per_press() {
        let mut input = ActionInput::default();

        input.set(true);
        assert!(input.take_rising_edge());
        assert!(!input.take_rising_edge());

        input.set(false);
        assert!(!input.take_rising_edge());
        input.set(true);
        assert!(input.take_rising_edge());
    }

    #[test]
    fn test_probe_press_and_release() {
        let mut detector = ProximityDetector::default();
        let transform = Transform::default();
        let on_plate = ScriptedHits(vec![hit(1, 0.0), hit(20, 0.5)]);

        let pressed = detector.probe(&transform, &on_plate, Some(ObjectId(1)), |object| object == ObjectId(20));
        assert_eq!(pressed, vec![(ObjectId(20), ProbeContact::Pressed)]);

        let still = detector.probe(&transform, &on_plate, Some(ObjectId(1)), |object| object == ObjectId(20));
        assert!(still.is_empty());

        let off = ScriptedHits(vec![hit(1, 0.0)]);
        let released = detector.probe(&transform, &off, Some(ObjectId(1)), |object| object == ObjectId(20));
        assert_eq!(released, vec![(ObjectId(20), ProbeContact::Released)]);
    }

    #[test]
    fn test_probe_ignores_plate_under_other_surface() {
        let mut detector = ProximityDetector::default();
        // Пол (30) ближе плиты (20): probe упирается в пол
        let spatial = ScriptedHits(vec![hit(30, 0.4), hit(20, 0.8)]);

        let transitions = detector.probe(&Transform::default(), &spatial, None, |object| object == ObjectId(20));
        assert!(transitions.is_empty());
        assert_eq!(detector.probed_plate(), None);
    }

    #[test]
    fn test_probe_switching_plates_releases_first() {
        assert_eq!(
            probe_transitions(Some(ObjectId(1)), Some(ObjectId(2))),
            vec![
                (ObjectId(1), ProbeContact::Released),
                (ObjectId(2), ProbeContact::Pressed),
            ]
        );
    }
}

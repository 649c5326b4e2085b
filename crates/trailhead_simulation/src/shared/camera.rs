//! Tutorial camera constraints
//!
//! Следование камеры за игроком — на стороне host engine.
//! ECS хранит только constraints, которые секвенсор выставляет на входе в фазу.

use bevy::prelude::Component;

use super::Bounds;

/// Ограничение области камеры (X/Z clamping делает host)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraLimits {
    /// Камера свободна
    #[default]
    Unbounded,

    /// Явный регион (объединённые bounds колайдеров)
    Region(Bounds),

    /// Host собирает колайдеры по тегу каждый кадр
    Tagged(String),
}

/// Per-phase конфигурация камеры
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraConfig {
    /// Фиксированная высота (None = не трогать текущую)
    pub fixed_height: Option<f32>,
    pub region: Option<Bounds>,
    pub limit_tag: Option<String>,
}

/// Tutorial camera rig component
///
/// Attached к camera entity. Секвенсор находит её по injected `ObjectId`.
///
/// # Usage
/// ```ignore
/// commands.spawn((ObjectId(900), TutorialCamera::default()));
/// ```
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TutorialCamera {
    pub fixed_height: f32,
    /// true → host использует стартовую Y камеры вместо `fixed_height`
    pub use_initial_height: bool,
    pub limits: CameraLimits,
}

impl Default for TutorialCamera {
    fn default() -> Self {
        Self {
            fixed_height: 5.0,
            use_initial_height: true,
            limits: CameraLimits::Unbounded,
        }
    }
}

impl TutorialCamera {
    /// Применить конфиг фазы.
    ///
    /// Регион приоритетнее тега; без обоих limits снимаются.
    pub fn apply(&mut self, config: &CameraConfig) {
        if let Some(height) = config.fixed_height {
            self.fixed_height = height;
            self.use_initial_height = false;
        }

        self.limits = match (&config.region, &config.limit_tag) {
            (Some(region), _) => CameraLimits::Region(*region),
            (None, Some(tag)) if !tag.is_empty() => CameraLimits::Tagged(tag.clone()),
            _ => CameraLimits::Unbounded,
        };
    }

    pub fn uses_limits(&self) -> bool {
        !matches!(self.limits, CameraLimits::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;

    #[test]
    fn test_apply_height_disables_initial_height() {
        let mut camera = TutorialCamera::default();
        camera.apply(&CameraConfig {
            fixed_height: Some(12.0),
            ..Default::default()
        });

        assert_eq!(camera.fixed_height, 12.0);
        assert!(!camera.use_initial_height);
        assert!(!camera.uses_limits());
    }

    #[test]
    fn test_region_wins_over_tag() {
        let region = Bounds::from_min_max(Vec3::ZERO, Vec3::splat(10.0));
        let mut camera = TutorialCamera::default();
        camera.apply(&CameraConfig {
            fixed_height: None,
            region: Some(region),
            limit_tag: Some("CameraLimit".into()),
        });

        assert_eq!(camera.limits, CameraLimits::Region(region));
        assert!(camera.use_initial_height);
    }

    #[test]
    fn test_empty_config_clears_limits() {
        let mut camera = TutorialCamera {
            limits: CameraLimits::Tagged("CameraLimit".into()),
            ..Default::default()
        };
        camera.apply(&CameraConfig::default());
        assert_eq!(camera.limits, CameraLimits::Unbounded);
    }
}

//! TutorialZone: volume, вход игрока в который засчитывает ReachZone

use bevy::prelude::*;

use crate::components::InteractionVolume;

#[derive(Component, Debug, Clone, PartialEq)]
#[require(InteractionVolume)]
pub struct TutorialZone {
    pub can_trigger_multiple_times: bool,
    /// Выключить зону (SetActive false) после первого входа
    pub disable_after_reached: bool,
    reached: bool,
}

impl Default for TutorialZone {
    fn default() -> Self {
        Self {
            can_trigger_multiple_times: false,
            disable_after_reached: true,
            reached: false,
        }
    }
}

impl TutorialZone {
    pub fn new(can_trigger_multiple_times: bool, disable_after_reached: bool) -> Self {
        Self {
            can_trigger_multiple_times,
            disable_after_reached,
            reached: false,
        }
    }

    /// true → вход засчитан (нужно слать ZoneEntered)
    pub fn try_reach(&mut self) -> bool {
        if self.reached && !self.can_trigger_multiple_times {
            return false;
        }
        self.reached = true;
        true
    }

    pub fn has_been_reached(&self) -> bool {
        self.reached
    }

    pub fn reset(&mut self) {
        self.reached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_fires_once_by_default() {
        let mut zone = TutorialZone::default();
        assert!(zone.try_reach());
        assert!(!zone.try_reach());
        assert!(zone.has_been_reached());

        zone.reset();
        assert!(zone.try_reach());
    }

    #[test]
    fn test_zone_multiple_triggers() {
        let mut zone = TutorialZone::new(true, false);
        assert!(zone.try_reach());
        assert!(zone.try_reach());
    }
}

//! WorldCommand: изменения мира, которые запрашивают interaction и tutorial
//!
//! ECS применяет команду к своим компонентам (Presence, Transform, TutorialCamera,
//! JumpAbility); host получает ту же команду через WorldAdapter в SimulationSet::Host.

use bevy::prelude::*;

use super::registry::ObjectRegistry;
use crate::components::{JumpAbility, Locomotion, ObjectId, Presence};
use crate::error::HostError;
use crate::interaction::Interactable;
use crate::logger;
use crate::shared::{CameraConfig, TutorialCamera};

#[derive(Event, Debug, Clone, PartialEq)]
pub enum WorldCommand {
    SetActive { object: ObjectId, active: bool },
    /// Teleport. В ECS перенос атомарен внутри `apply_world_commands`: Locomotion
    /// выключается только вокруг записи Transform, снаружи виден лишь итог.
    /// Host получает команду через `WorldAdapter::teleport` в том же порядке,
    /// что и остальные WorldCommand тика.
    Teleport {
        object: ObjectId,
        position: Vec3,
        rotation: Quat,
    },
    ConfigureCamera { camera: ObjectId, config: CameraConfig },
    UnlockExtraJump { object: ObjectId },
}

impl WorldCommand {
    pub fn object(&self) -> ObjectId {
        match self {
            WorldCommand::SetActive { object, .. }
            | WorldCommand::Teleport { object, .. }
            | WorldCommand::UnlockExtraJump { object } => *object,
            WorldCommand::ConfigureCamera { camera, .. } => *camera,
        }
    }
}

/// Система: применить WorldCommand к ECS компонентам (SimulationSet::World)
///
/// Неизвестный ObjectId или объект без нужного компонента → warning, команда пропускается.
pub fn apply_world_commands(
    mut world_commands: EventReader<WorldCommand>,
    registry: Res<ObjectRegistry>,
    mut presences: Query<&mut Presence>,
    mut interactables: Query<&mut Interactable>,
    mut bodies: Query<(&mut Transform, Option<&mut Locomotion>)>,
    mut cameras: Query<&mut TutorialCamera>,
    mut jumps: Query<&mut JumpAbility>,
) {
    for command in world_commands.read() {
        let Some(entity) = registry.get(command.object()) else {
            logger::log_warning(&format!("{}", HostError::UnknownObject(command.object())));
            continue;
        };

        match command {
            WorldCommand::SetActive { object, active } => {
                let Ok(mut presence) = presences.get_mut(entity) else {
                    continue;
                };
                if presence.active == *active {
                    continue;
                }
                presence.active = *active;

                if !*active {
                    if let Ok(mut interactable) = interactables.get_mut(entity) {
                        interactable.on_disabled();
                    }
                }
                logger::log(&format!("World: {:?} active = {}", object, active));
            }

            WorldCommand::Teleport {
                object,
                position,
                rotation,
            } => {
                let Ok((mut transform, mut locomotion)) = bodies.get_mut(entity) else {
                    logger::log_warning(&format!("World: teleport target {:?} has no Transform", object));
                    continue;
                };

                if let Some(locomotion) = locomotion.as_mut() {
                    locomotion.enabled = false;
                }
                transform.translation = *position;
                transform.rotation = *rotation;
                if let Some(locomotion) = locomotion.as_mut() {
                    locomotion.enabled = true;
                }

                logger::log_info(&format!("World: {:?} teleported to {}", object, position));
            }

            WorldCommand::ConfigureCamera { camera, config } => match cameras.get_mut(entity) {
                Ok(mut tutorial_camera) => tutorial_camera.apply(config),
                Err(_) => {
                    logger::log_warning(&format!("World: {:?} is not a TutorialCamera", camera));
                }
            },

            WorldCommand::UnlockExtraJump { object } => {
                if let Ok(mut jump) = jumps.get_mut(entity) {
                    if jump.unlock_extra_jump() {
                        logger::log_info(&format!("World: double jump unlocked for {:?}", object));
                    }
                }
            }
        }
    }
}

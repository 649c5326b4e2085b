//! Пользовательские activation hooks (аналог onActivate/onDeactivate callbacks)
//!
//! Hook может упасть: ошибка ловится на границе вызова, логируется,
//! тик продолжается.

use bevy::prelude::*;

use crate::components::ObjectId;
use crate::error::HookError;
use crate::logger;

pub trait ActivationHook: Send + Sync {
    fn name(&self) -> &str;

    fn on_activate(&mut self, object: ObjectId) -> Result<(), HookError>;

    fn on_deactivate(&mut self, _object: ObjectId) -> Result<(), HookError> {
        Ok(())
    }
}

struct RegisteredHook {
    /// None = все объекты
    filter: Option<ObjectId>,
    hook: Box<dyn ActivationHook>,
}

/// Реестр hooks (Resource)
#[derive(Resource, Default)]
pub struct ActivationHooks {
    hooks: Vec<RegisteredHook>,
}

impl ActivationHooks {
    pub fn register(&mut self, hook: impl ActivationHook + 'static) {
        self.hooks.push(RegisteredHook {
            filter: None,
            hook: Box::new(hook),
        });
    }

    pub fn register_for(&mut self, object: ObjectId, hook: impl ActivationHook + 'static) {
        self.hooks.push(RegisteredHook {
            filter: Some(object),
            hook: Box::new(hook),
        });
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Вызвать hooks для перехода. Возвращает число упавших.
    pub fn dispatch(&mut self, object: ObjectId, activated: bool) -> usize {
        let mut failures = 0;

        for registered in self.hooks.iter_mut() {
            if registered.filter.is_some_and(|filter| filter != object) {
                continue;
            }

            let result = if activated {
                registered.hook.on_activate(object)
            } else {
                registered.hook.on_deactivate(object)
            };

            if let Err(err) = result {
                failures += 1;
                logger::log_error(&format!("{} (object {:?})", err, object));
            }
        }

        failures
    }
}

//! ObjectRegistry: ObjectId → Entity lookup
//!
//! Пересобирается в начале каждого тика. Ссылки между объектами хранят только
//! `ObjectId`; despawn объекта просто убирает его из таблицы.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::components::ObjectId;
use crate::logger;

#[derive(Resource, Debug, Default)]
pub struct ObjectRegistry {
    entities: HashMap<ObjectId, Entity>,
    /// Дубликаты логируем один раз, а не каждый тик
    reported_duplicates: HashSet<ObjectId>,
}

impl ObjectRegistry {
    pub fn get(&self, id: ObjectId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Пересобрать таблицу. При дубликате выигрывает entity с меньшим id
    /// (порядок query не детерминирован). Возвращает впервые замеченные дубликаты.
    pub fn rebuild(&mut self, objects: impl IntoIterator<Item = (Entity, ObjectId)>) -> Vec<ObjectId> {
        self.entities.clear();
        let mut duplicates = Vec::new();

        for (entity, id) in objects {
            match self.entities.get_mut(&id) {
                Some(existing) => {
                    *existing = (*existing).min(entity);
                    if self.reported_duplicates.insert(id) {
                        duplicates.push(id);
                    }
                }
                None => {
                    self.entities.insert(id, entity);
                }
            }
        }

        duplicates
    }
}

/// Система: пересборка registry (SimulationSet::Index)
pub fn rebuild_object_registry(mut registry: ResMut<ObjectRegistry>, objects: Query<(Entity, &ObjectId)>) {
    let duplicates = registry.rebuild(objects.iter().map(|(entity, id)| (entity, *id)));

    for id in duplicates {
        logger::log_warning(&format!("ObjectRegistry: duplicate object id {:?}", id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_reports_duplicates_once() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut registry = ObjectRegistry::default();
        let first = registry.rebuild([(b, ObjectId(1)), (a, ObjectId(1))]);
        let second = registry.rebuild([(a, ObjectId(1)), (b, ObjectId(1))]);

        assert_eq!(first, vec![ObjectId(1)]);
        assert!(second.is_empty());
        assert_eq!(registry.get(ObjectId(1)), Some(a.min(b)));
    }

    #[test]
    fn test_rebuild_drops_despawned() {
        let mut world = World::new();
        let a = world.spawn_empty().id();

        let mut registry = ObjectRegistry::default();
        registry.rebuild([(a, ObjectId(5))]);
        assert!(registry.contains(ObjectId(5)));

        registry.rebuild(std::iter::empty::<(Entity, ObjectId)>());
        assert_eq!(registry.get(ObjectId(5)), None);
    }
}

use std::collections::BTreeMap;

use crate::component::Component;
use crate::components::Tag;
use crate::entity::{Entity, EntityId};

/// Entities queued for destruction at the next flush.
///
/// Handed to iteration callbacks so destruction requested mid-iteration never
/// invalidates the walk.
#[derive(Debug, Default, Clone)]
pub struct DestroyQueue {
    pending: Vec<EntityId>,
}

impl DestroyQueue {
    /// Queue `id`. Invalid and already-queued ids are ignored.
    pub fn destroy(&mut self, id: EntityId) {
        if !id.is_valid() || self.pending.contains(&id) {
            return;
        }
        self.pending.push(id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Owns every entity of a scene.
///
/// Ids are allocated from a counter starting at 1 and never reused, so iteration by id
/// is creation order.
#[derive(Debug)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
    pending: DestroyQueue,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
            pending: DestroyQueue::default(),
        }
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity. An empty name becomes `Entity_<id>`.
    pub fn create(&mut self, name: &str) -> &mut Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let name = if name.is_empty() {
            format!("Entity_{}", id.0)
        } else {
            name.to_string()
        };
        tracing::trace!(id = id.0, %name, "entity created");
        self.entities.entry(id).or_insert_with(|| Entity::new(id, name))
    }

    /// Queue `id` for destruction. Unknown ids are ignored.
    pub fn destroy(&mut self, id: EntityId) {
        if self.entities.contains_key(&id) {
            self.pending.destroy(id);
        }
    }

    pub fn is_pending_destroy(&self, id: EntityId) -> bool {
        self.pending.contains(id)
    }

    /// Drop every queued entity. Returns how many were removed.
    pub fn flush_pending_destroys(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let removed = std::mem::take(&mut self.pending.pending)
            .into_iter()
            .filter(|id| self.entities.remove(id).is_some())
            .count();
        tracing::debug!(removed, remaining = self.entities.len(), "flushed destroyed entities");
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// All entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// First entity (lowest id) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.name() == name)
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| e.get::<Tag>().is_some_and(|t| t.value == tag))
            .collect()
    }

    /// Ids of entities carrying a `K`, in creation order.
    pub fn find_with<K: Component>(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.has::<K>())
            .map(Entity::id)
            .collect()
    }

    /// Visit every active entity.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut Entity, &mut DestroyQueue)) {
        let pending = &mut self.pending;
        for entity in self.entities.values_mut().filter(|e| e.is_active()) {
            f(entity, pending);
        }
    }

    /// Visit the enabled `K` of every active entity.
    pub fn for_each_with<K: Component>(
        &mut self,
        mut f: impl FnMut(EntityId, &mut K, &mut DestroyQueue),
    ) {
        let pending = &mut self.pending;
        for entity in self.entities.values_mut().filter(|e| e.is_active()) {
            let id = entity.id();
            if let Some(component) = entity.get_mut::<K>() {
                if component.is_enabled() {
                    f(id, component, pending);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop all entities and pending destroys. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending = DestroyQueue::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{SpriteRenderer, Transform};
    use glam::Vec2;

    #[test]
    fn ids_start_at_one_and_names_default() {
        let mut reg = EntityRegistry::new();
        let a = reg.create("").id();
        let b = reg.create("hero").id();
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));
        assert_eq!(reg.get(a).unwrap().name(), "Entity_1");
        assert_eq!(reg.find_by_name("hero").unwrap().id(), b);
    }

    #[test]
    fn destroy_inside_for_each_is_deferred() {
        let mut reg = EntityRegistry::new();
        let ids: Vec<EntityId> = (0..3).map(|_| reg.create("").id()).collect();

        let mut visited = Vec::new();
        reg.for_each(|e, queue| {
            visited.push(e.id());
            if e.id() == ids[0] {
                queue.destroy(ids[1]);
            }
        });
        assert_eq!(visited, ids);
        assert_eq!(reg.len(), 3);
        assert!(reg.get(ids[1]).is_some());
        assert!(reg.is_pending_destroy(ids[1]));

        assert_eq!(reg.flush_pending_destroys(), 1);
        assert_eq!(reg.len(), 2);
        assert!(reg.get(ids[1]).is_none());
    }

    #[test]
    fn double_destroy_is_a_no_op() {
        let mut reg = EntityRegistry::new();
        let id = reg.create("x").id();
        reg.destroy(id);
        reg.destroy(id);
        reg.destroy(EntityId(99));
        assert_eq!(reg.flush_pending_destroys(), 1);
        reg.destroy(id);
        assert_eq!(reg.flush_pending_destroys(), 0);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut reg = EntityRegistry::new();
        let a = reg.create("a").id();
        reg.destroy(a);
        reg.flush_pending_destroys();
        reg.clear();
        let b = reg.create("b").id();
        assert!(b > a);
    }

    #[test]
    fn tag_and_component_queries() {
        let mut reg = EntityRegistry::new();
        let a = reg.create("a").id();
        reg.get_mut(a).unwrap().add(Tag::new("enemy"));
        let b = reg.create("b");
        b.add(Tag::new("enemy"));
        b.add(SpriteRenderer::default());
        let b = b.id();
        reg.create("c").add(Tag::new("friend"));

        let enemies: Vec<EntityId> = reg.find_by_tag("enemy").iter().map(|e| e.id()).collect();
        assert_eq!(enemies, vec![a, b]);
        assert_eq!(reg.find_with::<SpriteRenderer>(), vec![b]);
        assert_eq!(reg.find_with::<Transform>().len(), 3);
    }

    #[test]
    fn for_each_with_skips_inactive_and_disabled() {
        let mut reg = EntityRegistry::new();
        let moving = reg.create("moving").id();
        let idle = reg.create("idle");
        idle.set_active(false);
        let frozen = reg.create("frozen");
        frozen.transform_mut().unwrap().set_enabled(false);

        let mut seen = Vec::new();
        reg.for_each_with::<Transform>(|id, t, _| {
            t.translate(Vec2::new(1.0, 0.0));
            seen.push(id);
        });
        assert_eq!(seen, vec![moving]);
        assert_eq!(reg.get(moving).unwrap().transform().unwrap().position.x, 1.0);
    }

    #[test]
    fn flush_detaches_components() {
        let mut reg = EntityRegistry::new();
        let id = reg.create("x").id();
        let detached = reg.get_mut(id).unwrap().remove::<Transform>().unwrap();
        assert_eq!(detached.owner(), None);
        reg.destroy(id);
        assert_eq!(reg.flush_pending_destroys(), 1);
        assert!(reg.is_empty());
    }
}

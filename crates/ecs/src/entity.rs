use std::any::TypeId;
use std::collections::HashMap;

use crate::component::Component;
use crate::components::Transform;

/// Identity of an entity. `0` is reserved as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId(pub u32);

impl EntityId {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named identity owning at most one component per kind.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    active: bool,
    components: HashMap<TypeId, Box<dyn Component>>,
    /// Attach order of the kinds in `components`.
    order: Vec<TypeId>,
}

impl Entity {
    /// Create an entity carrying a default [`Transform`].
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        let mut entity = Self {
            id,
            name: name.into(),
            active: true,
            components: HashMap::new(),
            order: Vec::new(),
        };
        entity.add_default::<Transform>();
        entity
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Attach `component`, or return the existing instance of that kind (the new value
    /// is dropped).
    pub fn add<K: Component>(&mut self, component: K) -> &mut K {
        self.add_with(|| component)
    }

    pub fn add_default<K: Component + Default>(&mut self) -> &mut K {
        self.add_with(K::default)
    }

    /// Construct-or-return: `ctor` only runs when the kind is not attached yet.
    pub fn add_with<K: Component>(&mut self, ctor: impl FnOnce() -> K) -> &mut K {
        let kind = TypeId::of::<K>();
        let owner = self.id;
        let order = &mut self.order;
        let slot = self.components.entry(kind).or_insert_with(|| {
            let mut component: Box<dyn Component> = Box::new(ctor());
            component.on_attach(owner);
            order.push(kind);
            component
        });
        // Slots are only ever filled under their own `TypeId`, so the downcast cannot
        // miss; `get_mut` has the same shape but reports absence as `None`.
        slot.as_any_mut()
            .downcast_mut::<K>()
            .expect("component slot holds the type it is keyed by")
    }

    pub fn get<K: Component>(&self) -> Option<&K> {
        self.components
            .get(&TypeId::of::<K>())
            .and_then(|c| c.as_any().downcast_ref::<K>())
    }

    pub fn get_mut<K: Component>(&mut self) -> Option<&mut K> {
        self.components
            .get_mut(&TypeId::of::<K>())
            .and_then(|c| c.as_any_mut().downcast_mut::<K>())
    }

    pub fn has<K: Component>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<K>())
    }

    /// Detach and return the component of kind `K`. Dropping the box destroys it.
    pub fn remove<K: Component>(&mut self) -> Option<Box<K>> {
        let kind = TypeId::of::<K>();
        let mut component = self.components.remove(&kind)?;
        component.on_detach();
        self.order.retain(|k| *k != kind);
        component.into_any().downcast::<K>().ok()
    }

    /// Components in attach order.
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        self.order
            .iter()
            .filter_map(|k| self.components.get(k))
            .map(|c| c.as_ref())
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.get::<Transform>()
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.get_mut::<Transform>()
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        for component in self.components.values_mut() {
            component.on_detach();
        }
    }
}

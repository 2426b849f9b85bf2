//! Entity/component runtime.
//!
//! Entities own a small set of heterogeneous components, at most one per kind, looked
//! up by the component's `TypeId`. The [`EntityRegistry`] owns entities and defers
//! destruction to an explicit flush point.
//!
//! # Invariants
//! - At most one component instance per kind per entity; adding an existing kind
//!   returns the existing instance.
//! - A component's owner is the id of the entity that holds it, set on attach and
//!   cleared on detach.
//! - Entity ids are non-zero and never reused within a process run.
//! - Destruction requested during iteration takes effect only at
//!   [`EntityRegistry::flush_pending_destroys`].

mod component;
pub mod components;
mod entity;
mod registry;

pub use component::{Component, ComponentBase};
pub use components::{Animator, BoxCollider, SpriteRenderer, Tag, Transform};
pub use entity::{Entity, EntityId};
pub use registry::{DestroyQueue, EntityRegistry};

pub fn crate_info() -> &'static str {
    "isoworks-ecs v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert_eq!(crate_info(), "isoworks-ecs v0.1.0");
    }
}

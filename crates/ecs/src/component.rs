use std::any::Any;
use std::fmt::Debug;

use crate::entity::EntityId;

/// State every component carries: the enable flag and the owner back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBase {
    pub enabled: bool,
    pub owner: Option<EntityId>,
}

impl Default for ComponentBase {
    fn default() -> Self {
        Self {
            enabled: true,
            owner: None,
        }
    }
}

/// Capability interface shared by all component kinds.
///
/// Concrete kinds are plain structs with a `base: ComponentBase` field; the
/// [`impl_component!`](crate::impl_component) macro supplies the accessor boilerplate.
/// `on_attach`/`on_detach` may be overridden to hook attachment, but overrides must
/// still keep `owner` in sync.
pub trait Component: Any + Debug {
    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn kind_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn on_attach(&mut self, owner: EntityId) {
        self.base_mut().owner = Some(owner);
    }

    fn on_detach(&mut self) {
        self.base_mut().owner = None;
    }

    fn owner(&self) -> Option<EntityId> {
        self.base().owner
    }

    fn is_enabled(&self) -> bool {
        self.base().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().enabled = enabled;
    }
}

/// Implement [`Component`] for a struct with a `base: ComponentBase` field.
#[macro_export]
macro_rules! impl_component {
    ($ty:ty) => {
        impl $crate::Component for $ty {
            fn base(&self) -> &$crate::ComponentBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::ComponentBase {
                &mut self.base
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }
        }
    };
}

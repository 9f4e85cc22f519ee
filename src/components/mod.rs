//! [Components](Component) are the plain data records attached to entities.
//!
//! Each component type owns a process-wide [ComponentId]; every [World](crate::World)
//! maps the ids it encounters onto one of its 32 bit planes through its own class registry.

mod class_registry;
mod component_id;
mod component_set;
mod component_type;

pub use class_registry::MAX_CLASSES;
pub(crate) use class_registry::*;
pub use component_id::*;
pub use component_set::*;
pub use component_type::*;
pub use pulse_ecs_derive::Component;

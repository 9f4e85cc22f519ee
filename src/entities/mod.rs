//! [Entities](Entity) represent the individual "things" in your game or application.
//!
//! An [Entity] doesn't store any data and has no associated behaviour;
//! it is only a row of the entity table, whose bitmask tells which
//! [Components](crate::components::Component) are currently attached to it.
//! Rows are reused once an entity is deleted.

mod entity_query;
mod entity_table;
mod entity_instance;

pub use entity_query::*;
pub use entity_instance::*;
pub(crate) use entity_table::*;

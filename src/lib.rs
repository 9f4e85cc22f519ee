//! A small entity-component runtime driven by an external frame loop.
//!
//! Entities are plain ids into a table of component bitmasks, components live in one
//! typed column per class, and [systems](systems::System) cooperate through the
//! [`World`](world::World) instead of referencing each other. Attach/detach operations
//! take effect immediately, while match notifications are buffered and resolved once
//! per tick by [`World::apply_changes`](world::World::apply_changes).

extern crate self as pulse_ecs;

pub mod data_structures;
pub mod components;
pub mod entities;
pub mod changes;
pub mod systems;
mod context;
mod config;
mod error;
mod world;

pub use lazy_static::lazy_static;
#[doc(hidden)]
pub use paste;

pub mod prelude {
	pub use crate::systems::*;
	pub use crate::components::*;
	pub use crate::world::World;
	pub use crate::context::Runtime;
	pub use crate::error::{EcsError, Result};
	pub use crate::config::{RuntimeConfig, WorldConfig};
	pub use crate::changes::{Direction, Handler, SubscriptionId, Subscriptions};
	pub use crate::entities::{Entity, Query, QueryBuilder};
}

pub use context::Runtime;
pub use config::{RuntimeConfig, WorldConfig};
pub use error::{BoxedError, EcsError, Result, SystemResult};
pub use world::World;

#[cfg(test)]
mod tests;

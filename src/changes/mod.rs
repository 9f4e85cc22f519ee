//! Deferred match notifications.
//!
//! Every attach/detach is logged as it happens while the entity table is updated
//! immediately. [World::apply_changes](crate::World::apply_changes) later diffs each
//! touched entity's mask against every subscriber's query and fires the
//! "entered match" and "left match" handlers, repeating until handlers stop
//! producing new changes.

mod change_queue;
mod subscription;

pub(crate) use change_queue::*;
pub use subscription::*;

use crate::components::ComponentSet;
use crate::entities::{Entity, Query, QueryMask};
use crate::error::SystemResult;
use crate::world::World;

/// Callback fired for an entity whose match state changed.
pub type Handler = Box<dyn FnMut(&mut World, Entity) -> SystemResult>;

/// Which transition a subscriber listens for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
	/// The entity did not match the query before the flush and matches it now.
	Enter,
	/// The entity matched the query before the flush and no longer does.
	Exit,
}

/// Handle returned when registering a subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u32);

pub(crate) struct Subscriber {
	pub id: SubscriptionId,
	pub mask: QueryMask,
	pub direction: Direction,
	pub handler: Handler,
}

/// Declarative match/unmatch handlers collected from a [System](crate::systems::System)
/// when it is added to a [Runtime](crate::Runtime).
///
/// Handlers are `'static` closures; state shared with the system itself is usually
/// kept behind an `Rc<RefCell<_>>` or `Rc<Cell<_>>`.
#[derive(Default)]
pub struct Subscriptions {
	entries: Vec<(Query, Direction, Handler)>,
}

impl Subscriptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Run `handler` once when an entity gains the last of the components in `S`.
	pub fn on_match<S: ComponentSet>(
		&mut self, handler: impl FnMut(&mut World, Entity) -> SystemResult + 'static,
	) -> &mut Self {
		self.on_query(Query::of::<S>(), Direction::Enter, handler)
	}

	/// Run `handler` once when an entity stops carrying all of the components in `S`.
	pub fn on_unmatch<S: ComponentSet>(
		&mut self, handler: impl FnMut(&mut World, Entity) -> SystemResult + 'static,
	) -> &mut Self {
		self.on_query(Query::of::<S>(), Direction::Exit, handler)
	}

	pub fn on_query(
		&mut self, query: Query, direction: Direction,
		handler: impl FnMut(&mut World, Entity) -> SystemResult + 'static,
	) -> &mut Self {
		self.entries.push((query, direction, Box::new(handler)));
		self
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn into_entries(self) -> Vec<(Query, Direction, Handler)> {
		self.entries
	}
}

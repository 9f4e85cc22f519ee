use crate::changes::{Direction, Handler, Subscriber, SubscriptionId};
use crate::entities::{Entity, EntityTable, QueryMask};
use crate::data_structures::BitMask;
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;

type Hasher = BuildHasherDefault<NoHashHasher<Entity>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
	Attach,
	Detach,
}

/// A raw attach/detach record: the class bits that changed on one entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
	pub entity: Entity,
	pub delta: BitMask,
	pub kind: ChangeKind,
}

impl ChangeEvent {
	pub(crate) fn attach(entity: Entity, delta: BitMask) -> Self {
		Self { entity, delta, kind: ChangeKind::Attach }
	}

	pub(crate) fn detach(entity: Entity, delta: BitMask) -> Self {
		Self { entity, delta, kind: ChangeKind::Detach }
	}
}

/// The mask of an entity at the start and at the end of one flush round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
	pub entity: Entity,
	pub before: BitMask,
	pub after: BitMask,
}

impl Transition {
	/// The direction in which this transition crosses `mask`, if it does.
	pub fn crossing(&self, mask: &QueryMask) -> Option<Direction> {
		match (mask.matches(self.before), mask.matches(self.after)) {
			(false, true) => Some(Direction::Enter),
			(true, false) => Some(Direction::Exit),
			_ => None,
		}
	}
}

/// One handler call planned by a flush round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Delivery {
	pub subscriber: SubscriptionId,
	pub entity: Entity,
}

/// Pending change log and the subscribers it is diffed against.
///
/// While a round is dispatched its subscribers are moved out; `taken` remembers their ids
/// and `removed` the ones unsubscribed in the meantime.
#[derive(Default)]
pub(crate) struct ChangeQueue {
	events: Vec<ChangeEvent>,
	deferred: Vec<Delivery>,
	subscribers: Vec<Subscriber>,
	taken: Vec<SubscriptionId>,
	removed: Vec<SubscriptionId>,
	next_id: u32,
}

impl ChangeQueue {
	pub fn record(&mut self, event: ChangeEvent) {
		self.events.push(event);
	}

	/// Raw events plus handler calls left over by a failed flush.
	pub fn pending(&self) -> usize {
		self.events.len() + self.deferred.len()
	}

	pub fn take_events(&mut self) -> Vec<ChangeEvent> {
		std::mem::take(&mut self.events)
	}

	/// Handler calls a failed flush did not get to, in their original order.
	pub fn take_deferred(&mut self) -> Vec<Delivery> {
		std::mem::take(&mut self.deferred)
	}

	pub fn defer(&mut self, deliveries: impl IntoIterator<Item = Delivery>) {
		self.deferred.extend(deliveries);
	}

	/// The handler calls for one round: subscriber-major, transitions in first-touch order.
	pub fn plan(&self, transitions: &[Transition]) -> Vec<Delivery> {
		self.subscribers
			.iter()
			.flat_map(|subscriber| {
				transitions
					.iter()
					.filter(|t| t.crossing(&subscriber.mask) == Some(subscriber.direction))
					.map(|t| Delivery { subscriber: subscriber.id, entity: t.entity })
			})
			.collect()
	}

	pub fn subscribe(&mut self, mask: QueryMask, direction: Direction, handler: Handler) -> SubscriptionId {
		let id = SubscriptionId(self.next_id);
		self.next_id += 1;
		self.subscribers.push(Subscriber { id, mask, direction, handler });
		id
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.subscribers.len();
		self.subscribers.retain(|s| s.id != id);
		let mut found = self.subscribers.len() != before;

		if !found && self.taken.contains(&id) && !self.removed.contains(&id) {
			self.removed.push(id);
			found = true;
		}
		if found {
			self.deferred.retain(|d| d.subscriber != id);
		}
		found
	}

	/// Whether `id` was unsubscribed while its subscriber was moved out.
	pub fn is_removed(&self, id: SubscriptionId) -> bool {
		self.removed.contains(&id)
	}

	pub fn subscriber_count(&self) -> usize {
		self.subscribers.len() + self.taken.len() - self.removed.len()
	}

	/// Moves the subscribers out so their handlers can borrow the world mutably.
	pub fn take_subscribers(&mut self) -> Vec<Subscriber> {
		let subscribers = std::mem::take(&mut self.subscribers);
		self.taken = subscribers.iter().map(|s| s.id).collect();
		subscribers
	}

	/// Puts subscribers back after dispatch, keeping any registered in the meantime after them
	/// and dropping those unsubscribed in the meantime.
	pub fn restore_subscribers(&mut self, mut subscribers: Vec<Subscriber>) {
		let removed = std::mem::take(&mut self.removed);
		self.taken.clear();
		subscribers.retain(|s| !removed.contains(&s.id));

		let added = std::mem::replace(&mut self.subscribers, subscribers);
		self.subscribers.extend(added);
	}
}

/// Collapses a round of raw events into one transition per touched entity, in first-touch order.
///
/// The mask before the round is rebuilt by undoing `events` in reverse from the current table,
/// so any sequence of attach/detach calls reduces to its net effect. Entities whose mask ends
/// where it started produce no transition.
pub(crate) fn resolve_transitions(events: &[ChangeEvent], table: &EntityTable) -> Vec<Transition> {
	let mut order = Vec::new();
	let mut before: HashMap<Entity, BitMask, Hasher> = HashMap::default();

	for event in events {
		before.entry(event.entity).or_insert_with(|| {
			order.push(event.entity);
			table.mask(event.entity)
		});
	}

	for event in events.iter().rev() {
		if let Some(mask) = before.get_mut(&event.entity) {
			match event.kind {
				ChangeKind::Attach => mask.remove(event.delta),
				ChangeKind::Detach => mask.insert(event.delta),
			}
		}
	}

	order
		.into_iter()
		.filter_map(|entity| {
			let before = before.get(&entity).copied()?;
			let after = table.mask(entity);
			(before != after).then_some(Transition { entity, before, after })
		})
		.collect()
}

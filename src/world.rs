use crate::changes::{resolve_transitions, ChangeEvent, ChangeQueue, Delivery, Direction, Handler, SubscriptionId};
use crate::components::{ClassRegistry, Component, ComponentSet, ComponentType};
use crate::entities::{Entity, EntityTable, Query, QueryMask};
use crate::error::{EcsError, Result, SystemResult};
use crate::data_structures::BitMask;
use rand::{rngs::StdRng, SeedableRng};
use crate::config::WorldConfig;
use log::trace;

/// A container for [entities](Entity), their [components](Component) and the
/// subscribers waiting for their match state to change.
///
/// Component accessors take the component type as a type parameter and the entity as
/// argument: `world.get::<Position>(entity)`.
pub struct World {
	entities: EntityTable,
	classes: ClassRegistry,
	changes: ChangeQueue,
	rng: StdRng,
}

impl World {
	pub fn new() -> Self {
		Self::with_config(WorldConfig::default())
	}

	pub fn with_config(config: WorldConfig) -> Self {
		Self {
			entities: EntityTable::with_capacity(config.entity_capacity),
			classes: ClassRegistry::new(),
			changes: ChangeQueue::default(),
			rng: StdRng::seed_from_u64(config.seed),
		}
	}

	/// Creates an [`entity`](Entity), reusing the lowest free id, with a default `T` attached.
	pub fn add_entity<T: Component>(&mut self) -> Result<(Entity, &mut T)> {
		let bit = self.classes.register::<T>()?;
		let entity = self.entities.allocate();
		Ok((entity, self.attach_bit(entity, bit)))
	}

	/// Attaches a fresh default `T` to `entity` and returns it.
	///
	/// Registers `T` with this world on first use. If `T` is already attached its value is
	/// replaced and no change is recorded.
	pub fn attach<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
		if !self.entities.is_alive(entity) {
			return Err(EcsError::NoSuchEntity(entity));
		}
		let bit = self.classes.register::<T>()?;
		Ok(self.attach_bit(entity, bit))
	}

	/// Gets a reference to the `T` attached to `entity`.
	pub fn get<T: Component>(&self, entity: Entity) -> Result<&T> {
		let bit = self.attached_bit::<T>(entity)?;
		Ok(self.classes.column::<T>(bit).get(entity.slot()))
	}

	/// Gets a mutable reference to the `T` attached to `entity`.
	pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
		let bit = self.attached_bit::<T>(entity)?;
		Ok(self.classes.column_mut::<T>(bit).get_mut(entity.slot()))
	}

	pub fn has<T: Component>(&self, entity: Entity) -> bool {
		self.attached_bit::<T>(entity).is_ok()
	}

	/// Detaches `T` from `entity`.
	///
	/// Detaching a component that is not attached fails with [EcsError::MissingComponent];
	/// guard with [has](Self::has) when presence is optional. An entity left without
	/// components becomes free and its id may be reused.
	pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<()> {
		let bit = self.attached_bit::<T>(entity)?;
		self.entities.remove_bit(entity, bit);
		self.changes.record(ChangeEvent::detach(entity, BitMask::single(bit)));
		Ok(())
	}

	/// Deletes `entity`, making its id available for reuse.
	///
	/// Component values are left in place but are unreachable through the cleared mask.
	/// Subscribers whose query the entity matched are notified at the next flush.
	pub fn delete_entity(&mut self, entity: Entity) -> Result<()> {
		let mask = self.entities.free(entity).ok_or(EcsError::NoSuchEntity(entity))?;
		self.changes.record(ChangeEvent::detach(entity, mask));
		Ok(())
	}

	pub fn is_alive(&self, entity: Entity) -> bool {
		self.entities.is_alive(entity)
	}

	/// Number of live entities.
	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.len() == 0
	}

	/// Number of entity rows, live or free.
	pub fn capacity(&self) -> usize {
		self.entities.capacity()
	}

	/// All live entities in ascending id order.
	pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
		self.entities.iter().map(|(entity, _)| entity)
	}

	/// The component classes registered so far, in bit order.
	pub fn component_types(&self) -> impl Iterator<Item = &ComponentType> + '_ {
		(0..self.classes.len() as u32).filter_map(move |bit| self.classes.component_type(bit))
	}

	/// The components currently attached to `entity`.
	pub fn components_of(&self, entity: Entity) -> Vec<&ComponentType> {
		let mask = self.entities.mask(entity);
		mask.iter_ones().filter_map(|bit| self.classes.component_type(bit)).collect()
	}

	/// The world-owned random number generator, seeded from [WorldConfig::seed].
	pub fn rng(&mut self) -> &mut StdRng {
		&mut self.rng
	}

	pub fn reseed(&mut self, seed: u64) {
		self.rng = StdRng::seed_from_u64(seed);
	}

	// Queries

	/// Snapshot of the entities carrying every component of `S`, in ascending id order.
	pub fn select<S: ComponentSet>(&self) -> Vec<Entity> {
		self.select_query(&Query::of::<S>())
	}

	/// Snapshot of the entities carrying all of `I` and none of `E`.
	pub fn select_except<I: ComponentSet, E: ComponentSet>(&self) -> Vec<Entity> {
		self.select_query(&Query::build().include::<I>().exclude::<E>().create())
	}

	pub fn select_query(&self, query: &Query) -> Vec<Entity> {
		self.matching(query).collect()
	}

	/// The lowest id carrying every component of `S`.
	pub fn first<S: ComponentSet>(&self) -> Result<Entity> {
		self.first_query(&Query::of::<S>())
	}

	pub fn first_query(&self, query: &Query) -> Result<Entity> {
		self.matching(query).next().ok_or(EcsError::EmptyQueryResult)
	}

	/// The `T` of the lowest id carrying one.
	pub fn first_component<T: Component>(&self) -> Result<&T> {
		let entity = self.first::<(T,)>()?;
		self.get(entity)
	}

	pub fn first_component_mut<T: Component>(&mut self) -> Result<&mut T> {
		let entity = self.first::<(T,)>()?;
		self.get_mut(entity)
	}

	/// Number of entities carrying every component of `S`.
	pub fn count<S: ComponentSet>(&self) -> usize {
		self.count_query(&Query::of::<S>())
	}

	pub fn count_query(&self, query: &Query) -> usize {
		self.matching(query).count()
	}

	// Change notification

	/// Calls `handler` once per flush for every entity that starts matching all of `S`.
	pub fn on_attach<S: ComponentSet>(
		&mut self, handler: impl FnMut(&mut World, Entity) -> SystemResult + 'static,
	) -> Result<SubscriptionId> {
		self.subscribe(Query::of::<S>(), Direction::Enter, handler)
	}

	/// Calls `handler` once per flush for every entity that stops matching all of `S`.
	pub fn on_detach<S: ComponentSet>(
		&mut self, handler: impl FnMut(&mut World, Entity) -> SystemResult + 'static,
	) -> Result<SubscriptionId> {
		self.subscribe(Query::of::<S>(), Direction::Exit, handler)
	}

	/// Registers `handler` for `direction` transitions of `query`.
	///
	/// Every class named by the query is registered with this world, which can fail with
	/// [EcsError::RegistryOverflow]. The next flush reports every pending transition, including
	/// those recorded before this call.
	pub fn subscribe(
		&mut self, query: Query, direction: Direction,
		handler: impl FnMut(&mut World, Entity) -> SystemResult + 'static,
	) -> Result<SubscriptionId> {
		self.subscribe_boxed(query, direction, Box::new(handler))
	}

	pub fn subscribe_boxed(&mut self, query: Query, direction: Direction, handler: Handler) -> Result<SubscriptionId> {
		let mask = QueryMask::register(&mut self.classes, &query)?;
		let id = self.changes.subscribe(mask, direction, handler);
		trace!("subscribed {:?} to {:?} of {:?}", id, direction, query);
		Ok(id)
	}

	/// Removes a subscription. Returns `false` if it was unknown.
	///
	/// Handlers may unsubscribe any subscription during a flush, their own included; the
	/// removed handler gets no further calls, not even for the rest of the current round.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		self.changes.unsubscribe(id)
	}

	/// Registers every class in `types`, or none of them if they would not all fit.
	pub(crate) fn register_types(&mut self, types: &[ComponentType]) -> Result<()> {
		self.classes.register_all(types).map(|_| ())
	}

	pub fn subscriber_count(&self) -> usize {
		self.changes.subscriber_count()
	}

	/// Number of raw attach/detach events, plus handler calls left over by a failed flush,
	/// waiting for the next flush.
	pub fn pending_changes(&self) -> usize {
		self.changes.pending()
	}

	/// Fires the match handlers for every change recorded since the previous flush.
	///
	/// Changes made by the handlers themselves are resolved before this returns, so chained
	/// reactions complete within one call. Handlers creating changes forever never return.
	///
	/// The first handler error is returned unchanged. The handler calls of that round that did
	/// not run yet are kept, together with the changes recorded by handlers, and the next flush
	/// makes them first. Returns the number of handler calls.
	pub fn apply_changes(&mut self) -> SystemResult<usize> {
		let mut fired = 0;
		let mut round = 0;

		let deferred = self.changes.take_deferred();
		if !deferred.is_empty() {
			trace!("resuming {} deferred handler calls", deferred.len());
			self.dispatch(deferred, &mut fired)?;
		}

		loop {
			let events = self.changes.take_events();
			if events.is_empty() {
				break;
			}

			round += 1;
			let transitions = resolve_transitions(&events, &self.entities);
			let deliveries = self.changes.plan(&transitions);
			trace!(
				"flush round {}: {} events, {} transitions, {} handler calls",
				round, events.len(), transitions.len(), deliveries.len()
			);
			self.dispatch(deliveries, &mut fired)?;
		}

		Ok(fired)
	}

	/// Runs `deliveries` in order. On error the calls after the failing one are deferred.
	fn dispatch(&mut self, deliveries: Vec<Delivery>, fired: &mut usize) -> SystemResult {
		if deliveries.is_empty() {
			return Ok(());
		}

		let mut subscribers = self.changes.take_subscribers();
		let mut deliveries = deliveries.into_iter();
		let mut result = Ok(());

		for delivery in deliveries.by_ref() {
			if self.changes.is_removed(delivery.subscriber) {
				continue;
			}
			let subscriber = match subscribers.iter_mut().find(|s| s.id == delivery.subscriber) {
				Some(subscriber) => subscriber,
				None => continue,
			};
			if let Err(error) = (subscriber.handler)(self, delivery.entity) {
				result = Err(error);
				break;
			}
			*fired += 1;
		}

		self.changes.defer(deliveries);
		self.changes.restore_subscribers(subscribers);
		result
	}

	fn matching(&self, query: &Query) -> impl Iterator<Item = Entity> + '_ {
		let mask = QueryMask::resolve(&self.classes, query);
		self.entities
			.iter()
			.filter(move |(_, m)| mask.map_or(false, |q| q.matches(*m)))
			.map(|(entity, _)| entity)
	}

	fn attached_bit<T: Component>(&self, entity: Entity) -> Result<u32> {
		let mask = self.entities.mask(entity);
		match self.classes.bit_of(T::component_id()) {
			Some(bit) if mask.get(bit) => Ok(bit),
			_ => Err(EcsError::MissingComponent {
				entity,
				name: std::any::type_name::<T>(),
			}),
		}
	}

	fn attach_bit<T: Component>(&mut self, entity: Entity, bit: u32) -> &mut T {
		if self.entities.insert_bit(entity, bit) {
			self.changes.record(ChangeEvent::attach(entity, BitMask::single(bit)));
		}
		self.classes.column_mut::<T>(bit).reset(entity.slot())
	}
}

impl Default for World {
	fn default() -> Self {
		Self::new()
	}
}

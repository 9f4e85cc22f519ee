use crate::tests::{A, B, C, D};
use crate::prelude::*;
use crate::{BoxedError, SystemResult};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counter() -> (Rc<Cell<u32>>, impl FnMut(&mut World, Entity) -> SystemResult + 'static) {
	let count = Rc::new(Cell::new(0));
	let handle = count.clone();
	(count, move |_: &mut World, _: Entity| -> SystemResult {
		handle.set(handle.get() + 1);
		Ok(())
	})
}

#[test]
pub fn enter_fires_once_when_the_match_completes() {
	let mut world = World::new();
	let (count, handler) = counter();
	world.on_attach::<(A, B)>(handler).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 0);

	world.attach::<B>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 1);

	world.attach::<C>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 1);
}

#[test]
pub fn exit_fires_once_when_the_match_breaks() {
	let mut world = World::new();
	let (count, handler) = counter();
	world.on_detach::<(A, B)>(handler).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	world.attach::<C>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 0);

	world.detach::<C>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 0);

	world.detach::<B>(entity).unwrap();
	assert_eq!(world.apply_changes().unwrap(), 1);
	assert_eq!(count.get(), 1);
}

#[test]
pub fn repeated_changes_before_a_flush_fire_once() {
	let mut world = World::new();
	let (entered, on_enter) = counter();
	let (exited, on_exit) = counter();
	world.on_attach::<(A, B)>(on_enter).unwrap();
	world.on_detach::<(A, B)>(on_exit).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	world.detach::<B>(entity).unwrap();
	world.attach::<B>(entity).unwrap();
	world.attach::<C>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (1, 0));

	world.detach::<C>(entity).unwrap();
	world.detach::<B>(entity).unwrap();
	world.attach::<D>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (1, 1));
}

#[test]
pub fn net_zero_changes_fire_nothing() {
	let mut world = World::new();
	let (entered, on_enter) = counter();
	let (exited, on_exit) = counter();
	world.on_attach::<(A, B)>(on_enter).unwrap();
	world.on_detach::<(A, B)>(on_exit).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();

	world.attach::<B>(entity).unwrap();
	world.detach::<B>(entity).unwrap();
	assert_eq!(world.apply_changes().unwrap(), 0);

	world.attach::<B>(entity).unwrap();
	world.apply_changes().unwrap();
	world.detach::<B>(entity).unwrap();
	world.attach::<B>(entity).unwrap();
	assert_eq!(world.apply_changes().unwrap(), 0);

	// Created and deleted within one window.
	let (short_lived, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(short_lived).unwrap();
	world.delete_entity(short_lived).unwrap();
	assert_eq!(world.apply_changes().unwrap(), 0);

	assert_eq!((entered.get(), exited.get()), (1, 0));
}

#[test]
pub fn handlers_chain_within_one_flush() {
	let mut world = World::new();
	world
		.on_attach::<(A, B)>(|world, entity| {
			world.attach::<C>(entity)?.0 = 7;
			Ok(())
		})
		.unwrap();

	let seen = Rc::new(RefCell::new(Vec::new()));
	let log = seen.clone();
	world
		.on_attach::<(A, C)>(move |world, entity| {
			log.borrow_mut().push((entity, world.get::<C>(entity)?.0));
			Ok(())
		})
		.unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	assert_eq!(world.apply_changes().unwrap(), 2);

	assert_eq!(*seen.borrow(), vec![(entity, 7)]);
	assert_eq!(world.pending_changes(), 0);
}

#[test]
pub fn exit_follows_enter_in_the_next_round() {
	let mut world = World::new();
	world
		.on_attach::<(A, B)>(|world, entity| {
			world.detach::<B>(entity)?;
			Ok(())
		})
		.unwrap();
	let (exited, on_exit) = counter();
	world.on_detach::<(A, B)>(on_exit).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	assert_eq!(world.apply_changes().unwrap(), 2);
	assert_eq!(exited.get(), 1);
	assert!(!world.has::<B>(entity));
}

#[test]
pub fn dispatch_is_subscriber_major_in_first_touch_order() {
	let mut world = World::new();
	let calls = Rc::new(RefCell::new(Vec::new()));

	for tag in ["first", "second"] {
		let log = calls.clone();
		world
			.on_attach::<(B,)>(move |_, entity| {
				log.borrow_mut().push((tag, entity.index()));
				Ok(())
			})
			.unwrap();
	}

	let (e0, _) = world.add_entity::<A>().unwrap();
	let (e1, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(e1).unwrap();
	world.attach::<B>(e0).unwrap();
	world.apply_changes().unwrap();

	assert_eq!(
		*calls.borrow(),
		vec![("first", 0), ("first", 1), ("second", 0), ("second", 1)]
	);
}

#[test]
pub fn deleting_an_entity_fires_exit() {
	let mut world = World::new();
	let deleted = Rc::new(RefCell::new(Vec::new()));
	let log = deleted.clone();
	world
		.on_detach::<(A,)>(move |world, entity| {
			log.borrow_mut().push((entity, world.is_alive(entity)));
			Ok(())
		})
		.unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	world.apply_changes().unwrap();

	world.delete_entity(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!(*deleted.borrow(), vec![(entity, false)]);
}

#[test]
pub fn excluded_classes_drive_transitions() {
	let mut world = World::new();
	let (entered, on_enter) = counter();
	let (exited, on_exit) = counter();
	let query = Query::build().include::<(A,)>().exclude::<(B,)>().create();
	world.subscribe(query.clone(), Direction::Enter, on_enter).unwrap();
	world.subscribe(query, Direction::Exit, on_exit).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (1, 0));

	world.attach::<B>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (1, 1));

	world.detach::<B>(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (2, 1));
}

#[test]
pub fn subscribing_registers_classes() {
	let mut world = World::new();
	world.on_attach::<(C, D)>(|_, _| Ok(())).unwrap();
	assert_eq!(world.component_types().count(), 2);
	assert_eq!(world.subscriber_count(), 1);
}

#[test]
pub fn handler_errors_abort_the_flush() {
	let mut world = World::new();
	world
		.on_attach::<(A,)>(|world, entity| {
			world.attach::<C>(entity)?;
			world.first::<(D,)>()?;
			Ok(())
		})
		.unwrap();
	let (count, handler) = counter();
	world.on_attach::<(A,)>(handler).unwrap();

	world.add_entity::<A>().unwrap();
	let error: BoxedError = world.apply_changes().unwrap_err();
	assert_eq!(error.downcast_ref::<EcsError>(), Some(&EcsError::EmptyQueryResult));

	// The second handler's call and the first handler's own change wait for the next flush.
	assert_eq!(count.get(), 0);
	assert_eq!(world.pending_changes(), 2);
	assert_eq!(world.subscriber_count(), 2);

	assert_eq!(world.apply_changes().unwrap(), 1);
	assert_eq!(count.get(), 1);
	assert_eq!(world.pending_changes(), 0);
}

#[test]
pub fn enter_and_exit_alternate_across_failed_flushes() {
	let mut world = World::new();
	let armed = Rc::new(Cell::new(true));
	let trigger = armed.clone();
	world
		.on_attach::<(A,)>(move |_, _| {
			if trigger.replace(false) {
				return Err("first call fails".into());
			}
			Ok(())
		})
		.unwrap();
	let (entered, on_enter) = counter();
	let (exited, on_exit) = counter();
	world.on_attach::<(A,)>(on_enter).unwrap();
	world.on_detach::<(A,)>(on_exit).unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	assert_eq!(world.apply_changes().unwrap_err().to_string(), "first call fails");
	assert_eq!((entered.get(), exited.get()), (0, 0));

	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (1, 0));

	world.delete_entity(entity).unwrap();
	world.apply_changes().unwrap();
	assert_eq!((entered.get(), exited.get()), (1, 1));
}

#[test]
pub fn handlers_can_unsubscribe_other_handlers() {
	let mut world = World::new();
	let target = Rc::new(Cell::new(None::<SubscriptionId>));
	let results = Rc::new(RefCell::new(Vec::<bool>::new()));

	let (target_id, log) = (target.clone(), results.clone());
	world
		.on_attach::<(A,)>(move |world, _| {
			if let Some(id) = target_id.get() {
				log.borrow_mut().push(world.unsubscribe(id));
			}
			Ok(())
		})
		.unwrap();
	let (count, handler) = counter();
	target.set(Some(world.on_attach::<(A,)>(handler).unwrap()));

	world.add_entity::<A>().unwrap();
	world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	// Removed before its first call of the round.
	assert_eq!(count.get(), 0);
	assert_eq!(world.subscriber_count(), 1);

	world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 0);
	assert_eq!(*results.borrow(), vec![true, false, false]);
}

#[test]
pub fn handlers_can_unsubscribe_themselves() {
	let mut world = World::new();
	let own = Rc::new(Cell::new(None::<SubscriptionId>));
	let calls = Rc::new(Cell::new(0));

	let (own_id, handle) = (own.clone(), calls.clone());
	let id = world
		.on_attach::<(A,)>(move |world, _| {
			handle.set(handle.get() + 1);
			if let Some(id) = own_id.get() {
				assert!(world.unsubscribe(id));
			}
			Ok(())
		})
		.unwrap();
	own.set(Some(id));

	world.add_entity::<A>().unwrap();
	world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	assert_eq!(calls.get(), 1);
	assert_eq!(world.subscriber_count(), 0);
	assert!(!world.unsubscribe(id));
}

#[test]
pub fn subscriptions_made_during_a_flush_start_next_round() {
	let mut world = World::new();
	let late = Rc::new(Cell::new(0));
	let handle = late.clone();
	world
		.on_attach::<(A, B)>(move |world, entity| {
			let (count, handler) = counter();
			handle.set(handle.get() + 1);
			world.on_attach::<(A,)>(handler)?;
			world.on_attach::<(C,)>(move |_, _| {
				assert_eq!(count.get(), 0);
				Ok(())
			})?;
			world.attach::<C>(entity)?;
			Ok(())
		})
		.unwrap();

	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	// One call from the original subscriber, one from the late `C` subscriber.
	assert_eq!(world.apply_changes().unwrap(), 2);
	assert_eq!(late.get(), 1);
	assert_eq!(world.subscriber_count(), 3);
}

#[test]
pub fn unsubscribed_handlers_stop_firing() {
	let mut world = World::new();
	let (count, handler) = counter();
	let id = world.on_attach::<(A,)>(handler).unwrap();

	world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	assert!(world.unsubscribe(id));
	assert!(!world.unsubscribe(id));

	world.add_entity::<A>().unwrap();
	world.apply_changes().unwrap();
	assert_eq!(count.get(), 1);
	assert_eq!(world.subscriber_count(), 0);
}

#[test]
pub fn flushing_clears_pending_changes() {
	let mut world = World::new();
	let (entity, _) = world.add_entity::<A>().unwrap();
	world.attach::<B>(entity).unwrap();
	assert_eq!(world.pending_changes(), 2);

	assert_eq!(world.apply_changes().unwrap(), 0);
	assert_eq!(world.pending_changes(), 0);
}

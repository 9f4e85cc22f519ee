//! A unique runtime identifier tied to a [Component] type.
//!
//! Developers shouldn't rely on [component ids](ComponentId), as they are not stable between program re-runs.
//! They only decide which bit plane a component class receives inside a [World](crate::World).

use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::AtomicUsize;
use crate::components::Component;

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// A globally unique identifier for a type implementing the [`Component`] trait.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct ComponentId {
	value: usize,
}

impl ComponentId {
	/// Get the [ComponentId] of the type `T`.
	#[inline(always)]
	pub fn of<T: Component>() -> ComponentId {
		T::component_id()
	}

	/// Generates a new [ComponentId]. **Should not be called from user code.**
	///
	/// Called once per type from the code generated by #\[derive([Component])].
	#[doc(hidden)]
	pub fn next() -> ComponentId {
		let value = NEXT_ID.fetch_add(1, Relaxed);
		debug_assert!(value <= u32::MAX as usize, "Component id space exhausted");
		ComponentId { value }
	}
}

impl nohash_hasher::IsEnabled for ComponentId {}

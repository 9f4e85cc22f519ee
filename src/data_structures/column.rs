use crate::components::Component;
use std::any::Any;

/// Type-erased view of a [Column], one per registered component class.
pub(crate) trait AnyColumn {
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Densely packed storage for one component class, indexed by entity id.
///
/// Slots of entities that don't carry the component hold stale or default values;
/// the entity table decides which slots are readable.
pub(crate) struct Column<T: Component> {
	values: Vec<T>,
}

impl<T: Component> Column<T> {
	pub fn new() -> Self {
		Self { values: Vec::new() }
	}

	/// Replace the value at `index` with a fresh default instance, growing the column if needed.
	pub fn reset(&mut self, index: usize) -> &mut T {
		if self.values.len() <= index {
			self.values.resize_with(index + 1, T::default);
		} else {
			self.values[index] = T::default();
		}
		&mut self.values[index]
	}

	/// # Panics
	/// Panics if `index` was never reset.
	#[inline(always)]
	pub fn get(&self, index: usize) -> &T {
		&self.values[index]
	}

	/// # Panics
	/// Panics if `index` was never reset.
	#[inline(always)]
	pub fn get_mut(&mut self, index: usize) -> &mut T {
		&mut self.values[index]
	}
}

impl<T: Component> AnyColumn for Column<T> {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

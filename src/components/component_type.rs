use crate::data_structures::{AnyColumn, Column};
use crate::components::ComponentId;
use std::hash::{Hash, Hasher};
use std::fmt;

/// A data record that can be attached to an [Entity](crate::entities::Entity).
///
/// A fresh `Default` instance is constructed every time the component is attached.
/// Use #\[derive([`Component`](pulse_ecs_derive::Component))] rather than implementing it by hand.
pub trait Component: 'static + Default {
	fn component_id() -> ComponentId;
}

/// A runtime representation of a type implementing the [`Component`] trait.
#[derive(Clone, Copy)]
pub struct ComponentType {
	id: ComponentId,
	name: &'static str,
	make_column: fn() -> Box<dyn AnyColumn>,
}

impl ComponentType {
	/// Returns the [`ComponentType`] of T.
	pub fn of<T: Component>() -> Self {
		Self {
			id: ComponentId::of::<T>(),
			name: std::any::type_name::<T>(),
			make_column: || Box::new(Column::<T>::new()) as Box<dyn AnyColumn>,
		}
	}

	pub const fn id(&self) -> ComponentId {
		self.id
	}

	pub const fn name(&self) -> &'static str {
		self.name
	}

	pub(crate) fn make_column(&self) -> Box<dyn AnyColumn> {
		(self.make_column)()
	}
}

impl Eq for ComponentType {}

impl PartialEq<Self> for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Hash for ComponentType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state)
	}
}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentType").field("id", &self.id).field("name", &self.name).finish()
	}
}

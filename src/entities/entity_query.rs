use crate::components::{ClassRegistry, ComponentSet, ComponentType};
use crate::data_structures::BitMask;
use crate::entities::FREE;
use crate::error::Result;
use std::marker::PhantomData;
use std::sync::Arc;
use std::fmt;

/// A set of component classes an entity must carry, and optionally a set it must not carry.
///
/// Queries are world-independent; each [World](crate::World) reduces them to a bitmask
/// using its own class registry.
#[derive(Clone)]
pub struct Query {
	include: Arc<[ComponentType]>,
	exclude: Arc<[ComponentType]>,
}

impl Query {
	pub fn build() -> QueryBuilder {
		QueryBuilder::default()
	}

	/// A query matching every entity that carries all of `S`.
	pub fn of<S: ComponentSet>() -> Self {
		Self {
			include: S::component_types(),
			exclude: <()>::component_types(),
		}
	}

	pub fn include(&self) -> &[ComponentType] {
		&self.include
	}

	pub fn exclude(&self) -> &[ComponentType] {
		&self.exclude
	}
}

impl fmt::Debug for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names = |types: &[ComponentType]| types.iter().map(|t| t.name()).collect::<Vec<_>>();
		f.debug_struct("Query")
			.field("include", &names(&self.include))
			.field("exclude", &names(&self.exclude))
			.finish()
	}
}

/// A utility structure to build [Queries](Query).
pub struct QueryBuilder<I: 'static + ComponentSet = (), E: 'static + ComponentSet = ()> {
	i_phantom: PhantomData<&'static I>,
	e_phantom: PhantomData<&'static E>,
}

impl Default for QueryBuilder {
	fn default() -> Self {
		Self {
			i_phantom: PhantomData,
			e_phantom: PhantomData,
		}
	}
}

impl<I: 'static + ComponentSet, E: 'static + ComponentSet> QueryBuilder<I, E> {
	/// Specify which types to include in the query.
	pub fn include<TI: 'static + ComponentSet>(self) -> QueryBuilder<TI, E> {
		QueryBuilder {
			i_phantom: PhantomData,
			e_phantom: PhantomData,
		}
	}

	/// Specify which types to exclude from the query.
	pub fn exclude<TE: 'static + ComponentSet>(self) -> QueryBuilder<I, TE> {
		QueryBuilder {
			i_phantom: PhantomData,
			e_phantom: PhantomData,
		}
	}

	/// Construct a query from the previously specified types.
	pub fn create(self) -> Query {
		Query {
			include: I::component_types(),
			exclude: E::component_types(),
		}
	}
}

/// A [Query] reduced to the bit planes of one world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct QueryMask {
	include: BitMask,
	exclude: BitMask,
}

impl QueryMask {
	/// Resolves `query` without registering anything.
	///
	/// Returns `None` when an included class is unknown to the registry, as no entity can carry it.
	/// Unknown excluded classes are ignored for the same reason.
	pub fn resolve(classes: &ClassRegistry, query: &Query) -> Option<Self> {
		let mut include = BitMask::new();
		for ty in query.include() {
			include.set(classes.bit_of(ty.id())?, true);
		}

		let exclude = query.exclude().iter().filter_map(|ty| classes.bit_of(ty.id())).collect();
		Some(Self { include, exclude })
	}

	/// Resolves `query`, registering every class it names.
	pub fn register(classes: &mut ClassRegistry, query: &Query) -> Result<Self> {
		let types: Vec<ComponentType> = query.include().iter().chain(query.exclude()).copied().collect();
		let bits = classes.register_all(&types)?;
		let (include, exclude) = bits.split_at(query.include().len());
		Ok(Self {
			include: include.iter().copied().collect(),
			exclude: exclude.iter().copied().collect(),
		})
	}

	/// Free rows never match, not even the empty query.
	#[inline(always)]
	pub fn matches(&self, mask: BitMask) -> bool {
		mask != FREE && mask.contains(self.include) && !mask.intersects(self.exclude)
	}
}

use crate::components::{Component, ComponentId, ComponentType};
use crate::data_structures::{AnyColumn, Column};
use crate::error::{EcsError, Result};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use std::collections::HashMap;
use log::debug;

type Hasher = BuildHasherDefault<NoHashHasher<ComponentId>>;

/// Number of distinct component classes a single world can hold.
pub const MAX_CLASSES: usize = 32;

/// Assigns each component class seen by a world a permanent bit index
/// and owns the typed column backing that class.
pub(crate) struct ClassRegistry {
	bits: HashMap<ComponentId, u32, Hasher>,
	types: Vec<ComponentType>,
	columns: Vec<Box<dyn AnyColumn>>,
}

impl ClassRegistry {
	pub fn new() -> Self {
		Self {
			bits: HashMap::default(),
			types: Vec::with_capacity(MAX_CLASSES),
			columns: Vec::with_capacity(MAX_CLASSES),
		}
	}

	/// The bit index of `id`, if the class was registered in this world.
	#[inline(always)]
	pub fn bit_of(&self, id: ComponentId) -> Option<u32> {
		self.bits.get(&id).copied()
	}

	pub fn register<T: Component>(&mut self) -> Result<u32> {
		match self.bit_of(T::component_id()) {
			Some(bit) => Ok(bit),
			None => self.register_type(&ComponentType::of::<T>()),
		}
	}

	/// Registers a class, assigning the next free bit on first use.
	pub fn register_type(&mut self, ty: &ComponentType) -> Result<u32> {
		if let Some(bit) = self.bit_of(ty.id()) {
			return Ok(bit);
		}
		if self.types.len() >= MAX_CLASSES {
			return Err(EcsError::RegistryOverflow { name: ty.name() });
		}

		let bit = self.types.len() as u32;
		self.bits.insert(ty.id(), bit);
		self.types.push(*ty);
		self.columns.push(ty.make_column());

		debug!("registered component `{}` on bit {}", ty.name(), bit);
		Ok(bit)
	}

	/// Registers every class in `types`, or none of them if they would not all fit.
	pub fn register_all(&mut self, types: &[ComponentType]) -> Result<Vec<u32>> {
		let mut unseen: Vec<ComponentId> =
			types.iter().map(|t| t.id()).filter(|id| self.bit_of(*id).is_none()).collect();
		unseen.sort_unstable();
		unseen.dedup();

		if self.types.len() + unseen.len() > MAX_CLASSES {
			let rejected = types.iter().rev().find(|t| self.bit_of(t.id()).is_none());
			let name = rejected.map_or("<unknown>", |t| t.name());
			return Err(EcsError::RegistryOverflow { name });
		}

		types.iter().map(|t| self.register_type(t)).collect()
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn component_type(&self, bit: u32) -> Option<&ComponentType> {
		self.types.get(bit as usize)
	}

	pub fn column<T: Component>(&self, bit: u32) -> &Column<T> {
		// Bit and column are pushed together in register_type.
		self.columns[bit as usize]
			.as_any()
			.downcast_ref()
			.expect("component column does not match its class")
	}

	pub fn column_mut<T: Component>(&mut self, bit: u32) -> &mut Column<T> {
		// Bit and column are pushed together in register_type.
		self.columns[bit as usize]
			.as_any_mut()
			.downcast_mut()
			.expect("component column does not match its class")
	}
}

use crate::data_structures::BitMask;
use crate::entities::Entity;
use log::trace;

/// Sentinel mask of a free row.
pub(crate) const FREE: BitMask = BitMask::EMPTY;

/// One component bitmask per entity row; a row holding [FREE] may be reused.
pub(crate) struct EntityTable {
	masks: Vec<BitMask>,
	live: usize,
	/// No free row exists below this index.
	first_free: usize,
}

impl EntityTable {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			masks: Vec::with_capacity(capacity),
			live: 0,
			first_free: 0,
		}
	}

	/// Hands out the lowest free row, appending one if every row is in use.
	///
	/// The row stays [FREE] until a bit is set on it; callers attach a component right away.
	pub fn allocate(&mut self) -> Entity {
		let start = self.first_free.min(self.masks.len());
		let index = match self.masks[start..].iter().position(|m| *m == FREE) {
			Some(offset) => start + offset,
			None => {
				self.masks.push(FREE);
				self.masks.len() - 1
			},
		};

		self.first_free = index + 1;
		trace!("allocated entity row {}", index);
		Entity::from_index(index as u32)
	}

	/// The current mask of `entity`, [FREE] when it is out of range.
	#[inline(always)]
	pub fn mask(&self, entity: Entity) -> BitMask {
		self.masks.get(entity.slot()).copied().unwrap_or(FREE)
	}

	#[inline(always)]
	pub fn is_alive(&self, entity: Entity) -> bool {
		self.mask(entity) != FREE
	}

	/// Sets `bit` on `entity`. Returns `false` if it was already set.
	pub fn insert_bit(&mut self, entity: Entity, bit: u32) -> bool {
		let mask = &mut self.masks[entity.slot()];
		if mask.get(bit) {
			return false;
		}
		if *mask == FREE {
			self.live += 1;
		}
		mask.set(bit, true);
		true
	}

	/// Clears `bit` on `entity`. A row left without bits becomes free.
	pub fn remove_bit(&mut self, entity: Entity, bit: u32) {
		let mask = &mut self.masks[entity.slot()];
		debug_assert!(mask.get(bit));
		mask.set(bit, false);
		if *mask == FREE {
			self.release(entity);
		}
	}

	/// Resets `entity` to [FREE]. Returns the mask it held, or `None` if it was not alive.
	pub fn free(&mut self, entity: Entity) -> Option<BitMask> {
		let mask = self.masks.get_mut(entity.slot())?;
		if *mask == FREE {
			return None;
		}
		let previous = std::mem::replace(mask, FREE);
		self.release(entity);
		Some(previous)
	}

	/// Live rows with their masks, in ascending id order.
	pub fn iter(&self) -> impl Iterator<Item = (Entity, BitMask)> + '_ {
		self.masks
			.iter()
			.enumerate()
			.filter(|(_, mask)| **mask != FREE)
			.map(|(index, mask)| (Entity::from_index(index as u32), *mask))
	}

	/// Number of live entities.
	pub fn len(&self) -> usize {
		self.live
	}

	/// Number of rows, live or free.
	pub fn capacity(&self) -> usize {
		self.masks.len()
	}

	fn release(&mut self, entity: Entity) {
		self.live -= 1;
		self.first_free = self.first_free.min(entity.slot());
		trace!("released entity row {}", entity.index);
	}
}

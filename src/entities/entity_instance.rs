use std::fmt;

/// A handle to an entity: the index of its row in the entity table.
///
/// Handles carry no generation, so a deleted entity's handle names whichever
/// entity reuses its row next.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
	pub(crate) index: u32,
}

impl Entity {
	pub const fn from_index(index: u32) -> Self {
		Self { index }
	}

	pub const fn index(&self) -> u32 {
		self.index
	}

	#[inline(always)]
	pub(crate) const fn slot(&self) -> usize {
		self.index as usize
	}
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "entity #{}", self.index)
	}
}

impl nohash_hasher::IsEnabled for Entity {}

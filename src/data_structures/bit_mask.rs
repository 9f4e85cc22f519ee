use std::ops::{BitAnd, BitOr, Not};
use std::fmt;

const BITS: u32 = u32::BITS;

/// A fixed-size set of component class bits.
///
/// Bit `i` stands for the class registered at index `i` of a [World](crate::World).
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BitMask {
	value: u32,
}

impl BitMask {
	/// The mask with no bits set. Marks a free entity slot.
	pub const EMPTY: BitMask = BitMask { value: 0 };

	/// Create a new, empty [BitMask].
	pub const fn new() -> Self {
		Self::EMPTY
	}

	/// Create a [BitMask] with only bit `i` set.
	///
	/// # Arguments
	/// * `i` - The index of the bit to set, below 32
	pub const fn single(i: u32) -> Self {
		debug_assert!(i < BITS);
		Self { value: 1 << i }
	}

	pub const fn from_bits(value: u32) -> Self {
		Self { value }
	}

	pub const fn bits(&self) -> u32 {
		self.value
	}

	/// Get the value of the bit at index `i`.
	///
	/// # Arguments
	/// * `i` - The index of the bit to retrieve
	#[inline(always)]
	pub const fn get(&self, i: u32) -> bool {
		i < BITS && self.value & (1 << i) != 0
	}

	/// Set the value of the bit at index `i`.
	///
	/// # Arguments
	/// * `i` - The index of the bit to modify
	#[inline(always)]
	pub fn set(&mut self, i: u32, value: bool) {
		debug_assert!(i < BITS);
		match value {
			true => self.value |= 1 << i,
			false => self.value &= !(1 << i),
		}
	}

	/// Set every bit of `other`.
	#[inline(always)]
	pub fn insert(&mut self, other: BitMask) {
		self.value |= other.value;
	}

	/// Clear every bit of `other`.
	#[inline(always)]
	pub fn remove(&mut self, other: BitMask) {
		self.value &= !other.value;
	}

	/// Check if every bit of `other` is also set in this mask.
	#[inline(always)]
	pub const fn contains(&self, other: BitMask) -> bool {
		self.value & other.value == other.value
	}

	/// Check if this mask shares at least one bit with `other`.
	#[inline(always)]
	pub const fn intersects(&self, other: BitMask) -> bool {
		self.value & other.value != 0
	}

	pub const fn is_empty(&self) -> bool {
		self.value == 0
	}

	/// Number of set bits.
	pub const fn len(&self) -> usize {
		self.value.count_ones() as usize
	}

	/// Iterate over the indices of the set bits, lowest first.
	pub fn iter_ones(&self) -> BitMaskIterator {
		BitMaskIterator { remaining: self.value }
	}
}

impl BitOr for BitMask {
	type Output = BitMask;

	fn bitor(self, rhs: Self) -> Self::Output {
		BitMask { value: self.value | rhs.value }
	}
}

impl BitAnd for BitMask {
	type Output = BitMask;

	fn bitand(self, rhs: Self) -> Self::Output {
		BitMask { value: self.value & rhs.value }
	}
}

impl Not for BitMask {
	type Output = BitMask;

	fn not(self) -> Self::Output {
		BitMask { value: !self.value }
	}
}

impl FromIterator<u32> for BitMask {
	fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
		let mut mask = BitMask::new();
		for i in iter {
			mask.set(i, true);
		}
		mask
	}
}

impl fmt::Debug for BitMask {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "BitMask({:#034b})", self.value)
	}
}

/// Iterates over the indices of the set bits of a [BitMask].
pub struct BitMaskIterator {
	remaining: u32,
}

impl Iterator for BitMaskIterator {
	type Item = u32;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		let bit = self.remaining.trailing_zeros();
		self.remaining &= self.remaining - 1;
		Some(bit)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.remaining.count_ones() as usize;
		(len, Some(len))
	}
}

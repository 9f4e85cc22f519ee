/// Construction parameters for a [World](crate::World).
#[derive(Clone, Debug)]
pub struct WorldConfig {
	/// Number of entity slots reserved up front.
	pub entity_capacity: usize,
	/// Seed of the world-owned random number generator.
	pub seed: u64,
}

impl WorldConfig {
	pub fn with_capacity(mut self, entity_capacity: usize) -> Self {
		self.entity_capacity = entity_capacity;
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}
}

impl Default for WorldConfig {
	fn default() -> Self {
		Self {
			entity_capacity: 64,
			seed: 0,
		}
	}
}

/// Construction parameters for a [Runtime](crate::Runtime).
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
	pub world: WorldConfig,
}

impl RuntimeConfig {
	pub fn with_world(mut self, world: WorldConfig) -> Self {
		self.world = world;
		self
	}
}

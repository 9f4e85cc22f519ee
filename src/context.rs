use crate::systems::{Phase, State, System, SystemStore};
use crate::error::{Result, SystemResult};
use std::ops::{Deref, DerefMut};
use crate::config::RuntimeConfig;
use crate::world::World;
use log::{debug, trace};

/// Owns a [World] and the [systems](System) that act on it, and drives one tick per call to
/// [update](Runtime::update).
///
/// All [World] methods are reachable directly on the runtime.
pub struct Runtime {
	world: World,
	system_store: SystemStore,
	ticks: u64,
}

impl Runtime {
	pub fn new() -> Self {
		Self::with_config(RuntimeConfig::default())
	}

	pub fn with_config(config: RuntimeConfig) -> Self {
		Self {
			world: World::with_config(config.world),
			system_store: SystemStore::new(),
			ticks: 0,
		}
	}

	/// Add a new [system](System) to the [Runtime].
	///
	/// The system joins every phase it implements and its subscriptions are registered with
	/// the world. Fails once the runtime has started, or if a system of the same type was added.
	pub fn add_system<T: System>(&mut self, system: T) -> Result<()> {
		self.system_store.add_system(system, &mut self.world)
	}

	/// Builder-style [add_system](Self::add_system).
	pub fn with_system<T: System>(mut self, system: T) -> Result<Self> {
		self.add_system(system)?;
		Ok(self)
	}

	/// Runs every create hook, then every link hook, then flushes pending changes.
	///
	/// Called by the first [update](Self::update) if not called before. Create and link hook
	/// errors are returned unchanged and leave the runtime unable to tick: later calls fail with
	/// [EcsError::StartupFailed](crate::EcsError::StartupFailed). A handler error from the
	/// startup flush is returned as well, but the runtime counts as started and the handler
	/// calls left over run at the next flush.
	pub fn start(&mut self) -> SystemResult {
		if self.system_store.state() == State::Running {
			return Ok(());
		}
		self.system_store.start(&mut self.world)?;
		let fired = self.world.apply_changes()?;
		debug!("runtime started, {} handlers fired", fired);
		Ok(())
	}

	/// Runs one tick: input, update and output systems in registration order, then a single
	/// flush of the changes they made.
	///
	/// The first failing hook or handler aborts the tick and its error is returned unchanged.
	pub fn update(&mut self, delta_time: f32) -> SystemResult {
		self.start()?;
		self.system_store.run_tick(&mut self.world, delta_time)?;
		let fired = self.world.apply_changes()?;
		self.ticks += 1;
		trace!("tick {} done, {} handlers fired", self.ticks, fired);
		Ok(())
	}

	pub fn is_started(&self) -> bool {
		self.system_store.state() == State::Running
	}

	/// Number of completed ticks.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn system_count(&self) -> usize {
		self.system_store.len()
	}

	/// Number of systems taking part in `phase`.
	pub fn phase_len(&self, phase: Phase) -> usize {
		self.system_store.phase_len(phase)
	}

	pub fn world(&self) -> &World {
		&self.world
	}

	pub fn world_mut(&mut self) -> &mut World {
		&mut self.world
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

impl Deref for Runtime {
	type Target = World;

	#[inline(always)]
	fn deref(&self) -> &Self::Target {
		&self.world
	}
}

impl DerefMut for Runtime {
	#[inline(always)]
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.world
	}
}

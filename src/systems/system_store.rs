use crate::systems::{Phase, System};
use crate::error::{EcsError, Result, SystemResult};
use crate::changes::Subscriptions;
use crate::components::ComponentType;
use std::collections::HashSet;
use crate::world::World;
use std::any::TypeId;
use log::debug;

const PHASE_COUNT: usize = Phase::ALL.len();

pub(crate) struct SystemStore {
	state: State,
	set: HashSet<TypeId>,
	systems: Vec<Box<dyn System>>,
	phases: [Vec<usize>; PHASE_COUNT],
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum State {
	#[default]
	Registering,
	Starting,
	Running,
}

impl SystemStore {
	pub fn new() -> Self {
		Self {
			state: State::default(),
			set: HashSet::default(),
			systems: Vec::default(),
			phases: Default::default(),
		}
	}

	/// Buckets `system` into the phases it implements and forwards its subscriptions to `world`.
	pub fn add_system<T: System>(&mut self, mut system: T, world: &mut World) -> Result<()> {
		if self.state != State::Registering {
			return Err(EcsError::SystemsLocked);
		}
		if self.set.contains(&TypeId::of::<T>()) {
			return Err(EcsError::DuplicateSystem(system.name()));
		}

		let mut subscriptions = Subscriptions::new();
		system.subscribe(&mut subscriptions);
		let entries = subscriptions.into_entries();

		// Register every class up front so an overflow leaves the world untouched.
		let types: Vec<ComponentType> = entries
			.iter()
			.flat_map(|(query, _, _)| query.include().iter().chain(query.exclude()))
			.copied()
			.collect();
		world.register_types(&types)?;

		let subscription_count = entries.len();
		for (query, direction, handler) in entries {
			world.subscribe_boxed(query, direction, handler)?;
		}

		let index = self.systems.len();
		let mut phases = Vec::new();
		for phase in Phase::ALL {
			if system.implements(phase) {
				self.phases[phase.index()].push(index);
				phases.push(phase);
			}
		}

		debug!(
			"added system `{}`: phases {:?}, {} subscriptions",
			system.name(), phases, subscription_count
		);
		self.set.insert(TypeId::of::<T>());
		self.systems.push(Box::new(system));
		Ok(())
	}

	/// Runs every create hook, then every link hook. Does nothing once started.
	pub fn start(&mut self, world: &mut World) -> SystemResult {
		match self.state {
			State::Registering => {
				debug!("starting {} systems", self.systems.len());
				self.state = State::Starting;
				self.run_phase(Phase::Create, world, 0.0)?;
				self.run_phase(Phase::Link, world, 0.0)?;
				self.state = State::Running;
				Ok(())
			},
			State::Starting => Err(EcsError::StartupFailed.into()),
			State::Running => Ok(()),
		}
	}

	/// Runs the tick phases in order. The store must be started.
	pub fn run_tick(&mut self, world: &mut World, delta_time: f32) -> SystemResult {
		match self.state {
			State::Running => {
				for phase in Phase::TICK {
					self.run_phase(phase, world, delta_time)?;
				}
				Ok(())
			},
			State::Registering | State::Starting => Err(EcsError::StartupFailed.into()),
		}
	}

	fn run_phase(&mut self, phase: Phase, world: &mut World, delta_time: f32) -> SystemResult {
		for &index in &self.phases[phase.index()] {
			let system = &mut self.systems[index];
			match phase {
				Phase::Create => {
					if let Some(system) = system.as_create() {
						system.on_create(world)?;
					}
				},
				Phase::Link => {
					if let Some(system) = system.as_link() {
						system.on_link(world)?;
					}
				},
				Phase::Input => {
					if let Some(system) = system.as_input() {
						system.on_input(world, delta_time)?;
					}
				},
				Phase::Update => {
					if let Some(system) = system.as_update() {
						system.on_update(world, delta_time)?;
					}
				},
				Phase::Output => {
					if let Some(system) = system.as_output() {
						system.on_output(world, delta_time)?;
					}
				},
			}
		}
		Ok(())
	}

	pub fn state(&self) -> State {
		self.state
	}

	pub fn len(&self) -> usize {
		self.systems.len()
	}

	pub fn phase_len(&self, phase: Phase) -> usize {
		self.phases[phase.index()].len()
	}
}

use crate::changes::Subscriptions;
use crate::error::SystemResult;
use crate::world::World;
use paste::paste;

/// One of the fixed stages a [Runtime](crate::Runtime) runs systems in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
	Create,
	Link,
	Input,
	Update,
	Output,
}

impl Phase {
	pub const ALL: [Phase; 5] = [Phase::Create, Phase::Link, Phase::Input, Phase::Update, Phase::Output];

	/// The phases run by every tick, in order.
	pub const TICK: [Phase; 3] = [Phase::Input, Phase::Update, Phase::Output];

	pub(crate) const fn index(self) -> usize {
		self as usize
	}
}

macro_rules! phase_traits {
    ($($(#[$meta: meta])* $phase: ident($($arg: ident: $ty: ty),*);)*) => {
        paste! {
            $(
                $(#[$meta])*
                pub trait $phase {
                    fn [<on_ $phase:snake>](&mut self, world: &mut World $(, $arg: $ty)*) -> SystemResult;
                }
            )*
        }
    };
}

phase_traits! {
	/// Runs once before the first tick. Entities created here are visible to every [Link] hook.
	Create();
	/// Runs once after every [Create] hook, to look up entities created by other systems.
	Link();
	/// First phase of every tick.
	Input(delta_time: f32);
	/// Simulation phase of every tick.
	Update(delta_time: f32);
	/// Last phase of every tick, before pending changes are flushed.
	Output(delta_time: f32);
}

/// A unit of behaviour registered with a [Runtime](crate::Runtime).
///
/// A system opts into phases by implementing the matching phase traits and exposing them
/// through the `as_*` accessors, most easily with [system_phases!](crate::system_phases).
/// Systems without any phase can still react to match changes through [subscribe](System::subscribe).
pub trait System: 'static {
	/// Name used in logs and errors.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}

	/// Declares the match/unmatch handlers forwarded to the world when the system is added.
	fn subscribe(&mut self, _subscriptions: &mut Subscriptions) {}

	fn as_create(&mut self) -> Option<&mut dyn Create> {
		None
	}

	fn as_link(&mut self) -> Option<&mut dyn Link> {
		None
	}

	fn as_input(&mut self) -> Option<&mut dyn Input> {
		None
	}

	fn as_update(&mut self) -> Option<&mut dyn Update> {
		None
	}

	fn as_output(&mut self) -> Option<&mut dyn Output> {
		None
	}

	/// Whether the system takes part in `phase`.
	fn implements(&mut self, phase: Phase) -> bool {
		match phase {
			Phase::Create => self.as_create().is_some(),
			Phase::Link => self.as_link().is_some(),
			Phase::Input => self.as_input().is_some(),
			Phase::Update => self.as_update().is_some(),
			Phase::Output => self.as_output().is_some(),
		}
	}
}

/// Implements the `as_*` accessors of [System] for the listed phases.
///
/// ```ignore
/// impl System for Movement {
///     pulse_ecs::system_phases!(Create, Update);
/// }
/// ```
#[macro_export]
macro_rules! system_phases {
    ($($phase: ident),* $(,)?) => {
        $crate::paste::paste! {
            $(
                fn [<as_ $phase:snake>](&mut self) -> Option<&mut dyn $crate::systems::$phase> {
                    Some(self)
                }
            )*
        }
    };
}

use crate::entities::Entity;
use thiserror::Error;

/// Errors raised by the [World](crate::World) and the [Runtime](crate::Runtime).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
	/// A 33rd distinct component class was used in one world.
	#[error("cannot register component `{name}`: a world holds at most 32 component classes")]
	RegistryOverflow {
		/// Type name of the rejected component.
		name: &'static str,
	},

	/// The entity does not currently have the requested component.
	#[error("{entity} has no component `{name}`")]
	MissingComponent {
		/// The entity that was accessed.
		entity: Entity,
		/// Type name of the missing component.
		name: &'static str,
	},

	/// `first`-style lookups found no matching entity.
	#[error("no entity matches the query")]
	EmptyQueryResult,

	/// The id is out of range or names a free slot.
	#[error("{0} does not exist")]
	NoSuchEntity(Entity),

	/// A second system of the same type was added.
	#[error("system `{0}` was already added to the runtime")]
	DuplicateSystem(&'static str),

	/// Systems can only be added before the runtime starts.
	#[error("systems cannot be added once the runtime has started")]
	SystemsLocked,

	/// A startup hook failed earlier, the runtime cannot tick.
	#[error("the runtime did not finish starting up")]
	StartupFailed,
}

pub type Result<T> = std::result::Result<T, EcsError>;

/// Error type returned by system hooks and change handlers.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a system hook or change handler. Failures propagate unchanged.
pub type SystemResult<T = ()> = std::result::Result<T, BoxedError>;

use crate::components::{Component, ComponentType};
use std::collections::HashMap;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::any::TypeId;
use std::sync::Arc;

lazy_static! {
	static ref EMPTY_SET: Arc<[ComponentType]> = Arc::from(Vec::new());
	static ref TYPE_TO_SET: Mutex<HashMap<TypeId, Arc<[ComponentType]>>> =
		Mutex::new(HashMap::default());
}

/// A set of [Component] types, written as a tuple: `(Position,)`, `(Position, Velocity)`.
///
/// Used to describe queries and subscriptions. Repeated types are collapsed.
pub trait ComponentSet: 'static {
	/// The member types sorted by [ComponentId](crate::components::ComponentId), without duplicates.
	fn component_types() -> Arc<[ComponentType]>;
}

impl ComponentSet for () {
	fn component_types() -> Arc<[ComponentType]> {
		EMPTY_SET.clone()
	}
}

macro_rules! impl_component_set {
    ($($t: ident),*) => {
        impl <$($t: Component),*> ComponentSet for ($($t),*,) {
            fn component_types() -> Arc<[ComponentType]> {
                let key = TypeId::of::<Self>();
                let mut sets = TYPE_TO_SET.lock();
                if let Some(set) = sets.get(&key) {
                    return set.clone();
                }

                let mut types = vec![$(ComponentType::of::<$t>()),*];
                types.sort_by_key(|t| t.id());
                types.dedup();

                let set: Arc<[ComponentType]> = Arc::from(types);
                sets.insert(key, set.clone());
                set
            }
        }
    };
}

impl_component_set!(T0);
impl_component_set!(T0, T1);
impl_component_set!(T0, T1, T2);
impl_component_set!(T0, T1, T2, T3);
impl_component_set!(T0, T1, T2, T3, T4);
impl_component_set!(T0, T1, T2, T3, T4, T5);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);

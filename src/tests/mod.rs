mod change_tests;

use crate::components::Component;

#[derive(Default, Component, Debug, PartialEq)]
pub struct A(pub u32);

#[derive(Default, Component, Debug, PartialEq)]
pub struct B(pub u32);

#[derive(Default, Component, Debug, PartialEq)]
pub struct C(pub u32);

#[derive(Default, Component, Debug, PartialEq)]
pub struct D {
	pub x: f32,
	pub y: f32,
}

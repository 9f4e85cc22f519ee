mod column;
mod bit_mask;

pub use bit_mask::*;
pub(crate) use column::*;

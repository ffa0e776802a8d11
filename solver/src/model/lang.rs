//! Language for stating variables and constraints of a [`Model`](crate::model::Model).

mod cumulative;
mod ivar;
pub mod linear;
mod mul;
mod no_overlap;

pub use cumulative::Cumulative;
pub use ivar::{IVar, IntervalVar};
pub use linear::{Linear, LinearSum, LinearTerm};
pub use mul::Mul;
pub use no_overlap::NoOverlap2D;

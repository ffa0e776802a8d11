pub mod params;
pub mod search;
mod solver_impl;
pub mod stats;

pub use params::SolverParams;
pub use solver_impl::*;

//! A small finite-domain constraint solver.
//!
//! Problems are stated as a [`Model`](model::Model) of bounded integer variables and constraints
//! (linear, multiplication, two-dimensional no-overlap and cumulative) and solved by
//! a depth-first [`Solver`](solver::Solver) that alternates propagation and branching.

pub mod backtrack;
pub mod core;
pub mod model;
pub mod prelude;
pub mod reasoners;
pub mod solver;

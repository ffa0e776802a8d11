//! Module that re-export most commonly used types and traits to ease import.

pub use crate::backtrack::{Backtrack, DecLvl};
pub use crate::core::state::Domains;
pub use crate::core::{IntCst, Lit, VarRef};
pub use crate::model::lang::{linear, Cumulative, IVar, IntervalVar, LinearSum, Mul, NoOverlap2D};
pub use crate::model::{Constraint, Model, ModelError};
pub use crate::solver::search::{Decision, SearchControl};
pub use crate::solver::{SolveResponse, SolveStatus, Solver, SolverParams};

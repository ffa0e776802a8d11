use crate::core::{IntCst, VarRef};
use crate::model::lang::{Cumulative, Linear, Mul, NoOverlap2D};
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    Linear(Linear),
    Mul(Mul),
    NoOverlap2D(NoOverlap2D),
    Cumulative(Cumulative),
}

impl Constraint {
    /// All variables appearing in the constraint, possibly with repetitions.
    pub fn variables(&self) -> Vec<VarRef> {
        match self {
            Constraint::Linear(c) => c.variables().collect(),
            Constraint::Mul(c) => c.variables().to_vec(),
            Constraint::NoOverlap2D(c) => c.variables().collect(),
            Constraint::Cumulative(c) => c.variables().collect(),
        }
    }

    /// Checks the constraint against a total assignment, indexed by variable.
    pub fn is_satisfied(&self, values: &[IntCst]) -> bool {
        match self {
            Constraint::Linear(c) => c.is_satisfied(values),
            Constraint::Mul(c) => c.is_satisfied(values),
            Constraint::NoOverlap2D(c) => c.is_satisfied(values),
            Constraint::Cumulative(c) => c.is_satisfied(values),
        }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Linear(c) => write!(f, "{c}"),
            Constraint::Mul(c) => write!(f, "{c}"),
            Constraint::NoOverlap2D(c) => write!(f, "{c}"),
            Constraint::Cumulative(c) => write!(f, "{c}"),
        }
    }
}

impl From<Linear> for Constraint {
    fn from(c: Linear) -> Self {
        Constraint::Linear(c)
    }
}

impl From<Mul> for Constraint {
    fn from(c: Mul) -> Self {
        Constraint::Mul(c)
    }
}

impl From<NoOverlap2D> for Constraint {
    fn from(c: NoOverlap2D) -> Self {
        Constraint::NoOverlap2D(c)
    }
}

impl From<Cumulative> for Constraint {
    fn from(c: Cumulative) -> Self {
        Constraint::Cumulative(c)
    }
}

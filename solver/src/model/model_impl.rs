use crate::core::state::Domains;
use crate::core::*;
use crate::model::lang::linear::LinearSum;
use crate::model::lang::*;
use crate::model::{Constraint, Label};

/// Reasons for a model to be rejected before solving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("variable {name} has an empty domain [{lb}, {ub}]")]
    EmptyDomain { name: String, lb: IntCst, ub: IntCst },
    #[error("constraint #{constraint} refers to an unknown variable {var:?}")]
    UnknownVariable { constraint: usize, var: VarRef },
    #[error("constraint #{constraint}: {left} {left_kind} but {right} {right_kind}")]
    LengthMismatch {
        constraint: usize,
        left: usize,
        left_kind: &'static str,
        right: usize,
        right_kind: &'static str,
    },
    #[error("constraint #{constraint}: negative capacity {capacity}")]
    NegativeCapacity { constraint: usize, capacity: IntCst },
}

/// Defines the structure of a model: variable labels, intervals and constraints.
#[derive(Clone, Debug)]
pub struct ModelShape<Lbl> {
    labels: Vec<Option<Lbl>>,
    pub intervals: Vec<(IntervalVar, Lbl)>,
    pub constraints: Vec<Constraint>,
}

impl<Lbl: Label> ModelShape<Lbl> {
    pub fn new() -> Self {
        ModelShape {
            labels: Vec::new(),
            intervals: Vec::new(),
            constraints: Vec::new(),
        }
    }

    fn set_label(&mut self, var: VarRef, label: Lbl) {
        if self.labels.len() <= var.index() {
            self.labels.resize(var.index() + 1, None);
        }
        self.labels[var.index()] = Some(label);
    }

    pub fn label(&self, var: VarRef) -> Option<&Lbl> {
        self.labels.get(var.index()).and_then(|l| l.as_ref())
    }

    fn add_constraint(&mut self, c: Constraint) {
        tracing::trace!("Adding constraint: {}", c);
        self.constraints.push(c)
    }
}

impl<Lbl: Label> Default for ModelShape<Lbl> {
    fn default() -> Self {
        Self::new()
    }
}

/// A constraint satisfaction problem: its shape (labels and constraints) and its state
/// (the currently admissible values of each variable).
#[derive(Clone, Debug)]
pub struct Model<Lbl> {
    pub shape: ModelShape<Lbl>,
    pub state: Domains,
}

impl<Lbl: Label> Model<Lbl> {
    pub fn new() -> Self {
        Model {
            shape: ModelShape::new(),
            state: Domains::new(),
        }
    }

    /// Declares a new integer variable with domain `[lb, ub]`.
    ///
    /// An empty domain is not rejected here but makes the model invalid, see [`Model::validate`].
    pub fn new_ivar(&mut self, lb: IntCst, ub: IntCst, label: impl Into<Lbl>) -> IVar {
        let var = self.state.new_var(lb, ub);
        self.shape.set_label(var, label.into());
        IVar::new(var)
    }

    /// Declares an interval and posts `start + size == end`.
    pub fn new_interval(&mut self, start: IVar, size: IVar, end: IVar, label: impl Into<Lbl>) -> IntervalVar {
        let interval = IntervalVar { start, size, end };
        self.shape.intervals.push((interval, label.into()));
        self.enforce(linear::eq(start + size, end));
        interval
    }

    pub fn enforce(&mut self, constraint: impl Into<Constraint>) {
        self.shape.add_constraint(constraint.into())
    }

    pub fn enforce_all<C: Into<Constraint>>(&mut self, constraints: impl IntoIterator<Item = C>) {
        for c in constraints {
            self.enforce(c)
        }
    }

    /// Posts `prod == fact1 * fact2`.
    pub fn add_mul(&mut self, prod: IVar, fact1: IVar, fact2: IVar) {
        self.enforce(Mul::new(prod, fact1, fact2))
    }

    /// Posts `sum(elements) == value`.
    pub fn add_sum_eq<T: Into<LinearSum>>(&mut self, elements: impl IntoIterator<Item = T>, value: IntCst) {
        self.enforce(LinearSum::of(elements).eq(value))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.shape.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.state.num_variables()
    }

    pub fn label(&self, var: impl Into<VarRef>) -> Option<&Lbl> {
        self.shape.label(var.into())
    }

    /// Human readable name of the variable: its label if any.
    pub fn fmt_var(&self, var: impl Into<VarRef>) -> String {
        let var = var.into();
        match self.label(var) {
            Some(label) => format!("{label}"),
            None => format!("{var:?}"),
        }
    }

    pub fn fmt_lit(&self, lit: Lit) -> String {
        format!("{} {} {}", self.fmt_var(lit.variable()), lit.relation(), lit.value())
    }

    /// Checks that the model is well formed: every declared domain is non-empty and
    /// every constraint only refers to variables of this model and has consistent arguments.
    pub fn validate(&self) -> Result<(), ModelError> {
        for var in self.state.variables() {
            let (lb, ub) = self.state.bounds(var);
            if lb > ub {
                return Err(ModelError::EmptyDomain {
                    name: self.fmt_var(var),
                    lb,
                    ub,
                });
            }
        }
        let num_vars = self.num_variables();
        for (i, c) in self.constraints().iter().enumerate() {
            if let Some(var) = c.variables().into_iter().find(|v| v.index() >= num_vars) {
                return Err(ModelError::UnknownVariable { constraint: i, var });
            }
            match c {
                Constraint::NoOverlap2D(c) if c.x.len() != c.y.len() => {
                    return Err(ModelError::LengthMismatch {
                        constraint: i,
                        left: c.x.len(),
                        left_kind: "x intervals",
                        right: c.y.len(),
                        right_kind: "y intervals",
                    })
                }
                Constraint::Cumulative(c) if c.intervals.len() != c.demands.len() => {
                    return Err(ModelError::LengthMismatch {
                        constraint: i,
                        left: c.intervals.len(),
                        left_kind: "intervals",
                        right: c.demands.len(),
                        right_kind: "demands",
                    })
                }
                Constraint::Cumulative(c) if c.capacity < 0 => {
                    return Err(ModelError::NegativeCapacity {
                        constraint: i,
                        capacity: c.capacity,
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl<Lbl: Label> Default for Model<Lbl> {
    fn default() -> Self {
        Self::new()
    }
}

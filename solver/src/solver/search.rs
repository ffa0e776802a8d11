pub mod first_fail;
pub mod packing;

use crate::core::Lit;
use crate::model::{Label, Model};
use crate::solver::stats::Stats;
use smallvec::{smallvec, SmallVec};

/// A conjunction of literals to enforce together.
pub type Branch = SmallVec<[Lit; 8]>;

/// A choice point of the search: alternative branches tried in order.
///
/// A decision without any branch denotes a dead end that the solver must backtrack from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub branches: Vec<Branch>,
}

impl Decision {
    pub fn new(branches: impl IntoIterator<Item = Branch>) -> Self {
        Decision {
            branches: branches.into_iter().collect(),
        }
    }

    /// Try `lit` first, then its negation.
    pub fn binary(lit: Lit) -> Self {
        Decision::new([smallvec![lit], smallvec![!lit]])
    }

    pub fn fail() -> Self {
        Decision { branches: Vec::new() }
    }

    pub fn is_fail(&self) -> bool {
        self.branches.is_empty()
    }
}

pub type Brancher<L> = Box<dyn SearchControl<L> + Send>;

pub fn default_brancher<Lbl: Label>() -> Brancher<Lbl> {
    Box::new(first_fail::FirstFail)
}

pub trait SearchControl<Lbl> {
    /// Selects the next decision to make in the current state of the model.
    ///
    /// Returns `None` if the brancher has no decision left to make. Any variable left unbound
    /// is then handled by the solver's fallback strategy.
    fn next_decision(&mut self, stats: &Stats, model: &Model<Lbl>) -> Option<Decision>;
}

use crate::encode::{Encoding, Solver, SymmetryBreaking};
use quilt::solver::search::first_fail::FirstFail;
use quilt::solver::search::packing::{BottomLeftPacking, Candidates};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Search strategies that can be given to the solver.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Default)]
pub enum SearchStrategy {
    /// Fill the rectangle from its bottom-left corner, choosing which square covers the first free cell
    #[default]
    Packing,
    /// Branch on the variable with the smallest domain, smallest value first
    FirstFail,
}

impl SearchStrategy {
    /// The symmetry breaking used with the strategy unless another one is requested.
    /// The bottom-left search places squares in the order of their corners.
    pub fn symmetry_breaking(self) -> SymmetryBreaking {
        match self {
            SearchStrategy::Packing => SymmetryBreaking::Placement,
            SearchStrategy::FirstFail => SymmetryBreaking::Size,
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "packing" | "bottom-left" => Ok(SearchStrategy::Packing),
            "ff" | "first-fail" => Ok(SearchStrategy::FirstFail),
            e => Err(format!("Unrecognized search strategy: '{e}'")),
        }
    }
}

impl Display for SearchStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Packing => write!(f, "packing"),
            SearchStrategy::FirstFail => write!(f, "first-fail"),
        }
    }
}

/// Configures the brancher of the solver for the given strategy.
pub fn get_solver(mut solver: Solver, strategy: SearchStrategy, encoding: &Encoding) -> Solver {
    match strategy {
        SearchStrategy::Packing => {
            let candidates = match encoding.symmetry_breaking {
                // squares are interchangeable, or must be placed in order
                SymmetryBreaking::None | SymmetryBreaking::Placement => Candidates::First,
                SymmetryBreaking::Size => Candidates::SortedBySize,
            };
            solver.set_brancher(
                BottomLeftPacking::new(
                    encoding.rect.width,
                    encoding.rect.height,
                    encoding.x_intervals(),
                    encoding.y_intervals(),
                )
                .with_candidates(candidates),
            )
        }
        SearchStrategy::FirstFail => solver.set_brancher(FirstFail),
    }
    solver
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strategies() {
        assert_eq!("packing".parse(), Ok(SearchStrategy::Packing));
        assert_eq!("ff".parse(), Ok(SearchStrategy::FirstFail));
        for strategy in [SearchStrategy::Packing, SearchStrategy::FirstFail] {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
        assert!("random".parse::<SearchStrategy>().is_err());
    }

    #[test]
    fn preferred_symmetry_breaking() {
        assert_eq!(SearchStrategy::Packing.symmetry_breaking(), SymmetryBreaking::Placement);
        assert_eq!(SearchStrategy::FirstFail.symmetry_breaking(), SymmetryBreaking::Size);
    }
}

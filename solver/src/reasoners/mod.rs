use crate::core::state::InvalidUpdate;
use std::fmt::{Display, Formatter};

pub mod cp;

/// Signals that the current state of the domains admits no solution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Contradiction {
    /// A propagator attempted to empty the domain of a variable.
    InvalidUpdate(InvalidUpdate),
    /// A propagator detected an inconsistency without making an update.
    Failure(&'static str),
}

impl From<InvalidUpdate> for Contradiction {
    fn from(empty: InvalidUpdate) -> Self {
        Contradiction::InvalidUpdate(empty)
    }
}

impl Display for Contradiction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Contradiction::InvalidUpdate(up) => write!(f, "{up}"),
            Contradiction::Failure(origin) => write!(f, "inconsistent {origin}"),
        }
    }
}

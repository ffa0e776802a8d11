use std::time::Duration;

/// Parameters of a single call to [`Solver::solve`](crate::solver::Solver::solve).
#[derive(Clone, Debug, Default)]
pub struct SolverParams {
    /// Wall-clock budget of the search. The solver gives up with an `Unknown` status when exceeded.
    pub time_limit: Option<Duration>,
}

impl SolverParams {
    pub fn with_time_limit(time_limit: Duration) -> Self {
        SolverParams {
            time_limit: Some(time_limit),
        }
    }
}

use crate::backtrack::{Backtrack, DecLvl};
use crate::core::{IntCst, VarRef};
use crate::model::{Label, Model};
use crate::reasoners::cp::Cp;
use crate::reasoners::Contradiction;
use crate::solver::params::SolverParams;
use crate::solver::search::first_fail::FirstFail;
use crate::solver::search::{default_brancher, Branch, Brancher, Decision, SearchControl};
use crate::solver::stats::Stats;
use env_param::EnvParam;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// If true, decisions will be logged to the standard output.
static LOG_DECISIONS: EnvParam<bool> = EnvParam::new("QUILT_LOG_DECISIONS", "false");

/// Number of decisions between two progress reports of the search (0 to disable them).
static PROGRESS_PERIOD: EnvParam<u64> = EnvParam::new("QUILT_PROGRESS_PERIOD", "100000");

/// If true, the solver's stats will be printed at the end of each call to `solve`.
static PRINT_STATS: EnvParam<bool> = EnvParam::new("QUILT_PRINT_STATS", "false");

/// Macro that uses the same syntax as `println!()` but:
///  - only evaluate arguments and print if `LOG_DECISIONS` is true.
///  - prepends the thread id to the line.
macro_rules! log_dec {
    // log_dec!("a {} event", "log")
    ($($arg:tt)+) => {
        if LOG_DECISIONS.get() {
            print!("[{:?}] ", std::thread::current().id());
            println!($($arg)+);
        }
    }
}

/// Outcome of a call to [`Solver::solve`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// A solution satisfying all constraints was found.
    Feasible,
    /// The search space was exhausted without finding a solution.
    Infeasible,
    /// The time limit was reached before the search could conclude.
    Unknown,
    /// The model is malformed and was not solved.
    ModelInvalid,
}

impl SolveStatus {
    pub fn name(self) -> &'static str {
        match self {
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
        }
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A total assignment of the model's variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    values: Vec<IntCst>,
}

impl Solution {
    /// Value of the variable in the solution. Panics if the variable does not belong to the solved model.
    pub fn value(&self, var: impl Into<VarRef>) -> IntCst {
        self.values[var.into().index()]
    }

    pub fn values(&self) -> &[IntCst] {
        &self.values
    }
}

#[derive(Clone, Debug)]
pub struct SolveResponse {
    pub status: SolveStatus,
    /// Present iff the status is `Feasible`.
    pub solution: Option<Solution>,
    pub wall_time: Duration,
    pub stats: Stats,
}

impl SolveResponse {
    pub fn status_name(&self) -> &'static str {
        self.status.name()
    }

    /// Value of the variable in the solution, if any.
    pub fn value(&self, var: impl Into<VarRef>) -> Option<IntCst> {
        self.solution.as_ref().map(|s| s.value(var))
    }
}

/// Result of the `search` method.
enum SearchResult {
    /// A solution was found, given as the value of each variable
    Solution(Vec<IntCst>),
    /// The search space was exhausted.
    Exhausted,
    /// The deadline was reached.
    Interrupted,
}

/// An open choice point: its decision and the index of the next branch to try.
struct ChoicePoint {
    decision: Decision,
    next: usize,
}

pub struct Solver<Lbl> {
    pub model: Model<Lbl>,
    /// Index of the next constraint to post in the propagation engine.
    next_unposted_constraint: usize,
    brancher: Brancher<Lbl>,
    /// Completes the assignment once `brancher` has no decision left.
    fallback: FirstFail,
    cp: Cp,
    pub stats: Stats,
}

impl<Lbl: Label> Solver<Lbl> {
    pub fn new(model: Model<Lbl>) -> Solver<Lbl> {
        Solver {
            model,
            next_unposted_constraint: 0,
            brancher: default_brancher(),
            fallback: FirstFail,
            cp: Cp::new(),
            stats: Stats::new(),
        }
    }

    pub fn set_brancher(&mut self, brancher: impl SearchControl<Lbl> + Send + 'static) {
        self.brancher = Box::new(brancher)
    }

    /// Posts the constraints added to the model since the last call.
    fn post_constraints(&mut self) {
        let constraints = &self.model.shape.constraints[self.next_unposted_constraint..];
        for c in constraints {
            self.cp.add_constraint(c);
        }
        self.next_unposted_constraint = self.model.shape.constraints.len();
    }

    /// Searches for a solution of the model, within the time limit of `params` if any.
    ///
    /// Each call restarts the search from the root.
    pub fn solve(&mut self, params: &SolverParams) -> SolveResponse {
        let start = Instant::now();
        let deadline = params.time_limit.map(|limit| start + limit);
        tracing::debug!(
            "Solving model with {} variables and {} constraints",
            self.model.num_variables(),
            self.model.constraints().len()
        );
        self.model.state.reset();

        let (status, solution) = match self.model.validate() {
            Err(err) => {
                tracing::debug!("Invalid model: {err}");
                self.stats.init_time += start.elapsed();
                (SolveStatus::ModelInvalid, None)
            }
            Ok(()) => {
                self.post_constraints();
                self.stats.init_time += start.elapsed();
                let search_start = Instant::now();
                let result = self.search(deadline);
                self.stats.solve_time += search_start.elapsed();
                match result {
                    SearchResult::Solution(values) => (SolveStatus::Feasible, Some(Solution { values })),
                    SearchResult::Exhausted => (SolveStatus::Infeasible, None),
                    SearchResult::Interrupted => (SolveStatus::Unknown, None),
                }
            }
        };
        self.stats.num_propagations = self.cp.stats.num_propagations;
        let wall_time = start.elapsed();
        tracing::debug!("Solver status: {status} ({:.3} s)", wall_time.as_secs_f64());
        if PRINT_STATS.get() {
            self.print_stats();
        }
        SolveResponse {
            status,
            solution,
            wall_time,
            stats: self.stats.clone(),
        }
    }

    fn search(&mut self, deadline: Option<Instant>) -> SearchResult {
        if let Err(contradiction) = self.propagate() {
            log_dec!("=> ROOT CONFLICT: {}", contradiction);
            self.stats.add_conflict();
            return SearchResult::Exhausted;
        }
        let mut choice_points: Vec<ChoicePoint> = Vec::new();
        loop {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log_dec!("=> TIMEOUT");
                return SearchResult::Interrupted;
            }
            let decision = match self.brancher.next_decision(&self.stats, &self.model) {
                Some(decision) => Some(decision),
                None => self.fallback.next_decision(&self.stats, &self.model),
            };
            match decision {
                Some(decision) => {
                    if decision.is_fail() {
                        log_dec!("=> DEAD END");
                        self.stats.add_conflict();
                    }
                    choice_points.push(ChoicePoint { decision, next: 0 });
                    self.stats.add_decision(choice_points.len() as u32);
                    self.report_progress();
                }
                None => match self.check_solution() {
                    Some(values) => {
                        log_dec!("=> SOLUTION");
                        self.stats.add_solution();
                        return SearchResult::Solution(values);
                    }
                    None => {
                        log_dec!("=> REJECTED ASSIGNMENT");
                        self.stats.add_conflict();
                    }
                },
            }
            if !self.next_branch(&mut choice_points) {
                return SearchResult::Exhausted;
            }
        }
    }

    /// Moves to the next untried branch of the deepest open choice point, backtracking as necessary.
    ///
    /// Returns false if every choice point is exhausted.
    fn next_branch(&mut self, choice_points: &mut Vec<ChoicePoint>) -> bool {
        loop {
            let depth = choice_points.len();
            let Some(point) = choice_points.last_mut() else {
                return false;
            };
            // the state before any branch of this choice point
            self.model.state.restore(DecLvl::new(depth as u32 - 1));
            let Some(branch) = point.decision.branches.get(point.next) else {
                choice_points.pop();
                continue;
            };
            point.next += 1;
            self.model.state.save_state();
            log_dec!("decision {}: {}", depth, self.fmt_branch(branch));
            match self.apply(branch) {
                Ok(()) => return true,
                Err(contradiction) => {
                    log_dec!("=> CONFLICT: {}", contradiction);
                    self.stats.add_conflict();
                }
            }
        }
    }

    fn apply(&mut self, branch: &Branch) -> Result<(), Contradiction> {
        for &lit in branch {
            self.model.state.set(lit)?;
        }
        self.propagate()
    }

    fn propagate(&mut self) -> Result<(), Contradiction> {
        self.cp.propagate(&mut self.model.state)
    }

    /// Returns the current assignment if all variables are bound and all constraints satisfied.
    fn check_solution(&self) -> Option<Vec<IntCst>> {
        let values = self.model.state.assignment()?;
        self.model
            .constraints()
            .iter()
            .all(|c| c.is_satisfied(&values))
            .then_some(values)
    }

    fn report_progress(&self) {
        let period = PROGRESS_PERIOD.get();
        if period > 0 && self.stats.num_decisions % period == 0 {
            tracing::info!(
                "{} decisions, {} conflicts, depth {}",
                self.stats.num_decisions,
                self.stats.num_conflicts,
                self.model.state.current_decision_level()
            );
        }
    }

    fn fmt_branch(&self, branch: &Branch) -> String {
        branch.iter().map(|&lit| self.model.fmt_lit(lit)).join(" & ")
    }

    pub fn print_stats(&self) {
        println!("{}", self.stats);
    }
}

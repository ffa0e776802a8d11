use std::fmt::{Display, Error, Formatter};
use std::time::Duration;

/// Statistics of the solver.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Time spent validating the model and building the propagators
    pub init_time: Duration,
    pub solve_time: Duration,
    pub num_decisions: u64,
    pub num_conflicts: u64,
    /// Number of times a propagator was run
    pub num_propagations: u64,
    pub num_solutions: u64,
    /// Maximum number of simultaneously open choice points.
    pub max_depth: u32,
}

impl Stats {
    pub fn new() -> Stats {
        Default::default()
    }

    pub fn add_decision(&mut self, depth: u32) {
        self.num_decisions += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn add_conflict(&mut self) {
        self.num_conflicts += 1;
    }

    pub fn add_solution(&mut self) {
        self.num_solutions += 1;
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        fn label(f: &mut Formatter<'_>, label: &str) -> Result<(), Error> {
            write!(f, "{label:<20}: ")
        }
        fn val_throughput(f: &mut Formatter<'_>, value: u64, time: &Duration) -> Result<(), Error> {
            let secs = time.as_secs_f64();
            if secs > 0.0 {
                writeln!(f, "{:<12} ({:.0} /sec)", value, (value as f64) / secs)
            } else {
                writeln!(f, "{value:<12}")
            }
        }

        label(f, "solutions")?;
        writeln!(f, "{:<12}", self.num_solutions)?;

        label(f, "decisions")?;
        val_throughput(f, self.num_decisions, &self.solve_time)?;

        label(f, "conflicts")?;
        val_throughput(f, self.num_conflicts, &self.solve_time)?;

        label(f, "propagations")?;
        val_throughput(f, self.num_propagations, &self.solve_time)?;

        label(f, "max depth")?;
        writeln!(f, "{:<12}", self.max_depth)?;

        writeln!(f, "================= ")?;

        label(f, "Init time")?;
        writeln!(f, "{:.6} s", self.init_time.as_secs_f64())?;

        label(f, "Solve time")?;
        writeln!(f, "{:.6} s", self.solve_time.as_secs_f64())?;

        Ok(())
    }
}

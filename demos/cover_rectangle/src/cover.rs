use crate::encode::{encode, EncodingOptions, Solver};
use crate::problem::{Rectangle, RectangleError};
use crate::search::{get_solver, SearchStrategy};
use crate::tiling::{glyph, Tiling};
use quilt::solver::stats::Stats;
use quilt::solver::{SolveStatus, SolverParams};
use std::io::Write;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct CoverOptions {
    pub encoding: EncodingOptions,
    pub search: SearchStrategy,
    /// Time limit of each attempt.
    pub time_limit: Option<Duration>,
}

impl CoverOptions {
    /// Options for the given search strategy, with its preferred symmetry breaking and no time limit.
    pub fn new(search: SearchStrategy) -> Self {
        CoverOptions {
            encoding: EncodingOptions {
                symmetry_breaking: search.symmetry_breaking(),
                ..Default::default()
            },
            search,
            time_limit: None,
        }
    }
}

impl Default for CoverOptions {
    fn default() -> Self {
        CoverOptions::new(SearchStrategy::default())
    }
}

/// Result of trying to cover the rectangle with a given number of squares.
#[derive(Clone, Debug)]
pub struct Attempt {
    pub num_squares: usize,
    pub status: SolveStatus,
    pub wall_time: Duration,
    pub stats: Stats,
    /// The cover found, if the status is feasible.
    pub tiling: Option<Tiling>,
}

impl Attempt {
    pub fn is_feasible(&self) -> bool {
        self.status == SolveStatus::Feasible
    }
}

/// Tries to cover `rect` with exactly `num_squares` squares.
pub fn cover_rectangle(rect: Rectangle, num_squares: usize, options: &CoverOptions) -> Result<Attempt, RectangleError> {
    let (model, encoding) = encode(rect, num_squares, &options.encoding)?;
    let mut solver = get_solver(Solver::new(model), options.search, &encoding);
    let params = SolverParams {
        time_limit: options.time_limit,
    };
    let response = solver.solve(&params);
    tracing::debug!(
        "{} squares: {} after {} decisions",
        num_squares,
        response.status,
        response.stats.num_decisions
    );
    Ok(Attempt {
        num_squares,
        status: response.status,
        wall_time: response.wall_time,
        tiling: response.solution.as_ref().map(|s| encoding.tiling(s)),
        stats: response.stats,
    })
}

/// Events of [`find_minimum`].
#[derive(Copy, Clone, Debug)]
pub enum Progress<'a> {
    /// An attempt with the given number of squares is starting.
    Trying(usize),
    Done(&'a Attempt),
}

/// Tries each number of squares in order and returns the first feasible attempt, if any.
///
/// An attempt that reaches the time limit does not stop the iteration.
/// An invalid rectangle is reported before any attempt.
pub fn find_minimum(
    rect: Rectangle,
    counts: impl IntoIterator<Item = usize>,
    options: &CoverOptions,
    mut on_progress: impl FnMut(Progress<'_>),
) -> Result<Option<Attempt>, RectangleError> {
    rect.validate()?;
    for num_squares in counts {
        on_progress(Progress::Trying(num_squares));
        let attempt = cover_rectangle(rect, num_squares, options)?;
        on_progress(Progress::Done(&attempt));
        match attempt.status {
            SolveStatus::Feasible => return Ok(Some(attempt)),
            SolveStatus::Unknown => tracing::warn!("No conclusion with {num_squares} squares within the time limit"),
            SolveStatus::Infeasible | SolveStatus::ModelInvalid => {}
        }
    }
    Ok(None)
}

/// Prints a progress event of [`find_minimum`]: the number of squares of an attempt when it starts,
/// then its status and wall time. A cover found is drawn after the overlaps detected while drawing it.
pub fn write_progress(out: &mut impl Write, progress: Progress<'_>, with_stats: bool) -> std::io::Result<()> {
    match progress {
        Progress::Trying(n) => writeln!(out, "Trying with size = {n}"),
        Progress::Done(attempt) => {
            writeln!(out, "{} {:.6} s", attempt.status, attempt.wall_time.as_secs_f64())?;
            if with_stats {
                writeln!(out, "{}", attempt.stats)?;
            }
            if let Some(tiling) = &attempt.tiling {
                let grid = tiling.render();
                for &(a, b) in &grid.overlaps {
                    writeln!(out, "ERROR between {} and {}", glyph(a), glyph(b))?;
                }
                writeln!(out, "{grid}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::PlacedSquare;
    use quilt::core::IntCst;

    fn attempt(status: SolveStatus, squares: Option<Vec<(IntCst, IntCst, IntCst)>>) -> Attempt {
        Attempt {
            num_squares: squares.as_ref().map_or(2, |s| s.len()),
            status,
            wall_time: Duration::from_millis(1500),
            stats: Stats::new(),
            tiling: squares.map(|squares| Tiling {
                rect: Rectangle::new(3, 2),
                squares: squares
                    .into_iter()
                    .map(|(x, y, size)| PlacedSquare { x, y, size })
                    .collect(),
            }),
        }
    }

    fn printed(events: &[Progress<'_>]) -> String {
        let mut out = Vec::new();
        for &event in events {
            write_progress(&mut out, event, false).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn attempts_and_cover() {
        let failed = attempt(SolveStatus::Infeasible, None);
        let found = attempt(SolveStatus::Feasible, Some(vec![(0, 0, 2), (2, 0, 1), (2, 1, 1)]));
        let out = printed(&[
            Progress::Trying(2),
            Progress::Done(&failed),
            Progress::Trying(3),
            Progress::Done(&found),
        ]);
        assert_eq!(
            out,
            "Trying with size = 2\nINFEASIBLE 1.500000 s\nTrying with size = 3\nFEASIBLE 1.500000 s\n0 0 1\n0 0 2\n"
        );
    }

    #[test]
    fn overlaps_before_the_grid() {
        let found = attempt(SolveStatus::Feasible, Some(vec![(0, 0, 2), (1, 1, 1), (2, 0, 1)]));
        assert_eq!(
            printed(&[Progress::Done(&found)]),
            "FEASIBLE 1.500000 s\nERROR between 0 and 1\n0 0 2\n0 1  \n"
        );
    }
}

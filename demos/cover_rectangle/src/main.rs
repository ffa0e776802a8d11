use anyhow::{Context, Result};
use quilt::core::IntCst;
use quilt_cover::cover::{find_minimum, write_progress, CoverOptions};
use quilt_cover::encode::{EncodingOptions, SymmetryBreaking};
use quilt_cover::problem::Rectangle;
use quilt_cover::search::SearchStrategy;
use std::io::Write;
use std::time::{Duration, Instant};
use structopt::StructOpt;

/// Fills a rectangle with a minimum number of non-overlapping squares.
#[derive(Debug, StructOpt)]
#[structopt(name = "cover-rectangle", rename_all = "kebab-case")]
pub struct Opt {
    /// Width of the rectangle
    #[structopt(long, default_value = "72")]
    width: IntCst,
    /// Height of the rectangle
    #[structopt(long, default_value = "37")]
    height: IntCst,
    /// Smallest number of squares to try
    #[structopt(long, default_value = "1")]
    min_squares: usize,
    /// Largest number of squares to try
    #[structopt(long, default_value = "14")]
    max_squares: usize,
    /// Maximum runtime of each attempt, in seconds.
    #[structopt(long, short)]
    timeout: Option<f64>,
    /// Search strategy to use in {packing, first-fail}
    #[structopt(long, default_value = "packing")]
    search: SearchStrategy,
    /// Symmetry breaking constraints in {none, size, placement}.
    /// Defaults to placement with the packing search and to size otherwise.
    #[structopt(long)]
    symmetry_breaking: Option<SymmetryBreaking>,
    /// Do not post the redundant cumulative constraints.
    #[structopt(long)]
    no_cumulative: bool,
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[structopt(short, long, default_value = "info")]
    log_level: tracing::Level,
    /// Print the statistics of the solver after each attempt.
    #[structopt(long)]
    stats: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    // set up logger
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(Instant::now()))
        .with_thread_ids(true)
        .with_max_level(opt.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let rect = Rectangle::new(opt.width, opt.height);
    rect.validate()?;
    anyhow::ensure!(
        opt.min_squares <= opt.max_squares,
        "Empty range of square counts: [{}, {}]",
        opt.min_squares,
        opt.max_squares
    );
    let time_limit = opt
        .timeout
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("Invalid timeout")?;

    let options = CoverOptions {
        encoding: EncodingOptions {
            symmetry_breaking: opt.symmetry_breaking.unwrap_or(opt.search.symmetry_breaking()),
            cumulative: !opt.no_cumulative,
        },
        search: opt.search,
        time_limit,
    };

    let mut out = std::io::stdout().lock();
    let mut printed = Ok(());
    let result = find_minimum(rect, opt.min_squares..=opt.max_squares, &options, |progress| {
        if printed.is_ok() {
            printed = write_progress(&mut out, progress, opt.stats).and_then(|()| out.flush());
        }
    })?;
    printed.context("Could not write to the standard output")?;

    match result {
        Some(attempt) => {
            if let Some(tiling) = &attempt.tiling {
                tiling
                    .validate()
                    .with_context(|| format!("Invalid cover with {} squares", attempt.num_squares))?;
            }
            tracing::info!("{rect} rectangle covered with {} squares", attempt.num_squares);
        }
        None => tracing::warn!(
            "No cover of the {rect} rectangle found with {} to {} squares",
            opt.min_squares,
            opt.max_squares
        ),
    }
    Ok(())
}

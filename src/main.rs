//! Phase diagram of the mean-field order-parameter model over a
//! (field, temperature) grid.
//
//  Compile & run:  `cargo run --release -- --ions --num-bs 40 --num-ts 40`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mftscan::config::available_workers;
use mftscan::ionic::IonicSolver;
use mftscan::pipeline;
use mftscan::{IonicExchange, PhaseResult, RunConfig, SolverMode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Construct a phase diagram by multi-start free-energy minimization")]
struct Cli {
    /// Base environment file
    #[arg(long, default_value = "phase_diagram_env.json")]
    base_env_path: PathBuf,

    /// Read solved environments from this prefix instead of solving
    #[arg(long)]
    read_prefix: Option<PathBuf>,

    /// Output file prefix
    #[arg(long, default_value = "out_phase_diagram")]
    out_prefix: PathBuf,

    /// Consider only the ionic part
    #[arg(long)]
    ions: bool,

    /// Number of field points
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..))]
    num_bs: u32,

    /// Number of temperature points
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..))]
    num_ts: u32,

    /// Number of parallel workers (default: all available cores)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    npar: Option<u32>,

    /// Self-consistency tolerance
    #[arg(long, default_value = "1e-6")]
    tolerance: f64,

    /// Seed catalog: single, coupled, independent or independent+break-symmetry
    #[arg(long, default_value = "single")]
    mode: SolverMode,

    /// Add the symmetry-breaking seed (independent mode only)
    #[arg(long)]
    break_symmetry: bool,
}

impl Cli {
    fn into_config(self) -> PhaseResult<RunConfig> {
        Ok(RunConfig {
            base_env_path: self.base_env_path,
            out_prefix: self.out_prefix,
            read_prefix: self.read_prefix,
            ions_only: self.ions,
            num_fields: self.num_bs as usize,
            num_temps: self.num_ts as usize,
            workers: self.npar.map_or_else(available_workers, |n| n as usize),
            tolerance: self.tolerance,
            mode: self.mode.with_break_symmetry(self.break_symmetry)?,
            progress: true,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = match Cli::parse().into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!(?cfg, "configuration");

    match pipeline::run(&cfg, &IonicSolver::default(), &IonicExchange) {
        Ok(summary) => {
            info!(
                points = summary.points,
                solved = summary.solved,
                rows = summary.csv_rows,
                "phase diagram complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

//! End-to-end run: sample, sweep and persist, or replay a previous run; then
//! export the phase-diagram table.

use tracing::info;

use crate::config::RunConfig;
use crate::env::Environment;
use crate::error::PhaseResult;
use crate::export::write_phase_csv;
use crate::model::EnergyScale;
use crate::sampler::PhaseSampler;
use crate::solver::{Outcome, Solver};
use crate::store::ResultStore;
use crate::sweep::{Sweep, SweepReport};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub points: usize,
    pub solved: usize,
    /// `None` for a replayed run.
    pub report: Option<SweepReport>,
    pub csv_rows: usize,
}

/// Minimum free-energy results per sample point, computed or replayed.
pub fn min_results<S, E>(
    cfg: &RunConfig,
    solver: &S,
    scale: &E,
) -> PhaseResult<(Vec<Outcome>, Option<SweepReport>)>
where
    S: Solver + ?Sized,
    E: EnergyScale + ?Sized,
{
    cfg.validate()?;

    if let Some(prefix) = &cfg.read_prefix {
        let best = ResultStore::new(prefix).read_min(cfg.num_points())?;
        return Ok((best, None));
    }

    let mut base = Environment::load(&cfg.base_env_path)?;
    if cfg.ions_only {
        base.restrict_to_ions();
    }
    let options = cfg.solve_options();
    solver.check(&base, &options, cfg.mode)?;

    let samples = PhaseSampler::new(cfg.sample_range()).sample(
        &base,
        scale,
        cfg.num_fields,
        cfg.num_temps,
    )?;
    let output = Sweep::new(cfg.workers)?
        .with_progress(cfg.progress)
        .run(&samples, &options, cfg.mode, solver);

    ResultStore::new(&cfg.out_prefix).save(&output.results)?;
    let best = output.results.into_iter().map(|m| m.best).collect();
    Ok((best, Some(output.report)))
}

pub fn run<S, E>(cfg: &RunConfig, solver: &S, scale: &E) -> PhaseResult<RunSummary>
where
    S: Solver + ?Sized,
    E: EnergyScale + ?Sized,
{
    let (best, report) = min_results(cfg, solver, scale)?;

    let csv_path = ResultStore::new(&cfg.out_prefix).csv_path();
    let csv_rows = write_phase_csv(&csv_path, &best, cfg.mode, scale)?;
    info!(rows = csv_rows, path = %csv_path.display(), "wrote phase diagram table");

    Ok(RunSummary {
        points: best.len(),
        solved: best.iter().filter(|o| o.is_solved()).count(),
        report,
        csv_rows,
    })
}

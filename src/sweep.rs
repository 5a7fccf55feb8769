//! Sweep orchestrator: one minimization per sample point on a fixed worker
//! pool.
//!
//! Each task owns its sample environment; nothing is shared between tasks
//! except read-only references to the solver and options. Results come back
//! in sample order regardless of completion order. A task that panics is
//! recorded as an unconverged point and counted separately.

use std::panic::{self, AssertUnwindSafe};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::catalog::SolverMode;
use crate::env::Environment;
use crate::error::{PhaseError, PhaseResult};
use crate::minimize::{minimize, Minimization};
use crate::solver::{SolveOptions, Solver};

/// Per-sweep diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub points: usize,
    pub solved: usize,
    /// Points where every seed failed to converge.
    pub unconverged: usize,
    /// Points whose task panicked; also counted in `unconverged`.
    pub crashed: usize,
}

#[derive(Debug, Clone)]
pub struct SweepOutput {
    pub results: Vec<Minimization>,
    pub report: SweepReport,
}

pub struct Sweep {
    pool: ThreadPool,
    workers: usize,
    progress: bool,
}

impl Sweep {
    /// Pool with exactly `workers` threads.
    pub fn new(workers: usize) -> PhaseResult<Self> {
        if workers == 0 {
            return Err(PhaseError::Config("worker count must be at least 1".into()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("sweep-{i}"))
            .build()?;
        Ok(Self {
            pool,
            workers,
            progress: false,
        })
    }

    /// Show a progress bar while running.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Minimize every sample point. Blocks until all points are done.
    pub fn run<S: Solver + ?Sized>(
        &self,
        samples: &[Environment],
        options: &SolveOptions,
        mode: SolverMode,
        solver: &S,
    ) -> SweepOutput {
        info!(
            points = samples.len(),
            workers = self.workers,
            %mode,
            "starting sweep"
        );

        let bar = if self.progress {
            let bar = ProgressBar::new(samples.len() as u64);
            bar.set_style(
                ProgressStyle::with_template(" {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let n_seeds = mode.seeds().len();
        let tasks: Vec<(Minimization, bool)> = self.pool.install(|| {
            samples
                .par_iter()
                .enumerate()
                .map(|(idx, env)| {
                    let task = panic::catch_unwind(AssertUnwindSafe(|| {
                        minimize(env, options, mode, solver)
                    }));
                    bar.inc(1);
                    match task {
                        Ok(result) => (result, false),
                        Err(_) => {
                            warn!(point = idx, "sweep task panicked; recording as unconverged");
                            (Minimization::unconverged(n_seeds), true)
                        }
                    }
                })
                .collect()
        });
        bar.finish_and_clear();

        let mut report = SweepReport {
            points: tasks.len(),
            ..SweepReport::default()
        };
        let mut results = Vec::with_capacity(tasks.len());
        for (result, crashed) in tasks {
            if result.best.is_solved() {
                report.solved += 1;
            } else {
                report.unconverged += 1;
            }
            if crashed {
                report.crashed += 1;
            }
            results.push(result);
        }

        info!(
            solved = report.solved,
            unconverged = report.unconverged,
            crashed = report.crashed,
            "sweep finished"
        );
        SweepOutput { results, report }
    }
}

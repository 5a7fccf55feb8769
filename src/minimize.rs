//! Multi-start minimization of the free energy at one sample point.

use tracing::{debug, warn};

use crate::catalog::{FlagSet, SolverMode};
use crate::env::Environment;
use crate::solver::{Outcome, SolveOptions, Solver};

/// Best solution at a point plus every seed's outcome, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimization {
    pub best: Outcome,
    pub all: Vec<Outcome>,
}

impl Minimization {
    /// A point where no seed produced anything usable.
    pub fn unconverged(n_seeds: usize) -> Self {
        Self {
            best: Outcome::Unconverged,
            all: vec![Outcome::Unconverged; n_seeds],
        }
    }
}

/// Solve `base` from every seed of `mode` and keep the lowest free energy.
///
/// Ties go to the earliest seed. Solutions carrying a non-finite value (other
/// than an infinite `Beta`) cannot be persisted and are treated as
/// unconverged.
pub fn minimize<S: Solver + ?Sized>(
    base: &Environment,
    options: &SolveOptions,
    mode: SolverMode,
    solver: &S,
) -> Minimization {
    let seeds = mode.seeds();
    let n_seeds = seeds.len();

    let (candidates, flags): (Vec<Environment>, Vec<FlagSet>) = seeds
        .into_iter()
        .map(|seed| (seed.overlay.apply(base), seed.flags))
        .unzip();

    let mut all = solver.solve_batch(candidates, options, &flags, mode);
    if all.len() != n_seeds {
        warn!(
            expected = n_seeds,
            returned = all.len(),
            "solver returned the wrong number of results; padding with unconverged"
        );
        all.resize(n_seeds, Outcome::Unconverged);
    }

    for outcome in all.iter_mut() {
        if matches!(outcome, Outcome::Solved(env) if !env.is_finite()) {
            *outcome = Outcome::Unconverged;
        }
    }

    let mut best: Option<&Environment> = None;
    for env in all.iter().filter_map(Outcome::solved) {
        match best {
            Some(b) if env.free_energy >= b.free_energy => {}
            _ => best = Some(env),
        }
    }

    let best = Outcome::from(best.cloned());
    debug!(
        b = base.b,
        beta = base.beta,
        solved = all.iter().filter(|o| o.is_solved()).count(),
        seeds = n_seeds,
        "minimized sample point"
    );
    Minimization { best, all }
}

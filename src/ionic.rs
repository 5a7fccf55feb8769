//! Reference solver for the ion-only, single-order-parameter model.
//!
//! Iterates the mean-field equations
//!
//! ```text
//! M = 2 e sinh(Beta M QJ) / Z1
//! W = 2 e cosh(Beta M QJ) / Z1
//! e  = exp(-Beta (DeltaS - W QK)),   Z1 = 1 + 2 e cosh(Beta M QJ)
//! ```
//!
//! and reports `F = -2 T ln Z1 + QJ M^2 + QK W^2`. Everything is evaluated
//! through `L = ln(2 e cosh x)` so that low temperatures do not overflow.

use tracing::warn;

use crate::catalog::{FlagSet, SolverMode};
use crate::env::Environment;
use crate::error::{PhaseError, PhaseResult};
use crate::model::{delta_s, finite_hoppings, qk, EnergyScale, IonicExchange};
use crate::solver::{Outcome, SolveOptions, Solver};

#[derive(Debug, Clone, Copy)]
pub struct IonicSolver {
    pub max_iterations: usize,
    /// Fraction of the new iterate mixed into the old one.
    pub mixing: f64,
}

impl Default for IonicSolver {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            mixing: 0.5,
        }
    }
}

/// One evaluation of the right-hand sides.
struct Update {
    m: f64,
    w: f64,
    ln_z1: f64,
}

fn ln_1p_exp(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

fn rhs(m: f64, w: f64, beta: f64, qj: f64, qk: f64, ds: f64) -> Update {
    let x = beta * m * qj;
    let ax = x.abs();
    // ln(2 e cosh x)
    let l = std::f64::consts::LN_2 - beta * (ds - w * qk) + ax + (-2.0 * ax).exp().ln_1p();
    let frac = 1.0 / (1.0 + (-l).exp());
    Update {
        m: frac * x.tanh(),
        w: frac,
        ln_z1: ln_1p_exp(l),
    }
}

impl IonicSolver {
    fn solve_one(&self, mut env: Environment, tolerance: f64) -> Outcome {
        let Ok(qj) = IonicExchange.qj_ion(&env) else {
            return Outcome::Unconverged;
        };
        let qk = qk(&env);
        let ds = delta_s(&env);
        let beta = env.beta;
        let mut m = env.get_or_zero("M");
        let mut w = env.get_or_zero("W");

        for _ in 0..self.max_iterations {
            let next = rhs(m, w, beta, qj, qk, ds);
            if !(next.m.is_finite() && next.w.is_finite()) {
                return Outcome::Unconverged;
            }
            let residual = (next.m - m).abs().max((next.w - w).abs());
            if residual < tolerance {
                let fin = rhs(next.m, next.w, beta, qj, qk, ds);
                let free_energy = -2.0 * fin.ln_z1 / beta + qj * next.m * next.m + qk * next.w * next.w;
                if !free_energy.is_finite() {
                    return Outcome::Unconverged;
                }
                env.set("M", next.m);
                env.set("W", next.w);
                env.free_energy = free_energy;
                return Outcome::Solved(env);
            }
            m += self.mixing * (next.m - m);
            w += self.mixing * (next.w - w);
        }
        Outcome::Unconverged
    }
}

impl Solver for IonicSolver {
    fn solve_batch(
        &self,
        envs: Vec<Environment>,
        options: &SolveOptions,
        _flags: &[FlagSet],
        mode: SolverMode,
    ) -> Vec<Outcome> {
        if mode != SolverMode::SingleDof {
            warn!(%mode, "ionic solver only handles the single order parameter model");
            return vec![Outcome::Unconverged; envs.len()];
        }
        envs.into_iter()
            .map(|env| self.solve_one(env, options.tolerance))
            .collect()
    }

    fn required_keys(&self) -> &[&'static str] {
        &["Ja", "Jc"]
    }

    fn check(&self, base: &Environment, options: &SolveOptions, mode: SolverMode) -> PhaseResult<()> {
        base.validate(self.required_keys())?;
        if mode != SolverMode::SingleDof {
            return Err(PhaseError::Config(format!(
                "ionic solver supports the single mode only, got `{mode}`"
            )));
        }
        if !options.ions_only && finite_hoppings(base) {
            return Err(PhaseError::Config(
                "base environment has electronic hoppings; the ionic solver needs --ions".into(),
            ));
        }
        Ok(())
    }
}

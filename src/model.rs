// model.rs - Ionic model coefficients and the energy scale used to normalise
// the phase-diagram axes

use crate::env::Environment;
use crate::error::{PhaseError, PhaseResult};

/// Characteristic energy scale `QJ_ion` of a model.
pub trait EnergyScale: Sync {
    fn qj_ion(&self, env: &Environment) -> PhaseResult<f64>;
}

/// Closures serve as fixed or stub scales.
impl<F> EnergyScale for F
where
    F: Fn(&Environment) -> f64 + Sync,
{
    fn qj_ion(&self, env: &Environment) -> PhaseResult<f64> {
        Ok(self(env))
    }
}

/// `QJ_ion = 4 Ja + 2 Jc`: the dimer-favouring exchange without hopping
/// renormalisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IonicExchange;

impl EnergyScale for IonicExchange {
    fn qj_ion(&self, env: &Environment) -> PhaseResult<f64> {
        Ok(4.0 * env.require("Ja")? + 2.0 * env.require("Jc")?)
    }
}

/// Combined biquadratic coefficient for (S_i)^2 (S_j)^2.
pub fn qk(env: &Environment) -> f64 {
    4.0 * env.get_or_zero("Ka") + 2.0 * env.get_or_zero("Kc") + 8.0 * env.get_or_zero("Kb")
}

/// On-site splitting between the M and R configurations.
pub fn delta_s(env: &Environment) -> f64 {
    env.b + env.get_or_zero("EpsilonM") - env.get_or_zero("EpsilonR")
}

/// True if any electronic hopping is non-negligible.
pub fn finite_hoppings(env: &Environment) -> bool {
    const EPS: f64 = 1e-9;
    ["Tae", "Tce", "Tbe", "Tao", "Tco", "Tbo"]
        .iter()
        .any(|k| env.get_or_zero(k).abs() > EPS)
}

/// Scale with the sanity check every caller needs before dividing by it.
pub fn checked_scale<S: EnergyScale + ?Sized>(scale: &S, env: &Environment) -> PhaseResult<f64> {
    let q = scale.qj_ion(env)?;
    if q.is_finite() && q > 0.0 {
        Ok(q)
    } else {
        Err(PhaseError::InvalidScale(q))
    }
}

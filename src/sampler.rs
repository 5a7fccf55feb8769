//! Phase sampler: the (field, temperature) grid of sample environments.
//!
//! Both axes are ratios to the model's energy scale `QJ_ion`. The grid is
//! row-major with the field ratio in the outer loop; persistence relies on
//! this order to pair records with grid points.

use crate::env::Environment;
use crate::error::{PhaseError, PhaseResult};
use crate::model::{checked_scale, EnergyScale};

/// Inclusive ratio ranges for the two axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub field: (f64, f64),
    pub temperature: (f64, f64),
}

impl SampleRange {
    /// Ions plus electrons.
    pub fn electronic() -> Self {
        Self {
            field: (0.01, 1.2),
            temperature: (0.01, 0.8),
        }
    }

    /// The ionic transition sits at smaller fields.
    pub fn ionic() -> Self {
        Self {
            field: (0.01, 0.7),
            temperature: (0.01, 0.8),
        }
    }

    pub fn for_ions_only(ions_only: bool) -> Self {
        if ions_only {
            Self::ionic()
        } else {
            Self::electronic()
        }
    }
}

impl Default for SampleRange {
    fn default() -> Self {
        Self::electronic()
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive. One point gives
/// `start`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseSampler {
    pub range: SampleRange,
}

impl PhaseSampler {
    pub fn new(range: SampleRange) -> Self {
        Self { range }
    }

    /// Grid of sample environments; every key other than `B` and `Beta` is
    /// copied from `base`.
    pub fn sample<S: EnergyScale + ?Sized>(
        &self,
        base: &Environment,
        scale: &S,
        num_fields: usize,
        num_temps: usize,
    ) -> PhaseResult<Vec<Environment>> {
        if num_fields == 0 || num_temps == 0 {
            return Err(PhaseError::EmptyGrid);
        }
        let q = checked_scale(scale, base)?;

        let (f0, f1) = self.range.field;
        let (t0, t1) = self.range.temperature;
        let field_ratios = linspace(f0, f1, num_fields);
        let temp_ratios = linspace(t0, t1, num_temps);

        let mut envs = Vec::with_capacity(num_fields * num_temps);
        for &br in &field_ratios {
            for &tr in &temp_ratios {
                let mut env = base.clone();
                env.b = br * q;
                env.beta = 1.0 / (tr * q);
                envs.push(env);
            }
        }
        Ok(envs)
    }
}

/// Normalised grid coordinates `(B / scale, T / scale)` of a solved point.
pub fn grid_coordinates<S: EnergyScale + ?Sized>(
    env: &Environment,
    scale: &S,
) -> PhaseResult<(f64, f64)> {
    let q = checked_scale(scale, env)?;
    Ok((env.b / q, env.temperature() / q))
}

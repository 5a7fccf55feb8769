//! Run-time configuration (single source of truth for one phase-diagram run).

use std::path::PathBuf;

use crate::catalog::SolverMode;
use crate::error::{PhaseError, PhaseResult};
use crate::sampler::SampleRange;
use crate::solver::SolveOptions;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_env_path: PathBuf,
    pub out_prefix: PathBuf,
    /// Replay this prefix's minimal results instead of solving.
    pub read_prefix: Option<PathBuf>,
    pub ions_only: bool,
    pub num_fields: usize,
    pub num_temps: usize,
    pub workers: usize,
    pub tolerance: f64,
    pub mode: SolverMode,
    pub progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_env_path: PathBuf::from("phase_diagram_env.json"),
            out_prefix: PathBuf::from("out_phase_diagram"),
            read_prefix: None,
            ions_only: false,
            num_fields: 20,
            num_temps: 20,
            workers: available_workers(),
            tolerance: 1e-6,
            mode: SolverMode::SingleDof,
            progress: false,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> PhaseResult<()> {
        if self.num_fields == 0 || self.num_temps == 0 {
            return Err(PhaseError::EmptyGrid);
        }
        if self.workers == 0 {
            return Err(PhaseError::Config("worker count must be at least 1".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PhaseError::Config(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    pub fn num_points(&self) -> usize {
        self.num_fields * self.num_temps
    }

    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            tolerance: self.tolerance,
            ions_only: self.ions_only,
        }
    }

    pub fn sample_range(&self) -> SampleRange {
        SampleRange::for_ions_only(self.ions_only)
    }
}

/// Number of execution units on this host, at least 1.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = RunConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.num_points(), 400);
        assert!(cfg.workers >= 1);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let cfg = RunConfig { num_temps: 0, ..RunConfig::default() };
        assert!(matches!(cfg.validate(), Err(PhaseError::EmptyGrid)));

        let cfg = RunConfig { workers: 0, ..RunConfig::default() };
        assert!(cfg.validate().is_err());

        let cfg = RunConfig { tolerance: f64::NAN, ..RunConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_ions_only_narrows_field_range() {
        let cfg = RunConfig { ions_only: true, ..RunConfig::default() };
        assert_eq!(cfg.sample_range(), SampleRange::ionic());
        assert!(cfg.solve_options().ions_only);
    }
}

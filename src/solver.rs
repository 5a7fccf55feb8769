//! Self-consistency solver boundary.
//!
//! The numeric fixed-point update lives behind [`Solver`]; the rest of the
//! crate only relies on its batch contract: one [`Outcome`] per input, in input
//! order, with non-convergence reported as [`Outcome::Unconverged`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{FlagSet, SolverMode};
use crate::env::Environment;
use crate::error::PhaseResult;

/// Result of solving one seed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Solved(Environment),
    Unconverged,
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    pub fn solved(&self) -> Option<&Environment> {
        match self {
            Outcome::Solved(env) => Some(env),
            Outcome::Unconverged => None,
        }
    }
}

impl From<Option<Environment>> for Outcome {
    fn from(env: Option<Environment>) -> Self {
        env.map_or(Outcome::Unconverged, Outcome::Solved)
    }
}

// On disk an unconverged result is a JSON `null`.
impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Solved(env) => s.serialize_some(env),
            Outcome::Unconverged => s.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Option::<Environment>::deserialize(d).map(Outcome::from)
    }
}

/// Settings shared by every seed of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub tolerance: f64,
    pub ions_only: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            ions_only: false,
        }
    }
}

/// Batch fixed-point solver.
///
/// Implementations must return exactly one outcome per input environment in
/// the same order, and must not share mutable state between entries. They are
/// called concurrently from the sweep workers.
pub trait Solver: Sync {
    fn solve_batch(
        &self,
        envs: Vec<Environment>,
        options: &SolveOptions,
        flags: &[FlagSet],
        mode: SolverMode,
    ) -> Vec<Outcome>;

    /// Keys the base environment must provide.
    fn required_keys(&self) -> &[&'static str] {
        &[]
    }

    /// Reject a run this solver cannot handle before any solve starts.
    fn check(
        &self,
        base: &Environment,
        _options: &SolveOptions,
        _mode: SolverMode,
    ) -> PhaseResult<()> {
        base.validate(self.required_keys())
    }
}

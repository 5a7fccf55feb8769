//! Initial-condition catalog.
//!
//! The self-consistency equations have several fixed points, so every sample
//! point is solved from a fixed, ordered set of seeds. Seed order matters: the
//! minimizer breaks free-energy ties in favour of the earliest seed.

use std::fmt;
use std::str::FromStr;

use crate::env::Environment;
use crate::error::{PhaseError, PhaseResult};

/// Which self-consistency problem is being solved, and therefore which seeds
/// are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverMode {
    /// One order parameter pair (`M`, `W`).
    #[default]
    SingleDof,
    /// Two coupled degrees of freedom (`M01`, `M02`).
    TwoDofCoupled,
    /// Two independent sub-systems, each with two degrees of freedom.
    /// `break_symmetry` adds a seed that saturates the opposite pairing.
    TwoDofIndependent { break_symmetry: bool },
}

impl SolverMode {
    /// Order-parameter keys a solved environment carries in this mode.
    pub fn order_keys(&self) -> &'static [&'static str] {
        match self {
            SolverMode::SingleDof => &["M", "W"],
            SolverMode::TwoDofCoupled => &["M01", "M02"],
            SolverMode::TwoDofIndependent { .. } => {
                &["M01", "M11", "M02", "M12", "W01", "W11", "W02", "W12"]
            }
        }
    }

    pub fn seeds(&self) -> Vec<Seed> {
        seeds(*self)
    }

    /// Request the symmetry-breaking seed. Only the independent mode has one;
    /// asking for it in any other mode is a configuration error.
    pub fn with_break_symmetry(self, break_symmetry: bool) -> PhaseResult<Self> {
        match (self, break_symmetry) {
            (mode, false) => Ok(mode),
            (SolverMode::TwoDofIndependent { .. }, true) => {
                Ok(SolverMode::TwoDofIndependent { break_symmetry: true })
            }
            (mode, true) => Err(PhaseError::Config(format!(
                "symmetry breaking needs the independent mode, not `{mode}`"
            ))),
        }
    }
}

impl fmt::Display for SolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverMode::SingleDof => write!(f, "single"),
            SolverMode::TwoDofCoupled => write!(f, "coupled"),
            SolverMode::TwoDofIndependent { break_symmetry: false } => write!(f, "independent"),
            SolverMode::TwoDofIndependent { break_symmetry: true } => {
                write!(f, "independent+break-symmetry")
            }
        }
    }
}

impl FromStr for SolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(SolverMode::SingleDof),
            "coupled" => Ok(SolverMode::TwoDofCoupled),
            "independent" => Ok(SolverMode::TwoDofIndependent { break_symmetry: false }),
            "independent+break-symmetry" => {
                Ok(SolverMode::TwoDofIndependent { break_symmetry: true })
            }
            other => Err(format!(
                "unknown mode `{other}` (expected single, coupled, independent \
                 or independent+break-symmetry)"
            )),
        }
    }
}

/// A sub-variable the solver holds at zero while iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pin {
    M01,
    M11,
    M02,
    M12,
}

/// Per-seed solver steering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pins: Vec<Pin>,
}

impl FlagSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn pinned(pins: &[Pin]) -> Self {
        let mut pins = pins.to_vec();
        pins.sort();
        pins.dedup();
        Self { pins }
    }

    pub fn is_pinned(&self, pin: Pin) -> bool {
        self.pins.contains(&pin)
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

/// Partial assignment of seed values; applied on top of a copy of the base.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    values: Vec<(&'static str, f64)>,
}

impl Overlay {
    pub fn new(values: &[(&'static str, f64)]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    pub fn values(&self) -> &[(&'static str, f64)] {
        &self.values
    }

    /// Deep copy of `base` with exactly this overlay's keys overwritten.
    pub fn apply(&self, base: &Environment) -> Environment {
        let mut env = base.clone();
        for &(key, value) in &self.values {
            env.set(key, value);
        }
        env
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    pub overlay: Overlay,
    pub flags: FlagSet,
}

impl Seed {
    fn new(values: &[(&'static str, f64)], pins: &[Pin]) -> Self {
        Self {
            overlay: Overlay::new(values),
            flags: FlagSet::pinned(pins),
        }
    }
}

// Body-independent overlays: (M01, M11, M02, M12) moments and the matching W
// values. Near-zero moments pair with W = 0.7.
fn independent(m01: f64, m11: f64, m02: f64, m12: f64) -> Seed {
    let w = |m: f64| if m < 0.5 { 0.7 } else { 1.0 };
    Seed::new(
        &[
            ("M01", m01),
            ("M11", m11),
            ("M02", m02),
            ("M12", m12),
            ("W01", w(m01)),
            ("W11", w(m11)),
            ("W02", w(m02)),
            ("W12", w(m12)),
        ],
        &[],
    )
}

/// Ordered seeds for `mode`.
pub fn seeds(mode: SolverMode) -> Vec<Seed> {
    const SMALL: f64 = 0.01;
    const SAT: f64 = 1.0;

    match mode {
        SolverMode::SingleDof => vec![
            Seed::new(&[("M", SMALL), ("W", SMALL)], &[]),
            Seed::new(&[("M", SAT), ("W", SAT)], &[]),
        ],
        SolverMode::TwoDofCoupled => {
            let both = [("M01", SAT), ("M02", SAT)];
            vec![
                Seed::new(&both, &[]),
                Seed::new(&both, &[Pin::M01, Pin::M02]),
                Seed::new(&both, &[Pin::M02]),
            ]
        }
        SolverMode::TwoDofIndependent { break_symmetry } => {
            let mut seeds = vec![
                independent(SAT, SAT, SAT, SAT),
                independent(SMALL, SMALL, SMALL, SMALL),
                independent(SAT, SAT, SMALL, SMALL),
                independent(SAT, SAT, SAT, SMALL),
                independent(SAT, SAT, SMALL, SAT),
            ];
            if break_symmetry {
                seeds.push(independent(SMALL, SMALL, SAT, SAT));
            }
            seeds
        }
    }
}

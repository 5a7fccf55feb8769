pub mod error;
pub mod env;
pub mod catalog;
pub mod solver;
pub mod model;
pub mod ionic;
pub mod minimize;
pub mod sampler;
pub mod sweep;
pub mod store;
pub mod export;
pub mod config;
pub mod pipeline;

pub use catalog::{seeds, FlagSet, Overlay, Pin, Seed, SolverMode};
pub use config::RunConfig;
pub use env::{Environment, Param};
pub use error::{PhaseError, PhaseResult};
pub use minimize::{minimize, Minimization};
pub use model::{EnergyScale, IonicExchange};
pub use sampler::{PhaseSampler, SampleRange};
pub use solver::{Outcome, SolveOptions, Solver};
pub use store::ResultStore;
pub use sweep::{Sweep, SweepOutput, SweepReport};

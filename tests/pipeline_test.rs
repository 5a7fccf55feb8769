use std::fs;
use std::path::Path;

use mftscan::ionic::IonicSolver;
use mftscan::pipeline::{min_results, run};
use mftscan::{
    minimize, Environment, FlagSet, IonicExchange, Outcome, PhaseError, PhaseSampler, RunConfig,
    SampleRange, SolveOptions, Solver, SolverMode, Sweep,
};
use tempfile::tempdir;

/// Every seed converges with F = -B.
struct MinusField;

impl Solver for MinusField {
    fn solve_batch(
        &self,
        envs: Vec<Environment>,
        _options: &SolveOptions,
        _flags: &[FlagSet],
        _mode: SolverMode,
    ) -> Vec<Outcome> {
        envs.into_iter()
            .map(|mut env| {
                env.free_energy = -env.b;
                Outcome::Solved(env)
            })
            .collect()
    }
}

fn unit_scale(_: &Environment) -> f64 {
    1.0
}

#[test]
fn test_single_point_scenario() {
    let base = Environment::from_json(r#"{"M":0.0,"W":0.0,"FreeEnergy":0.0}"#).unwrap();
    let samples = PhaseSampler::new(SampleRange::electronic())
        .sample(&base, &unit_scale, 1, 1)
        .unwrap();
    assert_eq!(samples.len(), 1);
    assert!((samples[0].b - 0.01).abs() < 1e-15);
    assert!((samples[0].beta - 100.0).abs() < 1e-9);

    let result = minimize(&samples[0], &SolveOptions::default(), SolverMode::SingleDof, &MinusField);
    let best = result.best.solved().unwrap();
    assert!((best.free_energy + 0.01).abs() < 1e-15);

    let out = Sweep::new(1)
        .unwrap()
        .run(&samples, &SolveOptions::default(), SolverMode::SingleDof, &MinusField);
    assert_eq!(out.results[0], result);
}

fn write_base(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("base_env.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_run_then_replay() {
    let dir = tempdir().unwrap();
    let cfg = RunConfig {
        base_env_path: write_base(dir.path(), r#"{"M":0.0,"W":0.0}"#),
        out_prefix: dir.path().join("first"),
        num_fields: 3,
        num_temps: 2,
        workers: 2,
        ..RunConfig::default()
    };

    let summary = run(&cfg, &MinusField, &unit_scale).unwrap();
    assert_eq!(summary.points, 6);
    assert_eq!(summary.solved, 6);
    assert_eq!(summary.csv_rows, 6);
    assert_eq!(summary.report.unwrap().crashed, 0);

    let replay = RunConfig {
        read_prefix: Some(dir.path().join("first")),
        out_prefix: dir.path().join("second"),
        base_env_path: dir.path().join("not_needed.json"),
        ..cfg.clone()
    };
    let (replayed, report) = min_results(&replay, &MinusField, &unit_scale).unwrap();
    assert!(report.is_none());

    let (computed, _) = min_results(&cfg, &MinusField, &unit_scale).unwrap();
    assert_eq!(replayed, computed);

    let table = fs::read_to_string(dir.path().join("first_phase.csv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("b_ratio,t_ratio,free_energy,M,W"));
    assert_eq!(lines.count(), 6);
}

#[test]
fn test_replay_with_wrong_grid_size_fails() {
    let dir = tempdir().unwrap();
    let cfg = RunConfig {
        base_env_path: write_base(dir.path(), r#"{"M":0.0}"#),
        out_prefix: dir.path().join("first"),
        num_fields: 2,
        num_temps: 2,
        workers: 1,
        ..RunConfig::default()
    };
    run(&cfg, &MinusField, &unit_scale).unwrap();

    let replay = RunConfig {
        read_prefix: Some(dir.path().join("first")),
        num_fields: 3,
        ..cfg
    };
    assert!(matches!(
        min_results(&replay, &MinusField, &unit_scale),
        Err(PhaseError::ReplayLength { expected: 6, found: 4, .. })
    ));
}

#[test]
fn test_malformed_base_env_is_fatal() {
    let dir = tempdir().unwrap();
    let cfg = RunConfig {
        base_env_path: write_base(dir.path(), "{not json"),
        out_prefix: dir.path().join("out"),
        workers: 1,
        ..RunConfig::default()
    };
    assert!(matches!(
        run(&cfg, &MinusField, &unit_scale),
        Err(PhaseError::Json(_))
    ));
}

#[test]
fn test_ionic_phase_diagram() {
    let dir = tempdir().unwrap();
    let cfg = RunConfig {
        base_env_path: write_base(
            dir.path(),
            r#"{"Ja":0.25,"Jc":0.5,"Ka":0.0,"Kc":0.0,"Kb":0.0,
                "Tae":0.4,"EpsilonM":0.0,"EpsilonR":0.0,"Mu":0.0,"M":0.0,"W":0.0}"#,
        ),
        out_prefix: dir.path().join("ionic"),
        ions_only: true,
        num_fields: 4,
        num_temps: 4,
        workers: 2,
        tolerance: 1e-8,
        ..RunConfig::default()
    };

    let (best, report) = min_results(&cfg, &IonicSolver::default(), &IonicExchange).unwrap();
    let report = report.unwrap();
    assert_eq!(best.len(), 16);
    assert_eq!(report.crashed, 0);
    assert!(report.solved > 0);

    for env in best.iter().filter_map(Outcome::solved) {
        assert!(env.ions_only());
        assert_eq!(env.get("Tae"), Some(0.0));
        assert!(env.free_energy.is_finite());
    }

    // Lowest field and temperature: ordered. Highest field and temperature:
    // disordered.
    let cold = best[0].solved().unwrap().get("M").unwrap();
    let hot = best[15].solved().unwrap().get("M").unwrap();
    assert!(cold.abs() > 0.9, "cold M = {cold}");
    assert!(hot.abs() < 1e-3, "hot M = {hot}");
}

#[test]
fn test_ionic_solver_rejects_electronic_run() {
    let dir = tempdir().unwrap();
    let cfg = RunConfig {
        base_env_path: write_base(dir.path(), r#"{"Ja":0.25,"Jc":0.5,"Tae":0.4}"#),
        out_prefix: dir.path().join("out"),
        workers: 1,
        ..RunConfig::default()
    };
    assert!(matches!(
        run(&cfg, &IonicSolver::default(), &IonicExchange),
        Err(PhaseError::Config(_))
    ));
}

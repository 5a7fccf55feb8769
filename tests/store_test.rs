use std::fs;

use mftscan::{Environment, Minimization, Outcome, PhaseError, ResultStore};
use tempfile::tempdir;

fn solved(b: f64, beta: f64, m: f64, fe: f64) -> Outcome {
    let mut env = Environment::new();
    env.b = b;
    env.beta = beta;
    env.free_energy = fe;
    env.set("M", m);
    env.set("W", m * m);
    env.set("Ja", 0.25);
    Outcome::Solved(env)
}

fn sample_results() -> Vec<Minimization> {
    vec![
        Minimization {
            best: solved(0.01, 100.0, 0.999_999_123_456_7, -1.234_567_890_123),
            all: vec![solved(0.01, 100.0, 0.1, 0.5), solved(0.01, 100.0, 0.999_999_123_456_7, -1.234_567_890_123)],
        },
        Minimization::unconverged(2),
        Minimization {
            best: solved(1.2, f64::INFINITY, 1.0, -3.0),
            all: vec![Outcome::Unconverged, solved(1.2, f64::INFINITY, 1.0, -3.0)],
        },
    ]
}

#[test]
fn test_round_trip_preserves_values_and_nulls() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("run"));
    let results = sample_results();
    store.save(&results).unwrap();

    let best = store.read_min(3).unwrap();
    let expected: Vec<Outcome> = results.iter().map(|m| m.best.clone()).collect();
    assert_eq!(best, expected);

    let all = store.read_all(3).unwrap();
    let expected: Vec<Vec<Outcome>> = results.iter().map(|m| m.all.clone()).collect();
    assert_eq!(all, expected);
}

#[test]
fn test_unconverged_point_is_a_null_line() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("run"));
    store.save(&sample_results()).unwrap();

    let min = fs::read_to_string(store.min_path()).unwrap();
    let lines: Vec<&str> = min.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "null");

    let all = fs::read_to_string(store.all_path()).unwrap();
    let lines: Vec<&str> = all.lines().collect();
    assert_eq!(lines[1], "[null,null]");
    assert!(lines[2].starts_with("[null,{"));
}

#[test]
fn test_replay_length_mismatch_is_fatal() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("run"));
    store.save(&sample_results()).unwrap();

    match store.read_min(4) {
        Err(PhaseError::ReplayLength { expected, found, .. }) => {
            assert_eq!(expected, 4);
            assert_eq!(found, 3);
        }
        other => panic!("expected length error, got {other:?}"),
    }
}

#[test]
fn test_replay_bad_record_is_fatal() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("run"));
    fs::write(store.min_path(), "null\n{\"B\": 0.1, \"Beta\": \n").unwrap();

    match store.read_min(2) {
        Err(PhaseError::ReplayRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected record error, got {other:?}"),
    }
}

#[test]
fn test_replay_accepts_missing_trailing_newline() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("run"));
    fs::write(store.min_path(), "{\"B\":0.5,\"Beta\":2.0,\"FreeEnergy\":-1.0,\"M\":0.3}\nnull").unwrap();

    let best = store.read_min(2).unwrap();
    let env = best[0].solved().unwrap();
    assert_eq!(env.b, 0.5);
    assert_eq!(env.get("M"), Some(0.3));
    assert_eq!(best[1], Outcome::Unconverged);
}

#[test]
fn test_missing_replay_file_is_io_error() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("nothing_here"));
    assert!(matches!(store.read_min(1), Err(PhaseError::Io(_))));
}

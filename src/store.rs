//! Persistence and replay of sweep results.
//!
//! Two newline-delimited JSON files share an output prefix:
//!
//! * `<prefix>_min_data`: one record per sample point, `null` where the
//!   point did not converge.
//! * `<prefix>_all_data`: one array per sample point holding every seed's
//!   result in catalog order.
//!
//! Lines follow sample order. Replay checks the record count against the
//! intended grid size and fails on any mismatch.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{PhaseError, PhaseResult};
use crate::minimize::Minimization;
use crate::solver::Outcome;

#[derive(Debug, Clone)]
pub struct ResultStore {
    prefix: PathBuf,
}

impl ResultStore {
    pub fn new<P: Into<PathBuf>>(prefix: P) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.prefix.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn min_path(&self) -> PathBuf {
        self.with_suffix("_min_data")
    }

    pub fn all_path(&self) -> PathBuf {
        self.with_suffix("_all_data")
    }

    /// Phase-diagram table written next to the result files.
    pub fn csv_path(&self) -> PathBuf {
        self.with_suffix("_phase.csv")
    }

    /// Write both files for a finished sweep.
    pub fn save(&self, results: &[Minimization]) -> PhaseResult<()> {
        self.write_min(results.iter().map(|m| &m.best))?;
        self.write_all(results.iter().map(|m| m.all.as_slice()))?;
        let (min, all) = (self.min_path(), self.all_path());
        info!(
            points = results.len(),
            min = %min.display(),
            all = %all.display(),
            "saved sweep results"
        );
        Ok(())
    }

    pub fn write_min<'a, I>(&self, best: I) -> PhaseResult<()>
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        write_lines(&self.min_path(), best)
    }

    pub fn write_all<'a, I>(&self, all: I) -> PhaseResult<()>
    where
        I: IntoIterator<Item = &'a [Outcome]>,
    {
        write_lines(&self.all_path(), all)
    }

    /// Reload the minimal results of a previous run of `expected` points.
    pub fn read_min(&self, expected: usize) -> PhaseResult<Vec<Outcome>> {
        let path = self.min_path();
        let records = read_lines(&path, expected)?;
        info!(points = records.len(), path = %path.display(), "replayed minimal results");
        Ok(records)
    }

    pub fn read_all(&self, expected: usize) -> PhaseResult<Vec<Vec<Outcome>>> {
        read_lines(&self.all_path(), expected)
    }
}

fn write_lines<T, I>(path: &Path, records: I) -> PhaseResult<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut out = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn read_lines<T: DeserializeOwned>(path: &Path, expected: usize) -> PhaseResult<Vec<T>> {
    let data = fs::read_to_string(path)?;
    let lines: Vec<&str> = data.lines().collect();
    if lines.len() != expected {
        return Err(PhaseError::ReplayLength {
            path: path.to_path_buf(),
            expected,
            found: lines.len(),
        });
    }
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line.trim()).map_err(|source| PhaseError::ReplayRecord {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}

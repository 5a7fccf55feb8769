// export.rs - Phase-diagram table for plotting tools
//
// One CSV row per solved point; unsolved points are left out.

use std::path::Path;

use csv::WriterBuilder;

use crate::catalog::SolverMode;
use crate::error::PhaseResult;
use crate::model::EnergyScale;
use crate::sampler::grid_coordinates;
use crate::solver::Outcome;

/// Write `b_ratio, t_ratio, free_energy, <order keys...>` rows and return the
/// number of rows written.
pub fn write_phase_csv<S: EnergyScale + ?Sized>(
    path: &Path,
    best: &[Outcome],
    mode: SolverMode,
    scale: &S,
) -> PhaseResult<usize> {
    let mut wtr = WriterBuilder::new().from_path(path)?;

    let keys = mode.order_keys();
    let mut header = vec!["b_ratio", "t_ratio", "free_energy"];
    header.extend_from_slice(keys);
    wtr.write_record(&header)?;

    let mut rows = 0;
    for env in best.iter().filter_map(Outcome::solved) {
        let (b_ratio, t_ratio) = grid_coordinates(env, scale)?;
        let mut record = vec![
            b_ratio.to_string(),
            t_ratio.to_string(),
            env.free_energy.to_string(),
        ];
        record.extend(
            keys.iter()
                .map(|k| env.get(k).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

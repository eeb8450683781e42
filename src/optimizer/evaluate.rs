//! Parallel candidate evaluation: each candidate gets a disposable fit
//! clone, a full resolution and a stats snapshot. Results come back in
//! input order; dominance and ranking run only after the join.

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::MemoryCatalog;
use crate::dogma::{resolve, ResolutionError};
use crate::fit::Fit;
use crate::parallel::{batch_ranges, WorkerPool};
use crate::stats::{snapshot, StatsSnapshot};
use crate::validate::validate;

use super::candidates::Candidate;
use super::objective::Objective;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluatedCandidate {
    pub candidate: Candidate,
    pub snapshot: StatsSnapshot,
    /// One value per requested objective, unavailable metrics pinned worst.
    pub objective_values: Vec<f64>,
    /// Differences vs the base fit, same order as `objective_values`.
    pub deltas: Vec<f64>,
    pub violation_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub base_snapshot: StatsSnapshot,
    pub base_values: Vec<f64>,
    pub results: Vec<EvaluatedCandidate>,
    /// Candidates dropped because their hypothetical fit failed to resolve
    /// or (with `require_valid`) had violations.
    pub skipped: usize,
}

fn objective_values(objectives: &[Objective], snapshot: &StatsSnapshot) -> Vec<f64> {
    objectives.iter().map(|o| o.comparable(snapshot)).collect()
}

fn evaluate_one(
    fit: &Fit,
    catalog: &MemoryCatalog,
    candidate: &Candidate,
    objectives: &[Objective],
    base_values: &[f64],
    require_valid: bool,
) -> Option<EvaluatedCandidate> {
    let trial = candidate.materialize(fit, catalog).ok()?;
    let resolved = resolve(&trial, catalog).ok()?;
    let violation_count = validate(&trial, &resolved, catalog).len();
    if require_valid && violation_count > 0 {
        return None;
    }
    let snap = snapshot(&trial, &resolved, catalog);
    let values = objective_values(objectives, &snap);
    let deltas = values
        .iter()
        .zip(base_values)
        .map(|(value, base)| value - base)
        .collect();
    Some(EvaluatedCandidate {
        candidate: *candidate,
        snapshot: snap,
        objective_values: values,
        deltas,
        violation_count,
    })
}

/// Evaluate all candidates against the base fit. Independent candidates run
/// in parallel; the returned report is the barrier point.
pub fn evaluate_candidates(
    fit: &Fit,
    catalog: &MemoryCatalog,
    candidates: &[Candidate],
    objectives: &[Objective],
    require_valid: bool,
) -> Result<EvaluationReport, ResolutionError> {
    let resolved = resolve(fit, catalog)?;
    let base_snapshot = snapshot(fit, &resolved, catalog);
    let base_values = objective_values(objectives, &base_snapshot);

    let evaluated: Vec<Option<EvaluatedCandidate>> = candidates
        .par_iter()
        .map(|candidate| {
            evaluate_one(fit, catalog, candidate, objectives, &base_values, require_valid)
        })
        .collect();

    let skipped = evaluated.iter().filter(|e| e.is_none()).count();
    Ok(EvaluationReport {
        base_snapshot,
        base_values,
        results: evaluated.into_iter().flatten().collect(),
        skipped,
    })
}

/// Like [evaluate_candidates], but runs in batches under the given worker
/// pool and reports `(done, total)` after each batch.
pub fn evaluate_candidates_with_progress<F>(
    fit: &Fit,
    catalog: &MemoryCatalog,
    candidates: &[Candidate],
    objectives: &[Objective],
    require_valid: bool,
    pool: &WorkerPool,
    num_batches: usize,
    mut on_progress: F,
) -> Result<EvaluationReport, ResolutionError>
where
    F: FnMut(usize, usize),
{
    let resolved = resolve(fit, catalog)?;
    let base_snapshot = snapshot(fit, &resolved, catalog);
    let base_values = objective_values(objectives, &base_snapshot);

    let total = candidates.len();
    on_progress(0, total);

    let mut results = Vec::with_capacity(total);
    let mut skipped = 0;
    for (start, end) in batch_ranges(total, num_batches.max(1)) {
        let batch = &candidates[start..end];
        let evaluated: Vec<Option<EvaluatedCandidate>> = pool.install(|| {
            batch
                .par_iter()
                .map(|candidate| {
                    evaluate_one(fit, catalog, candidate, objectives, &base_values, require_valid)
                })
                .collect()
        });
        skipped += evaluated.iter().filter(|e| e.is_none()).count();
        results.extend(evaluated.into_iter().flatten());
        on_progress(end, total);
    }

    Ok(EvaluationReport {
        base_snapshot,
        base_values,
        results,
        skipped,
    })
}

//! Candidate search: ranked single-best replacement or Pareto frontier over
//! module/state substitutions, and a multi-slot iterative optimizer that
//! repeats best-pick passes until convergence or a pass cap.

pub mod candidates;
pub mod evaluate;
pub mod objective;
pub mod pareto;

pub use candidates::{discover_candidates, Candidate, CandidateChange};
pub use evaluate::{
    evaluate_candidates, evaluate_candidates_with_progress, EvaluatedCandidate, EvaluationReport,
};
pub use objective::{Direction, Objective};
pub use pareto::{dominates, pareto_frontier, sort_by_priority};

use serde::Serialize;

use crate::catalog::MemoryCatalog;
use crate::dogma::{resolve, ResolutionError};
use crate::fit::Fit;
use crate::stats::{snapshot, StatsSnapshot};

#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    /// Priority-ordered objectives; the first drives best-pick selection,
    /// the rest break ties.
    pub objectives: Vec<Objective>,
    pub max_passes: usize,
    /// Swap candidates considered per slot.
    pub candidate_limit: usize,
    /// Skip candidates whose hypothetical fit has validation violations.
    pub require_valid: bool,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            objectives: vec![Objective::Dps],
            max_passes: 4,
            candidate_limit: 12,
            require_valid: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedChange {
    pub pass: usize,
    pub candidate: Candidate,
    /// Primary objective value after the change.
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeReport {
    pub changes: Vec<AppliedChange>,
    pub passes: usize,
    /// False when the pass cap was reached with improvements still landing:
    /// a best-effort result, not a failure.
    pub converged: bool,
    pub score: f64,
    pub snapshot: StatsSnapshot,
}

/// Build the Pareto frontier for a supplied candidate set.
pub fn pareto_search(
    fit: &Fit,
    catalog: &MemoryCatalog,
    candidates: &[Candidate],
    objectives: &[Objective],
    require_valid: bool,
) -> Result<(Vec<EvaluatedCandidate>, EvaluationReport), ResolutionError> {
    let report = evaluate_candidates(fit, catalog, candidates, objectives, require_valid)?;
    let frontier = pareto_frontier(report.results.clone(), objectives);
    Ok((frontier, report))
}

/// Ranked candidates, best first, by declared objective priority.
pub fn rank_candidates(
    fit: &Fit,
    catalog: &MemoryCatalog,
    candidates: &[Candidate],
    objectives: &[Objective],
    require_valid: bool,
) -> Result<EvaluationReport, ResolutionError> {
    let mut report = evaluate_candidates(fit, catalog, candidates, objectives, require_valid)?;
    sort_by_priority(&mut report.results, objectives);
    Ok(report)
}

/// Multi-slot local search: per-slot best-pick in fixed rack traversal
/// order, re-resolving after each applied change, until a full pass makes
/// no improving swap or the pass cap is reached.
///
/// The traversal-order re-pick discipline guards against oscillation
/// between two candidates that alternately improve different objectives:
/// a swap is only applied when it strictly improves the primary objective.
pub fn optimize_iterative(
    fit: &mut Fit,
    catalog: &MemoryCatalog,
    config: &OptimizeConfig,
) -> Result<OptimizeReport, ResolutionError> {
    let primary = *config.objectives.first().unwrap_or(&Objective::Dps);
    let objectives: Vec<Objective> = if config.objectives.is_empty() {
        vec![primary]
    } else {
        config.objectives.clone()
    };

    let resolved = resolve(fit, catalog)?;
    let mut current_snapshot = snapshot(fit, &resolved, catalog);
    let mut current_score = primary.comparable(&current_snapshot);

    let mut changes = Vec::new();
    let mut passes = 0;
    let mut converged = false;

    while passes < config.max_passes.max(1) {
        passes += 1;
        let mut improved_this_pass = false;

        let positions: Vec<_> = fit
            .modules()
            .map(|(slot, index, _)| (slot, index))
            .collect();
        for (slot, index) in positions {
            let slot_candidates = match discover_candidates(
                fit,
                catalog,
                slot,
                index,
                config.candidate_limit,
            ) {
                Ok(candidates) => candidates,
                Err(_) => continue,
            };
            if slot_candidates.is_empty() {
                continue;
            }
            let mut report = evaluate_candidates(
                fit,
                catalog,
                &slot_candidates,
                &objectives,
                config.require_valid,
            )?;
            sort_by_priority(&mut report.results, &objectives);
            let Some(best) = report.results.first() else {
                continue;
            };
            let best_score = best.objective_values[0];
            if !primary.better(best_score, current_score) {
                continue;
            }
            let candidate = best.candidate;
            let best_snapshot = best.snapshot.clone();
            if candidate.apply(fit, catalog).is_err() {
                continue;
            }
            current_snapshot = best_snapshot;
            current_score = best_score;
            improved_this_pass = true;
            changes.push(AppliedChange {
                pass: passes,
                candidate,
                score: current_score,
            });
        }

        if !improved_this_pass {
            converged = true;
            break;
        }
    }

    Ok(OptimizeReport {
        changes,
        passes,
        converged,
        score: current_score,
        snapshot: current_snapshot,
    })
}

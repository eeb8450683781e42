//! Pareto dominance over evaluated candidates.

use super::evaluate::EvaluatedCandidate;
use super::objective::Objective;

/// Weak dominance: `a` is at least as good on every objective and strictly
/// better on at least one.
pub fn dominates(a: &[f64], b: &[f64], objectives: &[Objective]) -> bool {
    debug_assert_eq!(a.len(), objectives.len());
    debug_assert_eq!(b.len(), objectives.len());
    let mut strictly_better = false;
    for ((va, vb), objective) in a.iter().zip(b).zip(objectives) {
        if objective.better(*vb, *va) {
            return false;
        }
        if objective.better(*va, *vb) {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Prune every candidate dominated by another; ties broken by the declared
/// objective priority order (first objective most significant).
pub fn pareto_frontier(
    candidates: Vec<EvaluatedCandidate>,
    objectives: &[Objective],
) -> Vec<EvaluatedCandidate> {
    let mut kept: Vec<EvaluatedCandidate> = Vec::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let dominated = candidates.iter().enumerate().any(|(j, other)| {
            i != j && dominates(&other.objective_values, &candidate.objective_values, objectives)
        });
        if !dominated {
            kept.push(candidate.clone());
        }
    }
    sort_by_priority(&mut kept, objectives);
    kept
}

/// Order by the declared objective priority: best on objective 0 first,
/// further objectives break ties.
pub fn sort_by_priority(candidates: &mut [EvaluatedCandidate], objectives: &[Objective]) {
    candidates.sort_by(|left, right| {
        for (k, objective) in objectives.iter().enumerate() {
            let (lv, rv) = (left.objective_values[k], right.objective_values[k]);
            let ordering = match objective.direction() {
                super::objective::Direction::Maximize => rv.total_cmp(&lv),
                super::objective::Direction::Minimize => lv.total_cmp(&rv),
            };
            if ordering != std::cmp::Ordering::Equal {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    });
}

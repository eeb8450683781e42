//! Stacking penalty: diminishing returns for same-group multiplicative
//! modifiers.
//!
//! The decay constant is a domain convention; it lives behind the
//! [PenaltyPolicy] trait so an alternative calibration can be swapped in
//! without touching the resolver.

/// Weight applied to the k-th ranked modifier of a penalized group
/// (rank 0 = strongest, full weight).
pub trait PenaltyPolicy: Sync {
    fn weight(&self, rank: usize) -> f64;
}

pub const DEFAULT_PENALTY_SIGMA: f64 = 2.67;

/// weight(k) = exp(-(k / sigma)^2), the standard nerf curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    pub sigma: f64,
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_PENALTY_SIGMA,
        }
    }
}

impl PenaltyPolicy for ExponentialDecay {
    fn weight(&self, rank: usize) -> f64 {
        let x = rank as f64 / self.sigma;
        (-(x * x)).exp()
    }
}

/// Combine one penalized group of multipliers into a single factor.
///
/// Modifiers are ranked by descending distance from 1.0; the k-th ranked
/// multiplier `m` contributes `1 + (m - 1) * weight(k)`. Ties rank in a
/// fixed order (by value) so resolution stays deterministic.
pub fn combine_penalized(policy: &dyn PenaltyPolicy, multipliers: &mut Vec<f64>) -> f64 {
    multipliers.sort_by(|a, b| {
        (b - 1.0)
            .abs()
            .total_cmp(&(a - 1.0).abs())
            .then_with(|| a.total_cmp(b))
    });
    multipliers
        .iter()
        .enumerate()
        .map(|(rank, m)| 1.0 + (m - 1.0) * policy.weight(rank))
        .product()
}

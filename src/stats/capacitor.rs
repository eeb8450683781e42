//! Capacitor stability: a discrete time-stepped simulation of net energy
//! given the recharge curve and every active consumer's drain.

use serde::Serialize;

use crate::catalog::attrs;
use crate::dogma::{EntityId, Resolved};
use crate::fit::{Fit, ModuleState};

use super::Metric;

/// Simulation step, seconds.
const STEP_SECONDS: f64 = 1.0;
/// Horizon is 10x the recharge time, never less than 10 minutes.
const HORIZON_FACTOR: f64 = 10.0;
const MIN_HORIZON_SECONDS: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CapacitorReport {
    /// Net energy stays positive over the horizon; `fraction` is the lowest
    /// level reached over the settled tail, as a fraction of capacity.
    Stable { fraction: f64 },
    /// Drain exceeds recharge; time from full to empty, always > 0.
    Unstable { seconds_to_empty: f64 },
}

impl CapacitorReport {
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacitorStats {
    pub capacity: f64,
    pub recharge_time: f64,
    /// Combined continuous drain from active modules, GJ per second.
    pub drain_per_second: f64,
    /// Peak recharge rate, GJ per second.
    pub peak_recharge: f64,
    pub report: CapacitorReport,
}

/// Recharge rate at level `c` of capacity `c0`:
/// `dC/dt = (sqrt(c/c0) - c/c0) * 2 * c0 / tau`, `tau = recharge_time / 5`.
fn recharge_rate(c: f64, c0: f64, recharge_time: f64) -> f64 {
    if c0 <= 0.0 || recharge_time <= 0.0 {
        return 0.0;
    }
    let tau = recharge_time / 5.0;
    let x = (c / c0).clamp(0.0, 1.0);
    (x.sqrt() - x) * 2.0 * c0 / tau
}

fn total_drain(fit: &Fit, resolved: &Resolved) -> Result<f64, String> {
    let mut drain = 0.0;
    for (slot, index, module) in fit.modules() {
        if module.state < ModuleState::Active {
            continue;
        }
        let entity = EntityId::Module(slot, index);
        let Some(cost) = resolved.value(entity, attrs::ACTIVATION_COST) else {
            continue;
        };
        if cost <= 0.0 {
            continue;
        }
        let cycle = resolved.value(entity, attrs::CYCLE_TIME).unwrap_or(0.0);
        if cycle <= 0.0 {
            return Err(format!(
                "{entity} consumes capacitor but has no positive cycle time"
            ));
        }
        drain += cost / cycle;
    }
    Ok(drain)
}

pub fn capacitor(fit: &Fit, resolved: &Resolved) -> Metric<CapacitorStats> {
    let Some(capacity) = resolved.ship_attr(attrs::CAPACITOR_CAPACITY) else {
        return Metric::unavailable("hull has no capacitor capacity attribute");
    };
    let Some(recharge_time) = resolved.ship_attr(attrs::CAPACITOR_RECHARGE_TIME) else {
        return Metric::unavailable("hull has no capacitor recharge time attribute");
    };
    if capacity <= 0.0 || recharge_time <= 0.0 {
        return Metric::unavailable("capacitor capacity and recharge time must be positive");
    }
    let drain = match total_drain(fit, resolved) {
        Ok(drain) => drain,
        Err(reason) => return Metric::unavailable(reason),
    };

    // Peak of the recharge curve sits at 25% charge.
    let peak_recharge = recharge_rate(capacity * 0.25, capacity, recharge_time);

    let report = simulate(capacity, recharge_time, drain);
    Metric::ok(CapacitorStats {
        capacity,
        recharge_time,
        drain_per_second: drain,
        peak_recharge,
        report,
    })
}

fn simulate(capacity: f64, recharge_time: f64, drain: f64) -> CapacitorReport {
    if drain <= 0.0 {
        return CapacitorReport::Stable { fraction: 1.0 };
    }
    let horizon = (recharge_time * HORIZON_FACTOR).max(MIN_HORIZON_SECONDS);
    let steps = (horizon / STEP_SECONDS).ceil() as usize;
    let tail_start = steps / 2;

    let mut level = capacity;
    let mut tail_min = capacity;
    for step in 0..steps {
        let net = recharge_rate(level, capacity, recharge_time) - drain;
        level = (level + net * STEP_SECONDS).min(capacity);
        if level <= 0.0 {
            // Time to empty is measured from full and is always positive:
            // the capacitor starts full, so at least one step has elapsed.
            return CapacitorReport::Unstable {
                seconds_to_empty: (step + 1) as f64 * STEP_SECONDS,
            };
        }
        if step >= tail_start {
            tail_min = tail_min.min(level);
        }
    }
    CapacitorReport::Stable {
        fraction: tail_min / capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recharge_peaks_at_quarter_charge() {
        let c0 = 1000.0;
        let t = 300.0;
        let peak = recharge_rate(0.25 * c0, c0, t);
        for x in [0.05, 0.1, 0.5, 0.75, 0.95] {
            assert!(recharge_rate(x * c0, c0, t) <= peak + 1e-9);
        }
    }

    #[test]
    fn recharge_is_zero_at_full_and_empty() {
        assert_eq!(recharge_rate(1000.0, 1000.0, 300.0), 0.0);
        assert_eq!(recharge_rate(0.0, 1000.0, 300.0), 0.0);
    }

    #[test]
    fn no_drain_is_fully_stable() {
        assert_eq!(
            simulate(1000.0, 300.0, 0.0),
            CapacitorReport::Stable { fraction: 1.0 }
        );
    }

    #[test]
    fn light_drain_is_stable_below_full() {
        let peak = recharge_rate(250.0, 1000.0, 300.0);
        let report = simulate(1000.0, 300.0, peak * 0.3);
        match report {
            CapacitorReport::Stable { fraction } => {
                assert!(fraction > 0.0 && fraction < 1.0, "fraction {fraction}");
            }
            CapacitorReport::Unstable { .. } => panic!("expected stable"),
        }
    }

    #[test]
    fn heavy_drain_empties_in_finite_time() {
        let peak = recharge_rate(250.0, 1000.0, 300.0);
        let report = simulate(1000.0, 300.0, peak * 3.0);
        match report {
            CapacitorReport::Unstable { seconds_to_empty } => {
                assert!(seconds_to_empty > 0.0);
                assert!(seconds_to_empty.is_finite());
            }
            CapacitorReport::Stable { .. } => panic!("expected unstable"),
        }
    }
}

//! Damage output: volley, DPS, and range-scaled applied DPS.

use serde::Serialize;

use crate::catalog::attrs;
use crate::dogma::{EntityId, Resolved};
use crate::fit::{DamageType, Fit, ModuleState};

use super::Metric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DamageStats {
    pub volley: f64,
    pub dps: f64,
    pub weapon_count: usize,
}

/// One damage dealer: a weapon module (damage attrs read from its loaded
/// charge when present) or an active drone stack.
#[derive(Debug, Clone, Copy)]
struct Dealer {
    entity: EntityId,
    damage_source: EntityId,
    multiplier: f64,
}

fn dealers(fit: &Fit) -> Vec<Dealer> {
    let mut out = Vec::new();
    for (slot, index, module) in fit.modules() {
        if module.state < ModuleState::Active {
            continue;
        }
        let entity = EntityId::Module(slot, index);
        let damage_source = if module.charge.is_some() {
            EntityId::Charge(slot, index)
        } else {
            entity
        };
        out.push(Dealer {
            entity,
            damage_source,
            multiplier: 1.0,
        });
    }
    for (index, drone) in fit.drones().iter().enumerate() {
        if !drone.active {
            continue;
        }
        let entity = EntityId::Drone(index);
        out.push(Dealer {
            entity,
            damage_source: entity,
            multiplier: f64::from(drone.count),
        });
    }
    out
}

fn raw_volley(resolved: &Resolved, dealer: &Dealer) -> f64 {
    let type_sum: f64 = DamageType::ALL
        .iter()
        .map(|t| {
            resolved
                .value(dealer.damage_source, attrs::damage_attr(*t))
                .unwrap_or(0.0)
                .max(0.0)
        })
        .sum();
    let damage_multiplier = resolved
        .value(dealer.entity, attrs::DAMAGE_MULTIPLIER)
        .unwrap_or(1.0);
    type_sum * damage_multiplier * dealer.multiplier
}

/// Per-dealer volley and cycle, skipping anything that deals no damage.
fn dealer_outputs(fit: &Fit, resolved: &Resolved) -> Result<Vec<(Dealer, f64, f64)>, String> {
    let mut out = Vec::new();
    for dealer in dealers(fit) {
        let volley = raw_volley(resolved, &dealer);
        if volley <= 0.0 {
            continue;
        }
        let cycle = resolved
            .value(dealer.entity, attrs::CYCLE_TIME)
            .unwrap_or(0.0);
        if cycle <= 0.0 {
            return Err(format!(
                "{} deals damage but has no positive cycle time",
                dealer.entity
            ));
        }
        out.push((dealer, volley, cycle));
    }
    Ok(out)
}

pub fn total_damage(fit: &Fit, resolved: &Resolved) -> Metric<DamageStats> {
    match dealer_outputs(fit, resolved) {
        Err(reason) => Metric::unavailable(reason),
        Ok(outputs) => {
            let mut stats = DamageStats::default();
            for (_, volley, cycle) in &outputs {
                stats.volley += volley;
                stats.dps += volley / cycle;
            }
            stats.weapon_count = outputs.len();
            Metric::ok(stats)
        }
    }
}

/// Hit-quality factor as a function of distance: 1 inside optimal, then the
/// falloff curve `0.5 ^ ((d - optimal) / falloff)^2`, clamped to [0, 1].
/// With no falloff the factor is a hard cutoff at optimal.
pub fn range_factor(optimal: f64, falloff: f64, distance: f64) -> f64 {
    let over = (distance - optimal.max(0.0)).max(0.0);
    if over == 0.0 {
        return 1.0;
    }
    if falloff <= 0.0 {
        return 0.0;
    }
    let x = over / falloff;
    0.5_f64.powf(x * x).clamp(0.0, 1.0)
}

/// DPS scaled by each weapon's range factor at the given distance and by the
/// defense profile's average target resist. Monotonic non-increasing in
/// range. `range_override` takes precedence over the profile's range.
pub fn dps_at_range(
    fit: &Fit,
    resolved: &Resolved,
    range_override: Option<f64>,
) -> Metric<f64> {
    let outputs = match dealer_outputs(fit, resolved) {
        Err(reason) => return Metric::unavailable(reason),
        Ok(outputs) => outputs,
    };
    let distance = range_override.or(fit.defense_profile().range_m);
    let resist_factor = 1.0 - fit.defense_profile().average_resist();

    let mut total = 0.0;
    for (dealer, volley, cycle) in &outputs {
        let factor = match distance {
            None => 1.0,
            Some(d) => {
                let optimal = resolved
                    .value(dealer.entity, attrs::OPTIMAL_RANGE)
                    .unwrap_or(0.0);
                let falloff = resolved.value(dealer.entity, attrs::FALLOFF).unwrap_or(0.0);
                if optimal <= 0.0 && falloff <= 0.0 {
                    // No range data (e.g. drones): applies at full effect.
                    1.0
                } else {
                    range_factor(optimal, falloff, d.max(0.0))
                }
            }
        };
        total += volley / cycle * factor;
    }
    Metric::ok(total * resist_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_factor_is_one_inside_optimal() {
        assert_eq!(range_factor(10_000.0, 5_000.0, 0.0), 1.0);
        assert_eq!(range_factor(10_000.0, 5_000.0, 10_000.0), 1.0);
    }

    #[test]
    fn range_factor_halves_at_one_falloff() {
        let factor = range_factor(10_000.0, 5_000.0, 15_000.0);
        assert!((factor - 0.5).abs() < 1e-12);
    }

    #[test]
    fn range_factor_monotonic_non_increasing() {
        let mut previous = 1.0;
        for step in 0..40 {
            let factor = range_factor(10_000.0, 5_000.0, step as f64 * 1_000.0);
            assert!(factor <= previous + 1e-15);
            previous = factor;
        }
    }

    #[test]
    fn zero_falloff_is_a_hard_cutoff() {
        assert_eq!(range_factor(10_000.0, 0.0, 9_999.0), 1.0);
        assert_eq!(range_factor(10_000.0, 0.0, 10_001.0), 0.0);
    }
}

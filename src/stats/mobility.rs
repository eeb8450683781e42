//! Mobility: top speed and agility-derived align time.

use serde::Serialize;

use crate::catalog::attrs;
use crate::dogma::Resolved;

use super::Metric;

/// ln(4): a ship is considered aligned at 75% of top speed.
const ALIGN_LN4: f64 = 1.386_294_361_119_890_6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MobilityStats {
    pub max_velocity: f64,
    pub align_time: f64,
    pub mass: f64,
    pub agility: f64,
}

/// Align time = ln(4) * agility * mass / 1e6, seconds.
pub fn align_time(agility: f64, mass: f64) -> f64 {
    ALIGN_LN4 * agility * mass / 1e6
}

pub fn mobility(resolved: &Resolved) -> Metric<MobilityStats> {
    let Some(max_velocity) = resolved.ship_attr(attrs::MAX_VELOCITY) else {
        return Metric::unavailable("hull has no max velocity attribute");
    };
    let Some(mass) = resolved.ship_attr(attrs::MASS) else {
        return Metric::unavailable("hull has no mass attribute");
    };
    let Some(agility) = resolved.ship_attr(attrs::AGILITY) else {
        return Metric::unavailable("hull has no agility attribute");
    };
    Metric::ok(MobilityStats {
        max_velocity,
        align_time: align_time(agility, mass),
        mass,
        agility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_time_formula() {
        // 1,200,000 kg at 3.0 agility: ln(4) * 3 * 1.2 = ~4.99s
        let t = align_time(3.0, 1_200_000.0);
        assert!((t - 4.990_659_7).abs() < 1e-6, "got {t}");
    }

    #[test]
    fn heavier_is_slower_to_align() {
        assert!(align_time(3.0, 2_000_000.0) > align_time(3.0, 1_000_000.0));
    }
}

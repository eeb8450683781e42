//! Effective hit points and sustained tank.

use serde::Serialize;

use crate::catalog::attrs::{self, Layer};
use crate::dogma::{EntityId, Resolved};
use crate::fit::{DamagePattern, DamageType, Fit, ModuleState};

use super::Metric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayerEhp {
    pub raw_hp: f64,
    pub ehp: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EhpStats {
    pub shield: LayerEhp,
    pub armor: LayerEhp,
    pub structure: LayerEhp,
    pub total: f64,
}

impl EhpStats {
    pub fn layer(&self, layer: Layer) -> LayerEhp {
        match layer {
            Layer::Shield => self.shield,
            Layer::Armor => self.armor,
            Layer::Structure => self.structure,
        }
    }
}

/// Multiplier turning raw HP into EHP against the weighted damage mix:
/// `1 / sum_t fraction(t) * (1 - resist(layer, t))`. With all resists at
/// zero the divisor is exactly 1 and EHP equals raw HP.
fn ehp_divisor(resolved: &Resolved, pattern: &DamagePattern, layer: Layer) -> f64 {
    DamageType::ALL
        .iter()
        .map(|t| {
            let resist = resolved
                .ship_attr(attrs::resist_attr(layer, *t))
                .unwrap_or(0.0)
                .clamp(0.0, 0.99);
            pattern.fraction(*t) * (1.0 - resist)
        })
        .sum()
}

pub fn ehp(fit: &Fit, resolved: &Resolved) -> Metric<EhpStats> {
    let pattern = fit.damage_pattern();
    let mut stats = EhpStats::default();
    for layer in Layer::ALL {
        let Some(raw_hp) = resolved.ship_attr(layer.hp_attr()) else {
            return Metric::unavailable(format!(
                "hull has no {} hit points attribute",
                layer.as_str()
            ));
        };
        let divisor = ehp_divisor(resolved, pattern, layer);
        let layer_ehp = if divisor > 0.0 { raw_hp / divisor } else { f64::INFINITY };
        let entry = LayerEhp {
            raw_hp,
            ehp: layer_ehp,
        };
        match layer {
            Layer::Shield => stats.shield = entry,
            Layer::Armor => stats.armor = entry,
            Layer::Structure => stats.structure = entry,
        }
        stats.total += layer_ehp;
    }
    Metric::ok(stats)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TankStats {
    /// Active repair per second, raw HP, per layer.
    pub shield_repair: f64,
    pub armor_repair: f64,
    pub hull_repair: f64,
    /// Passive shield regeneration peak, raw HP per second.
    pub passive_shield: f64,
    pub total: f64,
    /// Total scaled into EHP per second against the damage pattern.
    pub total_ehp: f64,
}

/// Sustained repair rates from active repairer modules plus passive shield
/// regen. Per-layer rates are clamped to the layer buffer per second.
pub fn tank(fit: &Fit, resolved: &Resolved) -> Metric<TankStats> {
    let mut stats = TankStats::default();

    for (slot, index, module) in fit.modules() {
        if module.state < ModuleState::Active {
            continue;
        }
        let entity = EntityId::Module(slot, index);
        let cycle = resolved.value(entity, attrs::CYCLE_TIME).unwrap_or(0.0);
        for layer in Layer::ALL {
            let Some(amount) = resolved.value(entity, layer.repair_attr()) else {
                continue;
            };
            if amount <= 0.0 {
                continue;
            }
            if cycle <= 0.0 {
                return Metric::unavailable(format!(
                    "{entity} repairs {} but has no positive cycle time",
                    layer.as_str()
                ));
            }
            let rate = amount / cycle;
            match layer {
                Layer::Shield => stats.shield_repair += rate,
                Layer::Armor => stats.armor_repair += rate,
                Layer::Structure => stats.hull_repair += rate,
            }
        }
    }

    // Peak passive regen: 2.5 * capacity / recharge time (the maximum of the
    // shield recharge curve, reached at 50% charge).
    let shield_capacity = resolved.ship_attr(attrs::SHIELD_HP).unwrap_or(0.0);
    let recharge_time = resolved
        .ship_attr(attrs::SHIELD_RECHARGE_TIME)
        .unwrap_or(0.0);
    if shield_capacity > 0.0 && recharge_time > 0.0 {
        stats.passive_shield = 2.5 * shield_capacity / recharge_time;
    }

    for (rate, capacity_attr) in [
        (&mut stats.shield_repair, attrs::SHIELD_HP),
        (&mut stats.armor_repair, attrs::ARMOR_HP),
        (&mut stats.hull_repair, attrs::STRUCTURE_HP),
    ] {
        if let Some(capacity) = resolved.ship_attr(capacity_attr) {
            *rate = rate.min(capacity);
        }
    }

    stats.total =
        stats.shield_repair + stats.armor_repair + stats.hull_repair + stats.passive_shield;

    // EHP-scaled rate: each layer's repair weighted by its EHP multiplier.
    let pattern = fit.damage_pattern();
    let mut total_ehp = 0.0;
    for (rate, layer) in [
        (stats.shield_repair + stats.passive_shield, Layer::Shield),
        (stats.armor_repair, Layer::Armor),
        (stats.hull_repair, Layer::Structure),
    ] {
        let divisor = ehp_divisor(resolved, pattern, layer);
        if divisor > 0.0 {
            total_ehp += rate / divisor;
        }
    }
    stats.total_ehp = total_ehp;

    Metric::ok(stats)
}

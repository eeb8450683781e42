//! Fitting resource consumption vs hull capacity: CPU, powergrid,
//! calibration, slots, hardpoints.
//!
//! Offline modules still occupy slots and hardpoints and still count their
//! resolved resource usage; only their effects are absent from resolution.

use serde::Serialize;

use crate::catalog::attrs;
use crate::catalog::{AttrId, Catalog};
use crate::dogma::{EntityId, Resolved};
use crate::fit::{Fit, Hardpoint, SlotKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub used: f64,
    pub output: f64,
    pub headroom: f64,
}

impl ResourceUsage {
    fn new(used: f64, output: f64) -> Self {
        Self {
            used,
            output,
            headroom: output - used,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotUsage {
    pub slot: SlotKind,
    pub used: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HardpointUsage {
    pub used: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceStats {
    pub cpu: ResourceUsage,
    pub power: ResourceUsage,
    pub calibration: ResourceUsage,
    pub slots: Vec<SlotUsage>,
    pub turret_hardpoints: HardpointUsage,
    pub launcher_hardpoints: HardpointUsage,
    pub within_limits: bool,
}

fn slot_total_attr(slot: SlotKind) -> AttrId {
    match slot {
        SlotKind::High => attrs::HIGH_SLOTS,
        SlotKind::Mid => attrs::MID_SLOTS,
        SlotKind::Low => attrs::LOW_SLOTS,
        SlotKind::Rig => attrs::RIG_SLOTS,
        SlotKind::Subsystem => attrs::SUBSYSTEM_SLOTS,
    }
}

fn ship_count(resolved: &Resolved, attr: AttrId) -> usize {
    resolved.ship_attr(attr).unwrap_or(0.0).max(0.0).round() as usize
}

pub fn resources<C: Catalog>(fit: &Fit, resolved: &Resolved, catalog: &C) -> ResourceStats {
    let mut cpu_used = 0.0;
    let mut power_used = 0.0;
    let mut calibration_used = 0.0;
    let mut turret_used = 0;
    let mut launcher_used = 0;

    for (slot, index, module) in fit.modules() {
        let entity = EntityId::Module(slot, index);
        cpu_used += resolved.value(entity, attrs::CPU_USAGE).unwrap_or(0.0);
        power_used += resolved.value(entity, attrs::POWER_USAGE).unwrap_or(0.0);
        calibration_used += resolved
            .value(entity, attrs::CALIBRATION_USAGE)
            .unwrap_or(0.0);
        if let Ok(item) = catalog.get_item(module.item) {
            match item.hardpoint {
                Some(Hardpoint::Turret) => turret_used += 1,
                Some(Hardpoint::Launcher) => launcher_used += 1,
                None => {}
            }
        }
    }

    let cpu = ResourceUsage::new(cpu_used, resolved.ship_attr(attrs::CPU_OUTPUT).unwrap_or(0.0));
    let power = ResourceUsage::new(
        power_used,
        resolved.ship_attr(attrs::POWER_OUTPUT).unwrap_or(0.0),
    );
    let calibration = ResourceUsage::new(
        calibration_used,
        resolved
            .ship_attr(attrs::CALIBRATION_CAPACITY)
            .unwrap_or(0.0),
    );

    let slots: Vec<SlotUsage> = SlotKind::ALL
        .into_iter()
        .map(|slot| SlotUsage {
            slot,
            used: fit.rack(slot).len(),
            total: ship_count(resolved, slot_total_attr(slot)),
        })
        .collect();

    let turret_hardpoints = HardpointUsage {
        used: turret_used,
        total: ship_count(resolved, attrs::TURRET_HARDPOINTS),
    };
    let launcher_hardpoints = HardpointUsage {
        used: launcher_used,
        total: ship_count(resolved, attrs::LAUNCHER_HARDPOINTS),
    };

    let within_limits = cpu.headroom >= 0.0
        && power.headroom >= 0.0
        && calibration.headroom >= 0.0
        && slots.iter().all(|s| s.used <= s.total)
        && turret_hardpoints.used <= turret_hardpoints.total
        && launcher_hardpoints.used <= launcher_hardpoints.total;

    ResourceStats {
        cpu,
        power,
        calibration,
        slots,
        turret_hardpoints,
        launcher_hardpoints,
        within_limits,
    }
}

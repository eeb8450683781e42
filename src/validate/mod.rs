//! Fit validation: hard-constraint checks against the resolved fit.
//!
//! Violations are a complete, ordered report, not errors; an empty list
//! means the fit is valid. Validation never mutates the fit.

use serde::Serialize;

use crate::catalog::{Catalog, Item, ItemId};
use crate::dogma::Resolved;
use crate::fit::{Fit, SlotKind};
use crate::stats::{resources, ResourceStats};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    CpuExceeded,
    PowerExceeded,
    CalibrationExceeded,
    SlotsExceeded(SlotKind),
    TurretHardpointsExceeded,
    LauncherHardpointsExceeded,
    SkillRequirementMissing,
    HullRestricted,
    InvalidCharge,
    InvalidState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub code: ViolationCode,
    /// Offending module position, when the violation is per-module.
    pub slot: Option<(SlotKind, usize)>,
    pub limit: f64,
    pub usage: f64,
    pub message: String,
}

fn resource_violation(
    code: ViolationCode,
    label: &str,
    usage: f64,
    limit: f64,
    out: &mut Vec<Violation>,
) {
    if usage > limit {
        out.push(Violation {
            code,
            slot: None,
            limit,
            usage,
            message: format!("{label} usage {usage:.1} exceeds capacity {limit:.1}"),
        });
    }
}

fn check_resources(stats: &ResourceStats, out: &mut Vec<Violation>) {
    resource_violation(
        ViolationCode::CpuExceeded,
        "cpu",
        stats.cpu.used,
        stats.cpu.output,
        out,
    );
    resource_violation(
        ViolationCode::PowerExceeded,
        "power",
        stats.power.used,
        stats.power.output,
        out,
    );
    resource_violation(
        ViolationCode::CalibrationExceeded,
        "calibration",
        stats.calibration.used,
        stats.calibration.output,
        out,
    );
    for slot_usage in &stats.slots {
        if slot_usage.used > slot_usage.total {
            out.push(Violation {
                code: ViolationCode::SlotsExceeded(slot_usage.slot),
                slot: None,
                limit: slot_usage.total as f64,
                usage: slot_usage.used as f64,
                message: format!(
                    "{} slots exceeded: {} fitted, {} available",
                    slot_usage.slot.as_str(),
                    slot_usage.used,
                    slot_usage.total
                ),
            });
        }
    }
    if stats.turret_hardpoints.used > stats.turret_hardpoints.total {
        out.push(Violation {
            code: ViolationCode::TurretHardpointsExceeded,
            slot: None,
            limit: stats.turret_hardpoints.total as f64,
            usage: stats.turret_hardpoints.used as f64,
            message: "turret hardpoints exceeded".to_string(),
        });
    }
    if stats.launcher_hardpoints.used > stats.launcher_hardpoints.total {
        out.push(Violation {
            code: ViolationCode::LauncherHardpointsExceeded,
            slot: None,
            limit: stats.launcher_hardpoints.total as f64,
            usage: stats.launcher_hardpoints.used as f64,
            message: "launcher hardpoints exceeded".to_string(),
        });
    }
}

fn check_skill_reqs(
    fit: &Fit,
    item: &Item,
    position: (SlotKind, usize),
    out: &mut Vec<Violation>,
) {
    for (skill, required) in &item.skill_reqs {
        let trained = fit.skills().level(*skill);
        if trained < *required {
            out.push(Violation {
                code: ViolationCode::SkillRequirementMissing,
                slot: Some(position),
                limit: f64::from(*required),
                usage: f64::from(trained),
                message: format!(
                    "{} requires skill {} at level {required}, trained {trained}",
                    item.name, skill
                ),
            });
        }
    }
}

fn check_module<C: Catalog>(
    fit: &Fit,
    catalog: &C,
    position: (SlotKind, usize),
    module_item: ItemId,
    out: &mut Vec<Violation>,
) {
    let Ok(item) = catalog.get_item(module_item) else {
        return;
    };
    check_skill_reqs(fit, item, position, out);

    if !item.allowed_on_hull(fit.hull()) {
        out.push(Violation {
            code: ViolationCode::HullRestricted,
            slot: Some(position),
            limit: 0.0,
            usage: 0.0,
            message: format!("{} cannot be fitted to this hull", item.name),
        });
    }

    let (slot, index) = position;
    let module = match fit.module_at(slot, index) {
        Ok(module) => module,
        Err(_) => return,
    };

    if let Some(charge_id) = module.charge {
        match catalog.get_item(charge_id) {
            Ok(charge_item) => {
                check_skill_reqs(fit, charge_item, position, out);
                if !item.accepts_charge(charge_item) {
                    out.push(Violation {
                        code: ViolationCode::InvalidCharge,
                        slot: Some(position),
                        limit: 0.0,
                        usage: 0.0,
                        message: format!("{} cannot load {}", item.name, charge_item.name),
                    });
                }
            }
            Err(_) => out.push(Violation {
                code: ViolationCode::InvalidCharge,
                slot: Some(position),
                limit: 0.0,
                usage: 0.0,
                message: format!("{} has an unknown charge loaded", item.name),
            }),
        }
    }

    if module.state > item.max_state {
        out.push(Violation {
            code: ViolationCode::InvalidState,
            slot: Some(position),
            limit: 0.0,
            usage: 0.0,
            message: format!(
                "{} cannot run {} (max state {})",
                item.name,
                module.state.as_str(),
                item.max_state.as_str()
            ),
        });
    }
}

/// Check every hard constraint. Order is fixed: fit-wide resource checks
/// first, then per-module checks in rack traversal order.
pub fn validate<C: Catalog>(fit: &Fit, resolved: &Resolved, catalog: &C) -> Vec<Violation> {
    let mut out = Vec::new();
    let stats = resources(fit, resolved, catalog);
    check_resources(&stats, &mut out);
    for (slot, index, module) in fit.modules() {
        check_module(fit, catalog, (slot, index), module.item, &mut out);
    }
    out
}

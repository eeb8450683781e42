//! Stats aggregation: pure derived metrics over a resolved attribute set.
//!
//! Every metric degrades independently: a missing or malformed catalog
//! attribute downs that one metric (`Metric::Unavailable`) and the rest of
//! the snapshot proceeds.

pub mod capacitor;
pub mod damage;
pub mod defense;
pub mod mobility;
pub mod resources;

pub use capacitor::{capacitor, CapacitorReport, CapacitorStats};
pub use damage::{dps_at_range, range_factor, total_damage, DamageStats};
pub use defense::{ehp, tank, EhpStats, LayerEhp, TankStats};
pub use mobility::{align_time, mobility, MobilityStats};
pub use resources::{resources, HardpointUsage, ResourceStats, ResourceUsage, SlotUsage};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::dogma::Resolved;
use crate::fit::Fit;

/// A derived metric that either resolved or degraded with a reason. A
/// failed metric is never a numeric zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Metric<T> {
    Ok { value: T },
    Unavailable { reason: String },
}

impl<T> Metric<T> {
    pub fn ok(value: T) -> Self {
        Self::Ok { value }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            Self::Ok { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// The full aggregator output for one fit snapshot. Deterministic and
/// side-effect-free for a given (fit revision, catalog).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub fit_name: String,
    pub revision: u64,
    pub damage: Metric<DamageStats>,
    pub dps_at_range: Metric<f64>,
    pub ehp: Metric<EhpStats>,
    pub tank: Metric<TankStats>,
    pub capacitor: Metric<CapacitorStats>,
    pub mobility: Metric<MobilityStats>,
    pub resources: ResourceStats,
}

pub fn snapshot<C: Catalog>(fit: &Fit, resolved: &Resolved, catalog: &C) -> StatsSnapshot {
    snapshot_at_range(fit, resolved, catalog, None)
}

/// Like [snapshot] but with an explicit target range for applied DPS,
/// overriding the fit's defense profile range.
pub fn snapshot_at_range<C: Catalog>(
    fit: &Fit,
    resolved: &Resolved,
    catalog: &C,
    range_override: Option<f64>,
) -> StatsSnapshot {
    StatsSnapshot {
        fit_name: fit.name.clone(),
        revision: fit.revision(),
        damage: total_damage(fit, resolved),
        dps_at_range: dps_at_range(fit, resolved, range_override),
        ehp: ehp(fit, resolved),
        tank: tank(fit, resolved),
        capacitor: capacitor(fit, resolved),
        mobility: mobility(resolved),
        resources: resources(fit, resolved, catalog),
    }
}

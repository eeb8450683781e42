//! Objective metrics the optimizer can drive, each with a direction and a
//! scalar extraction from a stats snapshot.

use serde::{Deserialize, Serialize};

use crate::stats::{CapacitorReport, StatsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Dps,
    DpsAtRange,
    Ehp,
    Tank,
    CapStability,
    MaxSpeed,
    AlignTime,
}

impl Objective {
    pub const ALL: [Objective; 7] = [
        Objective::Dps,
        Objective::DpsAtRange,
        Objective::Ehp,
        Objective::Tank,
        Objective::CapStability,
        Objective::MaxSpeed,
        Objective::AlignTime,
    ];

    pub fn direction(self) -> Direction {
        match self {
            Self::AlignTime => Direction::Minimize,
            _ => Direction::Maximize,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dps => "dps",
            Self::DpsAtRange => "dps_at_range",
            Self::Ehp => "ehp",
            Self::Tank => "tank",
            Self::CapStability => "cap_stability",
            Self::MaxSpeed => "max_speed",
            Self::AlignTime => "align_time",
        }
    }

    /// Scalar value from a snapshot, None when the metric degraded.
    pub fn extract(self, snapshot: &StatsSnapshot) -> Option<f64> {
        match self {
            Self::Dps => snapshot.damage.as_ok().map(|d| d.dps),
            Self::DpsAtRange => snapshot.dps_at_range.as_ok().copied(),
            Self::Ehp => snapshot.ehp.as_ok().map(|e| e.total),
            Self::Tank => snapshot.tank.as_ok().map(|t| t.total_ehp),
            // Any stable fit scores above any unstable one; among unstable
            // fits, longer time-to-empty is better.
            Self::CapStability => snapshot.capacitor.as_ok().map(|c| match c.report {
                CapacitorReport::Stable { fraction } => 1.0 + fraction,
                CapacitorReport::Unstable { seconds_to_empty } => {
                    seconds_to_empty / (seconds_to_empty + 600.0)
                }
            }),
            Self::MaxSpeed => snapshot.mobility.as_ok().map(|m| m.max_velocity),
            Self::AlignTime => snapshot.mobility.as_ok().map(|m| m.align_time),
        }
    }

    /// Value for comparisons, with unavailable metrics pinned to the worst
    /// end of the scale so they never win.
    pub fn comparable(self, snapshot: &StatsSnapshot) -> f64 {
        self.extract(snapshot).unwrap_or(match self.direction() {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        })
    }

    /// True when `a` is strictly better than `b` for this objective.
    pub fn better(self, a: f64, b: f64) -> bool {
        match self.direction() {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }
}

impl std::str::FromStr for Objective {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Objective::ALL
            .into_iter()
            .find(|o| o.as_str() == raw)
            .ok_or_else(|| format!("unsupported objective: {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_time_minimizes() {
        assert_eq!(Objective::AlignTime.direction(), Direction::Minimize);
        assert!(Objective::AlignTime.better(3.0, 5.0));
        assert!(Objective::Dps.better(5.0, 3.0));
    }

    #[test]
    fn objectives_parse_from_their_names() {
        for objective in Objective::ALL {
            assert_eq!(objective.as_str().parse::<Objective>().unwrap(), objective);
        }
        assert!("warp_speed".parse::<Objective>().is_err());
    }
}

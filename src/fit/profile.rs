//! Target assumptions: incoming damage mix and outgoing-target profile.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Em,
    Thermal,
    Kinetic,
    Explosive,
}

impl DamageType {
    pub const ALL: [DamageType; 4] = [
        DamageType::Em,
        DamageType::Thermal,
        DamageType::Kinetic,
        DamageType::Explosive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Em => "em",
            Self::Thermal => "thermal",
            Self::Kinetic => "kinetic",
            Self::Explosive => "explosive",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Em => 0,
            Self::Thermal => 1,
            Self::Kinetic => 2,
            Self::Explosive => 3,
        }
    }
}

/// Weighted incoming damage mix used by EHP. Weights are stored raw and
/// normalized on read; an all-zero pattern reads as uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamagePattern {
    pub em: f64,
    pub thermal: f64,
    pub kinetic: f64,
    pub explosive: f64,
}

impl DamagePattern {
    pub fn uniform() -> Self {
        Self {
            em: 1.0,
            thermal: 1.0,
            kinetic: 1.0,
            explosive: 1.0,
        }
    }

    fn raw(&self, damage_type: DamageType) -> f64 {
        let weights = [self.em, self.thermal, self.kinetic, self.explosive];
        weights[damage_type.index()].max(0.0)
    }

    /// Normalized fraction for one damage type; fractions sum to 1.
    pub fn fraction(&self, damage_type: DamageType) -> f64 {
        let total: f64 = DamageType::ALL.iter().map(|t| self.raw(*t)).sum();
        if total <= 0.0 {
            return 0.25;
        }
        self.raw(damage_type) / total
    }
}

impl Default for DamagePattern {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Range and resist assumptions about the target, used by DPS-at-range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenseProfile {
    /// Distance to target in meters. None = point blank (no range scaling).
    #[serde(default)]
    pub range_m: Option<f64>,
    /// Target resist fractions per damage type; clamped to [0, 0.99] on read.
    #[serde(default)]
    pub target_resists: [f64; 4],
}

impl DefenseProfile {
    pub fn resist(&self, damage_type: DamageType) -> f64 {
        self.target_resists[damage_type.index()].clamp(0.0, 0.99)
    }

    /// Average target resist across the four damage types, as the applied
    /// DPS scaling uses it.
    pub fn average_resist(&self) -> f64 {
        DamageType::ALL.iter().map(|t| self.resist(*t)).sum::<f64>() / 4.0
    }
}

impl Default for DefenseProfile {
    fn default() -> Self {
        Self {
            range_m: None,
            target_resists: [0.0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pattern_reads_as_uniform() {
        let pattern = DamagePattern {
            em: 0.0,
            thermal: 0.0,
            kinetic: 0.0,
            explosive: 0.0,
        };
        for damage_type in DamageType::ALL {
            assert_eq!(pattern.fraction(damage_type), 0.25);
        }
    }

    #[test]
    fn fractions_normalize() {
        let pattern = DamagePattern {
            em: 3.0,
            thermal: 1.0,
            kinetic: 0.0,
            explosive: 0.0,
        };
        assert!((pattern.fraction(DamageType::Em) - 0.75).abs() < 1e-12);
        assert!((pattern.fraction(DamageType::Thermal) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn target_resists_clamp_to_hard_cap() {
        let profile = DefenseProfile {
            range_m: None,
            target_resists: [1.5, -0.2, 0.5, 0.0],
        };
        assert_eq!(profile.resist(DamageType::Em), 0.99);
        assert_eq!(profile.resist(DamageType::Thermal), 0.0);
    }
}

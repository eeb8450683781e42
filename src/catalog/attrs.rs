//! Well-known attribute ids used by the stats aggregator and validator.
//!
//! The numeric values are the DRYDOCK catalog schema; catalog files must use
//! the same numbering.

use crate::catalog::item::AttrId;
use crate::fit::DamageType;

pub const CPU_USAGE: AttrId = AttrId(1);
pub const CPU_OUTPUT: AttrId = AttrId(2);
pub const POWER_USAGE: AttrId = AttrId(3);
pub const POWER_OUTPUT: AttrId = AttrId(4);
pub const CALIBRATION_USAGE: AttrId = AttrId(5);
pub const CALIBRATION_CAPACITY: AttrId = AttrId(6);

pub const HIGH_SLOTS: AttrId = AttrId(7);
pub const MID_SLOTS: AttrId = AttrId(8);
pub const LOW_SLOTS: AttrId = AttrId(9);
pub const RIG_SLOTS: AttrId = AttrId(10);
pub const SUBSYSTEM_SLOTS: AttrId = AttrId(11);
pub const TURRET_HARDPOINTS: AttrId = AttrId(12);
pub const LAUNCHER_HARDPOINTS: AttrId = AttrId(13);

pub const DAMAGE_EM: AttrId = AttrId(14);
pub const DAMAGE_THERMAL: AttrId = AttrId(15);
pub const DAMAGE_KINETIC: AttrId = AttrId(16);
pub const DAMAGE_EXPLOSIVE: AttrId = AttrId(17);
pub const DAMAGE_MULTIPLIER: AttrId = AttrId(18);
/// Seconds per activation.
pub const CYCLE_TIME: AttrId = AttrId(19);
/// Meters.
pub const OPTIMAL_RANGE: AttrId = AttrId(20);
/// Meters.
pub const FALLOFF: AttrId = AttrId(21);

pub const SHIELD_HP: AttrId = AttrId(22);
pub const ARMOR_HP: AttrId = AttrId(23);
pub const STRUCTURE_HP: AttrId = AttrId(24);

pub const SHIELD_RESIST_EM: AttrId = AttrId(25);
pub const SHIELD_RESIST_THERMAL: AttrId = AttrId(26);
pub const SHIELD_RESIST_KINETIC: AttrId = AttrId(27);
pub const SHIELD_RESIST_EXPLOSIVE: AttrId = AttrId(28);
pub const ARMOR_RESIST_EM: AttrId = AttrId(29);
pub const ARMOR_RESIST_THERMAL: AttrId = AttrId(30);
pub const ARMOR_RESIST_KINETIC: AttrId = AttrId(31);
pub const ARMOR_RESIST_EXPLOSIVE: AttrId = AttrId(32);
pub const STRUCTURE_RESIST_EM: AttrId = AttrId(33);
pub const STRUCTURE_RESIST_THERMAL: AttrId = AttrId(34);
pub const STRUCTURE_RESIST_KINETIC: AttrId = AttrId(35);
pub const STRUCTURE_RESIST_EXPLOSIVE: AttrId = AttrId(36);

/// Seconds for a full passive shield recharge.
pub const SHIELD_RECHARGE_TIME: AttrId = AttrId(37);

/// Gigajoules.
pub const CAPACITOR_CAPACITY: AttrId = AttrId(38);
/// Seconds.
pub const CAPACITOR_RECHARGE_TIME: AttrId = AttrId(39);
/// Gigajoules per activation.
pub const ACTIVATION_COST: AttrId = AttrId(40);

/// Kilograms.
pub const MASS: AttrId = AttrId(41);
/// Inertia modifier (dimensionless).
pub const AGILITY: AttrId = AttrId(42);
/// Meters per second.
pub const MAX_VELOCITY: AttrId = AttrId(43);

/// Repair amounts, HP per activation.
pub const SHIELD_BOOST: AttrId = AttrId(44);
pub const ARMOR_REPAIR: AttrId = AttrId(45);
pub const HULL_REPAIR: AttrId = AttrId(46);

/// Defensive layers, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Shield,
    Armor,
    Structure,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Shield, Layer::Armor, Layer::Structure];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shield => "shield",
            Self::Armor => "armor",
            Self::Structure => "structure",
        }
    }

    pub fn hp_attr(self) -> AttrId {
        match self {
            Self::Shield => SHIELD_HP,
            Self::Armor => ARMOR_HP,
            Self::Structure => STRUCTURE_HP,
        }
    }

    pub fn repair_attr(self) -> AttrId {
        match self {
            Self::Shield => SHIELD_BOOST,
            Self::Armor => ARMOR_REPAIR,
            Self::Structure => HULL_REPAIR,
        }
    }
}

/// Resist attribute for a (layer, damage type) pair. Values are fractions in
/// [0, 1); the resolver's catalog bounds keep them under the 0.99 hard cap.
pub fn resist_attr(layer: Layer, damage_type: DamageType) -> AttrId {
    let base = match layer {
        Layer::Shield => 25,
        Layer::Armor => 29,
        Layer::Structure => 33,
    };
    let offset = match damage_type {
        DamageType::Em => 0,
        DamageType::Thermal => 1,
        DamageType::Kinetic => 2,
        DamageType::Explosive => 3,
    };
    AttrId(base + offset)
}

pub fn damage_attr(damage_type: DamageType) -> AttrId {
    match damage_type {
        DamageType::Em => DAMAGE_EM,
        DamageType::Thermal => DAMAGE_THERMAL,
        DamageType::Kinetic => DAMAGE_KINETIC,
        DamageType::Explosive => DAMAGE_EXPLOSIVE,
    }
}

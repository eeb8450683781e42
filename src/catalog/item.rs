//! Catalog item model: immutable entries keyed by numeric id, with base
//! attribute values and the effect ids they carry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fit::{Hardpoint, ModuleState, SlotKind};

/// Numeric item identifier (hulls, modules, charges, skills, drones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

/// Numeric effect identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub u32);

/// Numeric attribute identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrId(pub u16);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attr#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hull,
    Module,
    Charge,
    Skill,
    Drone,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hull => "hull",
            Self::Module => "module",
            Self::Charge => "charge",
            Self::Skill => "skill",
            Self::Drone => "drone",
        }
    }
}

/// Catalog-declared clamp applied after the resolution pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
}

impl AttrBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        let mut out = value;
        if let Some(floor) = self.floor {
            out = out.max(floor);
        }
        if let Some(cap) = self.cap {
            out = out.min(cap);
        }
        out
    }
}

/// Immutable catalog entry. Base attributes only; resolved values come from
/// the dogma engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub attrs: BTreeMap<AttrId, f64>,
    pub effects: Vec<EffectId>,
    /// Rack this item occupies when fitted. None for non-modules.
    pub slot: Option<SlotKind>,
    /// Hardpoint consumed when fitted. None for non-weapons.
    pub hardpoint: Option<Hardpoint>,
    /// Highest state the item supports when fitted as a module.
    pub max_state: ModuleState,
    /// Charge-group id, used to match charges against module acceptance lists.
    pub group: u32,
    /// Charge groups this module accepts. Empty means no charge may be loaded.
    pub charge_groups: Vec<u32>,
    /// Skill prerequisites: (skill item, required level).
    pub skill_reqs: Vec<(ItemId, u8)>,
    /// Hulls this item may be fitted to. Empty means unrestricted.
    pub hull_whitelist: Vec<ItemId>,
}

impl Item {
    pub fn base_attr(&self, attr: AttrId) -> Option<f64> {
        self.attrs.get(&attr).copied()
    }

    pub fn accepts_charge(&self, charge: &Item) -> bool {
        charge.category == Category::Charge && self.charge_groups.contains(&charge.group)
    }

    pub fn allowed_on_hull(&self, hull: ItemId) -> bool {
        self.hull_whitelist.is_empty() || self.hull_whitelist.contains(&hull)
    }
}

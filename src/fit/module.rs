//! Module placement primitives: racks, hardpoints, states.

use serde::{Deserialize, Serialize};

use crate::catalog::item::ItemId;

/// Rack categories, in fixed traversal order. The optimizer and the module
/// listing iterate racks in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    High,
    Mid,
    Low,
    Rig,
    Subsystem,
}

impl SlotKind {
    pub const ALL: [SlotKind; 5] = [
        SlotKind::High,
        SlotKind::Mid,
        SlotKind::Low,
        SlotKind::Rig,
        SlotKind::Subsystem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
            Self::Rig => "rig",
            Self::Subsystem => "subsystem",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hardpoint {
    Turret,
    Launcher,
}

impl Hardpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Turret => "turret",
            Self::Launcher => "launcher",
        }
    }
}

/// Module states form an ordered ladder; a module in a higher state is also
/// considered to be in every lower state except `Offline`, which contributes
/// no effects at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    Offline,
    Online,
    Active,
    Overheated,
}

impl ModuleState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Online => "online",
            Self::Active => "active",
            Self::Overheated => "overheated",
        }
    }
}

/// A placed item: catalog reference, current state, optional loaded charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInstance {
    pub item: ItemId,
    pub state: ModuleState,
    pub charge: Option<ItemId>,
}

impl ModuleInstance {
    pub fn new(item: ItemId, state: ModuleState) -> Self {
        Self {
            item,
            state,
            charge: None,
        }
    }
}

/// A drone in the fit's drone bay. Only active drones contribute effects
/// and damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneInstance {
    pub item: ItemId,
    pub count: u8,
    pub active: bool,
}

//! Shared fixture builders for the integration suites.

#![allow(dead_code)]

use std::collections::BTreeMap;

use drydock::catalog::{
    attrs, AttrId, Category, EffectDef, EffectId, Item, ItemId, MemoryCatalog, Operation,
    PenaltyGroupId, TargetSelector,
};
use drydock::fit::{Hardpoint, ModuleState, SlotKind};

pub fn item(id: u32, name: &str, category: Category) -> Item {
    Item {
        id: ItemId(id),
        name: name.to_string(),
        category,
        attrs: BTreeMap::new(),
        effects: Vec::new(),
        slot: None,
        hardpoint: None,
        max_state: ModuleState::Active,
        group: 0,
        charge_groups: Vec::new(),
        skill_reqs: Vec::new(),
        hull_whitelist: Vec::new(),
    }
}

pub fn with_attrs(mut entry: Item, attrs: &[(AttrId, f64)]) -> Item {
    for (attr, value) in attrs {
        entry.attrs.insert(*attr, *value);
    }
    entry
}

pub fn with_effects(mut entry: Item, effects: &[u32]) -> Item {
    entry.effects = effects.iter().map(|id| EffectId(*id)).collect();
    entry
}

pub fn module(id: u32, name: &str, slot: SlotKind) -> Item {
    let mut entry = item(id, name, Category::Module);
    entry.slot = Some(slot);
    entry
}

pub fn turret(id: u32, name: &str) -> Item {
    let mut entry = module(id, name, SlotKind::High);
    entry.hardpoint = Some(Hardpoint::Turret);
    entry
}

/// A frigate-sized hull with enough room for the suites: 3/3/3 racks, two
/// rigs, two turret and one launcher hardpoints, generous CPU and power.
pub fn hull(id: u32, name: &str) -> Item {
    with_attrs(
        item(id, name, Category::Hull),
        &[
            (attrs::CPU_OUTPUT, 400.0),
            (attrs::POWER_OUTPUT, 200.0),
            (attrs::CALIBRATION_CAPACITY, 400.0),
            (attrs::HIGH_SLOTS, 3.0),
            (attrs::MID_SLOTS, 3.0),
            (attrs::LOW_SLOTS, 3.0),
            (attrs::RIG_SLOTS, 2.0),
            (attrs::SUBSYSTEM_SLOTS, 0.0),
            (attrs::TURRET_HARDPOINTS, 2.0),
            (attrs::LAUNCHER_HARDPOINTS, 1.0),
            (attrs::SHIELD_HP, 500.0),
            (attrs::ARMOR_HP, 450.0),
            (attrs::STRUCTURE_HP, 400.0),
            (attrs::SHIELD_RECHARGE_TIME, 625.0),
            (attrs::CAPACITOR_CAPACITY, 250.0),
            (attrs::CAPACITOR_RECHARGE_TIME, 155.0),
            (attrs::MASS, 1_100_000.0),
            (attrs::AGILITY, 3.2),
            (attrs::MAX_VELOCITY, 365.0),
        ],
    )
}

pub fn effect(
    id: u32,
    name: &str,
    target: TargetSelector,
    src_attr: AttrId,
    dst_attr: AttrId,
    op: Operation,
) -> EffectDef {
    EffectDef {
        id: EffectId(id),
        name: name.to_string(),
        target,
        src_attr,
        dst_attr,
        op,
        penalty_group: None,
        min_state: ModuleState::Online,
        per_skill_level: false,
    }
}

pub fn penalized(mut def: EffectDef, group: u32) -> EffectDef {
    def.penalty_group = Some(PenaltyGroupId(group));
    def
}

pub fn catalog_with(items: Vec<Item>, effects: Vec<EffectDef>) -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    for entry in items {
        catalog.insert_item(entry);
    }
    for def in effects {
        catalog.insert_effect(def);
    }
    catalog
}

/// Magnitude attributes for synthetic effects, outside the built-in range.
pub const BONUS_A: AttrId = AttrId(900);
pub const BONUS_B: AttrId = AttrId(901);
pub const BONUS_C: AttrId = AttrId(902);

//! Catalog file loading: items from JSON, effect definitions from YAML.
//!
//! File schemas are the DRYDOCK normalized form; records are converted into
//! engine types at load time so the rest of the crate never sees raw files.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::effect::{EffectDef, Operation, PenaltyGroupId, TargetSelector};
use crate::catalog::item::{AttrBounds, AttrId, Category, EffectId, Item, ItemId};
use crate::catalog::store::MemoryCatalog;
use crate::fit::{Hardpoint, ModuleState, SlotKind};

pub const DEFAULT_CATALOG_DIR: &str = "data";
pub const ITEMS_FILE: &str = "items.json";
pub const EFFECTS_FILE: &str = "effects.yaml";

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    BadRecord(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "catalog io error: {err}"),
            Self::Json(err) => write!(f, "catalog json error: {err}"),
            Self::Yaml(err) => write!(f, "catalog yaml error: {err}"),
            Self::BadRecord(msg) => write!(f, "bad catalog record: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

#[derive(Debug, Deserialize)]
struct ItemsFile {
    #[serde(default)]
    bounds: BTreeMap<u16, AttrBounds>,
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    id: u32,
    name: String,
    category: Category,
    #[serde(default)]
    attrs: BTreeMap<u16, f64>,
    #[serde(default)]
    effects: Vec<u32>,
    #[serde(default)]
    slot: Option<SlotKind>,
    #[serde(default)]
    hardpoint: Option<Hardpoint>,
    #[serde(default = "default_max_state")]
    max_state: ModuleState,
    #[serde(default)]
    group: u32,
    #[serde(default)]
    charge_groups: Vec<u32>,
    #[serde(default)]
    skill_reqs: Vec<(u32, u8)>,
    #[serde(default)]
    hull_whitelist: Vec<u32>,
}

fn default_max_state() -> ModuleState {
    ModuleState::Active
}

impl ItemRecord {
    fn into_item(self) -> Item {
        Item {
            id: ItemId(self.id),
            name: self.name,
            category: self.category,
            attrs: self
                .attrs
                .into_iter()
                .map(|(attr, value)| (AttrId(attr), value))
                .collect(),
            effects: self.effects.into_iter().map(EffectId).collect(),
            slot: self.slot,
            hardpoint: self.hardpoint,
            max_state: self.max_state,
            group: self.group,
            charge_groups: self.charge_groups,
            skill_reqs: self
                .skill_reqs
                .into_iter()
                .map(|(skill, level)| (ItemId(skill), level))
                .collect(),
            hull_whitelist: self.hull_whitelist.into_iter().map(ItemId).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EffectsFile {
    effects: Vec<EffectRecord>,
}

#[derive(Debug, Deserialize)]
struct EffectRecord {
    id: u32,
    name: String,
    target: String,
    src_attr: u16,
    dst_attr: u16,
    op: Operation,
    #[serde(default)]
    penalty_group: Option<u32>,
    #[serde(default = "default_min_state")]
    min_state: ModuleState,
    #[serde(default)]
    per_skill_level: bool,
}

fn default_min_state() -> ModuleState {
    ModuleState::Online
}

impl EffectRecord {
    fn into_effect(self) -> Result<EffectDef, LoadError> {
        let target = self.target.parse::<TargetSelector>().map_err(LoadError::BadRecord)?;
        Ok(EffectDef {
            id: EffectId(self.id),
            name: self.name,
            target,
            src_attr: AttrId(self.src_attr),
            dst_attr: AttrId(self.dst_attr),
            op: self.op,
            penalty_group: self.penalty_group.map(PenaltyGroupId),
            min_state: self.min_state,
            per_skill_level: self.per_skill_level,
        })
    }
}

pub fn load_items_json(path: &Path, catalog: &mut MemoryCatalog) -> Result<usize, LoadError> {
    let raw = fs::read_to_string(path)?;
    let file: ItemsFile = serde_json::from_str(&raw)?;
    for (attr, bounds) in file.bounds {
        catalog.set_bounds(AttrId(attr), bounds);
    }
    let count = file.items.len();
    for record in file.items {
        catalog.insert_item(record.into_item());
    }
    Ok(count)
}

pub fn load_effects_yaml(path: &Path, catalog: &mut MemoryCatalog) -> Result<usize, LoadError> {
    let raw = fs::read_to_string(path)?;
    let file: EffectsFile = serde_yaml::from_str(&raw)?;
    let count = file.effects.len();
    for record in file.effects {
        catalog.insert_effect(record.into_effect()?);
    }
    Ok(count)
}

/// Load `items.json` + `effects.yaml` from a catalog directory.
pub fn load_catalog_dir(dir: &Path) -> Result<MemoryCatalog, LoadError> {
    let mut catalog = MemoryCatalog::new();
    load_items_json(&dir.join(ITEMS_FILE), &mut catalog)?;
    let effects_path = dir.join(EFFECTS_FILE);
    if effects_path.exists() {
        load_effects_yaml(&effects_path, &mut catalog)?;
    }
    Ok(catalog)
}

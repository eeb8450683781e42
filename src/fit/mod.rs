//! The fit aggregate: hull + racked modules + charges + skills + target
//! profiles. All mutation goes through methods that bump the revision
//! counter, which drives resolution-cache invalidation.

mod module;
mod profile;

pub use module::{DroneInstance, Hardpoint, ModuleInstance, ModuleState, SlotKind};
pub use profile::{DamagePattern, DamageType, DefenseProfile};

use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::{Catalog, CatalogError, Category, ItemId};

pub const MAX_SKILL_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    Catalog(CatalogError),
    NotAModule { item: ItemId },
    SlotMismatch { item: ItemId, slot: SlotKind },
    IndexOutOfBounds { slot: SlotKind, index: usize },
    DroneIndexOutOfBounds { index: usize },
    InvalidCharge { module: ItemId, charge: ItemId },
    InvalidState { item: ItemId, state: ModuleState, max: ModuleState },
    InvalidSkillLevel { skill: ItemId, level: u8 },
    NotASkill { item: ItemId },
    NotADrone { item: ItemId },
    NotAHull { item: ItemId },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::NotAModule { item } => write!(f, "{item} is not a module"),
            Self::SlotMismatch { item, slot } => {
                write!(f, "{item} does not fit a {} slot", slot.as_str())
            }
            Self::IndexOutOfBounds { slot, index } => {
                write!(f, "no module at {} slot index {index}", slot.as_str())
            }
            Self::DroneIndexOutOfBounds { index } => {
                write!(f, "no drone at index {index}")
            }
            Self::InvalidCharge { module, charge } => {
                write!(f, "{charge} is not a valid charge for {module}")
            }
            Self::InvalidState { item, state, max } => write!(
                f,
                "{item} cannot be {} (max state {})",
                state.as_str(),
                max.as_str()
            ),
            Self::InvalidSkillLevel { skill, level } => {
                write!(f, "level {level} is out of range for {skill}")
            }
            Self::NotASkill { item } => write!(f, "{item} is not a skill"),
            Self::NotADrone { item } => write!(f, "{item} is not a drone"),
            Self::NotAHull { item } => write!(f, "{item} is not a hull"),
        }
    }
}

impl std::error::Error for FitError {}

impl From<CatalogError> for FitError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// Trained skill levels, 0-5 per skill item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    levels: BTreeMap<ItemId, u8>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed skill at the same level ("all5"/"all0" profiles).
    pub fn all_at_level<I: IntoIterator<Item = ItemId>>(skills: I, level: u8) -> Self {
        Self {
            levels: skills
                .into_iter()
                .map(|skill| (skill, level.min(MAX_SKILL_LEVEL)))
                .collect(),
        }
    }

    pub fn level(&self, skill: ItemId) -> u8 {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    pub fn set_level(&mut self, skill: ItemId, level: u8) {
        if level == 0 {
            self.levels.remove(&skill);
        } else {
            self.levels.insert(skill, level);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u8)> + '_ {
        self.levels.iter().map(|(skill, level)| (*skill, *level))
    }
}

/// Root aggregate under evaluation. Owns all module instances; exclusive
/// access (`&mut`) is required for mutation, so concurrent mutation and
/// resolution of one fit cannot compile.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub name: String,
    hull: ItemId,
    racks: BTreeMap<SlotKind, Vec<ModuleInstance>>,
    drones: Vec<DroneInstance>,
    skills: SkillSet,
    damage_pattern: DamagePattern,
    defense_profile: DefenseProfile,
    revision: u64,
}

impl Fit {
    pub fn new(catalog: &impl Catalog, name: impl Into<String>, hull: ItemId) -> Result<Self, FitError> {
        let hull_item = catalog.get_item(hull)?;
        if hull_item.category != Category::Hull {
            return Err(FitError::NotAHull { item: hull });
        }
        Ok(Self {
            name: name.into(),
            hull,
            racks: BTreeMap::new(),
            drones: Vec::new(),
            skills: SkillSet::new(),
            damage_pattern: DamagePattern::uniform(),
            defense_profile: DefenseProfile::default(),
            revision: 0,
        })
    }

    pub fn hull(&self) -> ItemId {
        self.hull
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn damage_pattern(&self) -> &DamagePattern {
        &self.damage_pattern
    }

    pub fn defense_profile(&self) -> &DefenseProfile {
        &self.defense_profile
    }

    /// Monotonic mutation counter; resolution results are keyed by it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn rack(&self, slot: SlotKind) -> &[ModuleInstance] {
        self.racks.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn drones(&self) -> &[DroneInstance] {
        &self.drones
    }

    /// All placed modules in fixed traversal order (rack order, then index).
    pub fn modules(&self) -> impl Iterator<Item = (SlotKind, usize, &ModuleInstance)> + '_ {
        SlotKind::ALL.into_iter().flat_map(move |slot| {
            self.rack(slot)
                .iter()
                .enumerate()
                .map(move |(index, module)| (slot, index, module))
        })
    }

    pub fn module_at(&self, slot: SlotKind, index: usize) -> Result<&ModuleInstance, FitError> {
        self.rack(slot)
            .get(index)
            .ok_or(FitError::IndexOutOfBounds { slot, index })
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn module_at_mut(&mut self, slot: SlotKind, index: usize) -> Result<&mut ModuleInstance, FitError> {
        self.racks
            .get_mut(&slot)
            .and_then(|rack| rack.get_mut(index))
            .ok_or(FitError::IndexOutOfBounds { slot, index })
    }

    fn check_module_item(
        catalog: &impl Catalog,
        slot: SlotKind,
        item: ItemId,
    ) -> Result<ModuleState, FitError> {
        let entry = catalog.get_item(item)?;
        if entry.category != Category::Module {
            return Err(FitError::NotAModule { item });
        }
        if entry.slot != Some(slot) {
            return Err(FitError::SlotMismatch { item, slot });
        }
        Ok(entry.max_state)
    }

    /// Place a module at the end of a rack, defaulting to its highest
    /// supported state, capped at Active.
    pub fn add_module(
        &mut self,
        catalog: &impl Catalog,
        slot: SlotKind,
        item: ItemId,
    ) -> Result<usize, FitError> {
        let max_state = Self::check_module_item(catalog, slot, item)?;
        let state = max_state.min(ModuleState::Active);
        let rack = self.racks.entry(slot).or_default();
        rack.push(ModuleInstance::new(item, state));
        let index = rack.len() - 1;
        self.bump();
        Ok(index)
    }

    pub fn remove_module(&mut self, slot: SlotKind, index: usize) -> Result<ModuleInstance, FitError> {
        let rack = self
            .racks
            .get_mut(&slot)
            .filter(|rack| index < rack.len())
            .ok_or(FitError::IndexOutOfBounds { slot, index })?;
        let removed = rack.remove(index);
        self.bump();
        Ok(removed)
    }

    /// Swap the item in place. The loaded charge survives when the new
    /// module accepts it; the state is clamped to the new item's maximum.
    pub fn replace_module(
        &mut self,
        catalog: &impl Catalog,
        slot: SlotKind,
        index: usize,
        item: ItemId,
    ) -> Result<(), FitError> {
        let max_state = Self::check_module_item(catalog, slot, item)?;
        let new_entry = catalog.get_item(item)?;
        let keep_charge = match self.module_at(slot, index)?.charge {
            Some(charge) => {
                let charge_item = catalog.get_item(charge)?;
                new_entry.accepts_charge(charge_item).then_some(charge)
            }
            None => None,
        };
        let module = self.module_at_mut(slot, index)?;
        module.item = item;
        module.charge = keep_charge;
        module.state = module.state.min(max_state);
        self.bump();
        Ok(())
    }

    pub fn set_module_state(
        &mut self,
        catalog: &impl Catalog,
        slot: SlotKind,
        index: usize,
        state: ModuleState,
    ) -> Result<(), FitError> {
        let item = self.module_at(slot, index)?.item;
        let max = catalog.get_item(item)?.max_state;
        if state > max {
            return Err(FitError::InvalidState { item, state, max });
        }
        self.module_at_mut(slot, index)?.state = state;
        self.bump();
        Ok(())
    }

    pub fn set_charge(
        &mut self,
        catalog: &impl Catalog,
        slot: SlotKind,
        index: usize,
        charge: Option<ItemId>,
    ) -> Result<(), FitError> {
        let module_item = self.module_at(slot, index)?.item;
        if let Some(charge_id) = charge {
            let module_entry = catalog.get_item(module_item)?;
            let charge_entry = catalog.get_item(charge_id)?;
            if !module_entry.accepts_charge(charge_entry) {
                return Err(FitError::InvalidCharge {
                    module: module_item,
                    charge: charge_id,
                });
            }
        }
        self.module_at_mut(slot, index)?.charge = charge;
        self.bump();
        Ok(())
    }

    pub fn set_skill_level(
        &mut self,
        catalog: &impl Catalog,
        skill: ItemId,
        level: u8,
    ) -> Result<(), FitError> {
        if catalog.get_item(skill)?.category != Category::Skill {
            return Err(FitError::NotASkill { item: skill });
        }
        if level > MAX_SKILL_LEVEL {
            return Err(FitError::InvalidSkillLevel { skill, level });
        }
        self.skills.set_level(skill, level);
        self.bump();
        Ok(())
    }

    pub fn set_skills(&mut self, skills: SkillSet) {
        self.skills = skills;
        self.bump();
    }

    pub fn set_damage_pattern(&mut self, pattern: DamagePattern) {
        self.damage_pattern = pattern;
        self.bump();
    }

    pub fn set_defense_profile(&mut self, profile: DefenseProfile) {
        self.defense_profile = profile;
        self.bump();
    }

    pub fn add_drone(
        &mut self,
        catalog: &impl Catalog,
        item: ItemId,
        count: u8,
        active: bool,
    ) -> Result<usize, FitError> {
        if catalog.get_item(item)?.category != Category::Drone {
            return Err(FitError::NotADrone { item });
        }
        self.drones.push(DroneInstance { item, count, active });
        self.bump();
        Ok(self.drones.len() - 1)
    }

    pub fn set_drone_active(&mut self, index: usize, active: bool) -> Result<(), FitError> {
        let drone = self
            .drones
            .get_mut(index)
            .ok_or(FitError::DroneIndexOutOfBounds { index })?;
        drone.active = active;
        self.bump();
        Ok(())
    }
}

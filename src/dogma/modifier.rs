//! Active-effect collection: walk the fit, gate effects on module state,
//! and materialize the concrete modifier list the resolver evaluates.

use std::fmt;

use serde::Serialize;

use crate::catalog::{
    AttrId, Catalog, EffectId, Item, ItemId, Operation, PenaltyGroupId, TargetSelector,
};
use crate::fit::{Fit, ModuleState, SlotKind};

use super::resolver::ResolutionError;

/// Every addressable entity in a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "at")]
pub enum EntityId {
    Ship,
    Module(SlotKind, usize),
    Charge(SlotKind, usize),
    Drone(usize),
    Skill(ItemId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ship => write!(f, "ship"),
            Self::Module(slot, index) => write!(f, "module[{}:{index}]", slot.as_str()),
            Self::Charge(slot, index) => write!(f, "charge[{}:{index}]", slot.as_str()),
            Self::Drone(index) => write!(f, "drone[{index}]"),
            Self::Skill(item) => write!(f, "skill[{}]", item.0),
        }
    }
}

/// One concrete application of an effect: source magnitude attribute,
/// destination (entity, attribute), operation and penalty group.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub effect: EffectId,
    pub source: EntityId,
    pub src_attr: AttrId,
    pub target: EntityId,
    pub dst_attr: AttrId,
    pub op: Operation,
    pub penalty_group: Option<PenaltyGroupId>,
    /// Some(level) when the effect scales with trained skill level.
    pub skill_level: Option<u8>,
}

/// An entity together with its catalog item, in deterministic order.
pub struct FitEntity<'a> {
    pub id: EntityId,
    pub item: &'a Item,
    /// State gating effects from this entity. Ship and skills are always on.
    pub state: ModuleState,
}

/// Enumerate fit entities in fixed order: ship, modules (rack order),
/// charges, active drones, trained skills. Inactive drones carry no
/// entity at all.
pub fn fit_entities<'a, C: Catalog>(
    fit: &Fit,
    catalog: &'a C,
) -> Result<Vec<FitEntity<'a>>, ResolutionError> {
    let mut entities = Vec::new();
    entities.push(FitEntity {
        id: EntityId::Ship,
        item: catalog.get_item(fit.hull())?,
        state: ModuleState::Active,
    });
    for (slot, index, module) in fit.modules() {
        entities.push(FitEntity {
            id: EntityId::Module(slot, index),
            item: catalog.get_item(module.item)?,
            state: module.state,
        });
        if let Some(charge) = module.charge {
            entities.push(FitEntity {
                id: EntityId::Charge(slot, index),
                item: catalog.get_item(charge)?,
                // Charges are gated by their host module's state.
                state: module.state,
            });
        }
    }
    for (index, drone) in fit.drones().iter().enumerate() {
        if !drone.active {
            continue;
        }
        entities.push(FitEntity {
            id: EntityId::Drone(index),
            item: catalog.get_item(drone.item)?,
            state: ModuleState::Active,
        });
    }
    for (skill, _level) in fit.skills().iter() {
        entities.push(FitEntity {
            id: EntityId::Skill(skill),
            item: catalog.get_item(skill)?,
            state: ModuleState::Active,
        });
    }
    Ok(entities)
}

fn is_always_on(entity: EntityId) -> bool {
    matches!(entity, EntityId::Ship | EntityId::Skill(_))
}

/// Resolve an effect's target selector against the entity carrying it.
/// A charge's `self` target is its host module (ammo modifies the weapon).
fn targets_of(
    selector: TargetSelector,
    source: EntityId,
    entities: &[FitEntity<'_>],
) -> Vec<EntityId> {
    match selector {
        TargetSelector::SelfItem => match source {
            EntityId::Charge(slot, index) => vec![EntityId::Module(slot, index)],
            other => vec![other],
        },
        TargetSelector::Ship => vec![EntityId::Ship],
        TargetSelector::ItemsOfCategory(category) => entities
            .iter()
            .filter(|entity| entity.item.category == category)
            .map(|entity| entity.id)
            .collect(),
    }
}

/// Determine the active effect set and expand it into modifiers.
///
/// An effect is active when its owner is always-on (ship, skill), or the
/// owning module is not offline and its state meets the effect's minimum.
pub fn collect_modifiers<C: Catalog>(
    fit: &Fit,
    catalog: &C,
) -> Result<Vec<Modifier>, ResolutionError> {
    let entities = fit_entities(fit, catalog)?;
    let mut modifiers = Vec::new();

    for entity in &entities {
        for effect_id in &entity.item.effects {
            let effect = catalog.get_effect(*effect_id)?;
            if !is_always_on(entity.id) {
                if entity.state == ModuleState::Offline || entity.state < effect.min_state {
                    continue;
                }
            }
            let skill_level = match (entity.id, effect.per_skill_level) {
                (EntityId::Skill(skill), true) => Some(fit.skills().level(skill)),
                _ => None,
            };
            for target in targets_of(effect.target, entity.id, &entities) {
                modifiers.push(Modifier {
                    effect: *effect_id,
                    source: entity.id,
                    src_attr: effect.src_attr,
                    target,
                    dst_attr: effect.dst_attr,
                    op: effect.op,
                    penalty_group: effect.penalty_group,
                    skill_level,
                });
            }
        }
    }
    Ok(modifiers)
}

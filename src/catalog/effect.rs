//! Effect definitions: the rules by which one item's presence alters an
//! attribute of itself or another entity in the fit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::item::{AttrId, Category, EffectId};
use crate::fit::ModuleState;

/// Penalization group id. Modifiers sharing a group are subject to the
/// diminishing-returns stacking rule; unpenalized modifiers carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PenaltyGroupId(pub u32);

/// Which entity an effect writes to, relative to the item carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector {
    /// The carrying item itself (or its loaded charge's host module).
    SelfItem,
    /// The hull entity of the fit.
    Ship,
    /// Every fitted entity of the given category (e.g. all drones).
    ItemsOfCategory(Category),
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfItem => write!(f, "self"),
            Self::Ship => write!(f, "ship"),
            Self::ItemsOfCategory(category) => write!(f, "category:{}", category.as_str()),
        }
    }
}

impl FromStr for TargetSelector {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "self" => Ok(Self::SelfItem),
            "ship" => Ok(Self::Ship),
            other => match other.strip_prefix("category:") {
                Some("hull") => Ok(Self::ItemsOfCategory(Category::Hull)),
                Some("module") => Ok(Self::ItemsOfCategory(Category::Module)),
                Some("charge") => Ok(Self::ItemsOfCategory(Category::Charge)),
                Some("skill") => Ok(Self::ItemsOfCategory(Category::Skill)),
                Some("drone") => Ok(Self::ItemsOfCategory(Category::Drone)),
                _ => Err(format!("unknown effect target: {raw}")),
            },
        }
    }
}

/// Closed set of modifier operations, in pipeline order. The resolver
/// enforces bucket ordering structurally (see `dogma::resolver`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Replace the base value outright; short-circuits the other buckets.
    Assign,
    /// Multiplier applied before additive terms.
    PreMul,
    /// Flat additive term.
    Add,
    /// Multiplier applied after additive terms.
    PostMul,
}

/// A rule attached to an item: read the magnitude from `src_attr` on the
/// carrying item, apply `op` to `dst_attr` on the selected target.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDef {
    pub id: EffectId,
    pub name: String,
    pub target: TargetSelector,
    pub src_attr: AttrId,
    pub dst_attr: AttrId,
    pub op: Operation,
    /// None = unpenalized (immune to stacking diminishment).
    pub penalty_group: Option<PenaltyGroupId>,
    /// Minimum module state for the effect to contribute. Skill and hull
    /// effects ignore this (always active).
    pub min_state: ModuleState,
    /// Scale the magnitude by the owning skill's trained level.
    pub per_skill_level: bool,
}

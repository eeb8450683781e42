//! Attribute resolution: seed base values, order modified nodes by
//! dependency, then run the bucket pipeline per node.
//!
//! Bucket order is fixed: assignment-override (short-circuits the rest),
//! pre-multipliers, additive terms, post-multipliers. Penalized multipliers
//! are combined under the stacking policy; catalog bounds clamp last.
//! Resolution is pure and deterministic: the same fit revision always
//! produces bit-identical values.

use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::{AttrId, Catalog, CatalogError, EffectId, Operation, PenaltyGroupId};
use crate::fit::Fit;

use super::graph::{evaluation_order, AttrNode};
use super::modifier::{collect_modifiers, fit_entities, EntityId, Modifier};
use super::penalty::{combine_penalized, ExponentialDecay, PenaltyPolicy};

#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionError {
    Catalog(CatalogError),
    /// The modifier graph is not a DAG. The path lists the (entity, attr)
    /// nodes along the cycle, first == last.
    DependencyCycle { path: Vec<(EntityId, AttrId)> },
    /// A modifier's magnitude attribute is missing on its source entity.
    MissingMagnitude {
        entity: EntityId,
        attr: AttrId,
        effect: EffectId,
    },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::DependencyCycle { path } => {
                write!(f, "dependency cycle in modifier graph: ")?;
                for (i, (entity, attr)) in path.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{entity}.{attr}")?;
                }
                Ok(())
            }
            Self::MissingMagnitude { entity, attr, effect } => {
                write!(f, "{effect} reads {attr} from {entity}, which has no such attribute")
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

impl From<CatalogError> for ResolutionError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

/// Final attribute values for every entity in a fit, keyed by the fit
/// revision they were computed at. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    revision: u64,
    values: BTreeMap<EntityId, BTreeMap<AttrId, f64>>,
}

impl Resolved {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Resolved value, or None when the entity has no such attribute. A
    /// missing attribute is distinguishable from a resolved zero.
    pub fn value(&self, entity: EntityId, attr: AttrId) -> Option<f64> {
        self.values.get(&entity)?.get(&attr).copied()
    }

    pub fn ship_attr(&self, attr: AttrId) -> Option<f64> {
        self.value(EntityId::Ship, attr)
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.values.keys().copied()
    }

    pub fn attrs_of(&self, entity: EntityId) -> Option<&BTreeMap<AttrId, f64>> {
        self.values.get(&entity)
    }
}

fn split_buckets(modifiers: Vec<Modifier>) -> BTreeMap<AttrNode, Vec<Modifier>> {
    let mut per_node: BTreeMap<AttrNode, Vec<Modifier>> = BTreeMap::new();
    for modifier in modifiers {
        per_node
            .entry((modifier.target, modifier.dst_attr))
            .or_default()
            .push(modifier);
    }
    per_node
}

/// Magnitude of one modifier: the current value of its source attribute,
/// scaled by trained skill level when the effect is per-level.
fn magnitude(
    modifier: &Modifier,
    values: &BTreeMap<EntityId, BTreeMap<AttrId, f64>>,
) -> Result<f64, ResolutionError> {
    let raw = values
        .get(&modifier.source)
        .and_then(|attrs| attrs.get(&modifier.src_attr))
        .copied()
        .ok_or(ResolutionError::MissingMagnitude {
            entity: modifier.source,
            attr: modifier.src_attr,
            effect: modifier.effect,
        })?;
    let scaled = match (modifier.skill_level, modifier.op) {
        (None, _) => raw,
        // Additive and assigned magnitudes scale linearly with level;
        // multipliers scale their distance from 1.
        (Some(level), Operation::Add | Operation::Assign) => raw * f64::from(level),
        (Some(level), Operation::PreMul | Operation::PostMul) => {
            1.0 + (raw - 1.0) * f64::from(level)
        }
    };
    Ok(scaled)
}

fn multiplicative_factor(
    policy: &dyn PenaltyPolicy,
    entries: &[(Option<PenaltyGroupId>, f64)],
) -> f64 {
    let mut factor = 1.0;
    let mut groups: BTreeMap<PenaltyGroupId, Vec<f64>> = BTreeMap::new();
    for (group, value) in entries {
        match group {
            None => factor *= value,
            Some(id) => groups.entry(*id).or_default().push(*value),
        }
    }
    for (_, mut members) in groups {
        factor *= combine_penalized(policy, &mut members);
    }
    factor
}

/// Resolve every attribute of every entity in the fit.
pub fn resolve_with_policy<C: Catalog>(
    fit: &Fit,
    catalog: &C,
    policy: &dyn PenaltyPolicy,
) -> Result<Resolved, ResolutionError> {
    // Seed the arena with base attributes.
    let mut values: BTreeMap<EntityId, BTreeMap<AttrId, f64>> = BTreeMap::new();
    for entity in fit_entities(fit, catalog)? {
        let attrs = entity
            .item
            .attrs
            .iter()
            .map(|(attr, value)| (*attr, *value))
            .collect();
        values.insert(entity.id, attrs);
    }

    let modifiers = collect_modifiers(fit, catalog)?;
    let order = evaluation_order(&modifiers)
        .map_err(|path| ResolutionError::DependencyCycle { path })?;
    let mut per_node = split_buckets(modifiers);

    for node in order {
        let mut node_modifiers = per_node.remove(&node).unwrap_or_default();
        // Deterministic intra-bucket order regardless of collection order.
        node_modifiers.sort_by_key(|m| (m.effect, m.source));

        let (entity, attr) = node;
        let base = values
            .get(&entity)
            .and_then(|attrs| attrs.get(&attr))
            .copied()
            .unwrap_or(0.0);

        let assigns: Vec<&Modifier> = node_modifiers
            .iter()
            .filter(|m| m.op == Operation::Assign)
            .collect();

        let mut value = if let Some(last_assign) = assigns.last() {
            // Assignment overrides short-circuit the remaining buckets.
            magnitude(last_assign, &values)?
        } else {
            let mut pre = Vec::new();
            let mut add = 0.0;
            let mut post = Vec::new();
            for modifier in &node_modifiers {
                let m = magnitude(modifier, &values)?;
                match modifier.op {
                    Operation::Assign => unreachable!("assign handled above"),
                    Operation::PreMul => pre.push((modifier.penalty_group, m)),
                    Operation::Add => add += m,
                    Operation::PostMul => post.push((modifier.penalty_group, m)),
                }
            }
            (base * multiplicative_factor(policy, &pre) + add)
                * multiplicative_factor(policy, &post)
        };

        if let Some(bounds) = catalog.attr_bounds(attr) {
            value = bounds.clamp(value);
        }
        values.entry(entity).or_default().insert(attr, value);
    }

    Ok(Resolved {
        revision: fit.revision(),
        values,
    })
}

/// Resolve under the default stacking policy.
pub fn resolve<C: Catalog>(fit: &Fit, catalog: &C) -> Result<Resolved, ResolutionError> {
    resolve_with_policy(fit, catalog, &ExponentialDecay::default())
}

/// Revision-keyed cache of the last resolution. Coarse by design: any fit
/// mutation bumps the revision and discards the whole set, which can
/// over-invalidate but never serves stale values.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    last: Option<Resolved>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved_for<C: Catalog>(
        &mut self,
        fit: &Fit,
        catalog: &C,
    ) -> Result<&Resolved, ResolutionError> {
        let stale = self
            .last
            .as_ref()
            .map(|resolved| resolved.revision() != fit.revision())
            .unwrap_or(true);
        if stale {
            self.last = Some(resolve(fit, catalog)?);
        }
        Ok(self.last.as_ref().expect("cache filled above"))
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

//! Catalog adapter: read-only lookup of items and effects, injected into
//! every resolution call. No process-wide singleton; callers pass a borrow.

use std::collections::HashMap;
use std::fmt;

use crate::catalog::effect::EffectDef;
use crate::catalog::item::{AttrBounds, AttrId, Category, EffectId, Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    UnknownItem(ItemId),
    UnknownEffect(EffectId),
    UnknownName(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "unknown item: {id}"),
            Self::UnknownEffect(id) => write!(f, "unknown effect: {id}"),
            Self::UnknownName(name) => write!(f, "no catalog entry named '{name}'"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read API the engine consumes. Assumed immutable for the duration of any
/// resolution; implementations must be `Sync` so candidate evaluation can
/// share one catalog across worker threads.
pub trait Catalog: Sync {
    fn get_item(&self, id: ItemId) -> Result<&Item, CatalogError>;
    fn get_effect(&self, id: EffectId) -> Result<&EffectDef, CatalogError>;
    fn attr_bounds(&self, attr: AttrId) -> Option<&AttrBounds>;
}

/// Normalize a string for lookup: lowercase, collapse spaces/underscores.
pub fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// In-memory catalog. Built once (from loader files or a test builder),
/// then shared read-only.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    items: HashMap<ItemId, Item>,
    effects: HashMap<EffectId, EffectDef>,
    bounds: HashMap<AttrId, AttrBounds>,
    by_name: HashMap<String, ItemId>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&mut self, item: Item) {
        self.by_name.insert(normalize_lookup(&item.name), item.id);
        self.items.insert(item.id, item);
    }

    pub fn insert_effect(&mut self, effect: EffectDef) {
        self.effects.insert(effect.id, effect);
    }

    pub fn set_bounds(&mut self, attr: AttrId, bounds: AttrBounds) {
        self.bounds.insert(attr, bounds);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Every catalog item, unordered.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Resolve an item by normalized name.
    pub fn find_by_name(&self, name: &str) -> Result<&Item, CatalogError> {
        let id = self
            .by_name
            .get(&normalize_lookup(name))
            .ok_or_else(|| CatalogError::UnknownName(name.to_string()))?;
        self.get_item(*id)
    }

    /// Substring search over normalized names, results sorted by id for
    /// deterministic output.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Item> {
        let needle = normalize_lookup(query);
        let mut hits: Vec<&Item> = self
            .items
            .values()
            .filter(|item| normalize_lookup(&item.name).contains(&needle))
            .collect();
        hits.sort_by_key(|item| item.id);
        hits.truncate(limit);
        hits
    }

    /// All items of one category sharing a slot kind, sorted by id. The
    /// optimizer uses this for compatible-slot candidate discovery.
    pub fn items_in_slot(&self, slot: crate::fit::SlotKind) -> Vec<&Item> {
        let mut hits: Vec<&Item> = self
            .items
            .values()
            .filter(|item| item.category == Category::Module && item.slot == Some(slot))
            .collect();
        hits.sort_by_key(|item| item.id);
        hits
    }
}

impl Catalog for MemoryCatalog {
    fn get_item(&self, id: ItemId) -> Result<&Item, CatalogError> {
        self.items.get(&id).ok_or(CatalogError::UnknownItem(id))
    }

    fn get_effect(&self, id: EffectId) -> Result<&EffectDef, CatalogError> {
        self.effects.get(&id).ok_or(CatalogError::UnknownEffect(id))
    }

    fn attr_bounds(&self, attr: AttrId) -> Option<&AttrBounds> {
        self.bounds.get(&attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lookup_collapses_case_and_separators() {
        assert_eq!(normalize_lookup("Heavy  Pulse_Laser II"), "heavy_pulse_laser_ii");
        assert_eq!(normalize_lookup("heavy_pulse_laser_ii"), "heavy_pulse_laser_ii");
    }

    #[test]
    fn unknown_ids_fail_with_not_found() {
        let catalog = MemoryCatalog::new();
        assert_eq!(
            catalog.get_item(ItemId(9)).unwrap_err(),
            CatalogError::UnknownItem(ItemId(9))
        );
        assert_eq!(
            catalog.get_effect(EffectId(9)).unwrap_err(),
            CatalogError::UnknownEffect(EffectId(9))
        );
    }
}

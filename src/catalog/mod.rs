//! Item/effect catalog: the read-only database every resolution consumes.

pub mod attrs;
pub mod effect;
pub mod item;
pub mod loader;
pub mod store;

pub use effect::{EffectDef, Operation, PenaltyGroupId, TargetSelector};
pub use item::{AttrBounds, AttrId, Category, EffectId, Item, ItemId};
pub use loader::{load_catalog_dir, LoadError, DEFAULT_CATALOG_DIR};
pub use store::{normalize_lookup, Catalog, CatalogError, MemoryCatalog};

//! Dogma engine: dependency-driven attribute resolution over the modifier
//! graph, with stacking penalties and structural cycle detection.

pub mod graph;
pub mod modifier;
pub mod penalty;
pub mod resolver;

pub use modifier::{collect_modifiers, EntityId, Modifier};
pub use penalty::{combine_penalized, ExponentialDecay, PenaltyPolicy, DEFAULT_PENALTY_SIGMA};
pub use resolver::{resolve, resolve_with_policy, Resolved, ResolutionCache, ResolutionError};

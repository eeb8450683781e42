//! Ship fitting engine: a static item catalog, mutable fit aggregates, a
//! modifier-graph attribute resolver with stacking penalties, derived
//! combat stats, fit validation and a parallel candidate search, exposed
//! over a CLI and a local HTTP API.

pub mod catalog;
pub mod cli;
pub mod dogma;
pub mod fit;
pub mod optimizer;
pub mod parallel;
pub mod server;
pub mod stats;
pub mod validate;

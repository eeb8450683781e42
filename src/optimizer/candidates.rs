//! Candidate substitutions: module swaps and state changes for one slot.
//!
//! Discovery is deliberately narrow: only catalog items compatible with the
//! target slot (same rack kind, same hardpoint class, hull-allowed) are
//! considered. There is no unrestricted catalog-wide search.

use serde::Serialize;

use crate::catalog::{Catalog, ItemId, MemoryCatalog};
use crate::fit::{Fit, FitError, ModuleState, SlotKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateChange {
    Swap(ItemId),
    SetState(ModuleState),
}

/// A (slot, substitution) pair under consideration. Ephemeral: never part
/// of the fit until explicitly applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub slot: SlotKind,
    pub index: usize,
    pub change: CandidateChange,
}

impl Candidate {
    /// Materialize a hypothetical fit with this substitution applied.
    pub fn materialize<C: Catalog>(&self, fit: &Fit, catalog: &C) -> Result<Fit, FitError> {
        let mut trial = fit.clone();
        self.apply(&mut trial, catalog)?;
        Ok(trial)
    }

    /// Commit this substitution into the given fit.
    pub fn apply<C: Catalog>(&self, fit: &mut Fit, catalog: &C) -> Result<(), FitError> {
        match self.change {
            CandidateChange::Swap(item) => fit.replace_module(catalog, self.slot, self.index, item),
            CandidateChange::SetState(state) => {
                fit.set_module_state(catalog, self.slot, self.index, state)
            }
        }
    }
}

const STATE_LADDER: [ModuleState; 4] = [
    ModuleState::Offline,
    ModuleState::Online,
    ModuleState::Active,
    ModuleState::Overheated,
];

/// Compatible-slot candidates for one fitted module: every other catalog
/// module of the same rack kind and hardpoint class that the hull accepts,
/// plus every other supported state of the current item.
pub fn discover_candidates(
    fit: &Fit,
    catalog: &MemoryCatalog,
    slot: SlotKind,
    index: usize,
    limit: usize,
) -> Result<Vec<Candidate>, FitError> {
    let module = fit.module_at(slot, index)?;
    let current = catalog.get_item(module.item)?;

    let mut out = Vec::new();
    for item in catalog.items_in_slot(slot) {
        if item.id == current.id
            || item.hardpoint != current.hardpoint
            || !item.allowed_on_hull(fit.hull())
        {
            continue;
        }
        out.push(Candidate {
            slot,
            index,
            change: CandidateChange::Swap(item.id),
        });
        if out.len() >= limit {
            break;
        }
    }
    for state in STATE_LADDER {
        if state != module.state && state <= current.max_state {
            out.push(Candidate {
                slot,
                index,
                change: CandidateChange::SetState(state),
            });
        }
    }
    Ok(out)
}

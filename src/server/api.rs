//! JSON payload builders behind the HTTP routes. Each function parses its
//! request, runs the engine, and serializes a response body; HTTP status
//! mapping stays in the router.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{attrs, Catalog, CatalogError, Category, MemoryCatalog};
use crate::dogma::ResolutionError;
use crate::fit::{
    DamagePattern, DefenseProfile, Fit, FitError, ModuleState, SlotKind,
};
use crate::optimizer::{
    discover_candidates, optimize_iterative, pareto_search, Objective, OptimizeConfig,
};
use crate::stats::snapshot_at_range;
use crate::validate::{validate, Violation};

use super::ServerContext;

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Catalog(CatalogError),
    Fit(FitError),
    Resolution(ResolutionError),
    SessionNotFound(String),
    BadRequest(String),
}

impl ApiError {
    /// (status code, status text) the router should answer with.
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::SessionNotFound(_) => (404, "Not Found"),
            _ => (400, "Bad Request"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid request body: {err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Fit(err) => write!(f, "{err}"),
            Self::Resolution(err) => write!(f, "{err}"),
            Self::SessionNotFound(id) => write!(f, "no fit session '{id}'"),
            Self::BadRequest(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<FitError> for ApiError {
    fn from(err: FitError) -> Self {
        Self::Fit(err)
    }
}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        Self::Resolution(err)
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(payload).map_err(ApiError::Parse)
}

// ---------------------------------------------------------------------------
// Fit descriptions

#[derive(Debug, Clone, Deserialize)]
pub struct FitSpec {
    pub name: Option<String>,
    pub hull: String,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub drones: Vec<DroneSpec>,
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
    /// Train every catalog skill to this level before applying explicit
    /// per-skill entries ("all5" style profiles).
    pub all_skills_level: Option<u8>,
    pub damage_pattern: Option<DamagePattern>,
    pub defense_profile: Option<DefenseProfileSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSpec {
    pub slot: SlotKind,
    pub item: String,
    pub state: Option<ModuleState>,
    pub charge: Option<String>,
}

fn default_drone_count() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct DroneSpec {
    pub item: String,
    #[serde(default = "default_drone_count")]
    pub count: u8,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillSpec {
    pub skill: String,
    pub level: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefenseProfileSpec {
    pub range_km: Option<f64>,
    #[serde(default)]
    pub target_resists: [f64; 4],
}

/// Build a fit from a by-name description against the catalog.
pub fn build_fit(catalog: &MemoryCatalog, spec: &FitSpec) -> Result<Fit, ApiError> {
    let hull = catalog.find_by_name(&spec.hull)?;
    let name = spec.name.clone().unwrap_or_else(|| hull.name.clone());
    let mut fit = Fit::new(catalog, name, hull.id)?;

    if let Some(level) = spec.all_skills_level {
        for skill in catalog.items().filter(|i| i.category == Category::Skill) {
            fit.set_skill_level(catalog, skill.id, level)?;
        }
    }
    for entry in &spec.skills {
        let skill = catalog.find_by_name(&entry.skill)?;
        fit.set_skill_level(catalog, skill.id, entry.level)?;
    }

    for module in &spec.modules {
        let item = catalog.find_by_name(&module.item)?;
        let index = fit.add_module(catalog, module.slot, item.id)?;
        if let Some(charge) = &module.charge {
            let charge_item = catalog.find_by_name(charge)?;
            fit.set_charge(catalog, module.slot, index, Some(charge_item.id))?;
        }
        if let Some(state) = module.state {
            fit.set_module_state(catalog, module.slot, index, state)?;
        }
    }

    for drone in &spec.drones {
        let item = catalog.find_by_name(&drone.item)?;
        fit.add_drone(catalog, item.id, drone.count, drone.active)?;
    }

    if let Some(pattern) = spec.damage_pattern {
        fit.set_damage_pattern(pattern);
    }
    if let Some(profile) = &spec.defense_profile {
        fit.set_defense_profile(DefenseProfile {
            range_m: profile.range_km.map(|km| km * 1000.0),
            target_resists: profile.target_resists,
        });
    }

    Ok(fit)
}

// ---------------------------------------------------------------------------
// Route payloads

pub fn health_payload(ctx: &ServerContext) -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "drydock-api",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_items": ctx.catalog.item_count(),
        "catalog_effects": ctx.catalog.effect_count(),
        "sessions": ctx.sessions.len(),
    }))
}

#[derive(Debug, Serialize)]
struct FitCreated {
    status: &'static str,
    fit_id: String,
    name: String,
    revision: u64,
}

pub fn create_fit_payload(ctx: &ServerContext, body: &str) -> Result<String, ApiError> {
    let spec: FitSpec = serde_json::from_str(body)?;
    let fit = build_fit(&ctx.catalog, &spec)?;
    let name = fit.name.clone();
    let revision = fit.revision();
    let fit_id = ctx.sessions.create(fit);
    to_json(&FitCreated {
        status: "ok",
        fit_id,
        name,
        revision,
    })
}

pub fn delete_fit_payload(ctx: &ServerContext, id: &str) -> Result<String, ApiError> {
    if !ctx.sessions.remove(id) {
        return Err(ApiError::SessionNotFound(id.to_string()));
    }
    to_json(&serde_json::json!({ "status": "ok" }))
}

fn with_session<R>(
    ctx: &ServerContext,
    id: &str,
    f: impl FnOnce(&mut super::session::FitSession) -> Result<R, ApiError>,
) -> Result<R, ApiError> {
    ctx.sessions
        .with_session(id, f)
        .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?
}

pub fn stats_payload(
    ctx: &ServerContext,
    id: &str,
    range_km: Option<f64>,
) -> Result<String, ApiError> {
    with_session(ctx, id, |session| {
        let resolved = session.cache.resolved_for(&session.fit, &ctx.catalog)?;
        let snap = snapshot_at_range(
            &session.fit,
            resolved,
            &ctx.catalog,
            range_km.map(|km| km * 1000.0),
        );
        to_json(&snap)
    })
}

#[derive(Debug, Serialize)]
struct ModuleListItem {
    slot: SlotKind,
    index: usize,
    item_id: u32,
    item: String,
    state: ModuleState,
    charge: Option<String>,
}

#[derive(Debug, Serialize)]
struct ModuleListResponse {
    status: &'static str,
    revision: u64,
    modules: Vec<ModuleListItem>,
}

fn module_list(catalog: &MemoryCatalog, fit: &Fit) -> Result<Vec<ModuleListItem>, ApiError> {
    let mut out = Vec::new();
    for (slot, index, module) in fit.modules() {
        let item = catalog.get_item(module.item)?;
        let charge = match module.charge {
            Some(charge) => Some(catalog.get_item(charge)?.name.clone()),
            None => None,
        };
        out.push(ModuleListItem {
            slot,
            index,
            item_id: item.id.0,
            item: item.name.clone(),
            state: module.state,
            charge,
        });
    }
    Ok(out)
}

pub fn modules_get_payload(ctx: &ServerContext, id: &str) -> Result<String, ApiError> {
    with_session(ctx, id, |session| {
        to_json(&ModuleListResponse {
            status: "ok",
            revision: session.fit.revision(),
            modules: module_list(&ctx.catalog, &session.fit)?,
        })
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ModuleAction {
    Add {
        slot: SlotKind,
        item: String,
    },
    Remove {
        slot: SlotKind,
        index: usize,
    },
    Replace {
        slot: SlotKind,
        index: usize,
        item: String,
    },
    SetState {
        slot: SlotKind,
        index: usize,
        state: ModuleState,
    },
    SetCharge {
        slot: SlotKind,
        index: usize,
        charge: Option<String>,
    },
}

pub fn modules_post_payload(ctx: &ServerContext, id: &str, body: &str) -> Result<String, ApiError> {
    let action: ModuleAction = serde_json::from_str(body)?;
    with_session(ctx, id, |session| {
        let catalog = &ctx.catalog;
        match &action {
            ModuleAction::Add { slot, item } => {
                let item = catalog.find_by_name(item)?;
                session.fit.add_module(catalog, *slot, item.id)?;
            }
            ModuleAction::Remove { slot, index } => {
                session.fit.remove_module(*slot, *index)?;
            }
            ModuleAction::Replace { slot, index, item } => {
                let item = catalog.find_by_name(item)?;
                session.fit.replace_module(catalog, *slot, *index, item.id)?;
            }
            ModuleAction::SetState { slot, index, state } => {
                session.fit.set_module_state(catalog, *slot, *index, *state)?;
            }
            ModuleAction::SetCharge { slot, index, charge } => {
                let charge = match charge {
                    Some(name) => Some(catalog.find_by_name(name)?.id),
                    None => None,
                };
                session.fit.set_charge(catalog, *slot, *index, charge)?;
            }
        }
        session.touch();
        to_json(&ModuleListResponse {
            status: "ok",
            revision: session.fit.revision(),
            modules: module_list(catalog, &session.fit)?,
        })
    })
}

#[derive(Debug, Serialize)]
struct ValidateResponse {
    status: &'static str,
    valid: bool,
    violations: Vec<Violation>,
}

pub fn validate_payload(ctx: &ServerContext, id: &str) -> Result<String, ApiError> {
    with_session(ctx, id, |session| {
        let resolved = session.cache.resolved_for(&session.fit, &ctx.catalog)?;
        let violations = validate(&session.fit, resolved, &ctx.catalog);
        to_json(&ValidateResponse {
            status: "ok",
            valid: violations.is_empty(),
            violations,
        })
    })
}

fn parse_objectives(names: &[String]) -> Result<Vec<Objective>, ApiError> {
    if names.is_empty() {
        return Ok(vec![Objective::Dps]);
    }
    names
        .iter()
        .map(|name| name.parse::<Objective>().map_err(ApiError::BadRequest))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub objectives: Vec<String>,
    pub max_passes: Option<usize>,
    pub candidate_limit: Option<usize>,
    pub require_valid: Option<bool>,
}

pub fn optimize_payload(ctx: &ServerContext, id: &str, body: &str) -> Result<String, ApiError> {
    let request: OptimizeRequest = if body.trim().is_empty() {
        OptimizeRequest {
            objectives: Vec::new(),
            max_passes: None,
            candidate_limit: None,
            require_valid: None,
        }
    } else {
        serde_json::from_str(body)?
    };
    let defaults = OptimizeConfig::default();
    let config = OptimizeConfig {
        objectives: parse_objectives(&request.objectives)?,
        max_passes: request.max_passes.unwrap_or(defaults.max_passes),
        candidate_limit: request.candidate_limit.unwrap_or(defaults.candidate_limit),
        require_valid: request.require_valid.unwrap_or(defaults.require_valid),
    };
    with_session(ctx, id, |session| {
        let report = optimize_iterative(&mut session.fit, &ctx.catalog, &config)?;
        session.touch();
        to_json(&serde_json::json!({
            "status": "ok",
            "report": report,
            "revision": session.fit.revision(),
        }))
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParetoRequest {
    pub slot: SlotKind,
    pub index: usize,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub limit: Option<usize>,
    pub require_valid: Option<bool>,
}

pub fn pareto_payload(ctx: &ServerContext, id: &str, body: &str) -> Result<String, ApiError> {
    let request: ParetoRequest = serde_json::from_str(body)?;
    let objectives = parse_objectives(&request.objectives)?;
    let limit = request.limit.unwrap_or(24);
    let require_valid = request.require_valid.unwrap_or(true);
    with_session(ctx, id, |session| {
        let candidates = discover_candidates(
            &session.fit,
            &ctx.catalog,
            request.slot,
            request.index,
            limit,
        )?;
        let (frontier, report) = pareto_search(
            &session.fit,
            &ctx.catalog,
            &candidates,
            &objectives,
            require_valid,
        )?;
        to_json(&serde_json::json!({
            "status": "ok",
            "objectives": objectives,
            "considered": candidates.len(),
            "skipped": report.skipped,
            "base": report.base_snapshot,
            "frontier": frontier,
        }))
    })
}

#[derive(Debug, Serialize)]
struct CatalogListItem {
    id: u32,
    name: String,
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    slot: Option<SlotKind>,
}

/// Query-string parameter by key; no percent decoding.
pub fn query_param<'a>(path: &'a str, key: &str) -> Option<&'a str> {
    let query = path.split('?').nth(1)?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

pub fn catalog_items_payload(ctx: &ServerContext, path: &str) -> Result<String, ApiError> {
    let query = query_param(path, "query").unwrap_or("");
    let limit = query_param(path, "limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(50);
    let items: Vec<CatalogListItem> = ctx
        .catalog
        .search(query, limit)
        .into_iter()
        .map(|item| CatalogListItem {
            id: item.id.0,
            name: item.name.clone(),
            category: item.category,
            slot: item.slot,
        })
        .collect();
    to_json(&serde_json::json!({
        "status": "ok",
        "count": items.len(),
        "items": items,
    }))
}

pub fn hull_slots_payload(ctx: &ServerContext, name: &str) -> Result<String, ApiError> {
    let hull = ctx.catalog.find_by_name(name)?;
    if hull.category != Category::Hull {
        return Err(ApiError::BadRequest(format!("'{}' is not a hull", hull.name)));
    }
    let slot_total = |attr| hull.base_attr(attr).unwrap_or(0.0).round() as u32;
    to_json(&serde_json::json!({
        "status": "ok",
        "hull": hull.name,
        "id": hull.id.0,
        "slots": {
            "high": slot_total(attrs::HIGH_SLOTS),
            "mid": slot_total(attrs::MID_SLOTS),
            "low": slot_total(attrs::LOW_SLOTS),
            "rig": slot_total(attrs::RIG_SLOTS),
            "subsystem": slot_total(attrs::SUBSYSTEM_SLOTS),
        },
        "turret_hardpoints": slot_total(attrs::TURRET_HARDPOINTS),
        "launcher_hardpoints": slot_total(attrs::LAUNCHER_HARDPOINTS),
    }))
}

mod common;

use common::*;

use drydock::catalog::{attrs, AttrBounds, Operation, TargetSelector};
use drydock::dogma::{resolve, EntityId, ResolutionCache, ResolutionError};
use drydock::fit::{Fit, ModuleState, SlotKind};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn velocity_mod(id: u32, name: &str, effect_id: u32) -> drydock::catalog::Item {
    with_effects(
        with_attrs(module(id, name, SlotKind::Low), &[(BONUS_A, 1.10)]),
        &[effect_id],
    )
}

fn velocity_catalog(penalty_group: Option<u32>) -> drydock::catalog::MemoryCatalog {
    let mut def = effect(
        1,
        "velocity bonus",
        TargetSelector::Ship,
        BONUS_A,
        attrs::MAX_VELOCITY,
        Operation::PostMul,
    );
    if let Some(group) = penalty_group {
        def = penalized(def, group);
    }
    catalog_with(
        vec![
            hull(100, "Test Frigate"),
            velocity_mod(200, "Overdrive I", 1),
            velocity_mod(201, "Overdrive II", 1),
            velocity_mod(202, "Overdrive III", 1),
        ],
        vec![def],
    )
}

fn fit_with_mods(catalog: &drydock::catalog::MemoryCatalog, ids: &[u32]) -> Fit {
    let mut fit = Fit::new(catalog, "test", drydock::catalog::ItemId(100)).unwrap();
    for id in ids {
        fit.add_module(catalog, SlotKind::Low, drydock::catalog::ItemId(*id))
            .unwrap();
    }
    fit
}

#[test]
fn resolution_is_deterministic() {
    let catalog = velocity_catalog(Some(1));
    let fit = fit_with_mods(&catalog, &[200, 201, 202]);
    let first = resolve(&fit, &catalog).unwrap();
    let second = resolve(&fit, &catalog).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unpenalized_multipliers_compound_exactly() {
    let catalog = velocity_catalog(None);
    let fit = fit_with_mods(&catalog, &[200, 201]);
    let resolved = resolve(&fit, &catalog).unwrap();
    approx_eq(
        resolved.ship_attr(attrs::MAX_VELOCITY).unwrap(),
        365.0 * 1.21,
        1e-9,
    );
}

#[test]
fn penalized_pair_lands_between_single_and_unpenalized() {
    let catalog = velocity_catalog(Some(1));
    let fit = fit_with_mods(&catalog, &[200, 201]);
    let resolved = resolve(&fit, &catalog).unwrap();
    let velocity = resolved.ship_attr(attrs::MAX_VELOCITY).unwrap();
    assert!(velocity > 365.0 * 1.10, "got {velocity}");
    assert!(velocity < 365.0 * 1.21, "got {velocity}");
}

#[test]
fn every_penalized_module_still_helps() {
    let catalog = velocity_catalog(Some(1));
    let two = resolve(&fit_with_mods(&catalog, &[200, 201]), &catalog).unwrap();
    let three = resolve(&fit_with_mods(&catalog, &[200, 201, 202]), &catalog).unwrap();
    let v2 = two.ship_attr(attrs::MAX_VELOCITY).unwrap();
    let v3 = three.ship_attr(attrs::MAX_VELOCITY).unwrap();
    assert!(v3 > v2, "third module made things worse: {v3} <= {v2}");
    assert!(v3 < 365.0 * 1.1_f64.powi(3), "penalty not applied: {v3}");
}

#[test]
fn assign_short_circuits_the_other_buckets() {
    let catalog = catalog_with(
        vec![
            hull(100, "Test Frigate"),
            with_effects(
                with_attrs(module(200, "Velocity Override", SlotKind::Low), &[(BONUS_A, 500.0)]),
                &[1],
            ),
            with_effects(
                with_attrs(module(201, "Velocity Booster", SlotKind::Low), &[(BONUS_B, 50.0)]),
                &[2],
            ),
        ],
        vec![
            effect(
                1,
                "velocity override",
                TargetSelector::Ship,
                BONUS_A,
                attrs::MAX_VELOCITY,
                Operation::Assign,
            ),
            effect(
                2,
                "velocity add",
                TargetSelector::Ship,
                BONUS_B,
                attrs::MAX_VELOCITY,
                Operation::Add,
            ),
        ],
    );
    let fit = fit_with_mods(&catalog, &[200, 201]);
    let resolved = resolve(&fit, &catalog).unwrap();
    approx_eq(resolved.ship_attr(attrs::MAX_VELOCITY).unwrap(), 500.0, 1e-12);
}

#[test]
fn offline_module_contributes_no_effects() {
    let catalog = velocity_catalog(Some(1));
    let bare = fit_with_mods(&catalog, &[]);
    let mut fitted = fit_with_mods(&catalog, &[200]);
    fitted
        .set_module_state(&catalog, SlotKind::Low, 0, ModuleState::Offline)
        .unwrap();

    let bare_resolved = resolve(&bare, &catalog).unwrap();
    let fitted_resolved = resolve(&fitted, &catalog).unwrap();
    assert_eq!(
        bare_resolved.ship_attr(attrs::MAX_VELOCITY),
        fitted_resolved.ship_attr(attrs::MAX_VELOCITY),
    );
}

#[test]
fn effect_below_its_minimum_state_is_inert() {
    let mut def = effect(
        1,
        "active velocity bonus",
        TargetSelector::Ship,
        BONUS_A,
        attrs::MAX_VELOCITY,
        Operation::PostMul,
    );
    def.min_state = ModuleState::Active;
    let catalog = catalog_with(
        vec![hull(100, "Test Frigate"), velocity_mod(200, "Afterburner", 1)],
        vec![def],
    );

    let mut fit = fit_with_mods(&catalog, &[200]);
    fit.set_module_state(&catalog, SlotKind::Low, 0, ModuleState::Online)
        .unwrap();
    let online = resolve(&fit, &catalog).unwrap();
    approx_eq(online.ship_attr(attrs::MAX_VELOCITY).unwrap(), 365.0, 1e-12);

    fit.set_module_state(&catalog, SlotKind::Low, 0, ModuleState::Active)
        .unwrap();
    let active = resolve(&fit, &catalog).unwrap();
    approx_eq(active.ship_attr(attrs::MAX_VELOCITY).unwrap(), 365.0 * 1.10, 1e-9);
}

#[test]
fn dependency_cycle_is_a_fatal_error() {
    let catalog = catalog_with(
        vec![with_effects(
            with_attrs(hull(100, "Paradox Hull"), &[(BONUS_A, 1.0), (BONUS_B, 2.0)]),
            &[1, 2],
        )],
        vec![
            effect(1, "a feeds b", TargetSelector::Ship, BONUS_A, BONUS_B, Operation::Add),
            effect(2, "b feeds a", TargetSelector::Ship, BONUS_B, BONUS_A, Operation::Add),
        ],
    );
    let fit = Fit::new(&catalog, "test", drydock::catalog::ItemId(100)).unwrap();
    match resolve(&fit, &catalog) {
        Err(ResolutionError::DependencyCycle { path }) => {
            assert!(path.len() >= 2);
            assert_eq!(path.first(), path.last());
            assert!(path.iter().all(|(entity, _)| *entity == EntityId::Ship));
        }
        other => panic!("expected a dependency cycle, got {other:?}"),
    }
}

#[test]
fn per_level_additive_effect_scales_linearly() {
    let mut def = effect(
        1,
        "navigation velocity",
        TargetSelector::Ship,
        BONUS_A,
        attrs::MAX_VELOCITY,
        Operation::Add,
    );
    def.per_skill_level = true;
    let catalog = catalog_with(
        vec![
            hull(100, "Test Frigate"),
            with_effects(
                with_attrs(
                    item(400, "Navigation", drydock::catalog::Category::Skill),
                    &[(BONUS_A, 4.0)],
                ),
                &[1],
            ),
        ],
        vec![def],
    );
    let mut fit = Fit::new(&catalog, "test", drydock::catalog::ItemId(100)).unwrap();
    fit.set_skill_level(&catalog, drydock::catalog::ItemId(400), 3)
        .unwrap();
    let resolved = resolve(&fit, &catalog).unwrap();
    approx_eq(resolved.ship_attr(attrs::MAX_VELOCITY).unwrap(), 377.0, 1e-9);
}

#[test]
fn per_level_multiplier_scales_its_distance_from_one() {
    let mut def = effect(
        1,
        "navigation velocity",
        TargetSelector::Ship,
        BONUS_A,
        attrs::MAX_VELOCITY,
        Operation::PostMul,
    );
    def.per_skill_level = true;
    let catalog = catalog_with(
        vec![
            hull(100, "Test Frigate"),
            with_effects(
                with_attrs(
                    item(400, "Navigation", drydock::catalog::Category::Skill),
                    &[(BONUS_A, 1.05)],
                ),
                &[1],
            ),
        ],
        vec![def],
    );
    let mut fit = Fit::new(&catalog, "test", drydock::catalog::ItemId(100)).unwrap();
    fit.set_skill_level(&catalog, drydock::catalog::ItemId(400), 5)
        .unwrap();
    let resolved = resolve(&fit, &catalog).unwrap();
    // 1 + (1.05 - 1) * 5 = 1.25
    approx_eq(resolved.ship_attr(attrs::MAX_VELOCITY).unwrap(), 365.0 * 1.25, 1e-9);
}

#[test]
fn catalog_bounds_clamp_after_the_pipeline() {
    let mut catalog = velocity_catalog(None);
    catalog.set_bounds(
        attrs::MAX_VELOCITY,
        AttrBounds {
            floor: None,
            cap: Some(400.0),
        },
    );
    let fit = fit_with_mods(&catalog, &[200, 201, 202]);
    let resolved = resolve(&fit, &catalog).unwrap();
    approx_eq(resolved.ship_attr(attrs::MAX_VELOCITY).unwrap(), 400.0, 1e-12);
}

#[test]
fn cache_recomputes_only_on_revision_change() {
    let catalog = velocity_catalog(None);
    let mut fit = fit_with_mods(&catalog, &[200]);
    let mut cache = ResolutionCache::new();

    let before = {
        let resolved = cache.resolved_for(&fit, &catalog).unwrap();
        assert_eq!(resolved.revision(), fit.revision());
        resolved.ship_attr(attrs::MAX_VELOCITY).unwrap()
    };

    fit.add_module(&catalog, SlotKind::Low, drydock::catalog::ItemId(201))
        .unwrap();
    let resolved = cache.resolved_for(&fit, &catalog).unwrap();
    assert_eq!(resolved.revision(), fit.revision());
    let after = resolved.ship_attr(attrs::MAX_VELOCITY).unwrap();
    assert!(after > before);
}

#[test]
fn missing_attribute_is_none_not_zero() {
    let catalog = velocity_catalog(None);
    let fit = fit_with_mods(&catalog, &[]);
    let resolved = resolve(&fit, &catalog).unwrap();
    assert_eq!(resolved.ship_attr(BONUS_C), None);
}

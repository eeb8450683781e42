//! Resolver throughput: full attribute resolutions per second on a
//! representative fit, with and without stacking-penalized groups.
//!
//! Run with: `cargo bench`

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drydock::catalog::{
    attrs, AttrId, Category, EffectDef, EffectId, Item, ItemId, MemoryCatalog, Operation,
    PenaltyGroupId, TargetSelector,
};
use drydock::dogma::resolve;
use drydock::fit::{Fit, Hardpoint, ModuleState, SlotKind};

const BONUS: AttrId = AttrId(900);

fn bare_item(id: u32, name: &str, category: Category) -> Item {
    Item {
        id: ItemId(id),
        name: name.to_string(),
        category,
        attrs: BTreeMap::new(),
        effects: Vec::new(),
        slot: None,
        hardpoint: None,
        max_state: ModuleState::Active,
        group: 0,
        charge_groups: Vec::new(),
        skill_reqs: Vec::new(),
        hull_whitelist: Vec::new(),
    }
}

fn bench_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();

    let mut hull = bare_item(100, "Bench Cruiser", Category::Hull);
    for (attr, value) in [
        (attrs::CPU_OUTPUT, 500.0),
        (attrs::POWER_OUTPUT, 800.0),
        (attrs::CALIBRATION_CAPACITY, 400.0),
        (attrs::HIGH_SLOTS, 6.0),
        (attrs::MID_SLOTS, 4.0),
        (attrs::LOW_SLOTS, 5.0),
        (attrs::RIG_SLOTS, 3.0),
        (attrs::TURRET_HARDPOINTS, 6.0),
        (attrs::SHIELD_HP, 2_000.0),
        (attrs::ARMOR_HP, 2_400.0),
        (attrs::STRUCTURE_HP, 2_200.0),
        (attrs::SHIELD_RECHARGE_TIME, 1_000.0),
        (attrs::CAPACITOR_CAPACITY, 1_400.0),
        (attrs::CAPACITOR_RECHARGE_TIME, 350.0),
        (attrs::MASS, 11_000_000.0),
        (attrs::AGILITY, 0.6),
        (attrs::MAX_VELOCITY, 220.0),
    ] {
        hull.attrs.insert(attr, value);
    }
    catalog.insert_item(hull);

    // Six turrets, five penalized damage mods, assorted mids.
    let mut turret = bare_item(200, "Bench Turret", Category::Module);
    turret.slot = Some(SlotKind::High);
    turret.hardpoint = Some(Hardpoint::Turret);
    for (attr, value) in [
        (attrs::CPU_USAGE, 30.0),
        (attrs::POWER_USAGE, 80.0),
        (attrs::CYCLE_TIME, 3.0),
        (attrs::DAMAGE_EM, 12.0),
        (attrs::DAMAGE_THERMAL, 12.0),
        (attrs::OPTIMAL_RANGE, 8_000.0),
        (attrs::FALLOFF, 12_000.0),
        (attrs::DAMAGE_MULTIPLIER, 1.0),
    ] {
        turret.attrs.insert(attr, value);
    }
    catalog.insert_item(turret);

    let mut damage_mod = bare_item(210, "Bench Damage Mod", Category::Module);
    damage_mod.slot = Some(SlotKind::Low);
    damage_mod.attrs.insert(attrs::CPU_USAGE, 20.0);
    damage_mod.attrs.insert(BONUS, 1.1);
    damage_mod.effects = vec![EffectId(1)];
    catalog.insert_item(damage_mod);

    let mut extender = bare_item(220, "Bench Shield Extender", Category::Module);
    extender.slot = Some(SlotKind::Mid);
    extender.attrs.insert(attrs::CPU_USAGE, 25.0);
    extender.attrs.insert(BONUS, 500.0);
    extender.effects = vec![EffectId(2)];
    catalog.insert_item(extender);

    catalog.insert_effect(EffectDef {
        id: EffectId(1),
        name: "damage bonus".to_string(),
        target: TargetSelector::ItemsOfCategory(Category::Module),
        src_attr: BONUS,
        dst_attr: attrs::DAMAGE_MULTIPLIER,
        op: Operation::PostMul,
        penalty_group: Some(PenaltyGroupId(1)),
        min_state: ModuleState::Online,
        per_skill_level: false,
    });
    catalog.insert_effect(EffectDef {
        id: EffectId(2),
        name: "shield extension".to_string(),
        target: TargetSelector::Ship,
        src_attr: BONUS,
        dst_attr: attrs::SHIELD_HP,
        op: Operation::Add,
        min_state: ModuleState::Online,
        penalty_group: None,
        per_skill_level: false,
    });

    catalog
}

fn bench_fit(catalog: &MemoryCatalog) -> Fit {
    let mut fit = Fit::new(catalog, "bench", ItemId(100)).unwrap();
    for _ in 0..6 {
        fit.add_module(catalog, SlotKind::High, ItemId(200)).unwrap();
    }
    for _ in 0..5 {
        fit.add_module(catalog, SlotKind::Low, ItemId(210)).unwrap();
    }
    for _ in 0..4 {
        fit.add_module(catalog, SlotKind::Mid, ItemId(220)).unwrap();
    }
    fit
}

fn bench_resolver(c: &mut Criterion) {
    let catalog = bench_catalog();
    let fit = bench_fit(&catalog);

    let mut group = c.benchmark_group("resolver");
    group.sample_size(100);

    group.bench_function("full_resolution", |b| {
        b.iter(|| black_box(resolve(&fit, &catalog).unwrap()));
    });

    let bare = Fit::new(&catalog, "bare", ItemId(100)).unwrap();
    group.bench_function("hull_only_resolution", |b| {
        b.iter(|| black_box(resolve(&bare, &catalog).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_resolver);
criterion_main!(benches);

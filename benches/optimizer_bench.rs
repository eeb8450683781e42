//! Candidate evaluation throughput: swap candidates scored per second,
//! serial baseline vs the rayon-parallel path.
//!
//! Run with: `cargo bench`

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drydock::catalog::{attrs, Category, Item, ItemId, MemoryCatalog};
use drydock::fit::{Fit, Hardpoint, ModuleState, SlotKind};
use drydock::optimizer::{
    discover_candidates, evaluate_candidates, evaluate_candidates_with_progress, Objective,
};
use drydock::parallel::WorkerPool;

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

/// A hull and forty turret variants so discovery yields a wide swap set.
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

    for variant in 0..40u32 {
        let mut turret = bare_item(
            200 + variant,
            &format!("Bench Turret {variant}"),
            Category::Module,
        );
        turret.slot = Some(SlotKind::High);
        turret.hardpoint = Some(Hardpoint::Turret);
        for (attr, value) in [
            (attrs::CPU_USAGE, 20.0 + f64::from(variant)),
            (attrs::POWER_USAGE, 40.0),
            (attrs::CYCLE_TIME, 3.0 + f64::from(variant % 5) * 0.2),
            (attrs::DAMAGE_EM, 8.0 + f64::from(variant)),
            (attrs::OPTIMAL_RANGE, 5_000.0 + f64::from(variant) * 500.0),
            (attrs::FALLOFF, 10_000.0),
        ] {
            turret.attrs.insert(attr, value);
        }
        catalog.insert_item(turret);
    }

    catalog
}

fn bench_optimizer(c: &mut Criterion) {
    let catalog = bench_catalog();
    let mut fit = Fit::new(&catalog, "bench", ItemId(100)).unwrap();
    fit.add_module(&catalog, SlotKind::High, ItemId(200)).unwrap();

    let candidates = discover_candidates(&fit, &catalog, SlotKind::High, 0, 40).unwrap();
    let objectives = [Objective::Dps, Objective::Ehp];

    let mut group = c.benchmark_group("optimizer");
    group.sample_size(50);

    group.bench_function("evaluate_39_swaps_parallel", |b| {
        b.iter(|| {
            black_box(
                evaluate_candidates(&fit, &catalog, &candidates, &objectives, true).unwrap(),
            )
        });
    });

    let single = WorkerPool::with_workers(1);
    group.bench_function("evaluate_39_swaps_single_worker", |b| {
        b.iter(|| {
            black_box(
                evaluate_candidates_with_progress(
                    &fit,
                    &catalog,
                    &candidates,
                    &objectives,
                    true,
                    &single,
                    1,
                    |_, _| {},
                )
                .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_optimizer);
criterion_main!(benches);

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use dust::RedstoneEngine;
use dust_config::{RedstoneConfig, RedstoneImplementation};
use dust_util::math::position::BlockPos;
use dust_world::{CellKind, GridWorld, RedstoneWorld};
use rand::{Rng, SeedableRng, rngs::StdRng};

const LEVER: CellKind = CellKind::SignalSource { power: 15 };

/// A square of wire with scattered holes and pillars, lever spot at the corner.
fn random_network(side: i32, seed: u64) -> GridWorld {
    let mut rng = StdRng::seed_from_u64(seed);
    let world = GridWorld::new();
    world.fill(
        BlockPos::new(-1, 0, -1),
        BlockPos::new(side, 0, side),
        CellKind::SolidConductor,
    );

    let engine = RedstoneEngine::new(RedstoneConfig::with_implementation(
        RedstoneImplementation::Eigencraft,
    ));
    for x in 0..side {
        for z in 0..side {
            let pos = BlockPos::new(x, 1, z);
            match rng.random_range(0..10) {
                0 => world.place(pos, CellKind::SolidConductor),
                1 | 2 => {}
                _ => {
                    let _ = engine.place_wire(&world, pos);
                }
            }
        }
    }
    world.remove_block(&BlockPos::new(0, 1, 0));
    let _ = engine.place_wire(&world, BlockPos::new(0, 1, 0));
    world
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("lever_on");
    for side in [8, 16, 32] {
        let world = random_network(side, 0x5EED);
        for implementation in [
            RedstoneImplementation::Vanilla,
            RedstoneImplementation::Eigencraft,
        ] {
            let engine = RedstoneEngine::new(RedstoneConfig::with_implementation(implementation));
            group.bench_with_input(
                BenchmarkId::new(format!("{implementation:?}"), side),
                &world,
                |b, world| {
                    b.iter_batched(
                        || world.clone(),
                        |world| engine.place_block(&world, BlockPos::new(-1, 1, 0), LEVER),
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }
    group.finish();

    let mut group = c.benchmark_group("lever_off");
    for side in [8, 16, 32] {
        let world = random_network(side, 0x5EED);
        RedstoneEngine::default().place_block(&world, BlockPos::new(-1, 1, 0), LEVER);
        for implementation in [
            RedstoneImplementation::Vanilla,
            RedstoneImplementation::Eigencraft,
        ] {
            let engine = RedstoneEngine::new(RedstoneConfig::with_implementation(implementation));
            group.bench_with_input(
                BenchmarkId::new(format!("{implementation:?}"), side),
                &world,
                |b, world| {
                    b.iter_batched(
                        || world.clone(),
                        |world| engine.remove_block(&world, BlockPos::new(-1, 1, 0)),
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_propagation);
criterion_main!(benches);

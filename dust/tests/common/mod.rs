#![allow(dead_code)]

use dust::RedstoneEngine;
use dust_config::{RedstoneConfig, RedstoneImplementation};
use dust_util::math::position::BlockPos;
use dust_world::{CellKind, GridWorld};

/// Rounds of device ticks after which a circuit is taken to be a clock.
const MAX_TICK_ROUNDS: usize = 64;

pub const IMPLEMENTATIONS: [RedstoneImplementation; 2] = [
    RedstoneImplementation::Vanilla,
    RedstoneImplementation::Eigencraft,
];

pub fn enable_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn engine(implementation: RedstoneImplementation) -> RedstoneEngine {
    RedstoneEngine::new(RedstoneConfig::with_implementation(implementation))
}

/// Solid floor at `y = 0` covering the inclusive x/z box.
pub fn floor(world: &GridWorld, (min_x, min_z): (i32, i32), (max_x, max_z): (i32, i32)) {
    world.fill(
        BlockPos::new(min_x, 0, min_z),
        BlockPos::new(max_x, 0, max_z),
        CellKind::SolidConductor,
    );
}

/// Places wires one by one through the engine, on top of the floor.
pub fn lay_wire(engine: &RedstoneEngine, world: &GridWorld, positions: impl IntoIterator<Item = BlockPos>) {
    for pos in positions {
        assert!(
            engine.place_wire(world, pos).is_some(),
            "no floor under {pos}"
        );
    }
}

pub fn power(world: &GridWorld, pos: BlockPos) -> u8 {
    world.wire_power(&pos).unwrap_or_else(|| panic!("no wire at {pos}"))
}

/// Runs the scheduled device ticks round by round, in position order, until
/// none are left. Returns the number of rounds run.
pub fn run_device_ticks(engine: &RedstoneEngine, world: &GridWorld) -> usize {
    for round in 0..MAX_TICK_ROUNDS {
        let mut due: Vec<BlockPos> = world
            .take_scheduled_ticks()
            .into_iter()
            .map(|tick| tick.position)
            .collect();
        if due.is_empty() {
            return round;
        }
        due.sort();
        due.dedup();
        for pos in due {
            engine.on_device_tick(world, pos);
        }
    }
    panic!("device ticks still pending after {MAX_TICK_ROUNDS} rounds");
}

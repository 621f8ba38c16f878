use std::collections::VecDeque;

use dust_util::math::{direction::BlockDirection, position::BlockPos, vector3::Vector3};
use dust_world::{BlockFlags, RedstoneWorld};
use rustc_hash::FxHashSet;

use super::{PropagationStats, redstone_wire::RedstoneWireBlock};

/// Offsets whose wires may read a wire that just changed: the six faces and
/// the eight positions one step sideways and one step up or down.
fn update_offsets() -> impl Iterator<Item = Vector3<i32>> {
    let faces = BlockDirection::all().into_iter().map(BlockDirection::to_offset);
    let diagonals = BlockDirection::horizontal().into_iter().flat_map(|direction| {
        let offset = direction.to_offset();
        [
            offset + BlockDirection::Up.to_offset(),
            offset + BlockDirection::Down.to_offset(),
        ]
    });
    faces.chain(diagonals)
}

/// Plain worklist relaxation: re-evaluate wires one by one until nothing
/// changes. A wire may be written several times per call.
pub struct RedstoneWireVanilla<'a> {
    world: &'a dyn RedstoneWorld,
    wire: &'a RedstoneWireBlock,
    queue: VecDeque<BlockPos>,
    pending: FxHashSet<BlockPos>,
    stats: PropagationStats,
}

impl<'a> RedstoneWireVanilla<'a> {
    pub fn new(world: &'a dyn RedstoneWorld, wire: &'a RedstoneWireBlock) -> Self {
        Self {
            world,
            wire,
            queue: VecDeque::new(),
            pending: FxHashSet::default(),
            stats: PropagationStats::default(),
        }
    }

    fn schedule(&mut self, pos: BlockPos) {
        if self.pending.insert(pos) {
            self.queue.push_back(pos);
        }
    }

    /// Relaxes from `seeds` until every wire it reached is stable.
    pub fn propagate(mut self, seeds: &[BlockPos]) -> PropagationStats {
        for seed in seeds {
            self.schedule(*seed);
        }

        while let Some(pos) = self.queue.pop_front() {
            self.pending.remove(&pos);
            let Some(state) = self.world.get_cell(&pos).as_wire() else {
                continue;
            };
            self.stats.evaluated += 1;

            let power = self.wire.calculate_power(self.world, &pos);
            log::trace!("Wire at {pos}: {} -> {power}", state.power());
            if power == state.power() {
                continue;
            }

            self.world
                .set_wire_state(&pos, state.with_power(power), BlockFlags::NOTIFY_LISTENERS);
            self.stats.record_power_write(pos);
            for offset in update_offsets() {
                self.schedule(pos.offset(offset));
            }
        }

        self.stats
    }
}

#[cfg(test)]
mod tests {
    use dust_world::{CellKind, GridWorld, WireState};

    use super::*;

    #[test]
    fn covers_faces_and_diagonals() {
        let offsets: FxHashSet<_> = update_offsets().collect();
        assert_eq!(offsets.len(), 14);
        assert!(offsets.contains(&Vector3::new(1, -1, 0)));
        assert!(offsets.contains(&Vector3::new(0, 1, -1)));
        assert!(!offsets.contains(&Vector3::new(1, 0, 1)));
    }

    #[test]
    fn non_wire_seeds_are_skipped() {
        let world = GridWorld::new();
        let wire = RedstoneWireBlock::default();
        world.place(BlockPos::new(0, 0, 0), CellKind::SolidConductor);

        let stats = RedstoneWireVanilla::new(&world, &wire)
            .propagate(&[BlockPos::new(0, 0, 0), BlockPos::new(5, 5, 5)]);
        assert_eq!(stats, PropagationStats::default());
    }

    #[test]
    fn relaxes_a_short_line() {
        let world = GridWorld::new();
        let wire = RedstoneWireBlock::default();
        world.fill(BlockPos::new(0, 0, 0), BlockPos::new(3, 0, 0), CellKind::SolidConductor);
        world.place(BlockPos::new(-1, 1, 0), CellKind::SignalSource { power: 15 });
        for x in 0..=3 {
            world.place(BlockPos::new(x, 1, 0), CellKind::Wire(WireState::cross(0)));
        }

        let stats = RedstoneWireVanilla::new(&world, &wire).propagate(&[BlockPos::new(0, 1, 0)]);
        assert_eq!(world.wire_power(&BlockPos::new(0, 1, 0)), Some(15));
        assert_eq!(world.wire_power(&BlockPos::new(3, 1, 0)), Some(12));
        assert_eq!(stats.changed.len(), 4);
        assert_eq!(stats.power_writes, 4);
    }
}

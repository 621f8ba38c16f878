use std::collections::BTreeMap;

use dust_util::math::position::BlockPos;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::{
    cell::{CellKind, WireState},
    world::{BlockFlags, RedstoneWorld},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireWrite {
    pub position: BlockPos,
    pub state: WireState,
    pub flags: BlockFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    pub position: BlockPos,
    pub delay: u32,
}

/// A sparse in-memory world. Unset positions are air.
///
/// Records every wire write, scheduled tick and neighbour notification so
/// callers can observe what the engine did.
#[derive(Default)]
pub struct GridWorld {
    cells: RwLock<FxHashMap<BlockPos, CellKind>>,
    writes: Mutex<Vec<WireWrite>>,
    scheduled_ticks: Mutex<Vec<ScheduledTick>>,
    neighbor_updates: Mutex<Vec<(BlockPos, BlockPos)>>,
}

impl GridWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell directly, bypassing the engine.
    pub fn place(&self, position: BlockPos, cell: CellKind) {
        let mut cells = self.cells.write();
        if cell == CellKind::Air {
            cells.remove(&position);
        } else {
            cells.insert(position, cell);
        }
    }

    /// Places `cell` at every position of the inclusive box `from..=to`.
    pub fn fill(&self, from: BlockPos, to: BlockPos, cell: CellKind) {
        let (min, max) = (
            BlockPos::new(from.0.x.min(to.0.x), from.0.y.min(to.0.y), from.0.z.min(to.0.z)),
            BlockPos::new(from.0.x.max(to.0.x), from.0.y.max(to.0.y), from.0.z.max(to.0.z)),
        );
        for x in min.0.x..=max.0.x {
            for y in min.0.y..=max.0.y {
                for z in min.0.z..=max.0.z {
                    self.place(BlockPos::new(x, y, z), cell);
                }
            }
        }
    }

    #[must_use]
    pub fn wire_power(&self, position: &BlockPos) -> Option<u8> {
        self.get_cell(position).as_wire().map(|wire| wire.power())
    }

    /// Power of every wire, ordered by position.
    #[must_use]
    pub fn wire_powers(&self) -> BTreeMap<BlockPos, u8> {
        self.cells
            .read()
            .iter()
            .filter_map(|(pos, cell)| cell.as_wire().map(|wire| (*pos, wire.power())))
            .collect()
    }

    /// Every non-air cell, ordered by position.
    #[must_use]
    pub fn cells(&self) -> BTreeMap<BlockPos, CellKind> {
        self.cells.read().iter().map(|(pos, cell)| (*pos, *cell)).collect()
    }

    #[must_use]
    pub fn wire_positions(&self) -> Vec<BlockPos> {
        self.wire_powers().into_keys().collect()
    }

    #[must_use]
    pub fn writes(&self) -> Vec<WireWrite> {
        self.writes.lock().clone()
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    #[must_use]
    pub fn scheduled_ticks(&self) -> Vec<ScheduledTick> {
        self.scheduled_ticks.lock().clone()
    }

    /// Removes and returns the ticks scheduled so far, leaving the rest of
    /// the history alone.
    pub fn take_scheduled_ticks(&self) -> Vec<ScheduledTick> {
        std::mem::take(&mut *self.scheduled_ticks.lock())
    }

    /// `(notified, source)` pairs, in call order.
    #[must_use]
    pub fn neighbor_updates(&self) -> Vec<(BlockPos, BlockPos)> {
        self.neighbor_updates.lock().clone()
    }

    /// Forgets recorded writes, ticks and notifications; cells are kept.
    pub fn clear_history(&self) {
        self.writes.lock().clear();
        self.scheduled_ticks.lock().clear();
        self.neighbor_updates.lock().clear();
    }
}

/// Copies the cells only; the history of the copy starts empty.
impl Clone for GridWorld {
    fn clone(&self) -> Self {
        Self {
            cells: RwLock::new(self.cells.read().clone()),
            ..Self::default()
        }
    }
}

impl RedstoneWorld for GridWorld {
    fn get_cell(&self, position: &BlockPos) -> CellKind {
        self.cells
            .read()
            .get(position)
            .copied()
            .unwrap_or_default()
    }

    fn set_wire_state(&self, position: &BlockPos, state: WireState, flags: BlockFlags) {
        {
            let mut cells = self.cells.write();
            match cells.get_mut(position) {
                Some(cell) if cell.is_wire() => *cell = CellKind::Wire(state),
                _ => {
                    log::debug!("Ignoring wire write to {position}: cell is not a wire");
                    return;
                }
            }
        }
        self.writes.lock().push(WireWrite {
            position: *position,
            state,
            flags,
        });
    }

    fn place_block(&self, position: &BlockPos, cell: CellKind) {
        self.place(*position, cell);
    }

    fn schedule_future_tick(&self, position: BlockPos, delay: u32) {
        self.scheduled_ticks
            .lock()
            .push(ScheduledTick { position, delay });
    }

    fn update_neighbor(&self, position: &BlockPos, source: &BlockPos) {
        self.neighbor_updates.lock().push((*position, *source));
    }
}

#[cfg(test)]
mod tests {
    use dust_util::math::direction::BlockDirection;

    use super::*;

    #[test]
    fn unset_cells_are_air() {
        let world = GridWorld::new();
        assert_eq!(world.get_cell(&BlockPos::new(1, 2, 3)), CellKind::Air);
        assert!(!world.is_solid_face(&BlockPos::new(1, 2, 3), BlockDirection::Up));
    }

    #[test]
    fn writes_to_non_wires_are_ignored() {
        let world = GridWorld::new();
        let pos = BlockPos::new(0, 0, 0);
        world.place(pos, CellKind::SolidConductor);
        world.set_wire_power(&pos, 7, BlockFlags::NOTIFY_LISTENERS);
        world.set_wire_state(&pos, WireState::cross(3), BlockFlags::NOTIFY_LISTENERS);
        assert_eq!(world.get_cell(&pos), CellKind::SolidConductor);
        assert_eq!(world.write_count(), 0);
    }

    #[test]
    fn wire_writes_are_recorded() {
        let world = GridWorld::new();
        let pos = BlockPos::new(0, 1, 0);
        world.place(pos, CellKind::Wire(WireState::dot(0)));
        world.set_wire_power(&pos, 9, BlockFlags::NOTIFY_LISTENERS);

        assert_eq!(world.wire_power(&pos), Some(9));
        let writes = world.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].state, WireState::dot(9));
        assert_eq!(writes[0].flags, BlockFlags::NOTIFY_LISTENERS);
    }

    #[test]
    fn clone_copies_cells_but_not_history() {
        let world = GridWorld::new();
        world.fill(BlockPos::new(0, 0, 0), BlockPos::new(2, 0, 1), CellKind::SolidConductor);
        world.place(BlockPos::new(0, 1, 0), CellKind::Wire(WireState::dot(0)));
        world.set_wire_power(&BlockPos::new(0, 1, 0), 4, BlockFlags::NOTIFY_LISTENERS);
        world.schedule_future_tick(BlockPos::new(0, 1, 0), 2);

        let copy = world.clone();
        assert_eq!(copy.cells(), world.cells());
        assert_eq!(copy.write_count(), 0);
        assert!(copy.scheduled_ticks().is_empty());
        assert!(copy.is_solid_block(&BlockPos::new(2, 0, 1)));

        world.place(BlockPos::new(0, 1, 0), CellKind::Air);
        assert_eq!(copy.wire_power(&BlockPos::new(0, 1, 0)), Some(4));
    }

    #[test]
    fn taking_ticks_empties_the_schedule() {
        let world = GridWorld::new();
        world.schedule_future_tick(BlockPos::new(1, 1, 1), 2);
        world.update_neighbor(&BlockPos::new(1, 1, 1), &BlockPos::new(0, 1, 1));

        let ticks = world.take_scheduled_ticks();
        assert_eq!(
            ticks,
            vec![ScheduledTick {
                position: BlockPos::new(1, 1, 1),
                delay: 2,
            }]
        );
        assert!(world.scheduled_ticks().is_empty());
        assert_eq!(world.neighbor_updates().len(), 1);
    }
}

use bitflags::bitflags;
use dust_util::math::{direction::BlockDirection, position::BlockPos};

use crate::cell::{CellKind, WireState};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u32 {
        const NOTIFY_NEIGHBORS = 0b000_0000_0001;
        const NOTIFY_LISTENERS = 0b000_0000_0010;
        const NOTIFY_ALL       = 0b000_0000_0011;
    }
}

/// The slice of a world the wire engine needs.
///
/// Every method takes `&self`: implementors keep their cells behind interior
/// mutability, and a write may call back into the engine through
/// [`RedstoneWorld::update_neighbor`].
pub trait RedstoneWorld {
    fn get_cell(&self, position: &BlockPos) -> CellKind;

    /// Replaces the state of the wire at `position`. Implementors ignore the
    /// call when the cell is no longer a wire.
    fn set_wire_state(&self, position: &BlockPos, state: WireState, flags: BlockFlags);

    fn set_wire_power(&self, position: &BlockPos, power: u8, flags: BlockFlags) {
        if let CellKind::Wire(wire) = self.get_cell(position) {
            self.set_wire_state(position, wire.with_power(power), flags);
        } else {
            log::debug!("Skipping power write to {position}: not a wire anymore");
        }
    }

    /// Replaces whatever is at `position` with `cell`.
    fn place_block(&self, position: &BlockPos, cell: CellKind);

    fn remove_block(&self, position: &BlockPos) {
        self.place_block(position, CellKind::Air);
    }

    fn is_solid_face(&self, position: &BlockPos, face: BlockDirection) -> bool {
        self.get_cell(position).is_side_solid(face)
    }

    fn is_solid_block(&self, position: &BlockPos) -> bool {
        self.get_cell(position).is_solid_block()
    }

    fn schedule_future_tick(&self, position: BlockPos, delay: u32);

    /// Tells the block at `position` that the block at `source` changed.
    fn update_neighbor(&self, _position: &BlockPos, _source: &BlockPos) {}
}

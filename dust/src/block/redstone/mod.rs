/**
 * Signal queries shared by the wire and every block that reads redstone power.
 *
 * Directions follow one convention throughout: `direction` points from the
 * block receiving the signal toward the block emitting it.
 */
use dust_util::math::{direction::BlockDirection, position::BlockPos};
use dust_world::{CellKind, MAX_POWER, RedstoneWorld};
use rustc_hash::FxHashSet;

use self::redstone_wire::RedstoneWireBlock;

pub mod redstone_wire;
pub mod shape;
pub mod turbo;
pub mod vanilla;

/// What one stimulus did to the world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Wires whose power rule was evaluated.
    pub evaluated: usize,
    pub power_writes: usize,
    pub connection_writes: usize,
    pub removed_wires: usize,
    /// Wires whose power was written, in first-write order.
    pub changed: Vec<BlockPos>,
    changed_set: FxHashSet<BlockPos>,
}

impl PropagationStats {
    pub(crate) fn record_power_write(&mut self, pos: BlockPos) {
        self.power_writes += 1;
        if self.changed_set.insert(pos) {
            self.changed.push(pos);
        }
    }

    pub(crate) fn merge(&mut self, other: Self) {
        self.evaluated += other.evaluated;
        self.power_writes += other.power_writes;
        self.connection_writes += other.connection_writes;
        self.removed_wires += other.removed_wires;
        for pos in other.changed {
            if self.changed_set.insert(pos) {
                self.changed.push(pos);
            }
        }
    }
}

/// Weak power the block at `pos` emits toward the neighbour it is seen from.
pub fn get_weak_power(
    world: &dyn RedstoneWorld,
    wire: &RedstoneWireBlock,
    pos: &BlockPos,
    direction: BlockDirection,
) -> u8 {
    match world.get_cell(pos) {
        CellKind::Wire(state) => wire.get_weak_redstone_power(&state, direction),
        CellKind::SignalSource { power } => power.min(MAX_POWER),
        CellKind::DirectionalSignalSource { facing, power } => {
            if facing == direction.opposite() {
                power.min(MAX_POWER)
            } else {
                0
            }
        }
        CellKind::SignalMirror { facing, power } => {
            if facing == direction.opposite() {
                power.min(MAX_POWER)
            } else {
                0
            }
        }
        CellKind::Air | CellKind::SolidConductor => 0,
    }
}

/// Strong power the block at `pos` pushes into the neighbour it is seen from.
pub fn get_strong_power(
    world: &dyn RedstoneWorld,
    wire: &RedstoneWireBlock,
    pos: &BlockPos,
    direction: BlockDirection,
) -> u8 {
    match world.get_cell(pos) {
        CellKind::Wire(state) => wire.get_strong_redstone_power(&state, direction),
        CellKind::DirectionalSignalSource { facing, power } if facing == direction.opposite() => {
            power.min(MAX_POWER)
        }
        _ => 0,
    }
}

/// Signal reaching a neighbour from the block at `pos`. A solid block passes
/// on the strongest strong power entering it.
pub fn get_redstone_power(
    world: &dyn RedstoneWorld,
    wire: &RedstoneWireBlock,
    pos: &BlockPos,
    direction: BlockDirection,
) -> u8 {
    if world.is_solid_block(pos) {
        return get_max_strong_power(world, wire, pos).max(get_weak_power(world, wire, pos, direction));
    }
    get_weak_power(world, wire, pos, direction)
}

fn get_max_strong_power(world: &dyn RedstoneWorld, wire: &RedstoneWireBlock, pos: &BlockPos) -> u8 {
    let mut max_power = 0;
    for side in BlockDirection::all() {
        max_power = max_power.max(get_strong_power(world, wire, &pos.offset_dir(side), side));
        if max_power >= MAX_POWER {
            break;
        }
    }
    max_power
}

/// Strongest signal arriving at `pos` from any of its six neighbours.
pub fn get_received_redstone_power(
    world: &dyn RedstoneWorld,
    wire: &RedstoneWireBlock,
    pos: &BlockPos,
) -> u8 {
    let mut max_power = 0;
    for side in BlockDirection::all() {
        max_power = max_power.max(get_redstone_power(world, wire, &pos.offset_dir(side), side));
        if max_power >= MAX_POWER {
            break;
        }
    }
    max_power
}

/// What a mirror facing `facing` at `pos` reads from the block behind it
/// right now. The mirror only emits it after its next device tick.
pub fn mirror_input_strength(
    world: &dyn RedstoneWorld,
    wire: &RedstoneWireBlock,
    pos: &BlockPos,
    facing: BlockDirection,
) -> u8 {
    let back = facing.opposite();
    get_redstone_power(world, wire, &pos.offset_dir(back), back)
}

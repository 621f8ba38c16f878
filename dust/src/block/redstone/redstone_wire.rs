use std::cell::Cell;

use dust_util::math::{direction::BlockDirection, position::BlockPos};
use dust_world::{CellKind, ConnectionSide, MAX_POWER, RedstoneWorld, WireState};

use super::get_received_redstone_power;

/// Behaviour of a redstone wire cell.
///
/// Holds the "wires emit signal" flag that is lowered while a wire measures
/// the power reaching it from everything that is not a wire.
pub struct RedstoneWireBlock {
    should_signal: Cell<bool>,
}

impl Default for RedstoneWireBlock {
    fn default() -> Self {
        Self {
            should_signal: Cell::new(true),
        }
    }
}

/// Restores the previous signal flag when dropped.
#[must_use = "the flag is restored as soon as the suppression is dropped"]
pub struct SignalSuppression<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl Drop for SignalSuppression<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

impl RedstoneWireBlock {
    #[must_use]
    pub fn emits_signal(&self) -> bool {
        self.should_signal.get()
    }

    /// Silences every wire until the returned value is dropped. Nests.
    pub fn suppress_signal(&self) -> SignalSuppression<'_> {
        let previous = self.should_signal.replace(false);
        SignalSuppression {
            flag: &self.should_signal,
            previous,
        }
    }

    pub fn get_weak_redstone_power(&self, wire: &WireState, direction: BlockDirection) -> u8 {
        if !self.emits_signal() || wire.power() == 0 {
            return 0;
        }
        if direction == BlockDirection::Up || wire.is_side_connected(direction.opposite()) {
            wire.power()
        } else {
            0
        }
    }

    /// A wire strongly powers whatever it weakly powers.
    pub fn get_strong_redstone_power(&self, wire: &WireState, direction: BlockDirection) -> u8 {
        self.get_weak_redstone_power(wire, direction)
    }

    /// Power reaching `pos` from every neighbour that is not a wire.
    pub fn external_power(&self, world: &dyn RedstoneWorld, pos: &BlockPos) -> u8 {
        let _suppressed = self.suppress_signal();
        get_received_redstone_power(world, self, pos)
    }

    /// The power the wire at `pos` should carry given its surroundings.
    pub fn calculate_power(&self, world: &dyn RedstoneWorld, pos: &BlockPos) -> u8 {
        let block_power = self.external_power(world, pos);
        if block_power >= MAX_POWER {
            return MAX_POWER;
        }
        let Some(wire) = world.get_cell(pos).as_wire() else {
            return block_power;
        };

        let wire_power = wire_inputs(world, pos, &wire)
            .map(|input| world.get_cell(&input).wire_power())
            .max()
            .unwrap_or(0);
        block_power.max(wire_power.saturating_sub(1))
    }
}

/// Wires need a solid top face below them.
pub fn can_place_at(world: &dyn RedstoneWorld, pos: &BlockPos) -> bool {
    world.is_solid_face(&pos.down(), BlockDirection::Up)
}

fn can_connect_to(cell: &CellKind, side: BlockDirection) -> bool {
    match cell {
        CellKind::Wire(_) | CellKind::SignalSource { .. } => true,
        CellKind::DirectionalSignalSource { facing, .. } | CellKind::SignalMirror { facing, .. } => {
            facing.axis() == side.axis()
        }
        CellKind::Air | CellKind::SolidConductor => false,
    }
}

/// How the wire at `pos` attaches toward `side`, ignoring its current state.
pub fn resolve_side(world: &dyn RedstoneWorld, pos: &BlockPos, side: BlockDirection) -> ConnectionSide {
    let neighbor_pos = pos.offset_dir(side);
    let up_clear = !world.is_solid_face(&pos.up(), BlockDirection::Down);

    if up_clear
        && world.is_solid_face(&neighbor_pos, BlockDirection::Up)
        && world.get_cell(&neighbor_pos.up()).is_wire()
    {
        return if world.is_solid_face(&neighbor_pos, side.opposite()) {
            ConnectionSide::Up
        } else {
            ConnectionSide::Side
        };
    }

    let neighbor = world.get_cell(&neighbor_pos);
    if can_connect_to(&neighbor, side)
        || (!neighbor.is_solid_block() && world.get_cell(&neighbor_pos.down()).is_wire())
    {
        ConnectionSide::Side
    } else {
        ConnectionSide::None
    }
}

fn get_all_sides(mut wire: WireState, world: &dyn RedstoneWorld, pos: &BlockPos) -> WireState {
    for side in BlockDirection::horizontal() {
        wire.set_side(side, resolve_side(world, pos, side));
    }
    wire
}

/// Resolves every side of `wire` and keeps its dot or line shape.
///
/// A dot that is still isolated stays a dot; otherwise a side that is
/// unconnected while its whole perpendicular axis is unconnected is
/// extended, so one arm becomes a line and no arms become a cross.
pub fn regulated_connections(wire: WireState, world: &dyn RedstoneWorld, pos: &BlockPos) -> WireState {
    let mut state = get_all_sides(wire, world, pos);
    if wire.is_dot() && state.is_dot() {
        return state;
    }

    let resolved = state;
    for side in BlockDirection::horizontal() {
        let perpendicular = side.rotate_clockwise();
        if resolved.side(side).is_none()
            && resolved.side(perpendicular).is_none()
            && resolved.side(perpendicular.opposite()).is_none()
        {
            state.set_side(side, ConnectionSide::Side);
        }
    }
    state
}

/// State of a freshly placed, unpowered wire.
pub fn placement_state(world: &dyn RedstoneWorld, pos: &BlockPos) -> WireState {
    regulated_connections(WireState::cross(0), world, pos)
}

/// The state a player toggle turns `wire` into, if it changes anything.
///
/// Only dots and crosses toggle.
pub fn toggled_state(wire: WireState, world: &dyn RedstoneWorld, pos: &BlockPos) -> Option<WireState> {
    if !wire.is_cross() && !wire.is_dot() {
        return None;
    }
    let flipped = if wire.is_cross() {
        WireState::dot(wire.power())
    } else {
        WireState::cross(wire.power())
    };
    let regulated = regulated_connections(flipped, world, pos);
    (regulated != wire).then_some(regulated)
}

/// The wire the wire at `pos` reads through its `side` connection toward `direction`.
pub fn wire_input(
    world: &dyn RedstoneWorld,
    pos: &BlockPos,
    direction: BlockDirection,
    side: ConnectionSide,
) -> Option<BlockPos> {
    let neighbor_pos = pos.offset_dir(direction);
    let candidate = match side {
        ConnectionSide::None => return None,
        ConnectionSide::Up => neighbor_pos.up(),
        ConnectionSide::Side => {
            let neighbor = world.get_cell(&neighbor_pos);
            if neighbor.is_wire() {
                return Some(neighbor_pos);
            }
            if neighbor.is_solid_block() {
                return None;
            }
            neighbor_pos.down()
        }
    };
    world.get_cell(&candidate).is_wire().then_some(candidate)
}

/// Every wire the wire at `pos` reads its power from.
pub fn wire_inputs<'a>(
    world: &'a dyn RedstoneWorld,
    pos: &'a BlockPos,
    wire: &'a WireState,
) -> impl Iterator<Item = BlockPos> + 'a {
    BlockDirection::horizontal()
        .into_iter()
        .filter_map(move |direction| wire_input(world, pos, direction, wire.side(direction)))
}

/// Every wire that reads its power from the wire at `pos`.
///
/// `wire_at` supplies wire states, so connections that are not written to
/// the world yet can be taken into account.
pub fn wire_readers(
    world: &dyn RedstoneWorld,
    pos: &BlockPos,
    wire_at: impl Fn(&BlockPos) -> Option<WireState>,
) -> Vec<BlockPos> {
    let mut readers = Vec::new();
    for direction in BlockDirection::horizontal() {
        let beside = pos.offset_dir(direction);
        for candidate in [beside, beside.up(), beside.down()] {
            let Some(reader) = wire_at(&candidate) else {
                continue;
            };
            let back = direction.opposite();
            if wire_input(world, &candidate, back, reader.side(back)) == Some(*pos) {
                readers.push(candidate);
            }
        }
    }
    readers
}

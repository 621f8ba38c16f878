use dust_config::{RedstoneConfig, RedstoneImplementation};
use dust_util::math::{direction::BlockDirection, position::BlockPos};
use dust_world::{BlockFlags, CellKind, RedstoneWorld, WireState};
use rustc_hash::FxHashSet;

use crate::block::redstone::{
    PropagationStats, get_strong_power, get_weak_power, mirror_input_strength,
    redstone_wire::{
        RedstoneWireBlock, can_place_at, placement_state, regulated_connections, toggled_state,
    },
    turbo::RedstoneWireTurbo,
    vanilla::RedstoneWireVanilla,
};

/// Radius, in Manhattan distance, of the cells whose wires a stimulus can
/// affect directly.
const STIMULUS_RADIUS: i32 = 2;

/// Something changed at a position; the new state is read from the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StimulusEvent {
    CellChanged(BlockPos),
    CellPlaced(BlockPos),
    CellRemoved(BlockPos),
}

impl StimulusEvent {
    #[must_use]
    pub fn position(&self) -> BlockPos {
        match self {
            Self::CellChanged(pos) | Self::CellPlaced(pos) | Self::CellRemoved(pos) => *pos,
        }
    }
}

/// Positions visited once each, in insertion order.
#[derive(Default)]
struct Region {
    positions: Vec<BlockPos>,
    seen: FxHashSet<BlockPos>,
}

impl Region {
    fn extend(&mut self, center: BlockPos) {
        for pos in center.manhattan_neighborhood(STIMULUS_RADIUS) {
            self.insert(pos);
        }
    }

    fn insert(&mut self, pos: BlockPos) -> bool {
        let fresh = self.seen.insert(pos);
        if fresh {
            self.positions.push(pos);
        }
        fresh
    }
}

/// Entry point for everything that changes wire power.
pub struct RedstoneEngine {
    config: RedstoneConfig,
    wire: RedstoneWireBlock,
}

impl RedstoneEngine {
    #[must_use]
    pub fn new(config: RedstoneConfig) -> Self {
        Self {
            config,
            wire: RedstoneWireBlock::default(),
        }
    }

    /// Propagates a stimulus with the configured algorithm.
    pub fn handle(&self, world: &dyn RedstoneWorld, event: StimulusEvent) -> PropagationStats {
        self.dispatch(world, event, self.config.implementation)
    }

    /// Propagates a change at `pos` with worklist relaxation.
    pub fn on_stimulus(&self, world: &dyn RedstoneWorld, pos: BlockPos) -> PropagationStats {
        self.dispatch(
            world,
            StimulusEvent::CellChanged(pos),
            RedstoneImplementation::Vanilla,
        )
    }

    /// Propagates a change at `pos` over the whole network at once.
    pub fn on_stimulus_turbo(&self, world: &dyn RedstoneWorld, pos: BlockPos) -> PropagationStats {
        self.dispatch(
            world,
            StimulusEvent::CellChanged(pos),
            RedstoneImplementation::Eigencraft,
        )
    }

    /// Places an unpowered wire at `pos`, or returns `None` when it has no floor.
    pub fn place_wire(&self, world: &dyn RedstoneWorld, pos: BlockPos) -> Option<PropagationStats> {
        if !can_place_at(world, &pos) {
            log::debug!("Cannot place wire at {pos}: no solid floor");
            return None;
        }
        world.place_block(&pos, CellKind::Wire(placement_state(world, &pos)));
        Some(self.handle(world, StimulusEvent::CellPlaced(pos)))
    }

    /// Replaces the cell at `pos`. Wires are placed unpowered with their
    /// connections resolved.
    pub fn place_block(&self, world: &dyn RedstoneWorld, pos: BlockPos, cell: CellKind) -> PropagationStats {
        let was_air = world.get_cell(&pos) == CellKind::Air;
        let cell = if cell.is_wire() {
            CellKind::Wire(placement_state(world, &pos))
        } else {
            cell
        };
        world.place_block(&pos, cell);
        let event = if was_air {
            StimulusEvent::CellPlaced(pos)
        } else {
            StimulusEvent::CellChanged(pos)
        };
        self.handle(world, event)
    }

    pub fn remove_block(&self, world: &dyn RedstoneWorld, pos: BlockPos) -> PropagationStats {
        world.remove_block(&pos);
        self.handle(world, StimulusEvent::CellRemoved(pos))
    }

    /// Toggles a wire between dot and cross. Returns whether anything changed.
    pub fn toggle_shape(&self, world: &dyn RedstoneWorld, pos: BlockPos) -> bool {
        let Some(wire) = world.get_cell(&pos).as_wire() else {
            return false;
        };
        let Some(toggled) = toggled_state(wire, world, &pos) else {
            return false;
        };
        world.set_wire_state(&pos, toggled, BlockFlags::NOTIFY_ALL);
        self.handle(world, StimulusEvent::CellChanged(pos));
        true
    }

    /// Weak signal the cell at `pos` emits toward a receiver lying opposite
    /// to `direction`.
    pub fn query_signal(&self, world: &dyn RedstoneWorld, pos: &BlockPos, direction: BlockDirection) -> u8 {
        get_weak_power(world, &self.wire, pos, direction)
    }

    pub fn query_direct_signal(
        &self,
        world: &dyn RedstoneWorld,
        pos: &BlockPos,
        direction: BlockDirection,
    ) -> u8 {
        get_strong_power(world, &self.wire, pos, direction)
    }

    /// The power the wire at `pos` should carry right now.
    pub fn compute_power(&self, world: &dyn RedstoneWorld, pos: &BlockPos) -> u8 {
        self.wire.calculate_power(world, pos)
    }

    /// Runs a device tick at `pos`. A mirror whose input differs from its
    /// stored output takes the new value and stimulates what it faces.
    pub fn on_device_tick(&self, world: &dyn RedstoneWorld, pos: BlockPos) -> PropagationStats {
        let CellKind::SignalMirror { facing, power } = world.get_cell(&pos) else {
            return PropagationStats::default();
        };
        let input = mirror_input_strength(world, &self.wire, &pos, facing);
        if input == power {
            return PropagationStats::default();
        }
        log::trace!("Mirror at {pos}: {power} -> {input}");
        world.place_block(&pos, CellKind::SignalMirror { facing, power: input });
        self.handle(world, StimulusEvent::CellChanged(pos))
    }

    fn dispatch(
        &self,
        world: &dyn RedstoneWorld,
        event: StimulusEvent,
        implementation: RedstoneImplementation,
    ) -> PropagationStats {
        let origin = event.position();
        let mut stats = PropagationStats::default();
        let mut region = Region::default();
        region.extend(origin);

        let removed = if self.config.break_unsupported_wire {
            self.remove_unsupported_wires(world, &mut region)
        } else {
            Vec::new()
        };
        stats.removed_wires = removed.len();

        let regulated = regulate_connections(world, &region);
        let reshaped: Vec<BlockPos> = regulated.iter().map(|(pos, _)| *pos).collect();
        let seeds: Vec<BlockPos> = region
            .positions
            .iter()
            .copied()
            .filter(|pos| world.get_cell(pos).is_wire())
            .collect();
        let propagated = match implementation {
            RedstoneImplementation::Vanilla => {
                for (pos, state) in &regulated {
                    world.set_wire_state(pos, *state, BlockFlags::NOTIFY_LISTENERS);
                }
                stats.connection_writes = regulated.len();
                RedstoneWireVanilla::new(world, &self.wire).propagate(&seeds)
            }
            RedstoneImplementation::Eigencraft => RedstoneWireTurbo::new(world, &self.wire)
                .with_pending(regulated.into_iter().collect())
                .propagate(&seeds),
        };
        stats.merge(propagated);

        let changed = stats.changed.iter().chain(&reshaped).chain(&removed);
        self.notify_devices(world, changed.chain(std::iter::once(&origin)));
        self.schedule_mirror(world, origin);
        log::debug!(
            "{event:?} ({implementation:?}): {} seeds, {} evaluated, {} power writes, {} connection writes, {} removed",
            seeds.len(),
            stats.evaluated,
            stats.power_writes,
            stats.connection_writes,
            stats.removed_wires
        );
        stats
    }

    fn remove_unsupported_wires(
        &self,
        world: &dyn RedstoneWorld,
        region: &mut Region,
    ) -> Vec<BlockPos> {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < region.positions.len() {
            let pos = region.positions[index];
            index += 1;
            if world.get_cell(&pos).is_wire() && !can_place_at(world, &pos) {
                log::debug!("Removing unsupported wire at {pos}");
                world.remove_block(&pos);
                removed.push(pos);
                region.extend(pos);
            }
        }
        removed
    }

    /// A mirror that was placed or changed reads its input on its next tick.
    fn schedule_mirror(&self, world: &dyn RedstoneWorld, pos: BlockPos) {
        if let CellKind::SignalMirror { facing, power } = world.get_cell(&pos)
            && mirror_input_strength(world, &self.wire, &pos, facing) != power
        {
            world.schedule_future_tick(pos, self.config.device_tick_delay);
        }
    }

    /// Tells the devices around changed cells, and around the blocks those
    /// cells power, that their input may have changed.
    fn notify_devices<'a>(
        &self,
        world: &dyn RedstoneWorld,
        changed: impl Iterator<Item = &'a BlockPos>,
    ) {
        let mut notified = FxHashSet::default();
        for changed_pos in changed {
            for direction in BlockDirection::all() {
                let neighbor_pos = changed_pos.offset_dir(direction);
                let neighbor = world.get_cell(&neighbor_pos);
                if neighbor.is_wire() || neighbor == CellKind::Air {
                    continue;
                }
                self.notify(world, &neighbor_pos, changed_pos, &mut notified);

                if neighbor.is_solid_block() {
                    for side in BlockDirection::all() {
                        let device_pos = neighbor_pos.offset_dir(side);
                        let device = world.get_cell(&device_pos);
                        if device_pos == *changed_pos || device.is_wire() || device == CellKind::Air {
                            continue;
                        }
                        self.notify(world, &device_pos, &neighbor_pos, &mut notified);
                    }
                }
            }
        }
    }

    fn notify(
        &self,
        world: &dyn RedstoneWorld,
        pos: &BlockPos,
        source: &BlockPos,
        notified: &mut FxHashSet<(BlockPos, BlockPos)>,
    ) {
        if !notified.insert((*pos, *source)) {
            return;
        }
        world.update_neighbor(pos, source);

        let reads_source = world
            .get_cell(pos)
            .facing()
            .is_some_and(|facing| pos.offset_dir(facing.opposite()) == *source);
        if reads_source {
            world.schedule_future_tick(*pos, self.config.device_tick_delay);
        }
    }
}

/// Wires of the region whose regulated connections differ from the stored
/// ones, in region order. Power is kept.
fn regulate_connections(world: &dyn RedstoneWorld, region: &Region) -> Vec<(BlockPos, WireState)> {
    region
        .positions
        .iter()
        .filter_map(|pos| {
            let wire = world.get_cell(pos).as_wire()?;
            let regulated = regulated_connections(wire, world, pos);
            (regulated != wire).then_some((*pos, regulated))
        })
        .collect()
}

impl Default for RedstoneEngine {
    fn default() -> Self {
        Self::new(RedstoneConfig::default())
    }
}

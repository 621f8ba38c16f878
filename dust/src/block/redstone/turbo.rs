use std::collections::VecDeque;

use dust_util::math::position::BlockPos;
use dust_world::{BlockFlags, MAX_POWER, RedstoneWorld, WireState};
use rustc_hash::FxHashMap;

use super::{
    PropagationStats,
    redstone_wire::{RedstoneWireBlock, wire_inputs, wire_readers},
};

struct WireNode {
    pos: BlockPos,
    /// State as stored in the world.
    stored: WireState,
    /// State to write back; differs from `stored` in connections only.
    state: WireState,
    /// Power reaching the wire from everything that is not a wire.
    external: u8,
    inputs: Vec<usize>,
    readers: Vec<usize>,
    resolved: Option<u8>,
}

/// Breadth-first propagation over a whole wire network.
///
/// The network around the seeds is collected first, then powers are settled
/// from the strongest level down, so every wire is written at most once,
/// connections included.
pub struct RedstoneWireTurbo<'a> {
    world: &'a dyn RedstoneWorld,
    wire: &'a RedstoneWireBlock,
    pending: FxHashMap<BlockPos, WireState>,
    nodes: Vec<WireNode>,
    node_ids: FxHashMap<BlockPos, usize>,
}

impl<'a> RedstoneWireTurbo<'a> {
    pub fn new(world: &'a dyn RedstoneWorld, wire: &'a RedstoneWireBlock) -> Self {
        Self {
            world,
            wire,
            pending: FxHashMap::default(),
            nodes: Vec::new(),
            node_ids: FxHashMap::default(),
        }
    }

    /// Connection states computed but not yet written. They are read in
    /// place of the stored state and written together with the new power.
    #[must_use]
    pub fn with_pending(mut self, pending: FxHashMap<BlockPos, WireState>) -> Self {
        self.pending = pending;
        self
    }

    fn pending_or(&self, pos: &BlockPos, stored: WireState) -> WireState {
        self.pending
            .get(pos)
            .map_or(stored, |pending| pending.with_power(stored.power()))
    }

    fn wire_at(&self, pos: &BlockPos) -> Option<WireState> {
        let stored = self.world.get_cell(pos).as_wire()?;
        Some(self.pending_or(pos, stored))
    }

    fn node_id(&mut self, pos: BlockPos, frontier: &mut VecDeque<usize>) -> Option<usize> {
        if let Some(id) = self.node_ids.get(&pos) {
            return Some(*id);
        }
        let stored = self.world.get_cell(&pos).as_wire()?;
        let state = self.pending_or(&pos, stored);
        let id = self.nodes.len();
        self.nodes.push(WireNode {
            pos,
            stored,
            state,
            external: self.wire.external_power(self.world, &pos),
            inputs: Vec::new(),
            readers: Vec::new(),
            resolved: None,
        });
        self.node_ids.insert(pos, id);
        frontier.push_back(id);
        Some(id)
    }

    /// Collects every wire linked to the seeds, following reads both ways.
    fn discover(&mut self, seeds: &[BlockPos]) {
        let mut frontier = VecDeque::new();
        for seed in seeds {
            self.node_id(*seed, &mut frontier);
        }

        while let Some(id) = frontier.pop_front() {
            let pos = self.nodes[id].pos;
            let state = self.nodes[id].state;
            let inputs: Vec<BlockPos> = wire_inputs(self.world, &pos, &state).collect();
            for input in inputs {
                if let Some(input_id) = self.node_id(input, &mut frontier) {
                    self.nodes[id].inputs.push(input_id);
                }
            }
            let readers = wire_readers(self.world, &pos, |at| self.wire_at(at));
            for reader in readers {
                self.node_id(reader, &mut frontier);
            }
        }

        for id in 0..self.nodes.len() {
            for input in self.nodes[id].inputs.clone() {
                self.nodes[input].readers.push(id);
            }
        }
    }

    /// Settles powers level by level; returns the wires in the order they
    /// were settled.
    fn resolve(&mut self) -> Vec<usize> {
        let mut levels: [Vec<usize>; MAX_POWER as usize + 1] = Default::default();
        for (id, node) in self.nodes.iter().enumerate() {
            if node.external > 0 {
                levels[node.external as usize].push(id);
            }
        }

        let mut order = Vec::with_capacity(self.nodes.len());
        for level in (1..=MAX_POWER).rev() {
            while let Some(id) = levels[level as usize].pop() {
                if self.nodes[id].resolved.is_some() {
                    continue;
                }
                self.nodes[id].resolved = Some(level);
                order.push(id);
                if level > 1 {
                    for reader in &self.nodes[id].readers {
                        if self.nodes[*reader].resolved.is_none() {
                            levels[level as usize - 1].push(*reader);
                        }
                    }
                }
            }
        }
        order
    }

    pub fn propagate(mut self, seeds: &[BlockPos]) -> PropagationStats {
        let mut seeds = seeds.to_vec();
        seeds.extend(self.pending.keys().copied());
        self.discover(&seeds);
        let order = self.resolve();

        let mut stats = PropagationStats {
            evaluated: self.nodes.len(),
            ..PropagationStats::default()
        };
        let unresolved = (0..self.nodes.len()).filter(|id| self.nodes[*id].resolved.is_none());
        let write_order: Vec<usize> = order.iter().copied().chain(unresolved).collect();

        for id in write_order {
            let node = &self.nodes[id];
            let power = node.resolved.unwrap_or(0);
            log::trace!("Wire at {}: {} -> {power}", node.pos, node.stored.power());
            let state = node.state.with_power(power);
            if state == node.stored {
                continue;
            }
            self.world
                .set_wire_state(&node.pos, state, BlockFlags::NOTIFY_LISTENERS);
            if state.connections != node.stored.connections {
                stats.connection_writes += 1;
            }
            if power != node.stored.power() {
                stats.record_power_write(node.pos);
            }
        }
        stats
    }
}

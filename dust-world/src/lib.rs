pub mod cell;
pub mod grid;
pub mod world;

pub use cell::{CellKind, ConnectionSide, WireState};
pub use grid::GridWorld;
pub use world::{BlockFlags, RedstoneWorld};

/// Highest power level a wire or source can carry.
pub const MAX_POWER: u8 = 15;

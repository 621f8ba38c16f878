use dust_util::math::direction::BlockDirection;

use crate::MAX_POWER;

/// How a wire attaches to one horizontal neighbour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionSide {
    Up,
    Side,
    #[default]
    None,
}

impl ConnectionSide {
    #[must_use]
    pub fn is_connected(self) -> bool {
        self != Self::None
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

/// Mutable state of a wire cell.
///
/// `connections` is indexed like [`BlockDirection::horizontal`]: north, east,
/// south, west.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WireState {
    power: u8,
    pub connections: [ConnectionSide; 4],
}

impl WireState {
    #[must_use]
    pub fn new(power: u8, connections: [ConnectionSide; 4]) -> Self {
        Self {
            power: power.min(MAX_POWER),
            connections,
        }
    }

    /// A wire with every side connected at floor level.
    #[must_use]
    pub fn cross(power: u8) -> Self {
        Self::new(power, [ConnectionSide::Side; 4])
    }

    #[must_use]
    pub fn dot(power: u8) -> Self {
        Self::new(power, [ConnectionSide::None; 4])
    }

    #[must_use]
    pub fn power(&self) -> u8 {
        self.power
    }

    /// Power is clamped to `0..=15`.
    pub fn set_power(&mut self, power: u8) {
        self.power = power.min(MAX_POWER);
    }

    #[must_use]
    pub fn with_power(mut self, power: u8) -> Self {
        self.set_power(power);
        self
    }

    /// Connection toward `direction`; vertical directions are never connected.
    #[must_use]
    pub fn side(&self, direction: BlockDirection) -> ConnectionSide {
        direction
            .horizontal_index()
            .map_or(ConnectionSide::None, |i| self.connections[i])
    }

    pub fn set_side(&mut self, direction: BlockDirection, side: ConnectionSide) {
        if let Some(i) = direction.horizontal_index() {
            self.connections[i] = side;
        }
    }

    #[must_use]
    pub fn is_side_connected(&self, direction: BlockDirection) -> bool {
        self.side(direction).is_connected()
    }

    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.connections.iter().all(|side| side.is_none())
    }

    #[must_use]
    pub fn is_cross(&self) -> bool {
        self.connections.iter().all(|side| side.is_connected())
    }
}

/// Everything the engine distinguishes about a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Air, or any block that neither conducts nor emits.
    #[default]
    Air,
    Wire(WireState),
    /// A full block: every face is solid and it carries strong power.
    SolidConductor,
    /// Weak power toward every side, like a lever or a block of redstone.
    SignalSource { power: u8 },
    /// Weak and strong power toward `facing` only, like a repeater.
    DirectionalSignalSource { facing: BlockDirection, power: u8 },
    /// Re-emits toward `facing` what it last read from behind, like a
    /// comparator reading a container-less input. `power` is the stored
    /// output; it follows the input on the mirror's device tick.
    SignalMirror { facing: BlockDirection, power: u8 },
}

impl CellKind {
    #[must_use]
    pub fn is_wire(&self) -> bool {
        matches!(self, Self::Wire(_))
    }

    #[must_use]
    pub fn as_wire(&self) -> Option<WireState> {
        match self {
            Self::Wire(wire) => Some(*wire),
            _ => None,
        }
    }

    /// Wire power, or 0 for anything that is not a wire.
    #[must_use]
    pub fn wire_power(&self) -> u8 {
        self.as_wire().map_or(0, |wire| wire.power())
    }

    /// Whether the block is a full, signal-blocking cube.
    #[must_use]
    pub fn is_solid_block(&self) -> bool {
        matches!(self, Self::SolidConductor)
    }

    #[must_use]
    pub fn is_side_solid(&self, _face: BlockDirection) -> bool {
        self.is_solid_block()
    }

    /// The direction a device emits toward, if it is directional.
    #[must_use]
    pub fn facing(&self) -> Option<BlockDirection> {
        match self {
            Self::DirectionalSignalSource { facing, .. } | Self::SignalMirror { facing, .. } => {
                Some(*facing)
            }
            _ => None,
        }
    }
}

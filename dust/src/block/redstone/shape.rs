use std::sync::LazyLock;

use dust_util::math::direction::BlockDirection;
use dust_world::{ConnectionSide, WireState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StraightAxis {
    NorthSouth,
    EastWest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerKind {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

/// Canonical look of a wire, derived from its four connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireShape {
    Dot,
    Cross,
    Straight(StraightAxis),
    Corner(CornerKind),
    /// Three arms; holds the unconnected direction.
    Tee(BlockDirection),
}

const SHAPE_COUNT: usize = 81;

static SHAPES: LazyLock<[WireShape; SHAPE_COUNT]> = LazyLock::new(|| {
    let mut shapes = [WireShape::Dot; SHAPE_COUNT];
    for (index, shape) in shapes.iter_mut().enumerate() {
        let mut code = index;
        let mut connected = [false; 4];
        for arm in &mut connected {
            *arm = code % 3 != 0;
            code /= 3;
        }
        *shape = classify(connected);
    }
    shapes
});

fn side_code(side: ConnectionSide) -> usize {
    match side {
        ConnectionSide::None => 0,
        ConnectionSide::Side => 1,
        ConnectionSide::Up => 2,
    }
}

fn table_index(connections: &[ConnectionSide; 4]) -> usize {
    connections
        .iter()
        .rev()
        .fold(0, |index, side| index * 3 + side_code(*side))
}

/// `connected` is ordered north, east, south, west.
fn classify(connected: [bool; 4]) -> WireShape {
    let [north, east, south, west] = connected;
    match connected.iter().filter(|arm| **arm).count() {
        0 => WireShape::Dot,
        4 => WireShape::Cross,
        3 => {
            let missing = BlockDirection::horizontal()
                .into_iter()
                .zip(connected)
                .find_map(|(direction, arm)| (!arm).then_some(direction))
                .unwrap_or(BlockDirection::North);
            WireShape::Tee(missing)
        }
        1 if north || south => WireShape::Straight(StraightAxis::NorthSouth),
        1 => WireShape::Straight(StraightAxis::EastWest),
        _ if north && south => WireShape::Straight(StraightAxis::NorthSouth),
        _ if east && west => WireShape::Straight(StraightAxis::EastWest),
        _ if north && east => WireShape::Corner(CornerKind::NorthEast),
        _ if south && east => WireShape::Corner(CornerKind::SouthEast),
        _ if south && west => WireShape::Corner(CornerKind::SouthWest),
        _ => WireShape::Corner(CornerKind::NorthWest),
    }
}

#[must_use]
pub fn shape_of(connections: &[ConnectionSide; 4]) -> WireShape {
    SHAPES[table_index(connections)]
}

impl WireShape {
    #[must_use]
    pub fn of(wire: &WireState) -> Self {
        shape_of(&wire.connections)
    }
}

use super::vector3::Vector3;

/// One of the six axis-aligned faces of a block.
///
/// North is `-z`, east is `+x` and up is `+y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockDirection {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl BlockDirection {
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Down,
            Self::Up,
            Self::North,
            Self::South,
            Self::West,
            Self::East,
        ]
    }

    /// The horizontal plane, clockwise starting at north.
    #[must_use]
    pub const fn horizontal() -> [Self; 4] {
        [Self::North, Self::East, Self::South, Self::West]
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    #[must_use]
    pub const fn to_offset(self) -> Vector3<i32> {
        match self {
            Self::Down => Vector3::new(0, -1, 0),
            Self::Up => Vector3::new(0, 1, 0),
            Self::North => Vector3::new(0, 0, -1),
            Self::South => Vector3::new(0, 0, 1),
            Self::West => Vector3::new(-1, 0, 0),
            Self::East => Vector3::new(1, 0, 0),
        }
    }

    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Down | Self::Up => Axis::Y,
            Self::North | Self::South => Axis::Z,
            Self::West | Self::East => Axis::X,
        }
    }

    /// Next horizontal direction clockwise seen from above. Vertical
    /// directions are returned unchanged.
    #[must_use]
    pub const fn rotate_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::Down | Self::Up => self,
        }
    }

    /// Index into a `[_; 4]` ordered like [`BlockDirection::horizontal`].
    ///
    /// Returns `None` for the vertical directions.
    #[must_use]
    pub const fn horizontal_index(self) -> Option<usize> {
        match self {
            Self::North => Some(0),
            Self::East => Some(1),
            Self::South => Some(2),
            Self::West => Some(3),
            Self::Down | Self::Up => None,
        }
    }
}

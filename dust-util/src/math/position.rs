use std::fmt;

use super::{direction::BlockDirection, vector3::Vector3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    #[must_use]
    pub fn offset(&self, offset: Vector3<i32>) -> Self {
        Self(self.0 + offset)
    }

    #[must_use]
    pub fn offset_dir(&self, direction: BlockDirection) -> Self {
        self.offset(direction.to_offset())
    }

    #[must_use]
    pub fn up(&self) -> Self {
        self.offset_dir(BlockDirection::Up)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.offset_dir(BlockDirection::Down)
    }

    /// Every position within Manhattan distance `radius`, including `self`.
    pub fn manhattan_neighborhood(self, radius: i32) -> impl Iterator<Item = Self> {
        (-radius..=radius).flat_map(move |dx| {
            let rest = radius - dx.abs();
            (-rest..=rest).flat_map(move |dy| {
                let rest = rest - dy.abs();
                (-rest..=rest).map(move |dz| self.offset(Vector3::new(dx, dy, dz)))
            })
        })
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_counts() {
        let origin = BlockPos::new(3, -2, 7);
        assert_eq!(origin.manhattan_neighborhood(0).count(), 1);
        assert_eq!(origin.manhattan_neighborhood(1).count(), 7);
        assert_eq!(origin.manhattan_neighborhood(2).count(), 25);
        assert!(origin.manhattan_neighborhood(2).all(|pos| {
            let (dx, dy, dz) = (pos.0.x - origin.0.x, pos.0.y - origin.0.y, pos.0.z - origin.0.z);
            dx.abs() + dy.abs() + dz.abs() <= 2
        }));
        let distinct: std::collections::BTreeSet<_> = origin.manhattan_neighborhood(2).collect();
        assert_eq!(distinct.len(), 25);
    }

    #[test]
    fn vertical_helpers() {
        let pos = BlockPos::new(0, 64, 0);
        assert_eq!(pos.up(), BlockPos::new(0, 65, 0));
        assert_eq!(pos.down().up(), pos);
        assert_eq!(
            pos.offset_dir(BlockDirection::West),
            BlockPos::new(-1, 64, 0)
        );
    }
}

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// A cell position inside one room. Signed so that neighbours of edge cells
/// (row -1, column `COLUMN_COUNT`) can be named and safely rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: i32,
    pub col: i32,
}

impl CellCoord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Position of a room in the level's room array.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RoomCoord {
    pub row: usize,
    pub col: usize,
}

impl RoomCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Per-edge solidity of a tile. Each flag blocks passage through one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolidFlags(u8);

impl SolidFlags {
    pub const NONE: Self = Self(0);
    pub const TOP: Self = Self(1);
    pub const BOTTOM: Self = Self(2);
    pub const LEFT: Self = Self(4);
    pub const RIGHT: Self = Self(8);
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// True if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if at least one edge is solid.
    pub const fn is_any(self) -> bool {
        self.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for SolidFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for SolidFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_requires_all_bits() {
        let top_only = SolidFlags::TOP;
        assert!(top_only.contains(SolidFlags::TOP));
        assert!(!top_only.contains(SolidFlags::LEFT));
        assert!(!top_only.contains(SolidFlags::TOP | SolidFlags::LEFT));
        assert!(SolidFlags::ALL.contains(SolidFlags::TOP | SolidFlags::RIGHT));
    }

    #[test]
    fn empty_request_is_trivially_contained() {
        assert!(SolidFlags::NONE.contains(SolidFlags::NONE));
        assert!(!SolidFlags::NONE.is_any());
    }

    #[test]
    fn from_bits_masks_unknown_flags() {
        assert_eq!(SolidFlags::from_bits(0xff), SolidFlags::ALL);
    }

    #[test]
    fn room_coord_display() {
        assert_eq!(RoomCoord::new(1, 0).to_string(), "(1, 0)");
    }
}

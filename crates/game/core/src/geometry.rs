use std::fmt;

use crate::config::SimConfig;

/// Point in sub-unit coordinates (one tile is `1 << SimConfig::CSF`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position of the top-left corner of tile `(tx, ty)`.
    pub const fn from_tile(tx: i32, ty: i32) -> Self {
        Self {
            x: SimConfig::tiles(tx),
            y: SimConfig::tiles(ty),
        }
    }

    /// Tile coordinates containing this point.
    pub const fn tile(self) -> (i32, i32) {
        (self.x >> SimConfig::CSF, self.y >> SimConfig::CSF)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a bounding box in sub-units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent measured in screen pixels.
    pub const fn pixels(width: i32, height: i32) -> Self {
        Self {
            width: SimConfig::pixels(width),
            height: SimConfig::pixels(height),
        }
    }
}

/// Axis-aligned rectangle with inclusive left/top and exclusive right/bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub origin: Position,
    pub extent: Extent,
}

impl Rect {
    pub const fn new(origin: Position, extent: Extent) -> Self {
        Self { origin, extent }
    }

    pub const fn left(&self) -> i32 {
        self.origin.x
    }

    pub const fn top(&self) -> i32 {
        self.origin.y
    }

    pub const fn right(&self) -> i32 {
        self.origin.x + self.extent.width
    }

    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.extent.height
    }

    pub const fn mid_x(&self) -> i32 {
        self.origin.x + self.extent.width / 2
    }

    pub const fn mid_y(&self) -> i32 {
        self.origin.y + self.extent.height / 2
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(Position::new(0, 0), Extent::new(10, 10));
        let b = Rect::new(Position::new(10, 0), Extent::new(10, 10));
        let c = Rect::new(Position::new(9, 9), Extent::new(10, 10));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn tile_of_negative_position_rounds_down() {
        assert_eq!(Position::new(-1, 511).tile(), (-1, 0));
        assert_eq!(Position::from_tile(2, 3).tile(), (2, 3));
    }
}

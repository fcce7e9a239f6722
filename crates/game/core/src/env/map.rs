//! Read-only tile map surface.

use bitflags::bitflags;

use crate::config::SimConfig;

/// Identifier of a tile graphic within a plane.
pub type TileId = u16;

bitflags! {
    /// Per-tile behaviour bits looked up through [`TileOracle::properties_of`].
    ///
    /// The `SOLID_*` bits name the face of the tile that stops movement:
    /// `SOLID_TOP` is a floor for things falling onto it, `SOLID_LEFT` stops
    /// a body walking right into the tile, and so on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileProperties: u16 {
        const SOLID_TOP    = 1 << 0;
        const SOLID_BOTTOM = 1 << 1;
        const SOLID_LEFT   = 1 << 2;
        const SOLID_RIGHT  = 1 << 3;
        const CLIMBABLE    = 1 << 4;
        const SWITCH       = 1 << 5;
        const HAZARD       = 1 << 6;

        const SOLID = Self::SOLID_TOP.bits()
            | Self::SOLID_BOTTOM.bits()
            | Self::SOLID_LEFT.bits()
            | Self::SOLID_RIGHT.bits();
    }
}

/// Static map oracle exposing immutable tile planes.
///
/// Coordinates are tile coordinates. Lookups outside the map return `None`
/// and [`TileOracle::properties_at`] treats them as solid on every side.
pub trait TileOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    fn plane_value_at(&self, plane: u8, tx: i32, ty: i32) -> Option<TileId>;

    fn properties_of(&self, plane: u8, tile: TileId) -> TileProperties;

    fn properties_at(&self, plane: u8, tx: i32, ty: i32) -> TileProperties {
        match self.plane_value_at(plane, tx, ty) {
            Some(tile) => self.properties_of(plane, tile),
            None => TileProperties::SOLID,
        }
    }

    /// Properties of the foreground tile covering the sub-unit point `(x, y)`.
    fn properties_at_point(&self, x: i32, y: i32) -> TileProperties {
        self.properties_at(
            SimConfig::FOREGROUND_PLANE,
            x >> SimConfig::CSF,
            y >> SimConfig::CSF,
        )
    }
}

/// Map size in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && tx < self.width as i32 && ty < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

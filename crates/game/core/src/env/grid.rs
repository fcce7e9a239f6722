//! In-memory tile map used by levels, tools and tests.

use super::map::{MapDimensions, TileId, TileOracle, TileProperties};
use crate::config::SimConfig;

/// Number of planes every [`GridMap`] carries: background and foreground.
pub const PLANE_COUNT: usize = 2;

/// Dense tile planes plus a per-plane property table indexed by tile id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    dimensions: MapDimensions,
    planes: Vec<Vec<TileId>>,
    properties: Vec<Vec<TileProperties>>,
}

impl GridMap {
    /// Glyphs understood by [`GridMap::from_ascii`], with the foreground tile
    /// id and properties each one stands for.
    pub const LEGEND: [(char, TileId, TileProperties); 6] = [
        ('.', 0, TileProperties::empty()),
        ('#', 1, TileProperties::SOLID),
        ('=', 2, TileProperties::SOLID_TOP),
        ('|', 3, TileProperties::CLIMBABLE),
        ('s', 4, TileProperties::SWITCH),
        ('^', 5, TileProperties::HAZARD),
    ];

    /// Creates an empty map; every tile is id 0 with no properties.
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            planes: vec![vec![0; dimensions.area()]; PLANE_COUNT],
            properties: vec![vec![TileProperties::empty()]; PLANE_COUNT],
        }
    }

    /// Builds a foreground plane from text rows using [`GridMap::LEGEND`].
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut map = Self::new(MapDimensions::new(width as u32, height as u32));
        for (id, props) in Self::LEGEND.iter().map(|(_, id, props)| (*id, *props)) {
            map.set_properties(SimConfig::FOREGROUND_PLANE, id, props);
        }

        for (ty, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::Ragged {
                    row: ty,
                    expected: width,
                    found,
                });
            }
            for (tx, glyph) in row.chars().enumerate() {
                let (_, id, _) = Self::LEGEND
                    .iter()
                    .find(|(g, _, _)| *g == glyph)
                    .ok_or(MapError::UnknownGlyph {
                        glyph,
                        row: ty,
                        column: tx,
                    })?;
                map.set_tile(SimConfig::FOREGROUND_PLANE, tx as i32, ty as i32, *id);
            }
        }

        Ok(map)
    }

    pub fn set_tile(&mut self, plane: u8, tx: i32, ty: i32, tile: TileId) {
        let Some(index) = self.index(tx, ty) else {
            return;
        };
        if let Some(cells) = self.planes.get_mut(plane as usize) {
            cells[index] = tile;
        }
    }

    pub fn set_properties(&mut self, plane: u8, tile: TileId, properties: TileProperties) {
        let Some(table) = self.properties.get_mut(plane as usize) else {
            return;
        };
        let slot = tile as usize;
        if table.len() <= slot {
            table.resize(slot + 1, TileProperties::empty());
        }
        table[slot] = properties;
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        self.dimensions
            .contains(tx, ty)
            .then(|| ty as usize * self.dimensions.width as usize + tx as usize)
    }
}

impl TileOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn plane_value_at(&self, plane: u8, tx: i32, ty: i32) -> Option<TileId> {
        let index = self.index(tx, ty)?;
        self.planes.get(plane as usize).map(|cells| cells[index])
    }

    fn properties_of(&self, plane: u8, tile: TileId) -> TileProperties {
        self.properties
            .get(plane as usize)
            .and_then(|table| table.get(tile as usize))
            .copied()
            .unwrap_or_default()
    }
}

/// Errors raised while building a [`GridMap`] from text rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map has no rows or an empty first row")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        glyph: char,
        row: usize,
        column: usize,
    },
}

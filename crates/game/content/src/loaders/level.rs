//! Level loader.
//!
//! A level file carries the foreground tile rows (see [`GridMap::LEGEND`]),
//! optional decorative background rows, per-tile property overrides, the
//! actor spawns and the player start.

use std::path::Path;

use anyhow::Context;
use platformer_core::{
    FacingX, GameEnv, GridMap, Player, Position, SimConfig, SpawnSpec, SpeciesKey, TileId,
    TileOracle, TileProperties, World,
};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file, ron_options};

/// Level file as written on disk.
#[derive(Debug, Clone, Deserialize)]
struct LevelRon {
    tiles: Vec<String>,
    #[serde(default)]
    background: Vec<String>,
    /// `(tile id, properties)` pairs for the foreground plane.
    #[serde(default)]
    properties: Vec<(TileId, TileProperties)>,
    #[serde(default)]
    spawns: Vec<LevelSpawn>,
    #[serde(default)]
    player: Option<PlayerStart>,
}

/// Actor placement in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LevelSpawn {
    pub species: SpeciesKey,
    pub tile: (i32, i32),
    #[serde(default)]
    pub variant: u8,
    #[serde(default)]
    pub facing: FacingX,
}

impl LevelSpawn {
    pub fn spec(&self) -> SpawnSpec {
        SpawnSpec::at_tile(self.species, self.tile.0, self.tile.1)
            .with_variant(self.variant)
            .facing(self.facing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlayerStart {
    pub tile: (i32, i32),
    #[serde(default)]
    pub rations: u16,
}

impl PlayerStart {
    pub fn player(&self) -> Player {
        Player::new(Position::from_tile(self.tile.0, self.tile.1)).with_rations(self.rations)
    }
}

/// A loaded level: the tile map plus what to put in it.
#[derive(Debug, Clone)]
pub struct Level {
    pub map: GridMap,
    pub spawns: Vec<SpawnSpec>,
    pub player: Option<Player>,
}

impl Level {
    /// Spawns every actor of the level into `world` and places the player.
    /// Returns how many actors were added.
    pub fn populate(&self, world: &mut World, env: &GameEnv<'_>) -> usize {
        let added = self
            .spawns
            .iter()
            .filter_map(|spec| world.spawn(spec, env))
            .count();
        if let Some(player) = &self.player {
            world.set_player(player.clone());
        }
        tracing::info!(actors = added, player = self.player.is_some(), "level populated");
        added
    }
}

/// Loader for [`Level`]s from RON files.
pub struct LevelLoader;

impl LevelLoader {
    pub fn load(path: &Path) -> LoadResult<Level> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Level> {
        let data: LevelRon = ron_options()
            .from_str(content)
            .context("Failed to parse level RON")?;

        let mut map = GridMap::from_ascii(&data.tiles).context("Invalid foreground rows")?;

        if !data.background.is_empty() {
            let background = GridMap::from_ascii(&data.background)
                .context("Invalid background rows")?;
            anyhow::ensure!(
                background.dimensions() == map.dimensions(),
                "background is {:?} but foreground is {:?}",
                background.dimensions(),
                map.dimensions()
            );
            copy_plane(&background, &mut map, 0);
        }

        for (tile, properties) in data.properties {
            map.set_properties(SimConfig::FOREGROUND_PLANE, tile, properties);
        }

        let spawns = data.spawns.iter().map(LevelSpawn::spec).collect::<Vec<_>>();
        tracing::debug!(
            width = map.dimensions().width,
            height = map.dimensions().height,
            spawns = spawns.len(),
            "level parsed"
        );

        Ok(Level {
            map,
            spawns,
            player: data.player.map(|start| start.player()),
        })
    }
}

/// Copies the foreground ids of `source` onto `plane` of `target`.
fn copy_plane(source: &GridMap, target: &mut GridMap, plane: u8) {
    let dimensions = source.dimensions();
    for ty in 0..dimensions.height as i32 {
        for tx in 0..dimensions.width as i32 {
            if let Some(tile) = source.plane_value_at(SimConfig::FOREGROUND_PLANE, tx, ty) {
                target.set_tile(plane, tx, ty, tile);
            }
        }
    }
}

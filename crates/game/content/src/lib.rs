//! Data-driven content for the platformer simulation.
//!
//! Loaders read the files a session is assembled from:
//! - Simulation configuration (TOML)
//! - Per-species tuning overrides (RON)
//! - Levels: tile rows, property overrides, spawns and the player start (RON)
//!
//! Content feeds the oracles and the initial world; it never appears in save
//! games.

pub mod loaders;

pub use loaders::{ConfigLoader, Level, LevelLoader, LevelSpawn, PlayerStart, TuningLoader};

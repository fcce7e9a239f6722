//! Content loaders for reading simulation data from files.

pub mod config;
pub mod level;
pub mod tuning;

pub use config::ConfigLoader;
pub use level::{Level, LevelLoader, LevelSpawn, PlayerStart};
pub use tuning::TuningLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// RON options shared by the loaders; optional fields may omit `Some(..)`.
pub(crate) fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

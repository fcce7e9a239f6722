//! Simulation configuration loader.

use std::path::Path;

use anyhow::Context;
use platformer_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SimConfig`] from TOML files.
///
/// Every key is optional; missing keys keep their defaults.
///
/// ```toml
/// difficulty = "hard"
/// stun_duration = 300
///
/// [gravity.high]
/// acceleration = 10
/// terminal_velocity = 180
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        tracing::debug!(
            difficulty = %config.difficulty,
            stun_duration = config.stun_duration,
            "config loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{Difficulty, GravityTier};
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "difficulty = \"expert\"\n\n[gravity.high]\nacceleration = 10\nterminal_velocity = 180"
        )
        .unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.difficulty, Difficulty::Expert);
        assert_eq!(config.stun_duration, SimConfig::DEFAULT_STUN_DURATION);
        let high = config.gravity.params(GravityTier::High);
        assert_eq!((high.acceleration, high.terminal_velocity), (10, 180));
        assert_eq!(config.gravity.mid, SimConfig::default().gravity.mid);
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), SimConfig::default());
    }

    #[test]
    fn unknown_difficulty_is_an_error() {
        let err = ConfigLoader::parse("difficulty = \"nightmare\"").unwrap_err();
        assert!(format!("{err:#}").contains("config TOML"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}

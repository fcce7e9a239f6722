//! Per-species tuning loader.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use platformer_core::{BehaviorTuning, SpeciesKey, TuningTable};

use crate::loaders::{LoadResult, read_file, ron_options};

/// Loader for [`TuningTable`]s from RON files.
///
/// File format: a map from species name to overrides. Omitted fields keep
/// the species default.
///
/// ```ron
/// {
///     "ampton": (may_attack: true, scream_after_defeat: true),
///     "mimrock": (health_points: 2),
/// }
/// ```
pub struct TuningLoader;

impl TuningLoader {
    pub fn load(path: &Path) -> LoadResult<TuningTable> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses a tuning map. Unknown species names are logged and skipped.
    pub fn parse(content: &str) -> LoadResult<TuningTable> {
        let raw: BTreeMap<String, BehaviorTuning> = ron_options()
            .from_str(content)
            .context("Failed to parse tuning RON")?;

        let mut table = TuningTable::new();
        for (name, tuning) in raw {
            match name.parse::<SpeciesKey>() {
                Ok(species) => {
                    if tuning.is_empty() {
                        tracing::debug!(%species, "tuning entry has no overrides");
                    }
                    table.insert(species, tuning);
                }
                Err(_) => tracing::warn!(species = %name, "unknown species in tuning file; skipped"),
            }
        }
        Ok(table)
    }

    /// Loads `path` if given, falling back to an empty table on any failure.
    pub fn load_or_default(path: Option<&Path>) -> TuningTable {
        let Some(path) = path else {
            return TuningTable::new();
        };
        match Self::load(path) {
            Ok(table) => {
                tracing::info!(entries = table.len(), path = %path.display(), "tuning loaded");
                table
            }
            Err(err) => {
                tracing::warn!("tuning unavailable, using species defaults: {err:#}");
                TuningTable::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{SoundId, TuningOracle};
    use std::io::Write;

    #[test]
    fn overrides_are_keyed_by_species_name() {
        let table = TuningLoader::parse(
            r#"{
                "ampton": (may_attack: true, movement_sound: 77),
                "grabbiter": (health_points: 4),
            }"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let ampton = table.tuning(SpeciesKey::Ampton).unwrap();
        assert_eq!(ampton.may_attack, Some(true));
        assert_eq!(ampton.movement_sound, Some(SoundId(77)));
        assert_eq!(ampton.allow_climbing, None);
        assert_eq!(
            table.tuning(SpeciesKey::Grabbiter).unwrap().health_points,
            Some(4)
        );
        assert_eq!(table.tuning(SpeciesKey::Mimrock), None);
    }

    #[test]
    fn unknown_species_are_skipped() {
        let table = TuningLoader::parse(r#"{ "dragon": (may_attack: true), "orbatrix": () }"#)
            .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.tuning(SpeciesKey::Orbatrix).unwrap().is_empty());
    }

    #[test]
    fn load_or_default_falls_back_on_bad_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ \"ampton\": (may_attack: maybe) }}").unwrap();
        assert!(TuningLoader::load_or_default(Some(file.path())).is_empty());

        let dir = tempfile::tempdir().unwrap();
        assert!(TuningLoader::load_or_default(Some(&dir.path().join("missing.ron"))).is_empty());
        assert!(TuningLoader::load_or_default(None).is_empty());
    }

    #[test]
    fn load_or_default_reads_good_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ \"mimrock\": (health_points: 3) }}").unwrap();
        let table = TuningLoader::load_or_default(Some(file.path()));
        assert_eq!(
            table.tuning(SpeciesKey::Mimrock).unwrap().health_points,
            Some(3)
        );
    }
}

//! Per-species behaviour overrides resolved at construction time.

use std::collections::BTreeMap;

use crate::actor::SpeciesKey;
use crate::events::SoundId;

/// Optional overrides for a species' tunables. `None` keeps the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorTuning {
    pub scream_after_defeat: Option<bool>,
    pub may_attack: Option<bool>,
    pub allow_climbing: Option<bool>,
    pub health_points: Option<i32>,
    pub movement_sound: Option<SoundId>,
}

impl BehaviorTuning {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tuning provider consulted once per actor construction.
pub trait TuningOracle: Send + Sync {
    fn tuning(&self, species: SpeciesKey) -> Option<BehaviorTuning>;
}

/// Map-backed tuning provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TuningTable {
    entries: BTreeMap<SpeciesKey, BehaviorTuning>,
}

impl TuningTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, species: SpeciesKey, tuning: BehaviorTuning) -> Self {
        self.insert(species, tuning);
        self
    }

    pub fn insert(&mut self, species: SpeciesKey, tuning: BehaviorTuning) {
        self.entries.insert(species, tuning);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TuningOracle for TuningTable {
    fn tuning(&self, species: SpeciesKey) -> Option<BehaviorTuning> {
        self.entries.get(&species).copied()
    }
}

//! Traits describing read-only world data.
//!
//! Oracles expose the static tile planes, the random source and the optional
//! tuning provider. The [`Env`] aggregate bundles them so actors can reach
//! everything they need without hard coupling to concrete implementations.
mod grid;
mod map;
mod rng;
mod tuning;

pub use grid::{GridMap, MapError, PLANE_COUNT};
pub use map::{MapDimensions, TileId, TileOracle, TileProperties};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use tuning::{BehaviorTuning, TuningOracle, TuningTable};

/// Aggregates the read-only oracles used during a frame.
///
/// The map and the random source are mandatory; tuning is optional and an
/// absent provider simply leaves every species at its defaults.
pub struct Env<'a, M, R, T>
where
    M: TileOracle + ?Sized,
    R: RngOracle + ?Sized,
    T: TuningOracle + ?Sized,
{
    map: &'a M,
    rng: &'a R,
    tuning: Option<&'a T>,
}

pub type GameEnv<'a> = Env<'a, dyn TileOracle + 'a, dyn RngOracle + 'a, dyn TuningOracle + 'a>;

impl<M, R, T> Clone for Env<'_, M, R, T>
where
    M: TileOracle + ?Sized,
    R: RngOracle + ?Sized,
    T: TuningOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, R, T> Copy for Env<'_, M, R, T>
where
    M: TileOracle + ?Sized,
    R: RngOracle + ?Sized,
    T: TuningOracle + ?Sized,
{
}

impl<'a, M, R, T> Env<'a, M, R, T>
where
    M: TileOracle + ?Sized,
    R: RngOracle + ?Sized,
    T: TuningOracle + ?Sized,
{
    pub fn new(map: &'a M, rng: &'a R) -> Self {
        Self {
            map,
            rng,
            tuning: None,
        }
    }

    pub fn with_tuning(mut self, tuning: &'a T) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn map(&self) -> &'a M {
        self.map
    }

    pub fn rng(&self) -> &'a R {
        self.rng
    }

    pub fn tuning(&self) -> Option<&'a T> {
        self.tuning
    }
}

impl<'a> GameEnv<'a> {
    /// Builds a trait-object environment straight from concrete oracles.
    pub fn from_oracles(map: &'a dyn TileOracle, rng: &'a dyn RngOracle) -> Self {
        Self::new(map, rng)
    }
}

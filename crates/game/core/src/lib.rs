//! Deterministic actor simulation for a tile-based platformer.
//!
//! `platformer-core` owns the per-frame rules: action tables and their state
//! machines, gravity and tile collision, the pairwise touch protocol, and the
//! [`world::World`] arena that drives every live actor in a stable order.
//! Everything the rules read from the outside (tile map, random source,
//! tuning overrides) arrives through the [`env::Env`] oracle bundle, and
//! everything they emit (sounds, dialogs, tile triggers) lands in an
//! [`events::EventQueue`].
pub mod action;
pub mod activation;
pub mod actor;
pub mod collision;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod events;
pub mod geometry;
#[cfg(feature = "serde")]
pub mod persistence;
pub mod physics;
pub mod world;

pub use action::{
    ActionCode, ActionDef, ActionLayout, ActionStateMachine, ActionTable, ActionTableBuilder,
    AnimationSignal, FrameEnd, Handler,
};
pub use activation::{Approach, ProximityWindow};
pub use actor::{
    Actor, ActorKind, Blocked, Body, FacingX, FacingY, HitOutcome, Player, SpawnSpec, Species,
    SpeciesKey,
};
pub use collision::{Capability, Toucher};
pub use config::{Difficulty, GravityTier, SimConfig};
pub use context::FrameContext;
pub use env::{
    BehaviorTuning, Env, GameEnv, GridMap, MapDimensions, PcgRng, RngOracle, TileId,
    TileOracle, TileProperties, TuningOracle, TuningTable,
};
pub use error::{ActionError, ActionTableError, ErrorSeverity, GameError};
pub use events::{DialogKey, Event, EventQueue, SoundId};
pub use geometry::{Extent, Position, Rect};
#[cfg(feature = "serde")]
pub use persistence::{ActorRecord, PersistError, SaveGame};
pub use world::{StepReport, World};

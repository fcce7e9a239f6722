//! Actors: the shared [`Body`], the species behaviours and the tracked player.

mod body;
mod player;
pub mod species;

pub use body::{Blocked, Body, FacingX, FacingY, HitOutcome};
pub use player::Player;
pub use species::{Species, SpeciesKey};

use crate::action::ActionStateMachine;
use crate::collision::{Capability, Toucher, touch_suppressed};
use crate::config::SimConfig;
use crate::context::FrameContext;
use crate::env::{BehaviorTuning, GameEnv};
use crate::geometry::{Extent, Position};
use species::{Ampton, EnemyShot, Grabbiter, Mimrock, Orbatrix, PlayerShot};

/// Level or behaviour request to create an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnSpec {
    pub species: SpeciesKey,
    pub position: Position,
    /// Level-data variant; some species scale their health with it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub variant: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub facing: FacingX,
}

impl SpawnSpec {
    pub fn new(species: SpeciesKey, position: Position) -> Self {
        Self {
            species,
            position,
            variant: 0,
            facing: FacingX::default(),
        }
    }

    pub fn at_tile(species: SpeciesKey, tx: i32, ty: i32) -> Self {
        Self::new(species, Position::from_tile(tx, ty))
    }

    pub fn with_variant(mut self, variant: u8) -> Self {
        self.variant = variant;
        self
    }

    pub fn facing(mut self, facing: FacingX) -> Self {
        self.facing = facing;
        self
    }
}

/// Species-specific state, one variant per species.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Mimrock(Mimrock),
    Ampton(Ampton),
    Orbatrix(Orbatrix),
    Grabbiter(Grabbiter),
    PlayerShot(PlayerShot),
    EnemyShot(EnemyShot),
    /// Placeholder appended by restore; has no behaviour.
    Inert,
}

/// Runs `$body` with `$s` bound to the species state, or `$inert` for
/// placeholders.
macro_rules! with_species {
    ($kind:expr, $s:ident => $body:expr, inert => $inert:expr) => {
        match $kind {
            ActorKind::Mimrock($s) => $body,
            ActorKind::Ampton($s) => $body,
            ActorKind::Orbatrix($s) => $body,
            ActorKind::Grabbiter($s) => $body,
            ActorKind::PlayerShot($s) => $body,
            ActorKind::EnemyShot($s) => $body,
            ActorKind::Inert => $inert,
        }
    };
}

fn key_of<S: Species>(_: &S) -> SpeciesKey {
    S::KEY
}

fn capability_of<S: Species>(_: &S) -> Capability {
    S::CAPABILITY
}

/// A live entity: body plus species behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub body: Body,
    pub kind: ActorKind,
}

impl Actor {
    /// Builds the actor `spec` describes, consulting the tuning provider of
    /// `env` once.
    pub fn spawn(spec: &SpawnSpec, env: &GameEnv<'_>, config: &SimConfig) -> Self {
        let mut actor = Self::create(spec, config);
        let tuning = env.tuning().and_then(|provider| provider.tuning(spec.species));
        if let Some(tuning) = tuning {
            actor.apply_tuning(&tuning);
        }
        actor
    }

    /// Builds the actor without any tuning applied.
    pub fn create(spec: &SpawnSpec, config: &SimConfig) -> Self {
        match spec.species {
            SpeciesKey::Mimrock => Self::build(spec, config, ActorKind::Mimrock),
            SpeciesKey::Ampton => Self::build(spec, config, ActorKind::Ampton),
            SpeciesKey::Orbatrix => Self::build(spec, config, ActorKind::Orbatrix),
            SpeciesKey::Grabbiter => Self::build(spec, config, ActorKind::Grabbiter),
            SpeciesKey::PlayerShot => Self::build(spec, config, ActorKind::PlayerShot),
            SpeciesKey::EnemyShot => Self::build(spec, config, ActorKind::EnemyShot),
            SpeciesKey::Inert => {
                let mut actor = Self::placeholder();
                actor.body.position = spec.position;
                actor
            }
        }
    }

    fn build<S: Species>(spec: &SpawnSpec, config: &SimConfig, wrap: fn(S) -> ActorKind) -> Self {
        let (species, body) = S::create(spec, config);
        Self {
            body,
            kind: wrap(species),
        }
    }

    /// Inert stand-in that never exists unless a restore says so.
    pub fn placeholder() -> Self {
        let mut body = Body::new(
            Position::ORIGIN,
            Extent::default(),
            ActionStateMachine::inert(),
            0,
        );
        body.exists = false;
        body.solid = false;
        body.can_be_damaged = false;
        Self {
            body,
            kind: ActorKind::Inert,
        }
    }

    pub fn key(&self) -> SpeciesKey {
        with_species!(&self.kind, s => key_of(s), inert => SpeciesKey::Inert)
    }

    pub fn capability(&self) -> Capability {
        with_species!(&self.kind, s => capability_of(s), inert => Capability::Inert)
    }

    pub fn apply_tuning(&mut self, tuning: &BehaviorTuning) {
        if let Some(health) = tuning.health_points {
            self.body.health_points = health;
        }
        let body = &mut self.body;
        with_species!(&mut self.kind, s => s.apply_tuning(body, tuning), inert => {});
        tracing::debug!(species = %self.key(), ?tuning, "tuning applied");
    }

    /// Lets the species fix up its body after a save was applied to it.
    pub fn restored(&mut self) {
        let body = &mut self.body;
        with_species!(&mut self.kind, s => s.restored(body), inert => body.solid = false);
    }

    /// Activation predicate; the world latches `active` once this says yes.
    pub fn is_nearby(&mut self, player: Option<&Player>, ctx: &mut FrameContext<'_>) -> bool {
        let body = &mut self.body;
        with_species!(&mut self.kind, s => s.is_nearby(body, player, ctx), inert => false)
    }

    /// One frame of physics, behaviour and animation.
    pub fn process(&mut self, ctx: &mut FrameContext<'_>) {
        let body = &mut self.body;
        with_species!(&mut self.kind, s => s.process(body, ctx), inert => {});
    }

    /// Reacts to `other` overlapping this actor. Does nothing when either
    /// side is already dead.
    pub fn touched_by(&mut self, other: &mut Toucher<'_>, ctx: &mut FrameContext<'_>) {
        if touch_suppressed(&self.body, other) {
            return;
        }
        let body = &mut self.body;
        with_species!(&mut self.kind, s => s.touched_by(body, other, ctx), inert => {});
    }
}

//! Species behaviours.
//!
//! Every species owns a static [`ActionTable`] and implements [`Species`];
//! the default [`Species::process`] runs the standard frame: gravity, tile
//! collision, handler dispatch, animation advance.

mod ampton;
mod grabbiter;
mod mimrock;
mod orbatrix;
mod shot;

pub use ampton::Ampton;
pub use grabbiter::Grabbiter;
pub use mimrock::Mimrock;
pub use orbatrix::Orbatrix;
pub use shot::{EnemyShot, PlayerShot};

use super::{Body, Player, SpawnSpec};
use crate::action::ActionTable;
use crate::collision::{Capability, Toucher};
use crate::config::{GravityTier, SimConfig};
use crate::context::FrameContext;
use crate::env::BehaviorTuning;
use crate::geometry::Extent;
use crate::physics;

/// Stable species tag used by tuning files and save games.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SpeciesKey {
    Mimrock,
    Ampton,
    Orbatrix,
    Grabbiter,
    PlayerShot,
    EnemyShot,
    Inert,
}

impl SpeciesKey {
    /// Short-lived kinds that a restore brings back as non-existent.
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::PlayerShot | Self::EnemyShot)
    }
}

/// Behaviour contract of one species.
pub trait Species: Sized + 'static {
    const KEY: SpeciesKey;
    const CAPABILITY: Capability;
    const SPRITE_BASE: u16;
    const EXTENT: Extent;

    fn table() -> &'static ActionTable<Self>;

    /// Builds the species state and its body for `spec`.
    fn create(spec: &SpawnSpec, config: &SimConfig) -> (Self, Body);

    /// Fresh body sitting on the table's initial state.
    fn body(spec: &SpawnSpec) -> Body {
        let mut body = Body::new(
            spec.position,
            Self::EXTENT,
            Self::table().machine(),
            Self::SPRITE_BASE,
        );
        body.facing_x = spec.facing;
        body
    }

    /// Species-specific part of a tuning override. Health is applied by the
    /// caller before this runs.
    fn apply_tuning(&mut self, _body: &mut Body, _tuning: &BehaviorTuning) {}

    /// Re-derives body fields that follow from the action state after a
    /// restore. The body arrives solid.
    fn restored(&mut self, _body: &mut Body) {}

    /// Whether the actor should start or keep behaving actively. May start
    /// an approach as a side effect.
    fn is_nearby(
        &mut self,
        _body: &mut Body,
        _player: Option<&Player>,
        _ctx: &mut FrameContext<'_>,
    ) -> bool {
        true
    }

    fn process(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::apply_gravity(body, ctx.config, GravityTier::Mid);
        physics::resolve_collision(body, ctx.map());
        if body.dead {
            settle(body);
            return;
        }
        Self::table().dispatch(self, body, ctx);
        body.advance_animation();
    }

    fn touched_by(&mut self, body: &mut Body, other: &mut Toucher<'_>, ctx: &mut FrameContext<'_>);
}

/// Frame of a stunned body: its animation keeps running and the stun
/// countdown decides when it leaves the world.
pub(crate) fn settle(body: &mut Body) {
    body.advance_animation();
    body.tick_stun();
}

/// Handler for states whose behaviour lives outside the table, such as
/// the stun state.
pub(crate) fn idle<S>(_: &mut S, _: &mut Body, _: &mut FrameContext<'_>) {}

/// Leaves a chained state once the animation reached `target`.
pub(crate) fn follow_chain(body: &mut Body, target: crate::action::ActionCode) {
    if body.action_status(target) {
        body.set_action(target);
    }
}

//! Projectiles fired by the player and by enemies.

use std::sync::LazyLock;

use super::{Species, SpeciesKey, idle};
use crate::action::{ActionCode, ActionDef, ActionTable, FrameEnd};
use crate::actor::{Body, SpawnSpec};
use crate::collision::{Capability, Toucher};
use crate::config::SimConfig;
use crate::context::FrameContext;
use crate::events::SoundId;
use crate::geometry::Extent;
use crate::physics;

const FLY: ActionCode = 0;
const SMASH: ActionCode = 2;

static PLAYER_SHOT_TABLE: LazyLock<ActionTable<PlayerShot>> = LazyLock::new(|| {
    ActionTable::builder(FLY)
        .state(ActionDef::new(FLY, 2).ticks(4), PlayerShot::fly)
        .state(ActionDef::new(SMASH, 2).ticks(6).then(FrameEnd::Despawn), idle)
        .build()
        .expect("player shot action table")
});

static ENEMY_SHOT_TABLE: LazyLock<ActionTable<EnemyShot>> = LazyLock::new(|| {
    ActionTable::builder(FLY)
        .state(ActionDef::new(FLY, 2).ticks(4), EnemyShot::fly)
        .build()
        .expect("enemy shot action table")
});

fn shot_body<S: Species>(spec: &SpawnSpec) -> Body {
    let mut body = S::body(spec);
    body.inhibit_fall = true;
    body.can_be_damaged = false;
    body
}

/// The player's stunner shot. Smashes on the first wall or target it hits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerShot {
    speed: i32,
}

impl PlayerShot {
    pub const SPEED: i32 = 320;

    fn fly(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(self.speed);
    }
}

impl Species for PlayerShot {
    const KEY: SpeciesKey = SpeciesKey::PlayerShot;
    const CAPABILITY: Capability = Capability::Projectile;
    const SPRITE_BASE: u16 = 100;
    const EXTENT: Extent = Extent::pixels(8, 8);

    fn table() -> &'static ActionTable<Self> {
        &PLAYER_SHOT_TABLE
    }

    fn create(spec: &SpawnSpec, _config: &SimConfig) -> (Self, Body) {
        (Self { speed: Self::SPEED }, shot_body::<Self>(spec))
    }

    fn process(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::resolve_collision(body, ctx.map());
        if body.action_status(FLY) && (body.dead || body.blocked.any()) {
            body.set_action(SMASH);
            body.solid = false;
            ctx.play(SoundId::SHOT_HIT);
        }
        Self::table().dispatch(self, body, ctx);
        body.advance_animation();
    }

    fn restored(&mut self, body: &mut Body) {
        body.solid = !body.action_status(SMASH);
    }

    /// Targets react to the shot, not the other way round.
    fn touched_by(&mut self, _body: &mut Body, _other: &mut Toucher<'_>, _ctx: &mut FrameContext<'_>) {}
}

/// Shot fired by enemies; lethal to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyShot {
    speed: i32,
}

impl EnemyShot {
    pub const SPEED: i32 = 150;

    fn fly(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(self.speed);
    }
}

impl Species for EnemyShot {
    const KEY: SpeciesKey = SpeciesKey::EnemyShot;
    const CAPABILITY: Capability = Capability::Hazard;
    const SPRITE_BASE: u16 = 120;
    const EXTENT: Extent = Extent::pixels(8, 8);

    fn table() -> &'static ActionTable<Self> {
        &ENEMY_SHOT_TABLE
    }

    fn create(spec: &SpawnSpec, _config: &SimConfig) -> (Self, Body) {
        (Self { speed: Self::SPEED }, shot_body::<Self>(spec))
    }

    fn process(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::resolve_collision(body, ctx.map());
        if body.dead || body.blocked.any() {
            body.exists = false;
            return;
        }
        Self::table().dispatch(self, body, ctx);
        body.advance_animation();
    }

    fn touched_by(&mut self, body: &mut Body, other: &mut Toucher<'_>, _ctx: &mut FrameContext<'_>) {
        if let Some(player) = other.as_player() {
            player.kill();
            body.dead = true;
            body.exists = false;
        }
    }
}

//! Hungry guard that blocks the way until it is fed.

use std::sync::LazyLock;

use super::{Species, SpeciesKey};
use crate::action::{ActionCode, ActionDef, ActionTable};
use crate::actor::{Body, SpawnSpec};
use crate::collision::{Capability, Toucher};
use crate::config::SimConfig;
use crate::context::FrameContext;
use crate::events::{DialogKey, SoundId};
use crate::geometry::Extent;
use crate::physics;

const HUNGRY: ActionCode = 0;
const NAPPING: ActionCode = 2;

static TABLE: LazyLock<ActionTable<Grabbiter>> = LazyLock::new(|| {
    ActionTable::builder(HUNGRY)
        .state(ActionDef::new(HUNGRY, 2).ticks(10), Grabbiter::wait)
        .state(ActionDef::new(NAPPING, 2).ticks(20), Grabbiter::wait)
        .build()
        .expect("grabbiter action table")
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grabbiter;

impl Grabbiter {
    fn wait(&mut self, _body: &mut Body, _ctx: &mut FrameContext<'_>) {}
}

impl Species for Grabbiter {
    const KEY: SpeciesKey = SpeciesKey::Grabbiter;
    const CAPABILITY: Capability = Capability::Enemy;
    const SPRITE_BASE: u16 = 500;
    const EXTENT: Extent = Extent::pixels(32, 32);

    fn table() -> &'static ActionTable<Self> {
        &TABLE
    }

    fn create(spec: &SpawnSpec, _config: &SimConfig) -> (Self, Body) {
        let mut body = Self::body(spec);
        body.honor_priority = false;
        body.can_be_damaged = false;
        (Self, body)
    }

    /// Rooted to the spot: no gravity.
    fn process(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::resolve_collision(body, ctx.map());
        Self::table().dispatch(self, body, ctx);
        body.advance_animation();
    }

    fn touched_by(&mut self, body: &mut Body, other: &mut Toucher<'_>, ctx: &mut FrameContext<'_>) {
        if body.action_status(NAPPING) {
            return;
        }
        let Some(player) = other.as_player() else {
            return;
        };

        let diff = body.mid_x() - player.mid_x();
        player.shove(-diff / 4);

        if player.consume_ration() {
            ctx.dialog(DialogKey::GRABBITER_SLEEPY);
            body.set_action(NAPPING);
            ctx.play(SoundId::GRABBITER_SLEEP);
        } else {
            ctx.play(SoundId::GRABBITER_HUNGRY);
            ctx.dialog(DialogKey::GRABBITER_HUNGRY);
        }
    }
}

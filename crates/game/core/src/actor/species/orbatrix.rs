//! Floating orb that curls up and bounces across the floor.

use std::sync::LazyLock;

use super::{Species, SpeciesKey, follow_chain};
use crate::action::{ActionCode, ActionDef, ActionTable, FrameEnd};
use crate::actor::{Body, FacingX, Player, SpawnSpec};
use crate::collision::{Capability, Toucher};
use crate::config::{GravityTier, SimConfig};
use crate::context::FrameContext;
use crate::events::SoundId;
use crate::geometry::Extent;
use crate::physics;

const FLOAT: ActionCode = 0;
const MOVE: ActionCode = 1;
const CURL: ActionCode = 3;
const UNCURL: ActionCode = 5;
const SLIDE: ActionCode = 7;
const BOUNCE: ActionCode = 11;

const MAX_BOUNCE_BOOST: i32 = -150;
const FLY_SPEED: i32 = 10;
const HOR_SPEED: i32 = 80;

const TIME_UNTIL_MOVE: u32 = 20;
const TIME_UNTIL_CURL: u32 = 20;
const TIME_UNTIL_UNCURL: u32 = 200;
const TIME_UNTIL_FLOAT: u32 = 20;

static TABLE: LazyLock<ActionTable<Orbatrix>> = LazyLock::new(|| {
    ActionTable::builder(FLOAT)
        .state(ActionDef::new(FLOAT, 1), Orbatrix::float)
        .state(ActionDef::new(MOVE, 2), Orbatrix::drift)
        .state(
            ActionDef::new(CURL, 2).ticks(6).then(FrameEnd::Chain(BOUNCE)),
            Orbatrix::curl,
        )
        .state(
            ActionDef::new(UNCURL, 2).ticks(6).then(FrameEnd::Chain(SLIDE)),
            Orbatrix::uncurl,
        )
        .state(ActionDef::new(SLIDE, 4).ticks(5), Orbatrix::slide)
        .state(ActionDef::new(BOUNCE, 4).ticks(5), Orbatrix::bounce)
        .build()
        .expect("orbatrix action table")
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Orbatrix {
    timer: u32,
}

impl Orbatrix {
    /// Counts one frame and reports whether `limit` frames have passed.
    fn elapsed(&mut self, limit: u32) -> bool {
        self.timer += 1;
        if self.timer < limit {
            return false;
        }
        self.timer = 0;
        true
    }

    fn float(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        if self.elapsed(TIME_UNTIL_MOVE) {
            body.set_action(MOVE);
        }
    }

    fn drift(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(FLY_SPEED);
        if self.elapsed(TIME_UNTIL_CURL) {
            body.set_action(CURL);
        }
    }

    fn curl(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        if body.action_status(BOUNCE) {
            body.velocity_y = MAX_BOUNCE_BOOST;
            body.set_action(BOUNCE);
        }
    }

    fn bounce(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::apply_gravity(body, ctx.config, GravityTier::High);
        body.move_ahead(HOR_SPEED);

        if body.is_landed() {
            body.velocity_y = MAX_BOUNCE_BOOST;
            body.facing_x = body.facing_x.flip();
            ctx.play(SoundId::ORBATRIX_BUMP);
        }

        if self.elapsed(TIME_UNTIL_UNCURL) {
            body.set_action(UNCURL);
        }
    }

    fn uncurl(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.velocity_y = 0;
        follow_chain(body, SLIDE);
    }

    fn slide(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(FLY_SPEED);
        if self.elapsed(TIME_UNTIL_FLOAT) {
            body.set_action(FLOAT);
        }
    }
}

impl Species for Orbatrix {
    const KEY: SpeciesKey = SpeciesKey::Orbatrix;
    const CAPABILITY: Capability = Capability::Enemy;
    const SPRITE_BASE: u16 = 400;
    const EXTENT: Extent = Extent::pixels(16, 16);

    fn table() -> &'static ActionTable<Self> {
        &TABLE
    }

    fn create(spec: &SpawnSpec, _config: &SimConfig) -> (Self, Body) {
        let mut body = Self::body(spec);
        body.can_be_damaged = false;
        (Self::default(), body)
    }

    fn is_nearby(
        &mut self,
        body: &mut Body,
        player: Option<&Player>,
        ctx: &mut FrameContext<'_>,
    ) -> bool {
        if !body.action_status(FLOAT) {
            return true;
        }
        if let Some(player) = player {
            if ctx.probability(600) {
                body.face_toward(player.mid_x());
            }
        }
        true
    }

    /// Hovers on its own; only the bounce handler pulls it down.
    fn process(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::resolve_collision(body, ctx.map());

        if body.blocked.left {
            body.facing_x = FacingX::Right;
        } else if body.blocked.right {
            body.facing_x = FacingX::Left;
        }

        Self::table().dispatch(self, body, ctx);
        body.advance_animation();
    }

    fn touched_by(&mut self, _body: &mut Body, other: &mut Toucher<'_>, _ctx: &mut FrameContext<'_>) {
        match other.capability() {
            // Shots bounce off harmlessly but are used up.
            Capability::Projectile => other.mark_dead(),
            Capability::Player => other.mark_dead(),
            Capability::Enemy | Capability::Hazard | Capability::Inert => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::species::testing::Bench;
    use crate::events::Event;
    use crate::geometry::Position;

    const ROOM: [&str; 6] = [
        "#..................#",
        "#..................#",
        "#..................#",
        "#..................#",
        "#..................#",
        "####################",
    ];

    #[test]
    fn consumes_shots_without_taking_damage() {
        let mut bench = Bench::new(&ROOM);
        let mut orb = bench.spawn(SpawnSpec::at_tile(SpeciesKey::Orbatrix, 5, 2));
        let mut shot = bench.spawn(SpawnSpec::new(SpeciesKey::PlayerShot, orb.body.position));
        bench.touch(&mut orb, &mut shot);
        assert!(shot.body.dead);
        assert!(!orb.body.dead);
        assert_eq!(orb.body.health_points, 1);
    }

    #[test]
    fn kills_the_player() {
        let mut bench = Bench::new(&ROOM);
        let mut orb = bench.spawn(SpawnSpec::at_tile(SpeciesKey::Orbatrix, 5, 2));
        let mut player = Player::new(orb.body.position);
        bench.touch_player(&mut orb, &mut player);
        assert!(player.dead);
    }

    #[test]
    fn hovers_while_floating() {
        let mut bench = Bench::new(&ROOM);
        let mut orb = bench.spawn(SpawnSpec::at_tile(SpeciesKey::Orbatrix, 5, 2));
        bench.run(&mut orb, 10);
        assert_eq!(orb.body.position, Position::from_tile(5, 2));
        assert!(orb.body.action_status(FLOAT));
    }

    #[test]
    fn cycles_through_curl_bounce_and_back_to_float() {
        let mut bench = Bench::new(&ROOM);
        let mut orb = bench.spawn(
            SpawnSpec::at_tile(SpeciesKey::Orbatrix, 9, 3).facing(FacingX::Right),
        );

        let mut seen = Vec::new();
        for _ in 0..400 {
            bench.process(&mut orb);
            let state = [FLOAT, MOVE, CURL, BOUNCE, UNCURL, SLIDE]
                .into_iter()
                .find(|code| orb.body.machine.bound_code() == Some(*code));
            if let Some(state) = state {
                if seen.last() != Some(&state) {
                    seen.push(state);
                }
            }
        }
        assert_eq!(&seen[..6], &[FLOAT, MOVE, CURL, BOUNCE, UNCURL, SLIDE]);
        assert!(seen[6..].contains(&FLOAT));
        assert!(
            bench
                .events
                .iter()
                .any(|e| *e == Event::Sound(SoundId::ORBATRIX_BUMP))
        );
    }

    #[test]
    fn turns_toward_the_player_while_floating() {
        let mut bench = Bench::new(&ROOM);
        let mut orb = bench.spawn(
            SpawnSpec::at_tile(SpeciesKey::Orbatrix, 5, 2).facing(FacingX::Left),
        );
        let player = Player::new(Position::from_tile(12, 3));
        let mut turned = false;
        for _ in 0..20 {
            bench.is_nearby(&mut orb, &player);
            bench.frame += 1;
            if orb.body.facing_x == FacingX::Right {
                turned = true;
                break;
            }
        }
        assert!(turned);
    }
}

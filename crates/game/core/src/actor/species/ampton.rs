//! Walking maintenance robot: patrols, rides poles, flips switches.

use std::sync::LazyLock;

use super::{Species, SpeciesKey, follow_chain, idle, settle};
use crate::action::{ActionCode, ActionDef, ActionTable, FrameEnd};
use crate::actor::{Actor, Body, FacingX, FacingY, HitOutcome, Player, SpawnSpec};
use crate::collision::{Capability, Toucher};
use crate::config::{Difficulty, GravityTier, SimConfig};
use crate::context::FrameContext;
use crate::env::{BehaviorTuning, TileOracle, TileProperties};
use crate::events::{Event, SoundId};
use crate::geometry::{Extent, Position};
use crate::physics;

const WALK: ActionCode = 0;
const TURN: ActionCode = 4;
const START_POLE: ActionCode = 5;
const POLE_SLIDE: ActionCode = 7;
const STOP_POLE: ActionCode = 8;
const FLIP_SWITCH: ActionCode = 10;
const STUNNED: ActionCode = 15;
const SHOOT: ActionCode = 17;

const WALK_SPEED: i32 = 25;
const SLIDE_SPEED: i32 = 25;
const UNMOUNT_TIME: u32 = 30;
const TIME_UNTIL_SHOOT: u32 = 500;

static TABLE: LazyLock<ActionTable<Ampton>> = LazyLock::new(|| {
    ActionTable::builder(WALK)
        .state(ActionDef::new(WALK, 4).ticks(6), Ampton::walk)
        .state(
            ActionDef::new(TURN, 1).then(FrameEnd::Chain(WALK)),
            Ampton::resume_walk,
        )
        .state(
            ActionDef::new(START_POLE, 2).ticks(4).then(FrameEnd::Chain(POLE_SLIDE)),
            Ampton::start_pole,
        )
        .state(ActionDef::new(POLE_SLIDE, 1), Ampton::pole_slide)
        .state(
            ActionDef::new(STOP_POLE, 2).ticks(4).then(FrameEnd::Chain(WALK)),
            Ampton::resume_walk,
        )
        .state(
            ActionDef::new(FLIP_SWITCH, 5).ticks(6).then(FrameEnd::Chain(WALK)),
            Ampton::resume_walk,
        )
        .state(ActionDef::new(STUNNED, 2).ticks(12), idle)
        .state(
            ActionDef::new(SHOOT, 3).ticks(6).then(FrameEnd::Chain(WALK)),
            Ampton::resume_walk,
        )
        .build()
        .expect("ampton action table")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ampton {
    walk_sound: SoundId,
    may_attack: bool,
    allow_climbing: bool,
    scream_after_defeat: bool,
    /// Extra health from variant and difficulty, kept across tuning.
    health_bonus: i32,
    shoot_timer: u32,
    pole_timer: u32,
}

impl Default for Ampton {
    fn default() -> Self {
        Self {
            walk_sound: SoundId::AMPTON_WALK,
            may_attack: false,
            allow_climbing: true,
            scream_after_defeat: false,
            health_bonus: 0,
            shoot_timer: 0,
            pole_timer: 0,
        }
    }
}

impl Ampton {
    fn health_bonus(variant: u8, difficulty: Difficulty) -> i32 {
        match variant {
            1 if difficulty > Difficulty::Hard => 1,
            2 if difficulty > Difficulty::Expert => 2,
            3 if difficulty > Difficulty::Ninja => 3,
            _ => 0,
        }
    }

    fn on_pole(body: &Body) -> bool {
        body.action_status(START_POLE) || body.action_status(POLE_SLIDE)
    }

    fn walk(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        if body.machine.frame_changed() {
            match body.machine.cursor() {
                1 => ctx.play(self.walk_sound),
                3 => ctx.play(self.walk_sound.next()),
                _ => {}
            }
        }

        let mid_x = body.mid_x();
        if mid_x & (SimConfig::TILE - 1) < WALK_SPEED {
            let map = ctx.map();
            let (tx, ty) = (mid_x >> SimConfig::CSF, body.mid_y() >> SimConfig::CSF);
            let props = map.properties_at(SimConfig::FOREGROUND_PLANE, tx, ty);

            if props.contains(TileProperties::SWITCH) {
                ctx.events.append(Event::TileTrigger { x: tx, y: ty });
                body.set_action(FLIP_SWITCH);
            } else if self.allow_climbing
                && props.contains(TileProperties::CLIMBABLE)
                && ctx.probability(600)
            {
                let rect = body.rect();
                let mut pole_below = Self::pole_across(map, body, rect.bottom());
                let mut pole_above = Self::pole_across(map, body, rect.top());
                if ctx.probability(400) {
                    pole_above = false;
                } else {
                    pole_below = false;
                }

                if pole_above || pole_below {
                    body.facing_y = if pole_above { FacingY::Up } else { FacingY::Down };
                    body.set_action(START_POLE);
                    return;
                }
            }
        }

        body.move_ahead(WALK_SPEED);

        if self.may_attack {
            self.shoot_timer += 1;
            if self.shoot_timer > TIME_UNTIL_SHOOT {
                self.shoot_timer = 0;
                ctx.spawn(Self::fire(body, ctx.config));
                body.set_action(SHOOT);
            }
        }
    }

    fn fire(body: &Body, config: &SimConfig) -> Actor {
        let rect = body.rect();
        let x = match body.facing_x {
            FacingX::Left => rect.left() + SimConfig::pixels(4),
            FacingX::Center | FacingX::Right => rect.right() - SimConfig::pixels(4),
        };
        let spec = SpawnSpec::new(
            SpeciesKey::EnemyShot,
            Position::new(x, rect.top() + SimConfig::pixels(8)),
        )
        .facing(body.facing_x);
        Actor::create(&spec, config)
    }

    /// Climbable tile at height `y` under the left edge, centre or right edge.
    fn pole_across(map: &dyn TileOracle, body: &Body, y: i32) -> bool {
        let rect = body.rect();
        [rect.left(), rect.mid_x(), rect.right() - 1]
            .into_iter()
            .any(|x| map.properties_at_point(x, y).contains(TileProperties::CLIMBABLE))
    }

    fn resume_walk(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        follow_chain(body, WALK);
    }

    fn start_pole(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.solid = false;
        body.inhibit_fall = true;
        body.velocity_y = 0;
        follow_chain(body, POLE_SLIDE);
    }

    fn pole_slide(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        let map = ctx.map();
        let rect = body.rect();
        match body.facing_y {
            FacingY::Up => {
                if Self::pole_across(map, body, rect.mid_y()) {
                    body.move_up(SLIDE_SPEED);
                } else {
                    body.facing_y = FacingY::Down;
                }
            }
            FacingY::Center | FacingY::Down => {
                if Self::pole_across(map, body, rect.bottom()) {
                    body.move_down(SLIDE_SPEED);
                } else {
                    body.facing_y = FacingY::Up;
                }
            }
        }

        self.pole_timer += 1;
        if self.pole_timer < UNMOUNT_TIME {
            return;
        }
        self.pole_timer = 0;

        let floor = map.properties_at_point(rect.mid_x(), rect.bottom());
        if floor.contains(TileProperties::SOLID_TOP) {
            body.set_action(STOP_POLE);
            body.move_x(2 * body.facing_x.sign() * WALK_SPEED);
            body.move_up(rect.bottom() & (SimConfig::TILE - 1));
            body.solid = true;
            body.inhibit_fall = false;
        }
    }
}

impl Species for Ampton {
    const KEY: SpeciesKey = SpeciesKey::Ampton;
    const CAPABILITY: Capability = Capability::Enemy;
    const SPRITE_BASE: u16 = 200;
    const EXTENT: Extent = Extent::pixels(16, 24);

    fn table() -> &'static ActionTable<Self> {
        &TABLE
    }

    fn create(spec: &SpawnSpec, config: &SimConfig) -> (Self, Body) {
        let health_bonus = Self::health_bonus(spec.variant, config.difficulty);
        let mut body = Self::body(spec);
        body.health_points = 1 + health_bonus;
        (
            Self {
                health_bonus,
                ..Self::default()
            },
            body,
        )
    }

    fn apply_tuning(&mut self, body: &mut Body, tuning: &BehaviorTuning) {
        if let Some(scream) = tuning.scream_after_defeat {
            self.scream_after_defeat = scream;
        }
        if let Some(may_attack) = tuning.may_attack {
            self.may_attack = may_attack;
        }
        if let Some(allow_climbing) = tuning.allow_climbing {
            self.allow_climbing = allow_climbing;
        }
        if let Some(sound) = tuning.movement_sound {
            self.walk_sound = sound;
        }
        if tuning.health_points.is_some() {
            body.health_points = body.health_points.saturating_add(self.health_bonus);
        }
    }

    fn restored(&mut self, body: &mut Body) {
        body.solid = !Self::on_pole(body);
        self.pole_timer = 0;
    }

    fn is_nearby(
        &mut self,
        _body: &mut Body,
        _player: Option<&Player>,
        ctx: &mut FrameContext<'_>,
    ) -> bool {
        ctx.probability(10)
    }

    fn process(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>) {
        physics::apply_gravity(body, ctx.config, GravityTier::Mid);
        physics::resolve_collision(body, ctx.map());
        if body.dead {
            settle(body);
            return;
        }

        if body.blocked.left {
            if body.facing_x == FacingX::Left {
                body.set_action(TURN);
            }
            body.facing_x = FacingX::Right;
        } else if body.blocked.right {
            if body.facing_x == FacingX::Right {
                body.set_action(TURN);
            }
            body.facing_x = FacingX::Left;
        } else if body.machine.bound_code() == Some(WALK)
            && body.is_landed()
            && physics::cliff_ahead(body, ctx.map())
        {
            body.set_action(TURN);
            body.facing_x = body.facing_x.flip();
        }

        Self::table().dispatch(self, body, ctx);
        body.advance_animation();
    }

    fn touched_by(&mut self, body: &mut Body, other: &mut Toucher<'_>, ctx: &mut FrameContext<'_>) {
        match other.capability() {
            Capability::Projectile => {
                other.mark_dead();
                if body.take_hit() == HitOutcome::Defeated {
                    if self.scream_after_defeat {
                        ctx.play(SoundId::ROBOT_STUN);
                    }
                    body.stun(STUNNED, ctx.config);
                }
            }
            Capability::Player => {
                let rect = body.rect();
                if let Some(player) = other.as_player() {
                    player.push_out_of(rect);
                }
            }
            Capability::Enemy | Capability::Hazard | Capability::Inert => {}
        }
    }
}

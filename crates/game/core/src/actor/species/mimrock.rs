//! Rock-shaped ambusher that sits still until the player comes close.

use std::sync::LazyLock;

use super::{Species, SpeciesKey, idle};
use crate::action::{ActionCode, ActionDef, ActionTable, FrameEnd};
use crate::activation::{Approach, ProximityWindow};
use crate::actor::{Body, HitOutcome, Player, SpawnSpec};
use crate::collision::{Capability, Toucher};
use crate::config::SimConfig;
use crate::context::FrameContext;
use crate::geometry::Extent;

const SIT: ActionCode = 0;
const WALK: ActionCode = 1;
const JUMP: ActionCode = 7;
const BOUNCE: ActionCode = 10;
const STUNNED: ActionCode = 12;

const WINDOW: ProximityWindow = ProximityWindow::tiles(10, 3);
const WALK_SPEED: i32 = 10;
const JUMP_SPEED: i32 = 30;
const JUMP_HEIGHT: i32 = 148;
const BOUNCE_HEIGHT: i32 = 74;
const JUMP_TIME: i32 = 500;
const BOUNCE_TIME: i32 = 250;
const TIME_UNTIL_LOOK: i32 = 100;

static TABLE: LazyLock<ActionTable<Mimrock>> = LazyLock::new(|| {
    ActionTable::builder(SIT)
        .state(ActionDef::new(SIT, 1), Mimrock::sit)
        .state(
            ActionDef::new(WALK, 6).ticks(6).then(FrameEnd::Chain(SIT)),
            Mimrock::walk,
        )
        .state(ActionDef::new(JUMP, 3).ticks(6).then(FrameEnd::Hold), Mimrock::jump)
        .state(ActionDef::new(BOUNCE, 1).then(FrameEnd::Hold), Mimrock::bounce)
        .state(ActionDef::new(STUNNED, 2).ticks(12), idle)
        .build()
        .expect("mimrock action table")
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mimrock {
    /// Counts down the current jump or bounce, then the look-around pause.
    timer: i32,
}

impl Mimrock {
    fn sit(&mut self, _body: &mut Body, _ctx: &mut FrameContext<'_>) {
        if self.timer > 0 {
            self.timer -= 1;
        }
    }

    fn walk(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(WALK_SPEED);
        if body.action_status(SIT) {
            body.set_action(SIT);
        }
    }

    fn jump(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(JUMP_SPEED);
        self.timer -= 1;
        if body.is_landed() {
            self.timer = BOUNCE_TIME;
            body.velocity_y = -BOUNCE_HEIGHT;
            body.set_action(BOUNCE);
        }
    }

    fn bounce(&mut self, body: &mut Body, _ctx: &mut FrameContext<'_>) {
        body.move_ahead(JUMP_SPEED);
        self.timer -= 1;
        if self.timer <= 0 || body.blocked.down {
            self.timer = TIME_UNTIL_LOOK;
            body.set_action(SIT);
        }
    }
}

impl Species for Mimrock {
    const KEY: SpeciesKey = SpeciesKey::Mimrock;
    const CAPABILITY: Capability = Capability::Enemy;
    const SPRITE_BASE: u16 = 300;
    const EXTENT: Extent = Extent::pixels(16, 16);

    fn table() -> &'static ActionTable<Self> {
        &TABLE
    }

    fn create(spec: &SpawnSpec, _config: &SimConfig) -> (Self, Body) {
        let mut body = Self::body(spec);
        body.honor_priority = false;
        (Self::default(), body)
    }

    fn is_nearby(
        &mut self,
        body: &mut Body,
        player: Option<&Player>,
        _ctx: &mut FrameContext<'_>,
    ) -> bool {
        let Some(player) = player else {
            return true;
        };
        if body.dead || player.dead || self.timer > 0 {
            return true;
        }
        if !body.blocked.down || body.action_status(JUMP) || body.action_status(BOUNCE) {
            return true;
        }

        match WINDOW.classify(player.mid_x() - body.mid_x()) {
            Approach::OutOfRange => {}
            Approach::Follow(facing) => {
                body.facing_x = facing;
                body.set_action(WALK);
            }
            Approach::Trigger(facing) => {
                body.facing_x = facing;
                body.velocity_y = -JUMP_HEIGHT;
                self.timer = JUMP_TIME;
                body.set_action(JUMP);
            }
        }
        true
    }

    fn touched_by(&mut self, body: &mut Body, other: &mut Toucher<'_>, ctx: &mut FrameContext<'_>) {
        // Disguised as a rock: shots pass through and nothing hurts.
        if body.action_number(SIT) {
            return;
        }

        match other.capability() {
            Capability::Projectile => {
                other.mark_dead();
                if body.take_hit() == HitOutcome::Defeated {
                    body.stun(STUNNED, ctx.config);
                }
            }
            Capability::Player => {
                if body.action_status(WALK) || body.action_status(JUMP) || body.action_status(BOUNCE)
                {
                    other.mark_dead();
                }
            }
            Capability::Enemy | Capability::Hazard | Capability::Inert => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::species::testing::Bench;
    use crate::actor::{Actor, FacingX};
    use crate::geometry::Position;

    const ROWS: [&str; 4] = [
        "................................",
        "................................",
        "................................",
        "################################",
    ];

    fn settled(bench: &mut Bench, tx: i32) -> Actor {
        let mut rock = bench.spawn(SpawnSpec::new(
            SpeciesKey::Mimrock,
            Position::new(SimConfig::tiles(tx), SimConfig::tiles(2) - 40),
        ));
        bench.run(&mut rock, 20);
        assert!(rock.body.blocked.down);
        rock
    }

    fn player_at_distance(rock: &Actor, dx: i32) -> Player {
        let mut player = Player::new(Position::new(0, SimConfig::tiles(1)));
        player.position.x = rock.body.mid_x() + dx - player.extent.width / 2;
        assert_eq!(player.mid_x() - rock.body.mid_x(), dx);
        player
    }

    #[test]
    fn follow_window_turns_and_walks() {
        let mut bench = Bench::new(&ROWS);
        let mut rock = settled(&mut bench, 15);
        let player = player_at_distance(&rock, -SimConfig::tiles(5));

        assert!(bench.is_nearby(&mut rock, &player));
        assert_eq!(rock.body.facing_x, FacingX::Left);
        assert!(rock.body.action_status(WALK));

        let x = rock.body.position.x;
        bench.run(&mut rock, 3);
        assert!(rock.body.position.x < x);
    }

    #[test]
    fn trigger_window_jumps_with_the_full_impulse() {
        let mut bench = Bench::new(&ROWS);
        let mut rock = settled(&mut bench, 15);
        let player = player_at_distance(&rock, SimConfig::tiles(2));

        assert!(bench.is_nearby(&mut rock, &player));
        assert_eq!(rock.body.facing_x, FacingX::Right);
        assert!(rock.body.action_number(JUMP));
        assert_eq!(rock.body.velocity_y, -JUMP_HEIGHT);

        bench.process(&mut rock);
        assert!(!rock.body.blocked.down);
    }

    #[test]
    fn jump_lands_into_a_bounce_then_sits() {
        let mut bench = Bench::new(&ROWS);
        let mut rock = settled(&mut bench, 15);
        let player = player_at_distance(&rock, SimConfig::tiles(1));
        bench.is_nearby(&mut rock, &player);

        let mut saw_bounce = false;
        for _ in 0..400 {
            bench.process(&mut rock);
            saw_bounce |= rock.body.action_status(BOUNCE);
            if saw_bounce && rock.body.action_number(SIT) {
                break;
            }
        }
        assert!(saw_bounce);
        assert!(rock.body.action_number(SIT));
    }

    #[test]
    fn out_of_range_player_leaves_the_rock_sitting() {
        let mut bench = Bench::new(&ROWS);
        let mut rock = settled(&mut bench, 15);
        let player = player_at_distance(&rock, SimConfig::tiles(12));
        assert!(bench.is_nearby(&mut rock, &player));
        assert!(rock.body.action_number(SIT));
    }

    #[test]
    fn sitting_rock_ignores_shots_and_players() {
        let mut bench = Bench::new(&ROWS);
        let mut rock = settled(&mut bench, 15);
        let mut shot = bench.spawn(SpawnSpec::new(SpeciesKey::PlayerShot, rock.body.position));
        bench.touch(&mut rock, &mut shot);
        assert!(!shot.body.dead);
        assert!(!rock.body.dead);

        let mut player = Player::new(rock.body.position);
        bench.touch_player(&mut rock, &mut player);
        assert!(!player.dead);
    }

    #[test]
    fn awake_rock_is_stunned_by_one_shot_and_kills_on_contact() {
        let mut bench = Bench::new(&ROWS);
        let mut rock = settled(&mut bench, 15);
        rock.body.set_action(WALK);

        let mut player = Player::new(rock.body.position);
        bench.touch_player(&mut rock, &mut player);
        assert!(player.dead);

        let mut shot = bench.spawn(SpawnSpec::new(SpeciesKey::PlayerShot, rock.body.position));
        bench.touch(&mut rock, &mut shot);
        assert!(shot.body.dead);
        assert!(rock.body.dead);
        assert!(rock.body.action_status(STUNNED));
    }
}

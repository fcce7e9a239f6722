//! Services handle passed to behaviours for the duration of one actor tick.

use crate::actor::Actor;
use crate::config::SimConfig;
use crate::env::{GameEnv, TileOracle, compute_seed};
use crate::events::{DialogKey, EventQueue, SoundId};

/// Everything a handler may touch besides its own actor.
///
/// Random rolls are keyed by `(seed, frame, slot, roll)` so the outcome of
/// every `probability` call is reproducible from the world state alone.
pub struct FrameContext<'a> {
    pub env: GameEnv<'a>,
    pub config: &'a SimConfig,
    pub events: &'a mut EventQueue,
    spawns: &'a mut Vec<Actor>,
    seed: u64,
    frame: u64,
    slot: u32,
    rolls: u32,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        env: GameEnv<'a>,
        config: &'a SimConfig,
        events: &'a mut EventQueue,
        spawns: &'a mut Vec<Actor>,
    ) -> Self {
        Self {
            env,
            config,
            events,
            spawns,
            seed: 0,
            frame: 0,
            slot: 0,
            rolls: 0,
        }
    }

    /// Keys subsequent random rolls to one actor's turn.
    pub fn for_slot(mut self, seed: u64, frame: u64, slot: u32) -> Self {
        self.seed = seed;
        self.frame = frame;
        self.slot = slot;
        self.rolls = 0;
        self
    }

    pub fn map(&self) -> &'a dyn TileOracle {
        self.env.map()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// True with probability `per_mille / 1000`.
    pub fn probability(&mut self, per_mille: u32) -> bool {
        let seed = compute_seed(self.seed, self.frame, self.slot, self.rolls);
        self.rolls += 1;
        self.env.rng().probability(seed, per_mille)
    }

    /// Queues an actor to join the world after the current pass.
    pub fn spawn(&mut self, actor: Actor) {
        tracing::debug!(species = %actor.key(), position = %actor.body.position, "spawn queued");
        self.spawns.push(actor);
    }

    pub fn play(&mut self, sound: SoundId) {
        self.events.play(sound);
    }

    pub fn dialog(&mut self, key: DialogKey) {
        self.events.dialog(key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::env::{GridMap, RngOracle};

    /// Returns a fixed draw and records every seed it was asked for.
    struct ScriptedRng {
        draw: u32,
        seeds: Mutex<Vec<u64>>,
    }

    impl ScriptedRng {
        fn new(draw: u32) -> Self {
            Self {
                draw,
                seeds: Mutex::new(Vec::new()),
            }
        }
    }

    impl RngOracle for ScriptedRng {
        fn next_u32(&self, seed: u64) -> u32 {
            self.seeds.lock().unwrap().push(seed);
            self.draw
        }
    }

    #[test]
    fn probability_compares_the_draw_per_mille() {
        let map = GridMap::from_ascii(&["."]).unwrap();
        let rng = ScriptedRng::new(1599);
        let config = SimConfig::default();
        let (mut events, mut spawns) = (EventQueue::new(), Vec::new());
        let mut ctx = FrameContext::new(
            GameEnv::from_oracles(&map, &rng),
            &config,
            &mut events,
            &mut spawns,
        );

        assert!(ctx.probability(600));
        assert!(!ctx.probability(599));
    }

    #[test]
    fn each_roll_gets_a_fresh_seed() {
        let map = GridMap::from_ascii(&["."]).unwrap();
        let rng = ScriptedRng::new(0);
        let config = SimConfig::default();
        let (mut events, mut spawns) = (EventQueue::new(), Vec::new());
        let mut ctx = FrameContext::new(
            GameEnv::from_oracles(&map, &rng),
            &config,
            &mut events,
            &mut spawns,
        )
        .for_slot(11, 4, 2);

        ctx.probability(500);
        ctx.probability(500);
        drop(ctx);

        let seeds = rng.seeds.lock().unwrap().clone();
        assert_eq!(
            seeds,
            vec![compute_seed(11, 4, 2, 0), compute_seed(11, 4, 2, 1)]
        );
    }
}

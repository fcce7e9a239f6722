//! Arena of live actors and the per-frame driver.
//!
//! Actors run in container order. Behaviours never touch the container:
//! spawns are queued and appended after the pass, and actors that stop
//! existing are swept once every actor has had its turn.

use crate::actor::{Actor, Player, SpawnSpec};
use crate::collision::Toucher;
use crate::config::{Difficulty, SimConfig};
use crate::context::FrameContext;
use crate::env::GameEnv;
use crate::events::EventQueue;
use crate::geometry::Rect;

/// Counters describing one [`World::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub frame: u64,
    pub processed: usize,
    pub spawned: usize,
    pub removed: usize,
}

#[derive(Clone, Debug)]
pub struct World {
    config: SimConfig,
    seed: u64,
    frame: u64,
    pub(crate) actors: Vec<Actor>,
    player: Option<Player>,
    viewport: Option<Rect>,
}

impl World {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            frame: 0,
            actors: Vec::new(),
            player: None,
            viewport: None,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub(crate) fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, index: usize) -> Option<&Actor> {
        self.actors.get(index)
    }

    pub fn actor_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.actors.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    /// Area the camera shows; actors inside it count as on screen.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    /// Builds and appends the actor described by `spec`.
    pub fn spawn(&mut self, spec: &SpawnSpec, env: &GameEnv<'_>) -> Option<usize> {
        let actor = Actor::spawn(spec, env, &self.config);
        self.insert(actor)
    }

    /// Appends `actor` unless the container is full.
    pub fn insert(&mut self, actor: Actor) -> Option<usize> {
        if self.actors.len() >= SimConfig::MAX_ACTORS {
            tracing::warn!(
                species = %actor.key(),
                limit = SimConfig::MAX_ACTORS,
                "actor limit reached; spawn dropped"
            );
            return None;
        }
        tracing::debug!(species = %actor.key(), position = %actor.body.position, "actor spawned");
        self.actors.push(actor);
        Some(self.actors.len() - 1)
    }

    /// Runs one frame: every existing actor gets its activation check, its
    /// `process` tick and its touches, in container order.
    pub fn step(&mut self, env: GameEnv<'_>, events: &mut EventQueue) -> StepReport {
        let mut spawned: Vec<Actor> = Vec::new();
        let mut report = StepReport {
            frame: self.frame,
            ..StepReport::default()
        };

        for index in 0..self.actors.len() {
            let (_, tail) = self.actors.split_at_mut(index);
            let Some((actor, rest)) = tail.split_first_mut() else {
                break;
            };
            if !actor.body.exists {
                continue;
            }

            let mut ctx = FrameContext::new(env, &self.config, &mut *events, &mut spawned)
                .for_slot(self.seed, self.frame, index as u32);

            if actor.is_nearby(self.player.as_ref(), &mut ctx) && !actor.body.active {
                tracing::debug!(index, species = %actor.key(), "actor activated");
                actor.body.active = true;
            }
            if actor.body.active {
                actor.process(&mut ctx);
                report.processed += 1;
            }

            if let Some(viewport) = self.viewport {
                actor.body.onscreen = actor.body.rect().overlaps(&viewport);
                actor.body.has_been_onscreen |= actor.body.onscreen;
            }

            for other in rest.iter_mut() {
                if !actor.body.exists || !other.body.exists {
                    continue;
                }
                if !actor.body.rect().overlaps(&other.body.rect()) {
                    continue;
                }
                let (mine, theirs) = (actor.capability(), other.capability());
                actor.touched_by(
                    &mut Toucher::Actor {
                        capability: theirs,
                        body: &mut other.body,
                    },
                    &mut ctx,
                );
                other.touched_by(
                    &mut Toucher::Actor {
                        capability: mine,
                        body: &mut actor.body,
                    },
                    &mut ctx,
                );
            }

            if let Some(player) = self.player.as_mut() {
                if actor.body.exists && actor.body.rect().overlaps(&player.rect()) {
                    actor.touched_by(&mut Toucher::Player(player), &mut ctx);
                }
            }
        }

        for actor in spawned {
            if self.insert(actor).is_some() {
                report.spawned += 1;
            }
        }

        let before = self.actors.len();
        self.actors.retain(|actor| actor.body.exists);
        report.removed = before - self.actors.len();
        if report.removed > 0 {
            tracing::debug!(frame = self.frame, removed = report.removed, "swept actors");
        }

        self.frame += 1;
        tracing::trace!(?report, "frame complete");
        report
    }
}

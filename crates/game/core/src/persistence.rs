//! Save and restore of the actor container.
//!
//! A save blob is `sha256(payload) || payload`, where the payload is the
//! bincode encoding of a [`SaveGame`]. Restoring decodes and validates the
//! whole blob before the world is touched, so a failed load leaves the
//! previous state intact.
//!
//! Body state that is not saved (velocity, blink and stun countdowns,
//! pending movement) is reset on restore, and each species re-derives the
//! fields that follow from its restored action state.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::actor::{Actor, Blocked, Body, Player, SpawnSpec, SpeciesKey};
use crate::config::{Difficulty, SimConfig};
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::Position;
use crate::world::World;

const DIGEST_LEN: usize = 32;

/// Persisted attributes of one actor, in wire order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub kind: SpeciesKey,
    pub x: i32,
    pub y: i32,
    pub dead: bool,
    pub onscreen: bool,
    pub has_been_onscreen: bool,
    pub exists: bool,
    pub blocked_down: bool,
    pub blocked_up: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub health_points: i32,
    pub can_be_damaged: bool,
    pub can_support_player: bool,
    pub inhibit_fall: bool,
    pub honor_priority: bool,
    pub sprite: u16,
}

impl ActorRecord {
    pub fn capture(actor: &Actor) -> Self {
        let body = &actor.body;
        Self {
            kind: actor.key(),
            x: body.position.x,
            y: body.position.y,
            dead: body.dead,
            onscreen: body.onscreen,
            has_been_onscreen: body.has_been_onscreen,
            exists: body.exists,
            blocked_down: body.blocked.down,
            blocked_up: body.blocked.up,
            blocked_left: body.blocked.left,
            blocked_right: body.blocked.right,
            health_points: body.health_points,
            can_be_damaged: body.can_be_damaged,
            can_support_player: body.can_support_player,
            inhibit_fall: body.inhibit_fall,
            honor_priority: body.honor_priority,
            sprite: body.sprite,
        }
    }

    fn apply(&self, body: &mut Body, config: &SimConfig) {
        body.position = Position::new(self.x, self.y);
        body.dead = self.dead;
        body.onscreen = self.onscreen;
        body.has_been_onscreen = self.has_been_onscreen;
        body.exists = self.exists;
        body.blocked = Blocked {
            up: self.blocked_up,
            down: self.blocked_down,
            left: self.blocked_left,
            right: self.blocked_right,
        };
        body.health_points = self.health_points;
        body.can_be_damaged = self.can_be_damaged;
        body.can_support_player = self.can_support_player;
        body.inhibit_fall = self.inhibit_fall;
        body.honor_priority = self.honor_priority;
        body.pending_dx = 0;
        body.pending_dy = 0;
        body.velocity_y = 0;
        body.blink_timer = 0;
        body.solid = true;

        if self.kind == SpeciesKey::Inert {
            body.sprite = self.sprite;
        } else {
            body.restore_sprite(self.sprite);
        }

        if self.kind.is_transient() {
            body.exists = false;
        }
        body.stun_timer = if self.dead && body.exists {
            config.stun_duration.max(1)
        } else {
            0
        };
    }
}

/// Frame counter, session difficulty, tracked player and one record per
/// container slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    pub frame: u64,
    pub difficulty: Difficulty,
    pub player: Option<Player>,
    pub actor_count: u32,
    pub actors: Vec<ActorRecord>,
}

impl SaveGame {
    pub fn capture(world: &World) -> Self {
        let actors: Vec<_> = world.actors().iter().map(ActorRecord::capture).collect();
        Self {
            frame: world.frame(),
            difficulty: world.config().difficulty,
            player: world.player().cloned(),
            actor_count: actors.len() as u32,
            actors,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersistError> {
        let payload = bincode::serialize(self).map_err(|e| PersistError::Encode(e.to_string()))?;
        let mut blob = Vec::with_capacity(DIGEST_LEN + payload.len());
        blob.extend_from_slice(&Sha256::digest(&payload));
        blob.extend_from_slice(&payload);
        Ok(blob)
    }

    /// Decodes and validates a blob produced by [`SaveGame::encode`].
    pub fn decode(blob: &[u8]) -> Result<Self, PersistError> {
        if blob.len() <= DIGEST_LEN {
            return Err(PersistError::Truncated { len: blob.len() });
        }
        let (digest, payload) = blob.split_at(DIGEST_LEN);
        if Sha256::digest(payload).as_slice() != digest {
            return Err(PersistError::Corrupted);
        }

        let save: SaveGame =
            bincode::deserialize(payload).map_err(|e| PersistError::Decode(e.to_string()))?;

        let declared = save.actor_count as usize;
        if declared != save.actors.len() {
            return Err(PersistError::SizeMismatch {
                declared,
                found: save.actors.len(),
            });
        }
        if declared > SimConfig::MAX_ACTORS {
            return Err(PersistError::TooManyActors {
                saved: declared,
                limit: SimConfig::MAX_ACTORS,
            });
        }
        Ok(save)
    }

    /// SHA-256 header of a blob, if it is long enough to carry one.
    pub fn digest(blob: &[u8]) -> Option<&[u8]> {
        blob.get(..DIGEST_LEN)
    }
}

/// Errors raised while saving or restoring.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("save blob of {len} bytes is too short")]
    Truncated { len: usize },

    #[error("save blob digest does not match its payload")]
    Corrupted,

    #[error("save declares {declared} actors but holds {found}")]
    SizeMismatch { declared: usize, found: usize },

    #[error("save holds {saved} actors, more than the limit of {limit}")]
    TooManyActors { saved: usize, limit: usize },

    #[error("failed to decode save payload: {0}")]
    Decode(String),

    #[error("failed to encode save payload: {0}")]
    Encode(String),
}

impl GameError for PersistError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Encode(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "SAVE_TRUNCATED",
            Self::Corrupted => "SAVE_CORRUPTED",
            Self::SizeMismatch { .. } => "SAVE_SIZE_MISMATCH",
            Self::TooManyActors { .. } => "SAVE_TOO_MANY_ACTORS",
            Self::Decode(_) => "SAVE_DECODE",
            Self::Encode(_) => "SAVE_ENCODE",
        }
    }
}

impl World {
    /// Serializes the actor container into a save blob.
    pub fn save(&self) -> Result<Vec<u8>, PersistError> {
        let blob = SaveGame::capture(self).encode()?;
        tracing::info!(frame = self.frame(), actors = self.len(), bytes = blob.len(), "world saved");
        Ok(blob)
    }

    /// Restores the actor container from `blob`. On error the world is left
    /// exactly as it was.
    pub fn restore(&mut self, blob: &[u8], env: &GameEnv<'_>) -> Result<(), PersistError> {
        let save = SaveGame::decode(blob).inspect_err(|err| {
            tracing::warn!(error = err.error_code(), "save rejected: {err}");
        })?;
        self.apply_save(&save, env);
        Ok(())
    }

    /// Applies an already validated save.
    ///
    /// Slots beyond the live container are filled with placeholders first;
    /// live actors beyond the saved count are left as they are. A save
    /// without a player keeps the live one.
    pub fn apply_save(&mut self, save: &SaveGame, env: &GameEnv<'_>) {
        self.set_difficulty(save.difficulty);
        if let Some(player) = &save.player {
            self.set_player(player.clone());
        }

        let live = self.actors.len();
        if save.actors.len() > live {
            self.actors.resize_with(save.actors.len(), Actor::placeholder);
        }

        let config = self.config().clone();
        for (actor, record) in self.actors.iter_mut().zip(&save.actors) {
            if actor.key() != record.kind {
                let spec = SpawnSpec::new(record.kind, Position::new(record.x, record.y));
                *actor = Actor::spawn(&spec, env, &config);
            }
            record.apply(&mut actor.body, &config);
            actor.restored();
        }

        self.set_frame(save.frame);
        tracing::info!(
            frame = save.frame,
            difficulty = %save.difficulty,
            player = save.player.is_some(),
            restored = save.actors.len(),
            placeholders = save.actors.len().saturating_sub(live),
            "world restored"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::FacingX;
    use crate::env::{GridMap, PcgRng};
    use crate::events::EventQueue;

    const STUN_CODE: u16 = 15;

    const ROOM: [&str; 4] = [
        "#..............#",
        "#..............#",
        "#..............#",
        "################",
    ];

    fn populated(env: &GameEnv<'_>) -> World {
        let mut world = World::new(SimConfig::default(), 3);
        for spec in [
            SpawnSpec::at_tile(SpeciesKey::Mimrock, 2, 1),
            SpawnSpec::at_tile(SpeciesKey::Ampton, 6, 1).facing(FacingX::Right),
            SpawnSpec::at_tile(SpeciesKey::Grabbiter, 10, 1),
            SpawnSpec::at_tile(SpeciesKey::PlayerShot, 4, 1),
        ] {
            world.spawn(&spec, env).unwrap();
        }
        world
    }

    fn records(world: &World) -> Vec<ActorRecord> {
        world.actors().iter().map(ActorRecord::capture).collect()
    }

    #[test]
    fn round_trip_reproduces_every_record() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let mut world = populated(&env);
        let mut events = EventQueue::new();
        for _ in 0..5 {
            world.step(env, &mut events);
        }
        world.actor_mut(0).unwrap().body.has_been_onscreen = true;
        world.set_player(Player::new(Position::from_tile(8, 1)).with_rations(2));

        let blob = world.save().unwrap();
        let mut expected = records(&world);
        for record in &mut expected {
            if record.kind.is_transient() {
                record.exists = false;
            }
        }

        let mut fresh = World::new(SimConfig::default(), 3);
        fresh.restore(&blob, &env).unwrap();
        assert_eq!(records(&fresh), expected);
        assert_eq!(fresh.frame(), world.frame());
        assert_eq!(fresh.player(), world.player());
    }

    #[test]
    fn lethal_hit_after_restore_still_stuns() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let mut world = World::new(SimConfig::default(), 3);
        let robot = world
            .spawn(&SpawnSpec::at_tile(SpeciesKey::Ampton, 6, 1), &env)
            .unwrap();
        let blob = world.save().unwrap();

        let config = world.config().clone();
        {
            let body = &mut world.actor_mut(robot).unwrap().body;
            body.blink_timer = 9;
            body.velocity_y = 40;
            body.stun(STUN_CODE, &config);
        }
        world.restore(&blob, &env).unwrap();
        let body = &world.actors()[robot].body;
        assert!(!body.dead);
        assert!(!body.is_stunned());
        assert_eq!((body.blink_timer, body.velocity_y), (0, 0));
        assert!(body.solid);

        let position = body.position;
        let shot = SpawnSpec::new(SpeciesKey::PlayerShot, position).facing(FacingX::Right);
        world.spawn(&shot, &env).unwrap();
        let mut events = EventQueue::new();
        world.step(env, &mut events);

        let body = &world.actors()[robot].body;
        assert!(body.dead);
        assert_eq!(body.health_points, 0);
        assert!(body.is_stunned());
        assert!(body.action_status(STUN_CODE));
    }

    #[test]
    fn dead_records_restart_their_stun() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let config = SimConfig::default().with_stun_duration(40);
        let mut world = World::new(config.clone(), 3);
        world
            .spawn(&SpawnSpec::at_tile(SpeciesKey::Ampton, 6, 1), &env)
            .unwrap();
        world.actor_mut(0).unwrap().body.stun(STUN_CODE, &config);
        let blob = world.save().unwrap();

        let mut fresh = World::new(config, 3);
        fresh.restore(&blob, &env).unwrap();
        let body = &fresh.actors()[0].body;
        assert!(body.dead);
        assert_eq!(body.stun_timer, 40);
        assert!(body.action_status(STUN_CODE));
    }

    #[test]
    fn restore_reverts_the_player_and_difficulty() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let expert = SimConfig::default().with_difficulty(Difficulty::Expert);
        let mut world = World::new(expert, 3);
        world.set_player(Player::new(Position::from_tile(4, 1)).with_rations(1));
        let blob = world.save().unwrap();

        let player = world.player_mut().unwrap();
        assert!(player.consume_ration());
        player.kill();

        let mut fresh = World::new(SimConfig::default(), 3);
        fresh.restore(&blob, &env).unwrap();
        world.restore(&blob, &env).unwrap();
        for restored in [&world, &fresh] {
            let player = restored.player().unwrap();
            assert_eq!(player.rations, 1);
            assert!(!player.dead);
            assert_eq!(player.position, Position::from_tile(4, 1));
            assert_eq!(restored.config().difficulty, Difficulty::Expert);
        }
    }

    #[test]
    fn saves_without_a_player_keep_the_live_one() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let blob = populated(&env).save().unwrap();

        let mut world = World::new(SimConfig::default(), 3);
        let live = Player::new(Position::from_tile(12, 1)).with_rations(3);
        world.set_player(live.clone());
        world.restore(&blob, &env).unwrap();
        assert_eq!(world.player(), Some(&live));
    }

    #[test]
    fn larger_saves_append_placeholders() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let saved = populated(&env);
        let blob = saved.save().unwrap();

        let mut world = World::new(SimConfig::default(), 3);
        world
            .spawn(&SpawnSpec::at_tile(SpeciesKey::Mimrock, 2, 1), &env)
            .unwrap();
        world.restore(&blob, &env).unwrap();

        assert_eq!(world.len(), 4);
        let kinds: Vec<_> = world.actors().iter().map(Actor::key).collect();
        assert_eq!(
            kinds,
            vec![
                SpeciesKey::Mimrock,
                SpeciesKey::Ampton,
                SpeciesKey::Grabbiter,
                SpeciesKey::PlayerShot
            ]
        );
        assert!(!world.actors()[3].body.exists);
    }

    #[test]
    fn extra_live_actors_are_left_alone() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let mut small = World::new(SimConfig::default(), 3);
        small
            .spawn(&SpawnSpec::at_tile(SpeciesKey::Grabbiter, 10, 1), &env)
            .unwrap();
        let blob = small.save().unwrap();

        let mut world = populated(&env);
        let tail_before = records(&world)[1..].to_vec();
        world.restore(&blob, &env).unwrap();
        assert_eq!(world.len(), 4);
        assert_eq!(world.actors()[0].key(), SpeciesKey::Grabbiter);
        assert_eq!(records(&world)[1..].to_vec(), tail_before);
    }

    #[test]
    fn damaged_blobs_leave_the_world_untouched() {
        let map = GridMap::from_ascii(&ROOM).unwrap();
        let rng = PcgRng;
        let env = GameEnv::from_oracles(&map, &rng);
        let mut world = populated(&env);
        let blob = world.save().unwrap();
        let before = records(&world);

        let truncated = &blob[..10];
        assert_eq!(
            world.restore(truncated, &env),
            Err(PersistError::Truncated { len: 10 })
        );

        let mut flipped = blob.clone();
        let last = flipped.len() - 1;
        flipped[last] ^= 0xff;
        assert_eq!(world.restore(&flipped, &env), Err(PersistError::Corrupted));

        let cut = &blob[..blob.len() - 3];
        assert!(world.restore(cut, &env).is_err());

        assert_eq!(records(&world), before);
    }

    #[test]
    fn oversized_saves_are_rejected() {
        let save = SaveGame {
            frame: 0,
            difficulty: Difficulty::Normal,
            player: None,
            actor_count: (SimConfig::MAX_ACTORS + 1) as u32,
            actors: vec![ActorRecord::capture(&Actor::placeholder()); SimConfig::MAX_ACTORS + 1],
        };
        let blob = save.encode().unwrap();
        let err = SaveGame::decode(&blob).unwrap_err();
        assert_eq!(err.error_code(), "SAVE_TOO_MANY_ACTORS");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn size_field_must_match_the_records() {
        let save = SaveGame {
            frame: 0,
            difficulty: Difficulty::Normal,
            player: None,
            actor_count: 3,
            actors: vec![ActorRecord::capture(&Actor::placeholder())],
        };
        let blob = save.encode().unwrap();
        assert_eq!(
            SaveGame::decode(&blob),
            Err(PersistError::SizeMismatch {
                declared: 3,
                found: 1
            })
        );
    }
}

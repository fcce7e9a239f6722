//! Pairwise touch protocol between actors and the tracked player.
//!
//! Each overlapping pair is offered to both participants, one after the
//! other, and the two calls are not symmetric: the receiver decides what the
//! touch means based on the [`Capability`] of the other side. Whichever side
//! marks the other dead first wins, because every reaction is skipped once
//! either participant is dead.

use crate::actor::{Body, Player};
use crate::geometry::Rect;

/// Abstract classification used to pick a touch reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Hostile creature that can be shot.
    Enemy,
    /// Player shot: damages what it touches and is consumed.
    Projectile,
    /// Enemy shot or similar: lethal to the player.
    Hazard,
    Player,
    /// Takes part in nothing.
    Inert,
}

/// The other participant of a touch, as seen by the receiver.
pub enum Toucher<'a> {
    Actor {
        capability: Capability,
        body: &'a mut Body,
    },
    Player(&'a mut Player),
}

impl Toucher<'_> {
    pub fn capability(&self) -> Capability {
        match self {
            Self::Actor { capability, .. } => *capability,
            Self::Player(_) => Capability::Player,
        }
    }

    pub fn is_dead(&self) -> bool {
        match self {
            Self::Actor { body, .. } => body.dead,
            Self::Player(player) => player.dead,
        }
    }

    /// Marks the other side dead; for projectiles this means consumed.
    pub fn mark_dead(&mut self) {
        match self {
            Self::Actor { body, .. } => body.dead = true,
            Self::Player(player) => player.kill(),
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Self::Actor { body, .. } => body.rect(),
            Self::Player(player) => player.rect(),
        }
    }

    pub fn mid_x(&self) -> i32 {
        self.rect().mid_x()
    }

    pub fn as_player(&mut self) -> Option<&mut Player> {
        match self {
            Self::Player(player) => Some(player),
            Self::Actor { .. } => None,
        }
    }
}

/// True when a touch between `receiver` and `other` must be ignored.
pub fn touch_suppressed(receiver: &Body, other: &Toucher<'_>) -> bool {
    receiver.dead || other.is_dead() || !receiver.exists
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionStateMachine;
    use crate::geometry::{Extent, Position};

    #[test]
    fn dead_participants_suppress_touches() {
        let receiver = Body::new(
            Position::ORIGIN,
            Extent::pixels(16, 16),
            ActionStateMachine::inert(),
            0,
        );
        let mut player = Player::new(Position::ORIGIN);
        let mut other = Toucher::Player(&mut player);
        assert!(!touch_suppressed(&receiver, &other));
        assert_eq!(other.capability(), Capability::Player);

        other.mark_dead();
        assert!(touch_suppressed(&receiver, &other));
    }
}

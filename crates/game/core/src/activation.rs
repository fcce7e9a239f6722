//! Proximity gate deciding how a dormant actor reacts to the player.

use crate::actor::FacingX;
use crate::config::SimConfig;

/// Where the player stands relative to a [`ProximityWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approach {
    OutOfRange,
    /// Inside the follow window only: turn toward the player and approach.
    Follow(FacingX),
    /// Inside the nested trigger window: start the scripted transition.
    Trigger(FacingX),
}

/// Two nested, open horizontal windows centred on the actor, in sub-units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProximityWindow {
    pub follow: i32,
    pub trigger: i32,
}

impl ProximityWindow {
    pub const fn new(follow: i32, trigger: i32) -> Self {
        Self { follow, trigger }
    }

    /// Window sizes given in whole tiles.
    pub const fn tiles(follow: i32, trigger: i32) -> Self {
        Self::new(SimConfig::tiles(follow), SimConfig::tiles(trigger))
    }

    /// Classifies the signed horizontal distance `dx = player - actor`.
    pub fn classify(&self, dx: i32) -> Approach {
        if dx <= -self.follow || dx >= self.follow {
            return Approach::OutOfRange;
        }
        let facing = FacingX::toward(dx);
        if dx > -self.trigger && dx < self.trigger {
            Approach::Trigger(facing)
        } else {
            Approach::Follow(facing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: ProximityWindow = ProximityWindow::tiles(10, 3);

    #[test]
    fn nested_windows() {
        assert_eq!(
            WINDOW.classify(SimConfig::tiles(5)),
            Approach::Follow(FacingX::Right)
        );
        assert_eq!(
            WINDOW.classify(-SimConfig::tiles(2)),
            Approach::Trigger(FacingX::Left)
        );
        assert_eq!(WINDOW.classify(SimConfig::tiles(12)), Approach::OutOfRange);
    }

    #[test]
    fn window_edges_are_exclusive() {
        assert_eq!(WINDOW.classify(SimConfig::tiles(10)), Approach::OutOfRange);
        assert_eq!(
            WINDOW.classify(SimConfig::tiles(3)),
            Approach::Follow(FacingX::Right)
        );
        assert_eq!(WINDOW.classify(0), Approach::Trigger(FacingX::Right));
    }
}

//! Externally driven player the actors react to.

use crate::geometry::{Extent, Position, Rect};

/// The tracked player. Its movement comes from outside the core; actors only
/// kill it, shove it or take items from its inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub position: Position,
    pub extent: Extent,
    pub dead: bool,
    /// Food rations carried; a hungry guard takes one.
    pub rations: u16,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            extent: Extent::pixels(16, 32),
            dead: false,
            rations: 0,
        }
    }

    pub fn with_rations(mut self, rations: u16) -> Self {
        self.rations = rations;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.extent)
    }

    pub fn mid_x(&self) -> i32 {
        self.rect().mid_x()
    }

    pub fn kill(&mut self) {
        if !self.dead {
            tracing::debug!(position = %self.position, "player killed");
            self.dead = true;
        }
    }

    /// Moves the player horizontally by `dx` sub-units.
    pub fn shove(&mut self, dx: i32) {
        self.position.x += dx;
    }

    /// Pushes the player horizontally out of `obstacle` on the side of the
    /// player's centre.
    pub fn push_out_of(&mut self, obstacle: Rect) {
        let me = self.rect();
        if !me.overlaps(&obstacle) {
            return;
        }
        if me.mid_x() < obstacle.mid_x() {
            self.position.x = obstacle.left() - self.extent.width;
        } else {
            self.position.x = obstacle.right();
        }
    }

    /// Takes one ration if any is left.
    pub fn consume_ration(&mut self) -> bool {
        if self.rations == 0 {
            return false;
        }
        self.rations -= 1;
        true
    }
}

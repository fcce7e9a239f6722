//! Shared physical and lifecycle state of every actor.

use crate::action::{ActionCode, ActionStateMachine, AnimationSignal};
use crate::config::SimConfig;
use crate::error::GameError;
use crate::geometry::{Extent, Position, Rect};

/// Horizontal facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FacingX {
    #[default]
    Left,
    Center,
    Right,
}

impl FacingX {
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Center => 0,
            Self::Right => 1,
        }
    }

    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Center,
            Self::Right => Self::Left,
        }
    }

    /// Facing that points along the signed distance `dx`.
    pub const fn toward(dx: i32) -> Self {
        if dx < 0 { Self::Left } else { Self::Right }
    }
}

/// Vertical facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FacingY {
    Up,
    #[default]
    Center,
    Down,
}

impl FacingY {
    pub const fn sign(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Center => 0,
            Self::Down => 1,
        }
    }
}

/// Per-side obstruction flags written by tile collision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blocked {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Blocked {
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Obstruction on the side `facing` points at.
    pub fn ahead(&self, facing: FacingX) -> bool {
        match facing {
            FacingX::Left => self.left,
            FacingX::Right => self.right,
            FacingX::Center => false,
        }
    }
}

/// Result of a damaging touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The body was dead or not damageable; nothing changed.
    Ignored,
    Damaged,
    /// Health reached zero.
    Defeated,
}

/// Position, motion, flags and the bound state machine of one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    pub position: Position,
    pub extent: Extent,
    /// Vertical inertia in sub-units per frame; negative is upward.
    pub velocity_y: i32,
    /// Movement requested this frame, applied by tile collision.
    pub pending_dx: i32,
    pub pending_dy: i32,
    pub facing_x: FacingX,
    pub facing_y: FacingY,
    pub blocked: Blocked,
    pub machine: ActionStateMachine,

    pub health_points: i32,
    pub dead: bool,
    pub exists: bool,
    /// Whether tile collision applies to this body at all.
    pub solid: bool,
    /// Latched once the activation predicate first says yes.
    pub active: bool,
    pub onscreen: bool,
    pub has_been_onscreen: bool,
    pub can_be_damaged: bool,
    pub can_support_player: bool,
    pub inhibit_fall: bool,
    pub honor_priority: bool,

    /// Sprite frame currently shown, `sprite_base + action code`.
    pub sprite: u16,
    pub sprite_base: u16,
    pub stun_timer: u32,
    pub blink_timer: u16,
}

impl Body {
    /// Frames a non-fatal hit keeps the body blinking.
    pub const BLINK_FRAMES: u16 = 10;
    /// Upward kick given to a body entering its stun state.
    pub const STUN_HOP: i32 = 40;

    pub fn new(
        position: Position,
        extent: Extent,
        machine: ActionStateMachine,
        sprite_base: u16,
    ) -> Self {
        let sprite = sprite_base.wrapping_add(machine.code());
        Self {
            position,
            extent,
            velocity_y: 0,
            pending_dx: 0,
            pending_dy: 0,
            facing_x: FacingX::Left,
            facing_y: FacingY::Center,
            blocked: Blocked::NONE,
            machine,
            health_points: 1,
            dead: false,
            exists: true,
            solid: true,
            active: false,
            onscreen: false,
            has_been_onscreen: false,
            can_be_damaged: true,
            can_support_player: false,
            inhibit_fall: false,
            honor_priority: true,
            sprite,
            sprite_base,
            stun_timer: 0,
            blink_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.extent)
    }

    pub fn mid_x(&self) -> i32 {
        self.rect().mid_x()
    }

    pub fn mid_y(&self) -> i32 {
        self.rect().mid_y()
    }

    // ===== movement primitives =====
    // Unconditional deltas; blocking is resolved later by tile collision.

    pub fn move_left(&mut self, speed: i32) {
        self.pending_dx -= speed;
    }

    pub fn move_right(&mut self, speed: i32) {
        self.pending_dx += speed;
    }

    pub fn move_up(&mut self, speed: i32) {
        self.pending_dy -= speed;
    }

    pub fn move_down(&mut self, speed: i32) {
        self.pending_dy += speed;
    }

    /// Moves `speed` sub-units along the horizontal facing.
    pub fn move_ahead(&mut self, speed: i32) {
        self.pending_dx += self.facing_x.sign() * speed;
    }

    pub fn move_x(&mut self, dx: i32) {
        self.pending_dx += dx;
    }

    /// Standing on something and not moving up.
    pub fn is_landed(&self) -> bool {
        self.blocked.down && self.velocity_y >= 0
    }

    pub fn face_toward(&mut self, x: i32) {
        self.facing_x = FacingX::toward(x - self.mid_x());
    }

    // ===== action state =====

    /// Switches state; rejected codes leave the machine untouched.
    pub fn set_action(&mut self, code: ActionCode) {
        match self.machine.set_action(code) {
            Ok(()) => self.refresh_sprite(),
            Err(err) => tracing::warn!(
                code,
                error = err.error_code(),
                "ignoring action request: {err}"
            ),
        }
    }

    pub fn action_number(&self, code: ActionCode) -> bool {
        self.machine.action_number(code)
    }

    pub fn action_status(&self, code: ActionCode) -> bool {
        self.machine.action_status(code)
    }

    /// Advances the animation and clears `exists` once a despawning
    /// sequence ends.
    pub fn advance_animation(&mut self) -> AnimationSignal {
        let signal = self.machine.advance();
        if self.machine.frame_changed() {
            self.refresh_sprite();
        }
        if signal == AnimationSignal::Despawn && self.exists {
            tracing::debug!(position = %self.position, "despawn sequence finished");
            self.exists = false;
        }
        self.blink_timer = self.blink_timer.saturating_sub(1);
        signal
    }

    /// Restores a saved sprite frame and the action state it encodes.
    pub fn restore_sprite(&mut self, sprite: u16) {
        let code = sprite.wrapping_sub(self.sprite_base);
        if let Err(err) = self.machine.seek(code) {
            tracing::warn!(sprite, error = err.error_code(), "saved frame has no action state");
        }
        self.sprite = sprite;
    }

    fn refresh_sprite(&mut self) {
        self.sprite = self.sprite_base.wrapping_add(self.machine.code());
    }

    // ===== damage =====

    /// Removes one health point if the body can currently be damaged.
    pub fn take_hit(&mut self) -> HitOutcome {
        if self.dead || !self.can_be_damaged {
            return HitOutcome::Ignored;
        }
        self.health_points = self.health_points.saturating_sub(1);
        if self.health_points <= 0 {
            self.health_points = 0;
            HitOutcome::Defeated
        } else {
            self.blink_timer = Self::BLINK_FRAMES;
            HitOutcome::Damaged
        }
    }

    /// Enters the stun state `code`: harmless, no longer damageable, and
    /// swept once `config.stun_duration` frames have passed.
    pub fn stun(&mut self, code: ActionCode, config: &SimConfig) {
        if self.stun_timer > 0 {
            return;
        }
        self.set_action(code);
        self.dead = true;
        self.can_be_damaged = false;
        self.inhibit_fall = false;
        self.solid = true;
        self.blink_timer = 0;
        self.velocity_y = -Self::STUN_HOP;
        self.stun_timer = config.stun_duration.max(1);
        tracing::debug!(position = %self.position, code, "stunned");
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0
    }

    /// Counts the stun down; the body stops existing when it runs out.
    pub fn tick_stun(&mut self) {
        if self.stun_timer == 0 {
            return;
        }
        self.stun_timer -= 1;
        if self.stun_timer == 0 {
            tracing::debug!(position = %self.position, "stun expired");
            self.exists = false;
        }
    }
}

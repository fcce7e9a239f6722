//! Gravity integration and tile collision.
//!
//! Physics never fails: out-of-map tiles read as solid, and a body already
//! overlapping a solid tile is never pulled further into it.

mod collision;

pub use collision::{
    blocked_flags, cliff_ahead, column_has, resolve_collision, row_has, tile_span,
};

use crate::actor::Body;
use crate::config::{GravityTier, SimConfig};

/// Accelerates `body` downward by the tier's acceleration, capped at its
/// terminal velocity, and queues the resulting vertical movement.
pub fn apply_gravity(body: &mut Body, config: &SimConfig, tier: GravityTier) {
    if body.inhibit_fall {
        return;
    }
    let params = config.gravity.params(tier);
    body.velocity_y = (body.velocity_y + params.acceleration).min(params.terminal_velocity);
    body.pending_dy += body.velocity_y;
}

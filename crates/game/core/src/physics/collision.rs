//! Axis-separated sweep of pending movement against the foreground plane.

use crate::actor::{Blocked, Body, FacingX};
use crate::config::SimConfig;
use crate::env::{TileOracle, TileProperties};
use crate::geometry::Rect;

const CSF: u32 = SimConfig::CSF;
const TILE_MASK: i32 = SimConfig::TILE - 1;

/// Inclusive tile range covered by the half-open sub-unit span `[from, to)`.
pub fn tile_span(from: i32, to: i32) -> (i32, i32) {
    (from >> CSF, (to - 1).max(from) >> CSF)
}

/// True when any tile of row `ty` between the columns covering
/// `[left, right)` carries one of `flags`.
pub fn row_has(map: &dyn TileOracle, left: i32, right: i32, ty: i32, flags: TileProperties) -> bool {
    let (first, last) = tile_span(left, right);
    (first..=last).any(|tx| map.properties_at(SimConfig::FOREGROUND_PLANE, tx, ty).intersects(flags))
}

/// True when any tile of column `tx` between the rows covering
/// `[top, bottom)` carries one of `flags`.
pub fn column_has(
    map: &dyn TileOracle,
    top: i32,
    bottom: i32,
    tx: i32,
    flags: TileProperties,
) -> bool {
    let (first, last) = tile_span(top, bottom);
    (first..=last).any(|ty| map.properties_at(SimConfig::FOREGROUND_PLANE, tx, ty).intersects(flags))
}

/// Applies the body's pending movement, stopping at solid tile faces, then
/// recomputes its blocked flags and clamps vertical inertia.
///
/// Non-solid bodies move freely and report no blocks.
pub fn resolve_collision(body: &mut Body, map: &dyn TileOracle) {
    let dx = std::mem::take(&mut body.pending_dx);
    let dy = std::mem::take(&mut body.pending_dy);

    if !body.solid {
        body.position.x += dx;
        body.position.y += dy;
        body.blocked = Blocked::NONE;
        return;
    }

    sweep_x(body, map, dx);
    sweep_y(body, map, dy);
    body.blocked = blocked_flags(&body.rect(), map);

    if body.blocked.down && body.velocity_y >= 0 {
        body.velocity_y = 0;
    }
    if body.blocked.up && body.velocity_y < 0 {
        body.velocity_y = 0;
    }
}

fn sweep_x(body: &mut Body, map: &dyn TileOracle, dx: i32) {
    if dx == 0 {
        return;
    }
    let rect = body.rect();
    if dx > 0 {
        let first = ((rect.right() - 1) >> CSF) + 1;
        let last = (rect.right() + dx - 1) >> CSF;
        for tx in first..=last {
            if column_has(map, rect.top(), rect.bottom(), tx, TileProperties::SOLID_LEFT) {
                body.position.x = (tx << CSF) - rect.extent.width;
                return;
            }
        }
    } else {
        let first = (rect.left() >> CSF) - 1;
        let last = (rect.left() + dx) >> CSF;
        for tx in (last..=first).rev() {
            if column_has(map, rect.top(), rect.bottom(), tx, TileProperties::SOLID_RIGHT) {
                body.position.x = (tx + 1) << CSF;
                return;
            }
        }
    }
    body.position.x += dx;
}

fn sweep_y(body: &mut Body, map: &dyn TileOracle, dy: i32) {
    if dy == 0 {
        return;
    }
    let rect = body.rect();
    if dy > 0 {
        let first = ((rect.bottom() - 1) >> CSF) + 1;
        let last = (rect.bottom() + dy - 1) >> CSF;
        for ty in first..=last {
            if row_has(map, rect.left(), rect.right(), ty, TileProperties::SOLID_TOP) {
                body.position.y = (ty << CSF) - rect.extent.height;
                return;
            }
        }
    } else {
        let first = (rect.top() >> CSF) - 1;
        let last = (rect.top() + dy) >> CSF;
        for ty in (last..=first).rev() {
            if row_has(map, rect.left(), rect.right(), ty, TileProperties::SOLID_BOTTOM) {
                body.position.y = (ty + 1) << CSF;
                return;
            }
        }
    }
    body.position.y += dy;
}

/// Blocked flags for a rectangle resting where it is: a side counts as
/// blocked when it sits exactly on a tile boundary facing a solid face.
pub fn blocked_flags(rect: &Rect, map: &dyn TileOracle) -> Blocked {
    let down = rect.bottom() & TILE_MASK == 0
        && row_has(map, rect.left(), rect.right(), rect.bottom() >> CSF, TileProperties::SOLID_TOP);
    let up = rect.top() & TILE_MASK == 0
        && row_has(
            map,
            rect.left(),
            rect.right(),
            (rect.top() >> CSF) - 1,
            TileProperties::SOLID_BOTTOM,
        );
    let right = rect.right() & TILE_MASK == 0
        && column_has(map, rect.top(), rect.bottom(), rect.right() >> CSF, TileProperties::SOLID_LEFT);
    let left = rect.left() & TILE_MASK == 0
        && column_has(
            map,
            rect.top(),
            rect.bottom(),
            (rect.left() >> CSF) - 1,
            TileProperties::SOLID_RIGHT,
        );
    Blocked {
        up,
        down,
        left,
        right,
    }
}

/// True when the tile below the body's leading bottom corner offers no floor.
pub fn cliff_ahead(body: &Body, map: &dyn TileOracle) -> bool {
    let rect = body.rect();
    let x = match body.facing_x {
        FacingX::Left => rect.left(),
        FacingX::Right => rect.right() - 1,
        FacingX::Center => return false,
    };
    let flags = map.properties_at(SimConfig::FOREGROUND_PLANE, x >> CSF, rect.bottom() >> CSF);
    !flags.contains(TileProperties::SOLID_TOP)
}

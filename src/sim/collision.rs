//! Axis-separated collision of a rectangular body against the tile grid
//!
//! The body is pushed out of every overlapping non-passable tile along one
//! axis at a time. Platforms only ever push along Y, and only when the body
//! lands on them from above.

use glam::Vec2;

use super::geom::Rect;
use super::tile::{TileCollision, TileGrid};
use crate::consts::{TILE_HEIGHT, TILE_WIDTH};

/// Result of resolving a body against the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Corrected position
    pub position: Vec2,
    /// Whether a qualifying landing happened during this pass
    pub grounded: bool,
    /// Bottom edge of the resolved rectangle, fed back in on the next pass
    pub previous_bottom: i32,
    /// Whether an X correction was applied against an impassable tile
    pub hit_wall: bool,
}

/// World rectangle of a body whose local bounds are relative to its rounded position
#[inline]
pub fn body_rect(position: Vec2, local_bounds: Rect) -> Rect {
    Rect::new(
        position.x.round() as i32 + local_bounds.x,
        position.y.round() as i32 + local_bounds.y,
        local_bounds.width,
        local_bounds.height,
    )
}

#[inline]
fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}

#[inline]
fn ceil_div(a: i32, b: i32) -> i32 {
    -(-a).div_euclid(b)
}

/// Resolve a body against every tile its rectangle overlaps
///
/// Cells are visited rows top-to-bottom, columns left-to-right. Each
/// correction is applied immediately and the rectangle recomputed, so later
/// cells in the same pass see the corrected position.
pub fn resolve_tile_collisions(
    grid: &TileGrid,
    position: Vec2,
    local_bounds: Rect,
    previous_bottom: i32,
) -> CollisionResult {
    let mut position = position;
    let mut bounds = body_rect(position, local_bounds);

    let left_tile = floor_div(bounds.left(), TILE_WIDTH);
    let right_tile = ceil_div(bounds.right(), TILE_WIDTH) - 1;
    let top_tile = floor_div(bounds.top(), TILE_HEIGHT);
    let bottom_tile = ceil_div(bounds.bottom(), TILE_HEIGHT) - 1;

    let mut grounded = false;
    let mut hit_wall = false;

    for y in top_tile..=bottom_tile {
        for x in left_tile..=right_tile {
            let collision = grid.collision_at(x, y);
            if collision == TileCollision::Passable {
                continue;
            }

            let tile_bounds = grid.bounds_of(x, y);
            let depth = bounds.intersection_depth(&tile_bounds);
            if depth == Vec2::ZERO {
                continue;
            }

            // Resolve along the shallow axis; platforms only along Y
            if depth.y.abs() < depth.x.abs() || collision == TileCollision::Platform {
                // Crossing the top of a tile means standing on it
                if previous_bottom <= tile_bounds.top() {
                    grounded = true;
                }

                // Platforms are ignored unless we landed on them
                if collision == TileCollision::Impassable || grounded {
                    position.y += depth.y;
                    bounds = body_rect(position, local_bounds);
                }
            } else if collision == TileCollision::Impassable {
                position.x += depth.x;
                bounds = body_rect(position, local_bounds);
                hit_wall = true;
            }
        }
    }

    CollisionResult {
        position,
        grounded,
        previous_bottom: bounds.bottom(),
        hit_wall,
    }
}

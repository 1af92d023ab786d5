//! Tile grid
//!
//! Dense, immutable-after-load array of tiles. Out-of-grid queries are
//! answered so that bodies can never leave the level sideways but may jump
//! past the top or fall through the bottom.

use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::{TILE_HEIGHT, TILE_WIDTH};

/// Collision classification of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileCollision {
    /// Never blocks
    #[default]
    Passable,
    /// Blocks only a body landing on it from above
    Platform,
    /// Blocks from every side
    Impassable,
}

/// Opaque handle into the grid's visual palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u16);

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub collision: TileCollision,
    /// `None` for cells with nothing to draw
    pub visual: Option<VisualId>,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        collision: TileCollision::Passable,
        visual: None,
    };

    pub fn new(collision: TileCollision, visual: Option<VisualId>) -> Self {
        Self { collision, visual }
    }
}

/// The level's tile grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    /// Row-major cells
    tiles: Vec<Tile>,
    /// Visual names indexed by `VisualId`
    palette: Vec<String>,
}

impl TileGrid {
    /// An all-passable grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::EMPTY; width * height],
            palette: Vec::new(),
        }
    }

    /// Build a grid from a per-cell collision function (no visuals)
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> TileCollision,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.tiles[y * width + x] = Tile::new(f(x, y), None);
            }
        }
        grid
    }

    /// Width measured in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height measured in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whole level size in world units
    pub fn pixel_size(&self) -> glam::Vec2 {
        glam::Vec2::new(
            (self.width as i32 * TILE_WIDTH) as f32,
            (self.height as i32 * TILE_HEIGHT) as f32,
        )
    }

    /// Whole level rectangle in world units
    pub fn pixel_bounds(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.width as i32 * TILE_WIDTH,
            self.height as i32 * TILE_HEIGHT,
        )
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Stored tile, if the coordinate is inside the grid
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    /// Place a tile during load. Returns false for out-of-grid coordinates.
    pub(crate) fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Intern a visual name and return its handle
    pub(crate) fn intern_visual(&mut self, name: &str) -> VisualId {
        if let Some(i) = self.palette.iter().position(|p| p == name) {
            return VisualId(i as u16);
        }
        self.palette.push(name.to_string());
        VisualId((self.palette.len() - 1) as u16)
    }

    /// Name behind a visual handle
    pub fn visual_name(&self, id: VisualId) -> Option<&str> {
        self.palette.get(id.0 as usize).map(String::as_str)
    }

    /// Collision mode of the tile at a particular location
    ///
    /// Columns outside the grid are impassable; rows above or below it are
    /// passable.
    pub fn collision_at(&self, x: i32, y: i32) -> TileCollision {
        if x < 0 || x as usize >= self.width {
            return TileCollision::Impassable;
        }
        if y < 0 || y as usize >= self.height {
            return TileCollision::Passable;
        }
        self.tiles[y as usize * self.width + x as usize].collision
    }

    /// World rectangle of a grid cell
    pub fn bounds_of(&self, x: i32, y: i32) -> Rect {
        Rect::new(x * TILE_WIDTH, y * TILE_HEIGHT, TILE_WIDTH, TILE_HEIGHT)
    }

    /// Grid cell containing a world point
    pub fn cell_at(&self, world_x: f32, world_y: f32) -> (i32, i32) {
        (
            (world_x / TILE_WIDTH as f32).floor() as i32,
            (world_y / TILE_HEIGHT as f32).floor() as i32,
        )
    }
}

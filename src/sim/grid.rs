//! Tile grid: the arena's walls, bricks and open floor
//!
//! The grid is created once per level (or reset) and only ever changes by a
//! brick turning into open floor. Anything outside the grid reads as `Wall`,
//! which is what keeps every entity inside the arena.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_GRID_DIM;
use crate::settings::{LayoutKind, Settings};

/// State of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable floor
    #[default]
    Open,
    /// Indestructible wall
    Wall,
    /// Destructible brick
    Brick,
}

/// Fixed-size rectangular tile map (row-major)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Open interior surrounded by a wall border. Sides are clamped to `1..=MAX_GRID_DIM`.
    pub fn bordered(width: i32, height: i32) -> Self {
        let width = width.clamp(1, MAX_GRID_DIM);
        let height = height.clamp(1, MAX_GRID_DIM);
        let mut grid = Self {
            width,
            height,
            tiles: vec![Tile::Open; (width * height) as usize],
        };
        for x in 0..width {
            grid.set(x, 0, Tile::Wall);
            grid.set(x, height - 1, Tile::Wall);
        }
        for y in 0..height {
            grid.set(0, y, Tile::Wall);
            grid.set(width - 1, y, Tile::Wall);
        }
        grid
    }

    /// Build a grid from rows of ASCII art: `#` wall, `+` brick, anything else open.
    ///
    /// Rows shorter than the longest one are padded with walls, and the border
    /// is forced to walls.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Self::bordered(width, height);
        for (y, row) in rows.iter().enumerate() {
            let mut chars = row.chars();
            for x in 0..grid.width {
                let tile = match chars.next() {
                    Some('#') | None => Tile::Wall,
                    Some('+') => Tile::Brick,
                    Some(_) => Tile::Open,
                };
                if !grid.is_boundary(x, y as i32) {
                    grid.set(x, y as i32, tile);
                }
            }
        }
        grid
    }

    /// Generate the initial level layout described by the settings
    pub fn generate(settings: &Settings) -> Self {
        let mut grid = Self::bordered(settings.grid_width, settings.grid_height);
        grid.place_pillars();

        match settings.layout {
            LayoutKind::Classic => {
                for y in 1..grid.height - 1 {
                    for x in 1..grid.width - 1 {
                        if grid.tile_at(x, y) == Tile::Open
                            && !grid.is_start_area(x, y)
                            && (x + y) % 3 != 0
                        {
                            grid.set(x, y, Tile::Brick);
                        }
                    }
                }
            }
            LayoutKind::Scattered { seed, density } => {
                let mut rng = Pcg32::seed_from_u64(seed);
                let density = if density.is_nan() {
                    0.0
                } else {
                    f64::from(density.clamp(0.0, 1.0))
                };
                for y in 1..grid.height - 1 {
                    for x in 1..grid.width - 1 {
                        if grid.tile_at(x, y) != Tile::Open {
                            continue;
                        }
                        // Roll for every open tile so the stream stays aligned
                        let roll = rng.random_bool(density);
                        if roll && !grid.is_start_area(x, y) {
                            grid.set(x, y, Tile::Brick);
                        }
                    }
                }
            }
        }

        log::info!(
            "Generated {} grid {}x{}: {} walls, {} bricks",
            settings.layout.as_str(),
            grid.width,
            grid.height,
            grid.count(Tile::Wall),
            grid.count(Tile::Brick)
        );
        grid
    }

    /// Pillars on even interior coordinates, skipping ones that would close a 2x2 wall block
    fn place_pillars(&mut self) {
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                if x % 2 != 0 || y % 2 != 0 {
                    continue;
                }
                let closes_block = self.tile_at(x, y - 1) == Tile::Wall
                    && self.tile_at(x - 1, y) == Tile::Wall
                    && self.tile_at(x - 1, y - 1) == Tile::Wall;
                if !closes_block {
                    self.set(x, y, Tile::Wall);
                }
            }
        }
    }

    /// The 2x2 interior block in each corner, kept clear for spawning
    pub fn is_start_area(&self, x: i32, y: i32) -> bool {
        let near_x = x == 1 || x == 2 || x == self.width - 3 || x == self.width - 2;
        let near_y = y == 1 || y == 2 || y == self.height - 3 || y == self.height - 2;
        near_x && near_y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn is_boundary(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Tile at (x, y); `Wall` for anything outside the grid
    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize]
        } else {
            Tile::Wall
        }
    }

    #[inline]
    pub fn tile(&self, pos: IVec2) -> Tile {
        self.tile_at(pos.x, pos.y)
    }

    #[inline]
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y) == Tile::Open
    }

    /// Turn a brick into open floor. Returns false (and does nothing) for any other tile.
    pub fn destroy_brick(&mut self, x: i32, y: i32) -> bool {
        if self.tile_at(x, y) != Tile::Brick {
            return false;
        }
        self.set(x, y, Tile::Open);
        true
    }

    fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize] = tile;
        }
    }

    /// Raw row-major tiles for drawing
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Walls among the four orthogonal neighbours of a tile
    pub fn adjacent_walls(&self, tile: IVec2) -> usize {
        [IVec2::NEG_Y, IVec2::Y, IVec2::NEG_X, IVec2::X]
            .iter()
            .filter(|d| self.tile(tile + **d) == Tile::Wall)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_wall() {
        let grid = Grid::bordered(6, 5);
        assert_eq!(grid.tile_at(-1, 2), Tile::Wall);
        assert_eq!(grid.tile_at(6, 2), Tile::Wall);
        assert_eq!(grid.tile_at(2, 5), Tile::Wall);
        assert_eq!(grid.tile_at(i32::MIN, i32::MAX), Tile::Wall);
        assert!(grid.is_open(2, 2));
    }

    #[test]
    fn test_border_is_wall() {
        let grid = Grid::generate(&Settings::default());
        for x in 0..grid.width() {
            assert_eq!(grid.tile_at(x, 0), Tile::Wall);
            assert_eq!(grid.tile_at(x, grid.height() - 1), Tile::Wall);
        }
        for y in 0..grid.height() {
            assert_eq!(grid.tile_at(0, y), Tile::Wall);
            assert_eq!(grid.tile_at(grid.width() - 1, y), Tile::Wall);
        }
    }

    #[test]
    fn test_destroy_brick_once() {
        let mut grid = Grid::from_ascii(&["#####", "#.+.#", "#####"]);
        assert!(grid.destroy_brick(2, 1));
        assert_eq!(grid.tile_at(2, 1), Tile::Open);
        assert!(!grid.destroy_brick(2, 1));
        // Walls and open floor are untouched
        assert!(!grid.destroy_brick(0, 0));
        assert!(!grid.destroy_brick(1, 1));
        assert!(!grid.destroy_brick(-3, 9));
        assert_eq!(grid.tile_at(0, 0), Tile::Wall);
    }

    #[test]
    fn test_from_ascii_forces_border() {
        let grid = Grid::from_ascii(&["....", "..+.", "...."]);
        assert_eq!(grid.tile_at(0, 1), Tile::Wall);
        assert_eq!(grid.tile_at(1, 0), Tile::Wall);
        assert_eq!(grid.tile_at(2, 1), Tile::Brick);
        assert_eq!(grid.tile_at(1, 1), Tile::Open);
    }

    #[test]
    fn test_classic_layout_keeps_start_areas_clear() {
        let grid = Grid::generate(&Settings::default());
        for (x, y) in [(1, 1), (2, 1), (1, 2)] {
            assert_eq!(grid.tile_at(x, y), Tile::Open, "({x}, {y})");
        }
        // (2, 2) is a pillar position
        assert_eq!(grid.tile_at(2, 2), Tile::Wall);
        assert!(grid.count(Tile::Brick) > 0);
    }

    #[test]
    fn test_scattered_layout_is_deterministic() {
        let settings = Settings {
            layout: LayoutKind::Scattered {
                seed: 42,
                density: 0.3,
            },
            ..Default::default()
        };
        let a = Grid::generate(&settings);
        let b = Grid::generate(&settings);
        assert_eq!(a, b);
        assert!(a.is_open(1, 1));
    }

    #[test]
    fn test_bordered_clamps_size() {
        let grid = Grid::bordered(50_000, -3);
        assert_eq!(grid.width(), MAX_GRID_DIM);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.tiles().len(), MAX_GRID_DIM as usize);
    }

    #[test]
    fn test_rows_cover_grid() {
        let grid = Grid::bordered(7, 4);
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 7));
    }

    #[test]
    fn test_adjacent_walls() {
        let grid = Grid::from_ascii(&["#####", "#...#", "#.#.#", "#####"]);
        assert_eq!(grid.adjacent_walls(IVec2::new(1, 1)), 2);
        assert_eq!(grid.adjacent_walls(IVec2::new(2, 1)), 2);
    }
}

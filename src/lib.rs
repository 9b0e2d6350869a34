//! Blast Arena - A tile-based bomb arena game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, movement, bombs, arena tick)
//! - `settings`: Data-driven tuning, loadable from JSON

pub mod settings;
pub mod sim;

pub use settings::{LayoutKind, Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Largest grid side, in tiles
    pub const MAX_GRID_DIM: i32 = 1024;

    /// Speed factor applied when both axes are held
    pub const DIAGONAL_SPEED_FACTOR: f32 = std::f32::consts::FRAC_1_SQRT_2;

    /// Tile the player spawns on
    pub const PLAYER_START_TILE: (i32, i32) = (1, 1);
}

/// Map a continuous coordinate to the tile containing it
#[inline]
pub fn tile_of(pos: Vec2, tile_size: f32) -> IVec2 {
    (pos / tile_size).floor().as_ivec2()
}

/// Continuous coordinate of a tile's center
#[inline]
pub fn tile_center(tile: IVec2, tile_size: f32) -> Vec2 {
    (tile.as_vec2() + Vec2::splat(0.5)) * tile_size
}

/// The four corners of a square footprint (top-left, top-right, bottom-left, bottom-right)
#[inline]
pub fn footprint_corners(center: Vec2, half_extent: f32) -> [Vec2; 4] {
    [
        Vec2::new(center.x - half_extent, center.y - half_extent),
        Vec2::new(center.x + half_extent, center.y - half_extent),
        Vec2::new(center.x - half_extent, center.y + half_extent),
        Vec2::new(center.x + half_extent, center.y + half_extent),
    ]
}

/// Tiles touched by a square footprint's corners (deduplicated, stable order)
pub fn footprint_tiles(center: Vec2, half_extent: f32, tile_size: f32) -> Vec<IVec2> {
    let mut tiles: Vec<IVec2> = Vec::with_capacity(4);
    for corner in footprint_corners(center, half_extent) {
        let tile = tile_of(corner, tile_size);
        if !tiles.contains(&tile) {
            tiles.push(tile);
        }
    }
    tiles
}

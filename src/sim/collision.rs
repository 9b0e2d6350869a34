//! Footprint collision and movement resolution against the tile grid
//!
//! The player is a square of half-extent `h` at a continuous position. A
//! position is legal when all four corners land on passable tiles. Moves are
//! resolved one axis at a time so that pushing diagonally into a wall still
//! slides along it.
//!
//! Cornering is a deliberate tolerance on top of that: when both axes are held
//! and the vertical one is blocked, a shrunken diagonal probe may accept the
//! full diagonal step even though the strict footprint would clip a wall
//! corner. The margins and the pass threshold come from [`Settings`], and a
//! corner cut is refused outright once it would leave the footprint more than
//! `max_corner_overlap` deep inside an impassable tile.
//!
//! Long steps are cut into sub-moves of at most half a tile so no frame time
//! can carry the footprint across a wall.

use glam::{IVec2, Vec2};

use super::grid::{Grid, Tile};
use crate::consts::DIAGONAL_SPEED_FACTOR;
use crate::settings::Settings;
use crate::{footprint_corners, footprint_tiles, tile_center, tile_of};

/// Movement tuning, copied out of [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveParams {
    pub tile_size: f32,
    pub half_extent: f32,
    pub speed: f32,
    pub corner_margin: f32,
    pub flanked_corner_margin: f32,
    pub corner_pass_threshold: usize,
    pub max_corner_overlap: f32,
    pub snap_tolerance: f32,
}

impl MoveParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tile_size: settings.tile_size,
            half_extent: settings.half_extent(),
            speed: settings.player_speed,
            corner_margin: settings.corner_margin,
            flanked_corner_margin: settings.flanked_corner_margin,
            corner_pass_threshold: settings.corner_pass_threshold,
            max_corner_overlap: settings.max_corner_overlap,
            snap_tolerance: settings.snap_tolerance,
        }
    }
}

/// Outcome of one movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Resolved position (unchanged if nothing was allowed)
    pub position: Vec2,
    pub moved_x: bool,
    pub moved_y: bool,
    /// The diagonal step was accepted by the cornering probe (both axes moved)
    pub cornered: bool,
    /// The idle entity was pulled onto its tile center
    pub snapped: bool,
}

impl MoveResult {
    fn stay(position: Vec2) -> Self {
        Self {
            position,
            moved_x: false,
            moved_y: false,
            cornered: false,
            snapped: false,
        }
    }

    /// Whether the position changed at all
    pub fn moved(&self) -> bool {
        self.moved_x || self.moved_y || self.cornered || self.snapped
    }
}

/// Collision view for one entity at one moment
///
/// Armed bomb tiles block movement, except the ones the entity's current
/// footprint already overlaps: a player is never trapped by the bomb it is
/// standing on, but cannot walk back onto it once clear.
#[derive(Debug)]
pub struct Mover<'a> {
    grid: &'a Grid,
    params: MoveParams,
    blocking: Vec<IVec2>,
}

impl<'a> Mover<'a> {
    pub fn new(
        grid: &'a Grid,
        params: MoveParams,
        position: Vec2,
        armed_bomb_tiles: impl IntoIterator<Item = IVec2>,
    ) -> Self {
        let standing_on = footprint_tiles(position, params.half_extent, params.tile_size);
        let blocking = armed_bomb_tiles
            .into_iter()
            .filter(|tile| !standing_on.contains(tile))
            .collect();
        Self {
            grid,
            params,
            blocking,
        }
    }

    /// Tiles currently treated as obstacles on top of the grid
    pub fn blocking_tiles(&self) -> &[IVec2] {
        &self.blocking
    }

    /// Open floor with no blocking bomb on it
    #[inline]
    pub fn is_passable(&self, tile: IVec2) -> bool {
        self.grid.tile(tile) == Tile::Open && !self.blocking.contains(&tile)
    }

    #[inline]
    fn passable_at(&self, point: Vec2) -> bool {
        self.is_passable(tile_of(point, self.params.tile_size))
    }

    /// Every footprint corner of a square at `pos` lands on a passable tile
    pub fn can_occupy(&self, pos: Vec2, half_extent: f32) -> bool {
        footprint_corners(pos, half_extent)
            .iter()
            .all(|corner| self.passable_at(*corner))
    }

    /// How deep a square at `pos` sits inside impassable tiles.
    ///
    /// Per blocked tile under a corner this is the smaller of the two axis
    /// overlaps; the result is the largest of those, or zero when clear.
    pub fn overlap_depth(&self, pos: Vec2, half_extent: f32) -> f32 {
        let ts = self.params.tile_size;
        let lo = pos - Vec2::splat(half_extent);
        let hi = pos + Vec2::splat(half_extent);
        footprint_tiles(pos, half_extent, ts)
            .into_iter()
            .filter(|tile| !self.is_passable(*tile))
            .map(|tile| {
                let min = tile.as_vec2() * ts;
                let max = min + Vec2::splat(ts);
                (hi.min(max) - lo.max(min)).max(Vec2::ZERO).min_element()
            })
            .fold(0.0, f32::max)
    }

    /// Resolve one step of movement from `position` with a per-axis intent in {-1, 0, 1}
    pub fn step(&self, position: Vec2, intent: Vec2, dt: f32) -> MoveResult {
        let intent = Vec2::new(axis_sign(intent.x), axis_sign(intent.y));
        if intent == Vec2::ZERO {
            return self.snap_to_center(position);
        }

        let mut distance = self.params.speed * dt;
        if intent.x != 0.0 && intent.y != 0.0 {
            distance *= DIAGONAL_SPEED_FACTOR;
        }
        let mut result = MoveResult::stay(position);
        if !distance.is_finite() || distance <= 0.0 {
            return result;
        }

        let substeps = (distance / (self.params.tile_size * 0.5)).ceil().max(1.0);
        let sub_distance = distance / substeps;
        for _ in 0..substeps as u32 {
            let sub = self.sub_step(result.position, intent, sub_distance);
            if !sub.moved() {
                break;
            }
            result.position = sub.position;
            result.moved_x |= sub.moved_x;
            result.moved_y |= sub.moved_y;
            result.cornered |= sub.cornered;
        }
        result
    }

    /// One sub-move no longer than half a tile
    fn sub_step(&self, position: Vec2, intent: Vec2, distance: f32) -> MoveResult {
        let delta = intent * distance;
        let h = self.params.half_extent;

        let mut result = MoveResult::stay(position);
        let mut pos = position;

        if delta.x != 0.0 && self.can_occupy(Vec2::new(pos.x + delta.x, pos.y), h) {
            pos.x += delta.x;
            result.moved_x = true;
        }
        if delta.y != 0.0 && self.can_occupy(Vec2::new(pos.x, pos.y + delta.y), h) {
            pos.y += delta.y;
            result.moved_y = true;
        }

        // Vertical has priority; cornering only kicks in when it was refused
        if delta.x != 0.0 && delta.y != 0.0 && !result.moved_y {
            let candidate = position + delta;
            if self.corner_probe(position, candidate, intent.y) {
                pos = candidate;
                result.moved_x = true;
                result.moved_y = true;
                result.cornered = true;
            }
        }

        result.position = pos;
        result
    }

    /// Permissive diagonal check with a shrunken footprint
    fn corner_probe(&self, from: Vec2, candidate: Vec2, vertical: f32) -> bool {
        let p = &self.params;
        let flanked = self.grid.adjacent_walls(tile_of(from, p.tile_size)) >= 2;
        let margin = if flanked {
            p.flanked_corner_margin
        } else {
            p.corner_margin
        };
        let shrunk = (p.half_extent - margin).max(0.0);

        // Only assist a turn into an actual opening
        if !self.passable_at(candidate) {
            return false;
        }
        let leading_edge = Vec2::new(candidate.x, candidate.y + vertical * p.half_extent);
        if !self.passable_at(leading_edge) {
            return false;
        }
        if self.overlap_depth(candidate, p.half_extent) > p.max_corner_overlap {
            return false;
        }

        let passes = 1 + footprint_corners(candidate, shrunk)
            .iter()
            .filter(|corner| self.passable_at(**corner))
            .count();
        passes >= p.corner_pass_threshold
    }

    /// Pull an idle entity exactly onto its tile center when it is already close
    fn snap_to_center(&self, position: Vec2) -> MoveResult {
        let center = tile_center(tile_of(position, self.params.tile_size), self.params.tile_size);
        let offset = (position - center).abs();
        let tol = self.params.snap_tolerance;

        if position != center
            && offset.x <= tol
            && offset.y <= tol
            && self.can_occupy(center, self.params.half_extent)
        {
            return MoveResult {
                position: center,
                snapped: true,
                ..MoveResult::stay(position)
            };
        }
        MoveResult::stay(position)
    }
}

#[inline]
fn axis_sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

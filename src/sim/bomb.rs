//! Bomb lifecycle and blast propagation
//!
//! A bomb is `Armed` until its fuse runs out (or a neighbouring blast forces
//! it), then `Detonating` for a fixed window, then `Spent`. The blast cells
//! are computed exactly once, on entering `Detonating`, and never change.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Tile};
use crate::settings::Settings;

/// Blast directions in evaluation order: up, down, left, right
pub const BLAST_DIRECTIONS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::Y, IVec2::NEG_X, IVec2::X];

/// Lifecycle phase of a bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombPhase {
    /// Fuse burning; the tile blocks movement
    Armed,
    /// Blast cells are live and lethal
    Detonating,
    /// Finished; waiting to be removed
    Spent,
}

/// A placed bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    tile: IVec2,
    phase: BombPhase,
    /// Seconds since placement (monotonic)
    elapsed: f32,
    /// `elapsed` at the moment of detonation
    detonated_at: Option<f32>,
    /// Whether another blast set this one off
    chained: bool,
    fuse: f32,
    duration: f32,
    range: u32,
    blast: Vec<IVec2>,
    destroyed_bricks: Vec<IVec2>,
}

impl Bomb {
    pub fn new(id: u32, tile: IVec2, settings: &Settings) -> Self {
        Self {
            id,
            tile,
            phase: BombPhase::Armed,
            elapsed: 0.0,
            detonated_at: None,
            chained: false,
            fuse: settings.fuse_secs(),
            duration: settings.explosion_secs(),
            range: settings.explosion_range,
            blast: Vec::new(),
            destroyed_bricks: Vec::new(),
        }
    }

    #[inline]
    pub fn tile(&self) -> IVec2 {
        self.tile
    }

    #[inline]
    pub fn phase(&self) -> BombPhase {
        self.phase
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.phase == BombPhase::Armed
    }

    #[inline]
    pub fn is_detonating(&self) -> bool {
        self.phase == BombPhase::Detonating
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.phase == BombPhase::Spent
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn was_chained(&self) -> bool {
        self.chained
    }

    /// Seconds of fuse left (zero once detonated)
    pub fn fuse_remaining(&self) -> f32 {
        match self.phase {
            BombPhase::Armed => (self.fuse - self.elapsed).max(0.0),
            _ => 0.0,
        }
    }

    /// Tiles hit by this bomb's blast; empty while armed
    pub fn blast_cells(&self) -> &[IVec2] {
        &self.blast
    }

    /// Tiles whose bricks this detonation destroyed
    pub fn destroyed_bricks(&self) -> &[IVec2] {
        &self.destroyed_bricks
    }

    /// Whether the frozen blast reaches a tile
    pub fn covers(&self, tile: IVec2) -> bool {
        self.blast.contains(&tile)
    }

    /// Advance timers. Returns the new phase if this call changed it.
    pub fn tick(&mut self, dt: f32, grid: &mut Grid) -> Option<BombPhase> {
        if self.phase == BombPhase::Spent {
            return None;
        }
        self.elapsed += dt;

        match self.phase {
            BombPhase::Armed if self.elapsed >= self.fuse => {
                self.detonate(grid);
                Some(BombPhase::Detonating)
            }
            BombPhase::Detonating => {
                let since = self.elapsed - self.detonated_at.unwrap_or(self.elapsed);
                if since >= self.duration {
                    self.phase = BombPhase::Spent;
                    Some(BombPhase::Spent)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Detonate now, regardless of fuse. No-op (returns false) once past `Armed`.
    pub fn force_detonate(&mut self, grid: &mut Grid) -> bool {
        if self.phase != BombPhase::Armed {
            return false;
        }
        self.chained = true;
        self.detonate(grid);
        true
    }

    fn detonate(&mut self, grid: &mut Grid) {
        self.phase = BombPhase::Detonating;
        self.detonated_at = Some(self.elapsed);
        self.compute_blast(grid);
    }

    fn compute_blast(&mut self, grid: &mut Grid) {
        self.blast.clear();
        self.destroyed_bricks.clear();
        self.blast.push(self.tile);

        for dir in BLAST_DIRECTIONS {
            // The border stops every direction long before i32::MAX
            let range = i32::try_from(self.range).unwrap_or(i32::MAX);
            for distance in 1..=range {
                let cell = self.tile + dir * distance;
                match grid.tile(cell) {
                    Tile::Wall => break,
                    Tile::Brick => {
                        if grid.destroy_brick(cell.x, cell.y) {
                            self.destroyed_bricks.push(cell);
                        }
                        self.blast.push(cell);
                        break;
                    }
                    Tile::Open => self.blast.push(cell),
                }
            }
        }
    }
}

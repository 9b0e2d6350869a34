//! Arena state: grid, player and bombs under a single owner
//!
//! Everything the simulation mutates lives in [`Arena`] and only changes from
//! its command methods or the per-tick update in `tick.rs`.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::bomb::{Bomb, BombPhase};
use super::grid::Grid;
use crate::consts::PLAYER_START_TILE;
use crate::settings::Settings;
use crate::{footprint_tiles, tile_center, tile_of};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Updates suspended by the player
    Paused,
    /// Caught in a blast; terminal until reset
    Dead,
}

/// Gameplay events for the presentation layer (sounds, particles, overlays)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BombPlaced { tile: IVec2 },
    /// `chained` is set when another blast forced the detonation
    BombDetonated { tile: IVec2, chained: bool },
    BrickDestroyed { tile: IVec2 },
    BombSpent { tile: IVec2 },
    PlayerDied { tile: IVec2 },
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the footprint in world units
    pub pos: Vec2,
    /// Collision half-extent
    pub half_extent: f32,
    /// Held direction, per axis in {-1, 0, 1}
    pub intent: Vec2,
}

impl Player {
    pub fn at_tile(tile: IVec2, settings: &Settings) -> Self {
        Self {
            pos: tile_center(tile, settings.tile_size),
            half_extent: settings.half_extent(),
            intent: Vec2::ZERO,
        }
    }

    /// Edge length of the collision square
    pub fn size(&self) -> f32 {
        self.half_extent * 2.0
    }
}

/// Complete arena state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub(crate) settings: Settings,
    pub(crate) grid: Grid,
    /// Layout restored by `reset`
    initial_grid: Grid,
    start_tile: IVec2,
    pub(crate) player: Player,
    /// Active bombs, in placement order
    pub(crate) bombs: Vec<Bomb>,
    pub(crate) phase: GamePhase,
    pub(crate) events: Vec<GameEvent>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    next_id: u32,
}

impl Arena {
    /// New arena with a generated layout and the player in the top-left start area
    pub fn new(settings: Settings) -> Self {
        let grid = Grid::generate(&settings);
        let start = IVec2::new(PLAYER_START_TILE.0, PLAYER_START_TILE.1);
        Self::with_grid(settings, grid, start)
    }

    /// New arena over a prepared grid
    pub fn with_grid(settings: Settings, grid: Grid, start_tile: IVec2) -> Self {
        let player = Player::at_tile(start_tile, &settings);
        Self {
            settings,
            initial_grid: grid.clone(),
            grid,
            start_tile,
            player,
            bombs: Vec::new(),
            phase: GamePhase::Playing,
            events: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Restore the initial layout, clear every bomb and respawn the player
    pub fn reset(&mut self) {
        self.grid = self.initial_grid.clone();
        self.bombs.clear();
        self.events.clear();
        self.player = Player::at_tile(self.start_tile, &self.settings);
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.next_id = 1;
        log::info!("Arena reset");
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn start_tile(&self) -> IVec2 {
        self.start_tile
    }

    /// Events since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tile under the player's center
    pub fn player_tile(&self) -> IVec2 {
        tile_of(self.player.pos, self.settings.tile_size)
    }

    /// Tiles under the player's footprint corners
    pub fn player_footprint_tiles(&self) -> Vec<IVec2> {
        footprint_tiles(
            self.player.pos,
            self.player.half_extent,
            self.settings.tile_size,
        )
    }

    /// Tiles of bombs that still block movement
    pub fn armed_bomb_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.bombs
            .iter()
            .filter(|b| b.phase() == BombPhase::Armed)
            .map(Bomb::tile)
    }

    /// Held direction per axis; the sign is all that matters
    pub fn set_movement_intent(&mut self, dx: f32, dy: f32) {
        self.player.intent = Vec2::new(dx, dy);
    }

    /// Toggle between playing and paused (no effect once dead)
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::Dead => GamePhase::Dead,
        };
        log::debug!("Phase now {:?}", self.phase);
    }

    /// Drop a bomb on the player's tile.
    ///
    /// Refused while not playing, when `max_bombs` are already out, or when a
    /// bomb already sits on that tile.
    pub fn place_bomb(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if self.bombs.len() >= self.settings.max_bombs {
            return false;
        }
        let tile = self.player_tile();
        if self.bombs.iter().any(|b| b.tile() == tile) {
            return false;
        }

        let id = self.next_entity_id();
        self.bombs.push(Bomb::new(id, tile, &self.settings));
        self.events.push(GameEvent::BombPlaced { tile });
        log::debug!("Bomb {} placed at ({}, {})", id, tile.x, tile.y);
        true
    }

    /// Run one update with the held intent
    pub fn update(&mut self, dt: f32) {
        super::tick::advance(self, dt);
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        let grid = Grid::bordered(7, 7);
        Arena::with_grid(Settings::default(), grid, IVec2::new(1, 1))
    }

    #[test]
    fn test_new_arena_spawns_on_start_tile() {
        let arena = Arena::new(Settings::default());
        assert_eq!(arena.player_tile(), IVec2::new(1, 1));
        assert_eq!(arena.player().pos, Vec2::new(96.0, 96.0));
        assert_eq!(arena.player().size(), 56.0);
        assert_eq!(arena.phase(), GamePhase::Playing);
        assert!(arena.bombs().is_empty());
    }

    #[test]
    fn test_place_bomb_respects_cap() {
        let mut arena = arena();
        assert!(arena.place_bomb());
        assert_eq!(arena.bombs().len(), 1);
        // Same tile and over the cap of one
        assert!(!arena.place_bomb());
        assert_eq!(arena.bombs().len(), 1);
        assert_eq!(
            arena.take_events(),
            vec![GameEvent::BombPlaced {
                tile: IVec2::new(1, 1)
            }]
        );
        assert!(arena.take_events().is_empty());
    }

    #[test]
    fn test_place_bomb_refuses_occupied_tile() {
        let settings = Settings {
            max_bombs: 3,
            ..Default::default()
        };
        let mut arena = Arena::with_grid(settings, Grid::bordered(7, 7), IVec2::new(2, 2));
        assert!(arena.place_bomb());
        assert!(!arena.place_bomb());
        assert_eq!(arena.bombs().len(), 1);
    }

    #[test]
    fn test_pause_blocks_placement() {
        let mut arena = arena();
        arena.toggle_pause();
        assert_eq!(arena.phase(), GamePhase::Paused);
        assert!(!arena.place_bomb());
        arena.toggle_pause();
        assert!(arena.place_bomb());
    }

    #[test]
    fn test_armed_bomb_tiles() {
        let mut arena = arena();
        arena.place_bomb();
        let tiles: Vec<_> = arena.armed_bomb_tiles().collect();
        assert_eq!(tiles, vec![IVec2::new(1, 1)]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut arena = arena();
        arena.place_bomb();
        arena.player.pos += Vec2::new(30.0, 0.0);
        arena.phase = GamePhase::Dead;
        arena.reset();

        assert!(arena.bombs().is_empty());
        assert_eq!(arena.player().pos, tile_center(IVec2::new(1, 1), 64.0));
        assert_eq!(arena.phase(), GamePhase::Playing);
        assert!(arena.take_events().is_empty());
    }
}

//! Per-tick simulation update
//!
//! One update runs, in this exact order:
//! 1. player movement
//! 2. bomb timers
//! 3. chain reactions
//! 4. player hit test
//! 5. removal of spent bombs
//!
//! Swapping 3 and 4 changes whether a player escapes a chained blast, so the
//! order is part of the game's rules.

use glam::Vec2;

use super::bomb::BombPhase;
use super::collision::{MoveParams, Mover};
use super::state::{Arena, GameEvent, GamePhase};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction per axis (sign only; zero means idle on that axis)
    pub intent: Vec2,
    /// Drop a bomb on the player's tile
    pub place_bomb: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Apply one tick of input and advance the arena by `dt` seconds
pub fn tick(arena: &mut Arena, input: &TickInput, dt: f32) {
    if input.pause {
        arena.toggle_pause();
    }

    // Don't tick if paused or dead
    if arena.phase != GamePhase::Playing {
        return;
    }

    arena.set_movement_intent(input.intent.x, input.intent.y);
    if input.place_bomb {
        arena.place_bomb();
    }

    advance(arena, dt);
}

/// Advance the arena by `dt` seconds using the currently held intent
pub fn advance(arena: &mut Arena, dt: f32) {
    if arena.phase != GamePhase::Playing {
        return;
    }
    arena.time_ticks += 1;

    move_player(arena, dt);
    advance_bombs(arena, dt);
    propagate_chains(arena);
    check_player_hit(arena);
    reap_spent(arena);
}

fn move_player(arena: &mut Arena, dt: f32) {
    let params = MoveParams::from_settings(&arena.settings);
    let result = {
        let mover = Mover::new(
            &arena.grid,
            params,
            arena.player.pos,
            arena.armed_bomb_tiles(),
        );
        mover.step(arena.player.pos, arena.player.intent, dt)
    };
    arena.player.pos = result.position;
}

fn advance_bombs(arena: &mut Arena, dt: f32) {
    let Arena {
        bombs,
        grid,
        events,
        ..
    } = arena;

    for bomb in bombs.iter_mut() {
        match bomb.tick(dt, grid) {
            Some(BombPhase::Detonating) => {
                let tile = bomb.tile();
                log::debug!(
                    "Bomb {} detonated at ({}, {}), {} cells",
                    bomb.id,
                    tile.x,
                    tile.y,
                    bomb.blast_cells().len()
                );
                events.push(GameEvent::BombDetonated {
                    tile,
                    chained: false,
                });
                events.extend(
                    bomb.destroyed_bricks()
                        .iter()
                        .map(|&tile| GameEvent::BrickDestroyed { tile }),
                );
            }
            Some(BombPhase::Spent) => {
                events.push(GameEvent::BombSpent { tile: bomb.tile() });
            }
            _ => {}
        }
    }
}

/// Force every armed bomb caught in a live blast.
///
/// Sources are the bombs detonating when the scan starts; a bomb forced here
/// becomes a source on the next tick, so cascades spread one link per tick.
fn propagate_chains(arena: &mut Arena) {
    let Arena {
        bombs,
        grid,
        events,
        ..
    } = arena;

    let triggered: Vec<usize> = bombs
        .iter()
        .enumerate()
        .filter(|(_, bomb)| bomb.is_armed())
        .filter(|(i, bomb)| {
            bombs
                .iter()
                .enumerate()
                .any(|(j, source)| j != *i && source.is_detonating() && source.covers(bomb.tile()))
        })
        .map(|(i, _)| i)
        .collect();

    for i in triggered {
        let bomb = &mut bombs[i];
        if !bomb.force_detonate(grid) {
            continue;
        }
        let tile = bomb.tile();
        log::debug!("Bomb {} chain-detonated at ({}, {})", bomb.id, tile.x, tile.y);
        events.push(GameEvent::BombDetonated {
            tile,
            chained: true,
        });
        events.extend(
            bomb.destroyed_bricks()
                .iter()
                .map(|&tile| GameEvent::BrickDestroyed { tile }),
        );
    }
}

fn check_player_hit(arena: &mut Arena) {
    let footprint = arena.player_footprint_tiles();
    let hit = arena
        .bombs
        .iter()
        .filter(|b| b.is_detonating())
        .any(|b| footprint.iter().any(|tile| b.covers(*tile)));

    if hit {
        let tile = arena.player_tile();
        arena.phase = GamePhase::Dead;
        arena.events.push(GameEvent::PlayerDied { tile });
        log::info!(
            "Player caught in blast at ({}, {}) after {} ticks",
            tile.x,
            tile.y,
            arena.time_ticks
        );
    }
}

fn reap_spent(arena: &mut Arena) {
    arena.bombs.retain(|b| !b.is_spent());
}

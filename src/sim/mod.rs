//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt` only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (bombs in placement order)
//! - No rendering or windowing dependencies

pub mod bomb;
pub mod clock;
pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use bomb::{BLAST_DIRECTIONS, Bomb, BombPhase};
pub use clock::FixedStep;
pub use collision::{MoveParams, MoveResult, Mover};
pub use grid::{Grid, Tile};
pub use state::{Arena, GameEvent, GamePhase, Player};
pub use tick::{TickInput, advance, tick};

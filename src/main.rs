//! Blast Arena entry point
//!
//! Runs a short scripted session headlessly and logs what happens. Pass a
//! settings JSON path as the first argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use blast_arena::sim::{Arena, FixedStep, GameEvent, Grid, Tile, TickInput, tick};
    use blast_arena::{Settings, tile_center};
    use glam::{IVec2, Vec2};

    /// Longest simulated session before giving up
    const MAX_SIM_SECS: f32 = 20.0;
    /// Simulated display refresh
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Clone, Copy)]
    enum Action {
        WalkTo(IVec2),
        PlaceBomb,
        Wait(f32),
    }

    /// Duck into the start pocket: bomb next door, hide around the pillar
    const SCRIPT: &[Action] = &[
        Action::WalkTo(IVec2::new(2, 1)),
        Action::PlaceBomb,
        Action::WalkTo(IVec2::new(1, 1)),
        Action::WalkTo(IVec2::new(1, 2)),
        Action::Wait(4.0),
    ];

    struct Driver {
        cursor: usize,
        waited: f32,
    }

    impl Driver {
        /// Input for the next step, advancing through the script
        fn next_input(&mut self, arena: &Arena, dt: f32) -> Option<TickInput> {
            let action = *SCRIPT.get(self.cursor)?;
            let tolerance = arena.settings().snap_tolerance;
            match action {
                Action::WalkTo(tile) => {
                    let target = tile_center(tile, arena.settings().tile_size);
                    let diff = target - arena.player().pos;
                    if diff.abs().max_element() <= tolerance {
                        self.cursor += 1;
                        // Idle one step so the snap lands exactly on center
                        return Some(TickInput::default());
                    }
                    let intent = Vec2::new(
                        if diff.x.abs() > tolerance { diff.x.signum() } else { 0.0 },
                        if diff.y.abs() > tolerance { diff.y.signum() } else { 0.0 },
                    );
                    Some(TickInput {
                        intent,
                        ..Default::default()
                    })
                }
                Action::PlaceBomb => {
                    self.cursor += 1;
                    Some(TickInput {
                        place_bomb: true,
                        ..Default::default()
                    })
                }
                Action::Wait(secs) => {
                    self.waited += dt;
                    if self.waited >= secs {
                        self.cursor += 1;
                        self.waited = 0.0;
                    }
                    Some(TickInput::default())
                }
            }
        }
    }

    fn render_ascii(grid: &Grid, player: IVec2) -> Vec<String> {
        grid.rows()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, tile)| {
                        if IVec2::new(x as i32, y as i32) == player {
                            '@'
                        } else {
                            match tile {
                                Tile::Open => '.',
                                Tile::Wall => '#',
                                Tile::Brick => '+',
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn load_settings() -> Settings {
        match std::env::args().nth(1) {
            Some(path) => Settings::load(&path).unwrap_or_else(|e| {
                log::warn!("Could not use {}: {}; falling back to defaults", path, e);
                Settings::default()
            }),
            None => Settings::default(),
        }
    }

    pub fn run() {
        let settings = load_settings();
        let mut arena = Arena::new(settings);
        let mut clock = FixedStep::default();
        let mut driver = Driver {
            cursor: 0,
            waited: 0.0,
        };

        let mut sim_time = 0.0;
        'frames: while sim_time < MAX_SIM_SECS {
            for _ in 0..clock.advance(FRAME_DT) {
                let Some(input) = driver.next_input(&arena, clock.step()) else {
                    break 'frames;
                };
                tick(&mut arena, &input, clock.step());
                sim_time += clock.step();

                for event in arena.take_events() {
                    match event {
                        GameEvent::PlayerDied { tile } => {
                            log::warn!("Player died at ({}, {})", tile.x, tile.y);
                        }
                        other => log::info!("{:?}", other),
                    }
                }
                if arena.is_dead() {
                    break 'frames;
                }
            }
        }

        for line in render_ascii(arena.grid(), arena.player_tile()) {
            log::info!("{}", line);
        }
        log::info!(
            "Session over after {} ticks: {:?}, {} bombs outstanding",
            arena.time_ticks(),
            arena.phase(),
            arena.bombs().len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Blast Arena (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by an embedding host on the web
}

//! Autopilot that plays the game headlessly
//!
//! Stands in for the UI: starts each round, lets the music run for a seeded
//! random number of ticks, stops it, and lets the engine sort out the rest.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::{GameEngine, GamePhase};

/// Seeded command driver
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    min_music_ticks: u32,
    max_music_ticks: u32,
    /// Ticks of music left before stopping
    music_left: Option<u32>,
}

/// How an autoplayed game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner { player: usize, ticks: u64 },
    TimedOut { ticks: u64 },
}

impl Autopilot {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            min_music_ticks: settings.min_music_ticks.min(settings.max_music_ticks),
            max_music_ticks: settings.max_music_ticks.max(settings.min_music_ticks),
            music_left: None,
        }
    }

    /// Issue whatever command the current phase calls for; true once the game is over
    pub fn drive(&mut self, engine: &mut GameEngine) -> bool {
        match engine.phase() {
            GamePhase::Waiting => {
                engine.start_round();
                self.music_left = None;
            }
            GamePhase::Playing => {
                let left = match self.music_left {
                    Some(left) => left,
                    None => self
                        .rng
                        .random_range(self.min_music_ticks..=self.max_music_ticks),
                };
                if left == 0 {
                    engine.stop_music();
                    self.music_left = None;
                } else {
                    self.music_left = Some(left - 1);
                }
            }
            GamePhase::Stopping | GamePhase::Eliminating => {}
            GamePhase::GameOver => return true,
        }
        false
    }

    /// Play a whole game, ticking the engine between commands
    pub fn play(&mut self, engine: &mut GameEngine, max_ticks: u64) -> Outcome {
        while engine.time_ticks() < max_ticks {
            if self.drive(engine) {
                let player = engine.winner().map(|p| p.id).unwrap_or_default();
                return Outcome::Winner {
                    player,
                    ticks: engine.time_ticks(),
                };
            }
            engine.tick();
        }
        log::warn!("Gave up after {} ticks", max_ticks);
        Outcome::TimedOut {
            ticks: engine.time_ticks(),
        }
    }
}

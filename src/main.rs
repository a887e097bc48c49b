//! Musical Chairs headless runner
//!
//! Plays a full game with the autopilot and reports the result. Pass a JSON
//! settings file as the first argument to change the seed or music timing.

use std::path::PathBuf;

use musical_chairs::autoplay::Outcome;
use musical_chairs::consts::TICK_RATE_HZ;
use musical_chairs::sim::{GameEngine, GameEvent};
use musical_chairs::{Autopilot, Settings};

fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    };
    log::info!("Musical Chairs (headless) starting with seed {}", settings.seed);

    let mut engine = GameEngine::new();
    let mut autopilot = Autopilot::new(&settings);
    let outcome = autopilot.play(&mut engine, settings.max_ticks);

    let mut order: Vec<(u32, usize)> = engine
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::PlayerEliminated { player, order } => Some((order, player)),
            _ => None,
        })
        .collect();
    order.sort_unstable();

    for (order, player) in &order {
        let label = engine.players()[*player].label();
        println!("#{:>2} out: player {}", order + 1, label);
    }

    match outcome {
        Outcome::Winner { player, ticks } => {
            println!(
                "Winner: Player {} after {} rounds ({:.1}s of play)",
                engine.players()[player].label(),
                engine.round(),
                ticks as f32 / TICK_RATE_HZ as f32
            );
        }
        Outcome::TimedOut { ticks } => {
            println!("No winner after {} ticks ({})", ticks, engine.status_line());
        }
    }

    if settings.print_snapshot {
        match serde_json::to_string_pretty(&engine.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to serialize snapshot: {}", err),
        }
    }
}

//! Fixed-tick round state machine
//!
//! `GameEngine` owns the players and chairs. Each tick runs the handler for
//! the current phase; a handler reads the current lists as a snapshot and
//! returns the next phase together with the replacement lists, which the
//! engine swaps in at once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{animate_eliminations, has_pending_walkers, walk_to_exit};
use super::claim::{apply_claims, resolve_claims};
use super::motion::{advance_and_detect_laps, advance_running};
use super::stadium::canvas_center;
use super::state::{
    Chair, GameEvent, GamePhase, JudgedOutReason, Player, active_chair_count, active_player_count,
    assign_track_positions, create_initial_chairs, create_initial_players, is_chair_occupied,
    remove_one_chair, seat_remaining_players,
};

/// Commands the UI layer can issue between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    StartRound,
    StopMusic,
    RestartGame,
}

/// What a phase handler produced for one tick
#[derive(Debug)]
struct Step {
    next: GamePhase,
    players: Vec<Player>,
    /// Replacement chair list, when the chair set changed
    chairs: Option<Vec<Chair>>,
    events: Vec<GameEvent>,
}

impl Step {
    fn stay(phase: GamePhase, players: Vec<Player>) -> Self {
        Self {
            next: phase,
            players,
            chairs: None,
            events: Vec::new(),
        }
    }
}

/// Consistent post-tick view for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub round: u32,
    pub time_ticks: u64,
    pub players: Vec<Player>,
    pub chairs: Vec<Chair>,
    pub active_players: usize,
    pub active_chairs: usize,
    /// Set only once the game is over
    pub winner: Option<usize>,
    pub music_playing: bool,
}

/// The musical chairs game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEngine {
    phase: GamePhase,
    players: Vec<Player>,
    chairs: Vec<Chair>,
    /// Rounds started since the last reset
    round: u32,
    time_ticks: u64,
    /// Center of the canvas the track is laid out around
    center: Vec2,
    /// Events not yet drained by collaborators
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    pub fn new() -> Self {
        Self::with_center(canvas_center())
    }

    /// Lay the track out around a custom canvas center
    pub fn with_center(center: Vec2) -> Self {
        Self {
            phase: GamePhase::Waiting,
            players: create_initial_players(),
            chairs: create_initial_chairs(),
            round: 0,
            time_ticks: 0,
            center,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn chairs(&self) -> &[Chair] {
        &self.chairs
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn active_players(&self) -> usize {
        active_player_count(&self.players)
    }

    pub fn active_chairs(&self) -> usize {
        active_chair_count(&self.chairs)
    }

    /// Audio cue: music plays only while players circle
    pub fn music_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// The last player standing, once the game is over
    pub fn winner(&self) -> Option<&Player> {
        if self.phase != GamePhase::GameOver {
            return None;
        }
        self.players.iter().find(|p| p.is_active())
    }

    /// "Players: N | Chairs: M"
    pub fn status_line(&self) -> String {
        format!("Players: {} | Chairs: {}", self.active_players(), self.active_chairs())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            round: self.round,
            time_ticks: self.time_ticks,
            players: self.players.clone(),
            chairs: self.chairs.clone(),
            active_players: self.active_players(),
            active_chairs: self.active_chairs(),
            winner: self.winner().map(|p| p.id),
            music_playing: self.music_playing(),
        }
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a UI command; returns false (and changes nothing) if the phase does not accept it
    pub fn apply(&mut self, command: Command) -> bool {
        if !self.phase.accepts_commands() {
            log::debug!("Ignoring {:?} while {:?}", command, self.phase);
            return false;
        }
        match (command, self.phase) {
            (Command::StartRound, GamePhase::Waiting) => {
                self.begin_round();
                true
            }
            (Command::StopMusic, GamePhase::Playing) => {
                self.stop_music_now();
                true
            }
            (Command::RestartGame, GamePhase::GameOver) => {
                self.reset();
                true
            }
            (command, phase) => {
                log::debug!("Ignoring {:?} in {:?}", command, phase);
                false
            }
        }
    }

    pub fn start_round(&mut self) -> bool {
        self.apply(Command::StartRound)
    }

    pub fn stop_music(&mut self) -> bool {
        self.apply(Command::StopMusic)
    }

    pub fn restart_game(&mut self) -> bool {
        self.apply(Command::RestartGame)
    }

    /// Unseat the survivors, spread them round the track and take away a chair
    fn begin_round(&mut self) {
        let unseated: Vec<Player> = self
            .players
            .iter()
            .map(|player| {
                let mut player = player.clone();
                if player.is_active() {
                    player.is_sitting = false;
                    player.chair_index = None;
                }
                player
            })
            .collect();
        self.players = assign_track_positions(&unseated);
        self.chairs = remove_one_chair(&self.chairs);
        self.round += 1;
        self.phase = GamePhase::Playing;

        log::info!(
            "Round {}: {} players, {} chairs",
            self.round,
            self.active_players(),
            self.active_chairs()
        );
        self.events.push(GameEvent::RoundStarted {
            round: self.round,
            chairs: self.active_chairs(),
        });
    }

    /// Record every runner's lap marker
    fn stop_music_now(&mut self) {
        for player in self.players.iter_mut().filter(|p| p.is_running()) {
            player.start_position_when_stopped = Some(player.position);
        }
        self.phase = GamePhase::Stopping;
        log::info!("Music stopped at tick {}", self.time_ticks);
        self.events.push(GameEvent::MusicStopped);
    }

    fn reset(&mut self) {
        self.players = create_initial_players();
        self.chairs = create_initial_chairs();
        self.round = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Waiting;
        log::info!("Game restarted");
        self.events.push(GameEvent::GameRestarted);
    }

    /// Advance the simulation by one fixed tick
    pub fn tick(&mut self) {
        let step = match self.phase {
            GamePhase::Waiting | GamePhase::GameOver => return,
            GamePhase::Playing => self.tick_playing(),
            GamePhase::Stopping => self.tick_stopping(),
            GamePhase::Eliminating => self.tick_eliminating(),
        };

        self.time_ticks += 1;
        self.players = step.players;
        if let Some(chairs) = step.chairs {
            self.chairs = chairs;
        }
        self.events.extend(step.events);
        if step.next != self.phase {
            log::debug!("{:?} -> {:?}", self.phase, step.next);
            self.phase = step.next;
        }
    }

    fn tick_playing(&self) -> Step {
        Step::stay(GamePhase::Playing, advance_running(&self.players))
    }

    /// Move, check laps, claim chairs, then decide whether the round is over
    fn tick_stopping(&self) -> Step {
        let motion = advance_and_detect_laps(&self.players);
        let mut players = motion.players;
        let mut events = Vec::new();

        if let Some(id) = motion.lapped {
            log::info!("Player {} went a full lap without a seat", id + 1);
            events.push(GameEvent::PlayerJudgedOut {
                player: id,
                reason: JudgedOutReason::LapCompleted,
            });
        } else {
            // Claims only run when nobody was judged out this tick
            let claims = resolve_claims(&players, &self.chairs, self.center);
            for claim in &claims {
                log::debug!("Player {} sits on chair {}", claim.player + 1, claim.chair);
                events.push(GameEvent::PlayerSeated {
                    player: claim.player,
                    chair: claim.chair,
                });
            }
            players = apply_claims(&players, &claims);
        }

        let all_filled = self
            .chairs
            .iter()
            .filter(|c| !c.is_removed)
            .all(|c| is_chair_occupied(c, &players));

        if motion.lapped.is_none() && !all_filled {
            return Step {
                next: GamePhase::Stopping,
                players,
                chairs: None,
                events,
            };
        }

        if motion.lapped.is_none() {
            // Every chair is taken: whoever is still running is out
            let standing = players
                .iter()
                .position(|p| p.is_running() && !p.is_pending_elimination);
            if let Some(index) = standing {
                players[index].is_pending_elimination = true;
                let id = players[index].id;
                log::info!("Player {} is left without a chair", id + 1);
                events.push(GameEvent::PlayerJudgedOut {
                    player: id,
                    reason: JudgedOutReason::NoChairLeft,
                });
            }
        }

        Step {
            next: GamePhase::Eliminating,
            players,
            chairs: None,
            events,
        }
    }

    /// Walk the loser to the exit, animate the slide, then end the round or the game
    fn tick_eliminating(&self) -> Step {
        if has_pending_walkers(&self.players) {
            let walk = walk_to_exit(&self.players, &self.chairs, self.center);
            let events = walk
                .eliminated
                .iter()
                .map(|e| {
                    log::info!("Player {} eliminated (#{})", e.player + 1, e.order + 1);
                    GameEvent::PlayerEliminated {
                        player: e.player,
                        order: e.order,
                    }
                })
                .collect();
            return Step {
                next: GamePhase::Eliminating,
                players: walk.players,
                chairs: None,
                events,
            };
        }

        let (players, complete) = animate_eliminations(&self.players);
        if !complete {
            return Step::stay(GamePhase::Eliminating, players);
        }

        if active_player_count(&players) <= 1 {
            let winner = players.iter().find(|p| p.is_active()).map(|p| p.id);
            match winner {
                Some(id) => log::info!("Game over: player {} wins", id + 1),
                None => log::warn!("Game over with no players left"),
            }
            Step {
                next: GamePhase::GameOver,
                players,
                chairs: None,
                events: vec![GameEvent::RoundEnded, GameEvent::GameOver { winner }],
            }
        } else {
            Step {
                next: GamePhase::Waiting,
                players: seat_remaining_players(&players),
                chairs: None,
                events: vec![GameEvent::RoundEnded],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TOTAL_CHAIRS;
    use std::collections::HashSet;

    /// Tick until the phase changes, checking invariants on the way
    fn run_until_phase_changes(engine: &mut GameEngine, limit: u32) -> GamePhase {
        let start = engine.phase();
        for _ in 0..limit {
            engine.tick();
            assert_invariants(engine);
            if engine.phase() != start {
                return engine.phase();
            }
        }
        panic!("stuck in {:?}", start);
    }

    fn assert_invariants(engine: &GameEngine) {
        let mut seats = HashSet::new();
        for player in engine.players() {
            assert!((0.0..1.0).contains(&player.position));
            if !player.is_eliminated && player.is_sitting {
                let chair = player.chair_index.expect("sitting player has a chair");
                assert!(seats.insert(chair), "chair {} shared", chair);
            }
        }
        if engine.phase() == GamePhase::Stopping {
            assert_eq!(engine.active_players() - engine.active_chairs(), 1);
        }
        let mut orders: Vec<u32> = engine
            .players()
            .iter()
            .filter_map(|p| p.elimination_order)
            .collect();
        orders.sort_unstable();
        assert!(orders.iter().enumerate().all(|(i, o)| *o == i as u32));
    }

    /// Play one full round with the music running for `music_ticks`
    fn play_round(engine: &mut GameEngine, music_ticks: u32) {
        assert!(engine.start_round());
        for _ in 0..music_ticks {
            engine.tick();
            assert_invariants(engine);
        }
        assert!(engine.stop_music());
        let before = engine.active_players();
        assert_eq!(run_until_phase_changes(engine, 400), GamePhase::Eliminating);

        let judged_out = engine
            .players()
            .iter()
            .filter(|p| p.is_pending_elimination && !p.is_eliminated)
            .count();
        assert_eq!(judged_out, 1);
        assert_eq!(engine.active_players(), before - 1);

        let next = run_until_phase_changes(engine, 600);
        assert!(matches!(next, GamePhase::Waiting | GamePhase::GameOver));
    }

    #[test]
    fn test_start_round_spreads_players() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.phase(), GamePhase::Waiting);
        assert!(engine.start_round());

        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.active_chairs(), 9);
        assert_eq!(engine.round(), 1);
        assert!(engine.music_playing());
        for (i, player) in engine.players().iter().enumerate() {
            assert!(!player.is_sitting);
            assert!((player.position - i as f32 / 10.0).abs() < 1e-6);
        }
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::RoundStarted { round: 1, chairs: 9 }]
        );
    }

    #[test]
    fn test_stop_music_records_markers() {
        let mut engine = GameEngine::new();
        engine.start_round();
        for _ in 0..10 {
            engine.tick();
        }
        assert!(engine.stop_music());
        assert_eq!(engine.phase(), GamePhase::Stopping);
        assert!(!engine.music_playing());
        for player in engine.players() {
            assert_eq!(player.start_position_when_stopped, Some(player.position));
        }
    }

    #[test]
    fn test_invalid_commands_change_nothing() {
        let mut engine = GameEngine::new();
        let before = engine.clone();
        assert!(!engine.stop_music());
        assert!(!engine.restart_game());
        assert_eq!(engine, before);

        engine.start_round();
        engine.stop_music();
        let stopping = engine.clone();
        assert!(!engine.start_round());
        assert!(!engine.stop_music());
        assert!(!engine.restart_game());
        assert_eq!(engine, stopping);
        assert_eq!(engine.snapshot(), stopping.snapshot());
    }

    #[test]
    fn test_waiting_tick_is_idle() {
        let mut engine = GameEngine::new();
        let before = engine.snapshot();
        engine.tick();
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_one_round_eliminates_one_player() {
        let mut engine = GameEngine::new();
        play_round(&mut engine, 30);

        assert_eq!(engine.phase(), GamePhase::Waiting);
        assert_eq!(engine.active_players(), 9);
        assert_eq!(engine.active_chairs(), 9);

        let out: Vec<&Player> = engine.players().iter().filter(|p| p.is_eliminated).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].elimination_order, Some(0));
        assert_eq!(out[0].elimination_animation_progress, 1.0);

        // Survivors are seated with markers cleared
        for player in engine.players().iter().filter(|p| p.is_active()) {
            assert!(player.is_sitting);
            assert_eq!(player.start_position_when_stopped, None);
        }

        let events = engine.drain_events();
        assert!(events.contains(&GameEvent::MusicStopped));
        assert!(events.contains(&GameEvent::RoundEnded));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerJudgedOut { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_full_game_to_single_winner() {
        let mut engine = GameEngine::new();
        let mut rounds = 0;
        while engine.phase() != GamePhase::GameOver {
            play_round(&mut engine, 20 + rounds * 17);
            rounds += 1;
            assert_eq!(engine.active_chairs(), TOTAL_CHAIRS - rounds as usize);
            assert!(rounds < TOTAL_CHAIRS as u32);
        }

        assert_eq!(rounds, TOTAL_CHAIRS as u32 - 1);
        assert_eq!(engine.active_players(), 1);
        let winner = engine.winner().expect("a winner");
        assert!(winner.is_active());
        assert_eq!(engine.snapshot().winner, Some(winner.id));

        // Final loser was the (n - 2)th elimination
        let last_order = engine
            .players()
            .iter()
            .filter_map(|p| p.elimination_order)
            .max();
        assert_eq!(last_order, Some(TOTAL_CHAIRS as u32 - 2));

        let events = engine.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { winner: Some(_) })));

        // Game over ignores start/stop but accepts restart
        assert!(!engine.start_round());
        assert!(engine.restart_game());
        assert_eq!(engine.phase(), GamePhase::Waiting);
        assert_eq!(engine.players(), create_initial_players().as_slice());
        assert_eq!(engine.chairs(), create_initial_chairs().as_slice());
        assert_eq!(engine.round(), 0);
    }

    /// Music stopped with players 2.. seated, leaving one chair free and
    /// players 0 and 1 running; player 0 is one step short of a full lap
    fn stopped_with_lap_pending() -> GameEngine {
        let mut engine = GameEngine::new();
        engine.start_round();
        engine.stop_music();

        let free_chair = engine.chairs.iter().find(|c| !c.is_removed).map(|c| c.id).unwrap();
        let mut seats = engine
            .chairs
            .iter()
            .filter(|c| !c.is_removed && c.id != free_chair)
            .map(|c| c.id);
        for player in engine.players.iter_mut().skip(2) {
            player.is_sitting = true;
            player.chair_index = seats.next();
        }
        engine.players[0].position = 0.498;
        engine.players[0].start_position_when_stopped = Some(0.5);
        engine.players[1].position = 0.6;
        engine.players[1].start_position_when_stopped = Some(0.6);
        assert_invariants(&engine);
        engine
    }

    #[test]
    fn test_lapper_judged_out_other_runners_keep_going() {
        let mut engine = stopped_with_lap_pending();

        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Eliminating);
        assert!(engine.players[0].is_pending_elimination);
        assert!(!engine.players[1].is_pending_elimination);
        assert_eq!(
            engine.drain_events().last(),
            Some(&GameEvent::PlayerJudgedOut {
                player: 0,
                reason: JudgedOutReason::LapCompleted
            })
        );
    }

    #[test]
    fn test_lap_round_leaves_runner_standing_into_next_round() {
        let mut engine = stopped_with_lap_pending();
        assert_eq!(run_until_phase_changes(&mut engine, 10), GamePhase::Eliminating);
        assert_eq!(run_until_phase_changes(&mut engine, 600), GamePhase::Waiting);

        assert!(engine.players[0].is_eliminated);
        assert_eq!(engine.players[0].elimination_order, Some(0));
        // The other runner survives without a seat; a chair stays empty
        assert!(engine.players[1].is_active());
        assert!(!engine.players[1].is_sitting);
        assert_eq!(engine.active_players(), 9);
        assert_eq!(engine.active_chairs(), 9);

        assert!(engine.start_round());
        assert_eq!(engine.active_players(), 9);
        assert_eq!(engine.active_chairs(), 8);
        assert!(engine.players().iter().filter(|p| p.is_active()).all(|p| !p.is_sitting));
        for _ in 0..45 {
            engine.tick();
            assert_invariants(&engine);
        }
        assert!(engine.stop_music());
        assert_eq!(run_until_phase_changes(&mut engine, 400), GamePhase::Eliminating);
        assert_eq!(engine.active_players(), 8);
    }

    #[test]
    fn test_last_runner_out_when_all_chairs_taken() {
        let mut engine = GameEngine::new();
        engine.start_round();
        engine.stop_music();

        let mut seats = engine.chairs.iter().filter(|c| !c.is_removed).map(|c| c.id);
        for player in engine.players.iter_mut().skip(1) {
            player.is_sitting = true;
            player.chair_index = seats.next();
        }
        engine.drain_events();

        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Eliminating);
        assert!(engine.players[0].is_pending_elimination);
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::PlayerJudgedOut {
                player: 0,
                reason: JudgedOutReason::NoChairLeft
            }]
        );
    }

    #[test]
    fn test_restart_matches_fresh_game() {
        let mut engine = GameEngine::new();
        let mut rounds = 0;
        while engine.phase() != GamePhase::GameOver {
            play_round(&mut engine, 25);
            rounds += 1;
            assert!(rounds < TOTAL_CHAIRS);
        }
        assert!(engine.time_ticks() > 0);

        assert!(engine.restart_game());
        assert_eq!(engine.time_ticks(), 0);
        assert_eq!(engine.snapshot(), GameEngine::new().snapshot());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut engine = GameEngine::new();
        engine.start_round();
        let json = serde_json::to_string(&engine.snapshot()).expect("serialize");
        let back: GameSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.phase, GamePhase::Playing);
        assert_eq!(back.active_chairs, 9);
        assert!(back.music_playing);
    }

    #[test]
    fn test_status_line() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.status_line(), "Players: 10 | Chairs: 10");
        engine.start_round();
        assert_eq!(engine.status_line(), "Players: 10 | Chairs: 9");
    }
}

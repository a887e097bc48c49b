//! Game entities and registry operations
//!
//! Players and chairs are plain data. Registry operations take a slice and
//! return a fresh list, so a half-applied update is never observable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::stadium::elimination_slot;
use crate::consts::*;
use crate::ease_out_cubic;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Survivors seated, waiting for the music to start
    Waiting,
    /// Music playing, players circling the track
    Playing,
    /// Music stopped, players racing for a seat
    Stopping,
    /// Loser walking off and animating to the eliminated area
    Eliminating,
    /// One player left
    GameOver,
}

impl GamePhase {
    /// Whether the UI may issue a command in this phase
    pub fn accepts_commands(self) -> bool {
        matches!(self, GamePhase::Waiting | GamePhase::Playing | GamePhase::GameOver)
    }

    /// Label for the single control button
    pub fn action_label(self) -> &'static str {
        match self {
            GamePhase::Waiting => "Start Music",
            GamePhase::Playing => "Stop Music",
            GamePhase::Stopping => "Finding Chairs...",
            GamePhase::Eliminating => "Eliminating...",
            GamePhase::GameOver => "Play Again",
        }
    }
}

/// Which bank of chairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Left,
    Right,
}

/// A chair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chair {
    pub id: usize,
    pub column: Column,
    /// Vertical slot; row 0 is lowest on the canvas
    pub row: u32,
    pub is_removed: bool,
}

/// A player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    /// Display color (0xRRGGBB)
    pub color: u32,
    /// Track parameter in [0, 1); meaningless while seated
    pub position: f32,
    pub is_eliminated: bool,
    /// Judged out but still walking to the exit
    pub is_pending_elimination: bool,
    pub is_sitting: bool,
    /// Chair id, only meaningful while sitting
    pub chair_index: Option<usize>,
    /// Lap-detection marker recorded when the music stops
    pub start_position_when_stopped: Option<f32>,
    /// Exit animation progress (0 = at the track, 1 = in the eliminated area)
    pub elimination_animation_progress: f32,
    /// Canvas position at the moment of elimination
    pub elimination_start: Vec2,
    /// 0 for the first player eliminated
    pub elimination_order: Option<u32>,
}

impl Player {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            color: PLAYER_COLORS[id % PLAYER_COLORS.len()],
            position: 0.0,
            is_eliminated: false,
            is_pending_elimination: false,
            is_sitting: true,
            chair_index: Some(id),
            start_position_when_stopped: None,
            elimination_animation_progress: 0.0,
            elimination_start: Vec2::ZERO,
            elimination_order: None,
        }
    }

    /// Still competing (not eliminated and not judged out)
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_eliminated && !self.is_pending_elimination
    }

    /// Moving around the track looking for a seat
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.is_eliminated && !self.is_sitting
    }

    /// Number shown on the player's token
    pub fn label(&self) -> String {
        (self.id + 1).to_string()
    }

    /// Eased progress of the exit animation
    pub fn eased_exit_progress(&self) -> f32 {
        ease_out_cubic(self.elimination_animation_progress)
    }

    /// Where an eliminated player should be drawn on its way to the eliminated area
    pub fn exit_position(&self, screen_width: f32) -> Option<Vec2> {
        let order = self.elimination_order?;
        let target = elimination_slot(order, screen_width);
        Some(self.elimination_start.lerp(target, self.eased_exit_progress()))
    }
}

/// Why a player lost the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JudgedOutReason {
    /// Went a full lap after the music stopped without finding a seat
    LapCompleted,
    /// Every chair was taken
    NoChairLeft,
}

/// Things that happened during a tick or command, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32, chairs: usize },
    MusicStopped,
    PlayerSeated { player: usize, chair: usize },
    PlayerJudgedOut { player: usize, reason: JudgedOutReason },
    PlayerEliminated { player: usize, order: u32 },
    RoundEnded,
    GameOver { winner: Option<usize> },
    GameRestarted,
}

/// One player per chair, each seated on the chair with its own id
pub fn create_initial_players() -> Vec<Player> {
    (0..TOTAL_CHAIRS).map(Player::new).collect()
}

/// Chairs alternate between the left and right banks, two per row
pub fn create_initial_chairs() -> Vec<Chair> {
    (0..TOTAL_CHAIRS)
        .map(|id| Chair {
            id,
            column: if id % 2 == 0 { Column::Left } else { Column::Right },
            row: (id / 2) as u32,
            is_removed: false,
        })
        .collect()
}

/// Remove the first surviving chair in the highest surviving row
///
/// Returns the list unchanged when no chairs remain.
pub fn remove_one_chair(chairs: &[Chair]) -> Vec<Chair> {
    let Some(max_row) = chairs.iter().filter(|c| !c.is_removed).map(|c| c.row).max() else {
        return chairs.to_vec();
    };
    let target = chairs
        .iter()
        .find(|c| !c.is_removed && c.row == max_row)
        .map(|c| c.id);

    chairs
        .iter()
        .map(|chair| {
            let mut chair = chair.clone();
            if Some(chair.id) == target {
                chair.is_removed = true;
            }
            chair
        })
        .collect()
}

/// Spread non-eliminated players evenly around the track in list order
pub fn assign_track_positions(players: &[Player]) -> Vec<Player> {
    let count = players.iter().filter(|p| !p.is_eliminated).count();
    let mut index = 0;
    players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if !player.is_eliminated {
                player.position = index as f32 / count as f32;
                index += 1;
            }
            player
        })
        .collect()
}

/// Clear lap markers of seated survivors; they keep the chair they hold
pub fn seat_remaining_players(players: &[Player]) -> Vec<Player> {
    players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if !player.is_eliminated && player.is_sitting {
                player.start_position_when_stopped = None;
            }
            player
        })
        .collect()
}

/// Whether a non-eliminated player is sitting on the chair
pub fn is_chair_occupied(chair: &Chair, players: &[Player]) -> bool {
    players
        .iter()
        .any(|p| !p.is_eliminated && p.is_sitting && p.chair_index == Some(chair.id))
}

pub fn active_player_count(players: &[Player]) -> usize {
    players.iter().filter(|p| p.is_active()).count()
}

pub fn active_chair_count(chairs: &[Chair]) -> usize {
    chairs.iter().filter(|c| !c.is_removed).count()
}

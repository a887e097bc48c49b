//! Player motion and lap detection

use super::state::Player;
use crate::consts::MOVE_STEP;
use crate::wrap_unit;

/// Positions above this count as the tail of the lap for wrap detection
const WRAP_TAIL: f32 = 0.9;
/// Positions below this count as the head of the lap for wrap detection
const WRAP_HEAD: f32 = 0.1;
/// A forward crossing never jumps more than this in one step
const MAX_FORWARD_JUMP: f32 = 0.5;

/// Advance a track parameter by one step, wrapping at the lap boundary
#[inline]
pub fn advance(position: f32, step: f32) -> f32 {
    wrap_unit(position + step)
}

/// Whether moving from `previous` to `current` crossed the lap marker
///
/// `marker` is `None` when the player is not being tracked.
pub fn has_completed_lap(current: f32, marker: Option<f32>, previous: f32) -> bool {
    let Some(start) = marker else {
        return false;
    };

    let crossed_forward =
        previous < start && current >= start && (current - previous) < MAX_FORWARD_JUMP;
    let wrapped = previous > WRAP_TAIL && current < WRAP_HEAD;
    // Marker in the tail we just left
    let crossed_tail = wrapped && start > previous;
    // Marker in the head we just entered
    let crossed_head = wrapped && start < current;

    crossed_forward || crossed_tail || crossed_head
}

/// Result of one motion pass
#[derive(Debug, Clone)]
pub struct MotionOutcome {
    pub players: Vec<Player>,
    /// First player (in list order) found to have completed a lap
    pub lapped: Option<usize>,
}

/// Move every running player one step; in PLAYING nobody is lap-checked
pub fn advance_running(players: &[Player]) -> Vec<Player> {
    players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if player.is_running() {
                player.position = advance(player.position, MOVE_STEP);
            }
            player
        })
        .collect()
}

/// Move every running player one step and judge out the first one to finish a lap
///
/// Only one player can be judged out per round: once a lap is found, later
/// players in the same pass still move but are not checked.
pub fn advance_and_detect_laps(players: &[Player]) -> MotionOutcome {
    let mut lapped = None;
    let players = players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if !player.is_running() {
                return player;
            }
            let previous = player.position;
            player.position = advance(previous, MOVE_STEP);

            if lapped.is_none()
                && has_completed_lap(player.position, player.start_position_when_stopped, previous)
            {
                player.is_pending_elimination = true;
                lapped = Some(player.id);
            }
            player
        })
        .collect();

    MotionOutcome { players, lapped }
}

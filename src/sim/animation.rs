//! Elimination exit: the walk to the right straight, then the slide to the eliminated area
//!
//! Purely cosmetic apart from gating when ELIMINATING may end.

use glam::Vec2;

use super::motion::advance;
use super::stadium::{PathSegment, StadiumGeometry};
use super::state::{Chair, Player};
use crate::consts::{ELIMINATION_ANIMATION_SPEED, MOVE_STEP};

/// A player that finished the walk this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elimination {
    pub player: usize,
    pub order: u32,
}

/// Result of one exit-walk step
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub players: Vec<Player>,
    pub eliminated: Vec<Elimination>,
}

/// Whether anyone judged out is still walking to the exit
pub fn has_pending_walkers(players: &[Player]) -> bool {
    players.iter().any(|p| p.is_pending_elimination && !p.is_eliminated)
}

/// Step every pending player along the track; on reaching the right straight they are eliminated
///
/// Elimination order continues from the number of players already eliminated.
pub fn walk_to_exit(players: &[Player], chairs: &[Chair], center: Vec2) -> WalkOutcome {
    let geometry = StadiumGeometry::from_chairs(chairs);
    let mut next_order = players.iter().filter(|p| p.is_eliminated).count() as u32;
    let mut eliminated = Vec::new();

    let players = players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if !player.is_pending_elimination || player.is_eliminated {
                return player;
            }
            player.position = advance(player.position, MOVE_STEP);

            if geometry.segment_at(player.position) == PathSegment::RightStraight {
                player.is_eliminated = true;
                player.elimination_start = geometry.point_at(player.position, center);
                player.elimination_order = Some(next_order);
                eliminated.push(Elimination {
                    player: player.id,
                    order: next_order,
                });
                next_order += 1;
            }
            player
        })
        .collect();

    WalkOutcome { players, eliminated }
}

/// Advance a progress value by one animation step, clamped to 1
#[inline]
pub fn step_progress(progress: f32) -> f32 {
    (progress + ELIMINATION_ANIMATION_SPEED).min(1.0)
}

/// Step the exit animation of every eliminated player
///
/// Returns the updated players and whether every animation had already
/// finished before this step.
pub fn animate_eliminations(players: &[Player]) -> (Vec<Player>, bool) {
    let mut complete = true;
    let players = players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if player.is_eliminated && player.elimination_animation_progress < 1.0 {
                complete = false;
                player.elimination_animation_progress =
                    step_progress(player.elimination_animation_progress);
            }
            player
        })
        .collect();
    (players, complete)
}

//! Chair claim resolution
//!
//! Runs once per STOPPING tick. Players are considered in ascending track
//! parameter order and the first to reach a free chair wins it. The order is
//! a global sort, which only approximates arrival order within a single
//! straight.

use std::collections::HashSet;

use glam::Vec2;

use super::stadium::{StadiumGeometry, chair_position};
use super::state::{Chair, Player, is_chair_occupied};
use crate::consts::CLAIM_TOLERANCE;

/// A successful claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub player: usize,
    pub chair: usize,
}

/// First free chair in the reachable column whose seat lines up with the player
///
/// Occupancy is judged against the pre-tick snapshot in `players`.
pub fn find_claimable_chair<'a>(
    player: &Player,
    chairs: &'a [Chair],
    players: &[Player],
    geometry: &StadiumGeometry,
    center: Vec2,
) -> Option<&'a Chair> {
    let column = geometry.segment_at(player.position).reachable_column()?;
    let player_y = geometry.point_at(player.position, center).y;

    chairs.iter().find(|chair| {
        !chair.is_removed
            && chair.column == column
            && (player_y - chair_position(chair, center).y).abs() < CLAIM_TOLERANCE
            && !is_chair_occupied(chair, players)
    })
}

/// Work out every claim for this tick without touching the snapshot
pub fn resolve_claims(players: &[Player], chairs: &[Chair], center: Vec2) -> Vec<Claim> {
    let geometry = StadiumGeometry::from_chairs(chairs);

    let mut contenders: Vec<&Player> = players.iter().filter(|p| p.is_running()).collect();
    // Stable sort keeps list order for equal parameters
    contenders.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut claims = Vec::new();

    for player in contenders {
        let Some(chair) = find_claimable_chair(player, chairs, players, &geometry, center) else {
            continue;
        };
        if claimed.insert(chair.id) {
            claims.push(Claim {
                player: player.id,
                chair: chair.id,
            });
        }
    }

    claims
}

/// Seat every claiming player at once
pub fn apply_claims(players: &[Player], claims: &[Claim]) -> Vec<Player> {
    players
        .iter()
        .map(|player| {
            let mut player = player.clone();
            if let Some(claim) = claims.iter().find(|c| c.player == player.id) {
                player.is_sitting = true;
                player.chair_index = Some(claim.chair);
            }
            player
        })
        .collect()
}
